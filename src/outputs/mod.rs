//! Output generation for batch runs.
//!
//! # Submodules
//!
//! - [`json`]: Writes the whole [`BatchRun`](crate::models::BatchRun) as JSON
//! - [`report`]: Builds and writes the plain-text summary report
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2026-07-01/
//!     ├── results.json
//!     └── report.txt
//! ```

pub mod json;
pub mod report;

use std::path::{Path, PathBuf};

use crate::models::BatchRun;

/// Directory holding the outputs of `run`.
pub fn run_dir(output_dir: &Path, run: &BatchRun) -> PathBuf {
    output_dir.join(run.run_date.to_string())
}
