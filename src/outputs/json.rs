//! JSON output of a batch run.
//!
//! Each kept article is written with its score, relevance label, every
//! individual keyword match and the per-category breakdown, next to the
//! per-source session stats and the error log.

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

use super::run_dir;
use crate::error::RelevanceError;
use crate::models::BatchRun;

/// Write `run` to `{output_dir}/{run_date}/results.json`.
///
/// # Returns
///
/// The path of the written file.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.display()))]
pub async fn write_batch_run(run: &BatchRun, output_dir: &Path) -> Result<PathBuf, RelevanceError> {
    let json = serde_json::to_string_pretty(run)?;

    let dir = run_dir(output_dir, run);
    info!(dir = %dir.display(), "Ensuring JSON directory exists");
    if let Err(e) = fs::create_dir_all(&dir).await {
        error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
        return Err(RelevanceError::io(&dir, e));
    }

    let path = dir.join("results.json");
    fs::write(&path, json)
        .await
        .map_err(|e| RelevanceError::io(&path, e))?;
    info!(
        path = %path.display(),
        articles = run.articles.len(),
        sessions = run.sessions.len(),
        errors = run.errors.len(),
        "Wrote results JSON"
    );
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::{Article, BatchRun};
    use crate::pipeline::run_batch;
    use crate::scoring::RelevanceScorer;

    fn sample_run() -> BatchRun {
        let config = AppConfig::default();
        let scorer = RelevanceScorer::new(&config.rule_book()).unwrap();
        let articles = vec![Article {
            source: Some("Calexico Chronicle".to_string()),
            url: "https://calexicochronicle.com/heat".to_string(),
            title: "Farm worker heat death".to_string(),
            text: "A heat advisory was in effect.".to_string(),
            authors: vec!["Staff".to_string()],
            published_date: None,
            language: None,
        }];
        run_batch(articles, &config, &scorer, 50)
    }

    #[tokio::test]
    async fn test_write_batch_run() {
        let dir = tempfile::tempdir().unwrap();
        let run = sample_run();
        let path = write_batch_run(&run, dir.path()).await.unwrap();

        assert_eq!(
            path,
            dir.path().join(run.run_date.to_string()).join("results.json")
        );
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let article = &written["articles"][0];
        assert_eq!(article["relevance"], "HIGHLY_RELEVANT");
        assert_eq!(article["language"], "en");
        assert_eq!(article["categories"]["primary_death"]["matches"], 1);
        assert_eq!(article["matches"][0]["keyword"], "heat death");
        assert_eq!(written["sessions"][0]["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn test_written_run_deserializes() {
        let dir = tempfile::tempdir().unwrap();
        let run = sample_run();
        let path = write_batch_run(&run, dir.path()).await.unwrap();
        let back: BatchRun = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.articles.len(), 1);
        assert_eq!(back.articles[0].score, run.articles[0].score);
    }
}
