//! Case study import from a JSON file

use crate::catalog::{CatalogDb, RunOperation, RunStatus, RunTotals};
use crate::error::{Error, Result};
use crate::models::{CaseStudyRecord, CaseStudyStatus};
use crate::upsert::{RecordFailure, Upserter};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One case study as written by the content team
#[derive(Debug, Clone, Deserialize)]
pub struct CaseStudyInput {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub challenge: String,
    #[serde(default)]
    pub approach: String,
    #[serde(default)]
    pub results: String,
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub metrics: Option<serde_json::Value>,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    #[serde(default)]
    pub seo_keywords: Vec<String>,
    #[serde(default)]
    pub status: CaseStudyStatus,
    #[serde(default)]
    pub featured: bool,
}

impl From<CaseStudyInput> for CaseStudyRecord {
    fn from(input: CaseStudyInput) -> Self {
        let slug = input
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&input.title));
        Self {
            video_id: input.video_id.trim().to_string(),
            title: input.title.trim().to_string(),
            slug,
            client_name: input.client_name,
            challenge: input.challenge,
            approach: input.approach,
            results: input.results,
            key_takeaways: input.key_takeaways,
            metrics: input.metrics,
            seo_title: input.seo_title,
            seo_description: input.seo_description,
            seo_keywords: input.seo_keywords,
            status: input.status,
            featured: input.featured,
        }
    }
}

/// Lowercase, ASCII alphanumerics joined by single hyphens
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Case studies read from a file, plus the entries that could not be decoded
#[derive(Debug, Default)]
pub struct LoadedCaseStudies {
    pub records: Vec<CaseStudyRecord>,
    pub failures: Vec<RecordFailure>,
}

/// Read case studies from a JSON array file
///
/// An unreadable file or a document that is not an array is a configuration
/// error. A single malformed entry is reported and skipped.
pub fn load_case_studies(path: &Path) -> Result<LoadedCaseStudies> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read case studies {}: {}", path.display(), e))
    })?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Invalid case studies file {}: {}", path.display(), e))
    })?;

    let mut loaded = LoadedCaseStudies::default();
    for (index, entry) in entries.into_iter().enumerate() {
        let key = entry
            .get("video_id")
            .and_then(|v| v.as_str())
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("entry[{}]", index));

        match serde_json::from_value::<CaseStudyInput>(entry) {
            Ok(input) => loaded.records.push(CaseStudyRecord::from(input)),
            Err(e) => {
                let e = Error::from(e);
                warn!(key = %key, error = %e, "Skipping case study entry");
                loaded.failures.push(RecordFailure {
                    key,
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(loaded)
}

/// Statistics from a case study import
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStudyImportStats {
    pub run_id: String,
    pub loaded: usize,
    pub written: usize,
    pub failures: Vec<RecordFailure>,
}

/// Import case studies, marking each referenced video featured
pub async fn cmd_import_case_studies(db: &CatalogDb, path: &Path) -> Result<CaseStudyImportStats> {
    let LoadedCaseStudies { records, failures } = load_case_studies(path)?;
    info!(
        "Loaded {} case studies from {:?} ({} unreadable)",
        records.len(),
        path,
        failures.len()
    );

    let run = db
        .start_import_run(None, RunOperation::CaseStudies)
        .await?;

    let report = match Upserter::new(db).case_studies(&records).await {
        Ok(report) => report,
        Err(e) => {
            let totals = RunTotals {
                errors: vec![e.to_string()],
                ..Default::default()
            };
            db.complete_import_run(&run.id, RunStatus::Failed, &totals)
                .await?;
            return Err(e);
        }
    };

    let mut stats = CaseStudyImportStats {
        run_id: run.id,
        loaded: records.len() + failures.len(),
        written: report.written,
        failures,
    };
    stats.failures.extend(report.failures);

    let status = if stats.failures.is_empty() {
        RunStatus::Completed
    } else {
        RunStatus::Partial
    };
    let totals = RunTotals {
        case_studies_written: stats.written as i64,
        errors: stats.failures.iter().map(ToString::to_string).collect(),
        ..Default::default()
    };
    db.complete_import_run(&stats.run_id, status, &totals).await?;

    Ok(stats)
}

pub fn print_case_study_stats(stats: &CaseStudyImportStats) {
    println!("\n✓ Case study import complete");
    println!("  Loaded: {}", stats.loaded);
    println!("  Written: {}", stats.written);
    if !stats.failures.is_empty() {
        println!("\n  Skipped ({}):", stats.failures.len());
        for failure in &stats.failures {
            println!("    - {}", failure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{sample_playlist, sample_video, setup_test_db};
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Northwind Rebrand: 2024!"), "northwind-rebrand-2024");
        assert_eq!(slugify("  --Hello   World--  "), "hello-world");
        assert_eq!(slugify("Café Launch"), "caf-launch");
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let input: CaseStudyInput = serde_json::from_str(
            r#"{"video_id": " v1 ", "title": "Launch Film", "metrics": {"views": 10}}"#,
        )
        .unwrap();
        let record = CaseStudyRecord::from(input);
        assert_eq!(record.video_id, "v1");
        assert_eq!(record.slug, "launch-film");
        assert_eq!(record.status, CaseStudyStatus::Draft);
        assert!(record.key_takeaways.is_empty());
        assert!(record.metrics.is_some());
    }

    #[test]
    fn test_bad_file_is_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("studies.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = load_case_studies(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(load_case_studies(&tmp.path().join("missing.json")).is_err());

        std::fs::write(&path, r#"{"video_id": "v1", "title": "Not a list"}"#).unwrap();
        let err = load_case_studies(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_malformed_entry_is_skipped() {
        let (db, tmp) = setup_test_db().await;
        db.upsert_playlist(&sample_playlist("PL1", "Commercials"))
            .await
            .unwrap();
        db.upsert_video(&sample_video("v1", "PL1", 0)).await.unwrap();
        db.upsert_video(&sample_video("v2", "PL1", 1)).await.unwrap();
        db.upsert_video(&sample_video("v3", "PL1", 2)).await.unwrap();

        let path = tmp.path().join("studies.json");
        std::fs::write(
            &path,
            r#"[
                {"video_id": "v1", "title": "Northwind Rebrand"},
                {"video_id": "v2", "title": "Harbor Launch", "status": "live"},
                {"title": "No video"},
                {"video_id": "v3", "title": "Summit Recap"}
            ]"#,
        )
        .unwrap();

        let stats = cmd_import_case_studies(&db, &path).await.unwrap();
        assert_eq!(stats.loaded, 4);
        assert_eq!(stats.written, 2);
        assert_eq!(stats.failures.len(), 2);
        assert_eq!(stats.failures[0].key, "v2");
        assert_eq!(stats.failures[0].kind, ErrorKind::Recoverable);
        assert_eq!(stats.failures[1].key, "entry[2]");

        assert!(db.get_video("v1").await.unwrap().unwrap().featured);
        assert!(!db.get_video("v2").await.unwrap().unwrap().featured);
        assert!(db.get_video("v3").await.unwrap().unwrap().featured);

        let run = db.get_import_run(&stats.run_id).await.unwrap().unwrap();
        assert_eq!(run.status, "partial");
        assert_eq!(run.case_studies_written, 2);
    }

    #[tokio::test]
    async fn test_import_case_studies() {
        let (db, tmp) = setup_test_db().await;
        db.upsert_playlist(&sample_playlist("PL1", "Commercials"))
            .await
            .unwrap();
        db.upsert_video(&sample_video("v1", "PL1", 0)).await.unwrap();

        let path = tmp.path().join("studies.json");
        std::fs::write(
            &path,
            r#"[
                {"video_id": "v1", "title": "Northwind Rebrand", "status": "published",
                 "challenge": "Six weeks", "key_takeaways": ["Ship early"]},
                {"video_id": "ghost", "title": "Lost Project"}
            ]"#,
        )
        .unwrap();

        let stats = cmd_import_case_studies(&db, &path).await.unwrap();
        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.written, 1);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].key, "ghost");

        assert!(db.get_video("v1").await.unwrap().unwrap().featured);
        let study = db.get_case_study_by_video("v1").await.unwrap().unwrap();
        assert_eq!(study.slug, "northwind-rebrand");
        assert_eq!(study.status, "published");

        let run = db.get_import_run(&stats.run_id).await.unwrap().unwrap();
        assert_eq!(run.operation, "case_studies");
        assert_eq!(run.status, "partial");
        assert_eq!(run.case_studies_written, 1);
    }
}
