//! Consistency check between the known sample set and the files on disk

use serde::{Deserialize, Serialize};

use super::accessor::ContentDir;
use super::error::{LoadError, LoadResult};
use super::repository::load_post;
use super::samples::SampleSet;

/// Outcome of a consistency check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub valid: bool,
    /// Known files that are not on disk
    pub missing_files: Vec<String>,
    /// Files on disk that fail to parse or lack required fields
    pub invalid_metadata: Vec<String>,
}

/// Reconcile `samples` against the content directory. Never fails: an
/// unexpected error yields an all-empty, invalid report.
pub fn validate(dir: &ContentDir, samples: &SampleSet) -> ConsistencyReport {
    match try_validate(dir, samples) {
        Ok(report) => {
            if report.valid {
                tracing::info!("Content is consistent");
            } else {
                tracing::warn!(
                    "Content has inconsistencies: {} missing, {} invalid",
                    report.missing_files.len(),
                    report.invalid_metadata.len()
                );
            }
            report
        }
        Err(e) => {
            tracing::error!("Consistency check failed: {}", e);
            ConsistencyReport::default()
        }
    }
}

fn try_validate(dir: &ContentDir, samples: &SampleSet) -> LoadResult<ConsistencyReport> {
    let missing_files: Vec<String> = samples
        .metadata()
        .iter()
        .filter(|meta| !dir.file_exists(&meta.filename))
        .map(|meta| meta.filename.clone())
        .collect();

    let on_disk = match dir.try_list() {
        Ok(files) => files,
        Err(LoadError::NotFound(_)) => Vec::new(),
        Err(e) => return Err(e),
    };

    let mut invalid_metadata = Vec::new();
    for filename in on_disk {
        match load_post(dir, &filename) {
            Ok(_) => {}
            Err(LoadError::Io(reason)) => return Err(LoadError::Io(reason)),
            Err(e) => {
                tracing::warn!("Invalid content file {}: {}", filename, e);
                invalid_metadata.push(filename);
            }
        }
    }

    Ok(ConsistencyReport {
        valid: missing_files.is_empty() && invalid_metadata.is_empty(),
        missing_files,
        invalid_metadata,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::post::parse_date_string;
    use crate::content::PostMetadata;
    use std::fs;
    use tempfile::TempDir;

    fn known(filenames: &[&str]) -> SampleSet {
        let metadata = filenames
            .iter()
            .map(|name| PostMetadata {
                slug: name.trim_end_matches(".md").to_string(),
                title: name.to_string(),
                description: String::new(),
                date: parse_date_string("2024-01-01").unwrap(),
                author: "Tester".to_string(),
                tags: Vec::new(),
                thumbnail: None,
                filename: name.to_string(),
            })
            .collect();
        SampleSet::new(metadata, Vec::new())
    }

    #[test]
    fn test_reports_missing_known_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "---\ntitle: A\ndate: 2024-01-01\n---\nA").unwrap();

        let report = validate(&ContentDir::new(tmp.path()), &known(&["a.md", "b.md"]));
        assert_eq!(
            report,
            ConsistencyReport {
                valid: false,
                missing_files: vec!["b.md".to_string()],
                invalid_metadata: vec![],
            }
        );
    }

    #[test]
    fn test_reports_invalid_files_on_disk() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "---\ntitle: A\ndate: 2024-01-01\n---\nA").unwrap();
        fs::write(tmp.path().join("no-title.md"), "---\ndate: 2024-01-01\n---\nB").unwrap();
        fs::write(tmp.path().join("bad.mdx"), "---\ntitle: [x\n---\nC").unwrap();

        let report = validate(&ContentDir::new(tmp.path()), &known(&["a.md"]));
        assert!(!report.valid);
        assert!(report.missing_files.is_empty());
        assert_eq!(report.invalid_metadata, vec!["bad.mdx", "no-title.md"]);
    }

    #[test]
    fn test_consistent_content() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "---\ntitle: A\ndate: 2024-01-01\n---\nA").unwrap();

        let report = validate(&ContentDir::new(tmp.path()), &known(&["a.md"]));
        assert!(report.valid);
    }

    #[test]
    fn test_missing_directory_lists_every_known_file() {
        let tmp = TempDir::new().unwrap();
        let report = validate(
            &ContentDir::new(tmp.path().join("nope")),
            &known(&["a.md", "b.md"]),
        );
        assert!(!report.valid);
        assert_eq!(report.missing_files, vec!["a.md", "b.md"]);
        assert!(report.invalid_metadata.is_empty());
    }

    #[test]
    fn test_io_error_yields_empty_report() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.md"), "---\ntitle: A\ndate: 2024-01-01\n---\nA").unwrap();
        fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00, 0xc3, 0x28]).unwrap();

        let report = validate(&ContentDir::new(tmp.path()), &known(&["a.md", "b.md"]));
        assert_eq!(report, ConsistencyReport::default());
        assert!(!report.valid);
    }

    #[test]
    fn test_json_field_names() {
        let report = ConsistencyReport {
            valid: false,
            missing_files: vec!["b.md".to_string()],
            invalid_metadata: Vec::new(),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["missingFiles"][0], "b.md");
        assert!(json["invalidMetadata"].as_array().unwrap().is_empty());
    }
}
