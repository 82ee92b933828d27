//! Initialize a new site: config, content directory and sample posts

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::ConsistencyReport;
use crate::{Folio, CONFIG_FILE};

const DEFAULT_CONFIG: &str = r#"# Folio configuration

# Site
title: Folio
description: ''
author: Anonymous
url: http://localhost:4000

# Content
content_dir: blogs
# strict | development | mock
# FOLIO_ENV and FOLIO_MOCK_DATA override this at startup
mode: development

# Server
server:
  ip: localhost
  port: 4000

# Code blocks
highlight:
  theme: base16-ocean.dark
  line_number: false
"#;

/// Initialize a site in `target_dir`.
///
/// Existing files are left alone; only missing sample posts are written.
pub fn init_site(target_dir: &Path) -> Result<ConsistencyReport> {
    fs::create_dir_all(target_dir)?;

    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        tracing::info!("Keeping existing {:?}", config_path);
    } else {
        fs::write(&config_path, DEFAULT_CONFIG)?;
        tracing::info!("Created {:?}", config_path);
    }

    let folio = Folio::new(target_dir)?;
    run(&folio)
}

/// Write the sample posts if needed, then report consistency
pub fn run(folio: &Folio) -> Result<ConsistencyReport> {
    tracing::info!("Initializing blog content in {:?}", folio.content_dir);

    if folio.mode().is_development() {
        folio.materialize_samples();
    } else {
        tracing::warn!(
            "Mode is {:?}; sample posts are only written in development modes",
            folio.mode()
        );
        folio.content().ensure_directory();
    }

    let report = folio.validate();
    if report.valid {
        tracing::info!("Blog content initialized successfully");
    } else {
        tracing::warn!("Blog content initialized with warnings");
        if !report.missing_files.is_empty() {
            tracing::warn!("Missing files: {}", report.missing_files.join(", "));
        }
        if !report.invalid_metadata.is_empty() {
            tracing::warn!(
                "Files with invalid metadata: {}",
                report.invalid_metadata.join(", ")
            );
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContentMode, SiteConfig};
    use tempfile::TempDir;

    #[test]
    fn test_run_writes_samples_in_development_mode() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            mode: ContentMode::DevWithFallback,
            ..Default::default()
        };
        let folio = Folio::with_config(tmp.path(), config);

        let report = run(&folio).unwrap();
        assert!(report.valid, "{:?}", report);
        assert_eq!(
            folio.content().list_content_files().len(),
            crate::content::SampleSet::builtin().files().len()
        );
    }

    #[test]
    fn test_run_in_strict_mode_reports_missing_samples() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::with_config(tmp.path(), SiteConfig::default());

        let report = run(&folio).unwrap();
        assert!(!report.valid);
        assert!(folio.content().directory_exists());
        assert!(folio.content().list_content_files().is_empty());
    }

    #[test]
    fn test_default_config_parses() {
        let config: SiteConfig = serde_yaml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.mode, ContentMode::DevWithFallback);
        assert_eq!(config.content_dir, "blogs");
    }

    #[test]
    fn test_init_site_keeps_existing_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: Mine\nmode: strict\n").unwrap();

        init_site(tmp.path()).unwrap();
        let kept = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(kept, "title: Mine\nmode: strict\n");
    }
}
