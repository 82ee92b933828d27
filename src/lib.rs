//! folio: a Markdown-backed personal blog
//!
//! Posts are Markdown files with a YAML front-matter header kept in a single
//! content directory. This crate reads them into an in-memory collection,
//! answers queries by slug and tag, checks the directory for drift against the
//! built-in sample posts, and serves the result over a small HTTP API.

pub mod commands;
pub mod config;
pub mod content;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use config::{ContentMode, SiteConfig};
use content::{ConsistencyReport, ContentDir, PostRepository, SampleSet};

/// Name of the site configuration file inside the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application handle
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration, environment overrides applied
    pub config: SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the Markdown posts
    pub content_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration; no environment lookup
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    pub fn mode(&self) -> ContentMode {
        self.config.mode
    }

    pub fn content(&self) -> ContentDir {
        ContentDir::new(&self.content_dir)
    }

    /// A fresh repository; its post collection is computed on first read
    pub fn repository(&self) -> PostRepository {
        PostRepository::new(self.content(), self.mode())
    }

    /// Compare the built-in sample posts with the content directory
    pub fn validate(&self) -> ConsistencyReport {
        content::validate(&self.content(), &SampleSet::builtin())
    }

    /// Write any missing sample posts (development modes only)
    pub fn materialize_samples(&self) -> usize {
        SampleSet::builtin().materialize(&self.content(), self.mode())
    }
}
