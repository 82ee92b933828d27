//! Built-in sample posts
//!
//! Used so a fresh site has something to show during local development: the
//! repository falls back to them when the content directory is missing or
//! empty, and `folio init` writes them to disk.

use super::accessor::ContentDir;
use super::post::{parse_date_string, Post, PostMetadata};
use crate::config::ContentMode;

/// Body used when a post's file cannot be read
pub const PLACEHOLDER_CONTENT: &str =
    "This post's content is not available. Add its Markdown file to the content directory to replace this placeholder.";

struct SampleRecord {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    date: &'static str,
    tags: &'static [&'static str],
    thumbnail: &'static str,
    markdown: &'static str,
}

const BUILTIN: &[SampleRecord] = &[
    SampleRecord {
        slug: "welcome-to-folio",
        title: "Welcome to Folio",
        description: "A quick tour of how this blog turns a folder of Markdown files into posts.",
        date: "2024-03-18",
        tags: &["Meta", "Getting Started"],
        thumbnail: "/images/welcome.jpg",
        markdown: include_str!("samples/welcome-to-folio.md"),
    },
    SampleRecord {
        slug: "writing-posts-in-markdown",
        title: "Writing Posts in Markdown",
        description: "The front-matter fields Folio understands and what happens when they are missing.",
        date: "2024-02-27",
        tags: &["Markdown", "Writing"],
        thumbnail: "/images/markdown.jpg",
        markdown: include_str!("samples/writing-posts-in-markdown.md"),
    },
    SampleRecord {
        slug: "organizing-with-tags",
        title: "Organizing Posts with Tags",
        description: "Tags group related posts and get their own listing pages.",
        date: "2024-01-09",
        tags: &["Writing", "Tags"],
        thumbnail: "/images/tags.jpg",
        markdown: include_str!("samples/organizing-with-tags.md"),
    },
    SampleRecord {
        slug: "serving-the-site",
        title: "Serving the Site",
        description: "Running the built-in server and using the JSON API.",
        date: "2023-12-02",
        tags: &["Getting Started", "API"],
        thumbnail: "/images/server.jpg",
        markdown: include_str!("samples/serving-the-site.md"),
    },
];

/// A fixed set of known posts: metadata records plus the full Markdown
/// (front-matter and body) of each file
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    metadata: Vec<PostMetadata>,
    files: Vec<(String, String)>,
}

impl SampleSet {
    pub fn new(metadata: Vec<PostMetadata>, files: Vec<(String, String)>) -> Self {
        Self { metadata, files }
    }

    /// The samples shipped with the binary
    pub fn builtin() -> Self {
        let mut metadata = Vec::with_capacity(BUILTIN.len());
        let mut files = Vec::with_capacity(BUILTIN.len());

        for record in BUILTIN {
            let filename = format!("{}.md", record.slug);
            let Some(date) = parse_date_string(record.date) else {
                tracing::error!("Built-in sample {} has a bad date", record.slug);
                continue;
            };
            metadata.push(PostMetadata {
                slug: record.slug.to_string(),
                title: record.title.to_string(),
                description: record.description.to_string(),
                date,
                author: "Folio".to_string(),
                tags: record.tags.iter().map(|t| t.to_string()).collect(),
                thumbnail: Some(record.thumbnail.to_string()),
                filename: filename.clone(),
            });
            files.push((filename, record.markdown.to_string()));
        }

        Self { metadata, files }
    }

    pub fn metadata(&self) -> &[PostMetadata] {
        &self.metadata
    }

    /// (file name, full Markdown text) pairs
    pub fn files(&self) -> &[(String, String)] {
        &self.files
    }

    /// One placeholder-bodied post per metadata record
    pub fn stub_posts(&self) -> Vec<Post> {
        self.metadata.iter().map(stub_post).collect()
    }

    /// Write every sample file that is not on disk yet.
    ///
    /// Never overwrites, and does nothing outside development-capable modes.
    /// Returns how many files were created.
    pub fn materialize(&self, dir: &ContentDir, mode: ContentMode) -> usize {
        if !mode.is_development() {
            tracing::debug!("Not writing sample posts in {:?} mode", mode);
            return 0;
        }

        tracing::info!("Checking for sample Markdown files...");
        if !dir.ensure_directory() {
            tracing::error!("Failed to create content directory, cannot write sample files");
            return 0;
        }

        let mut created = 0;
        for (name, text) in &self.files {
            if !dir.file_exists(name) && dir.write_file(name, text) {
                created += 1;
            }
        }

        if created > 0 {
            tracing::info!("Wrote {} sample posts to {:?}", created, dir.root());
        } else {
            tracing::info!("No sample files needed to be written");
        }
        created
    }
}

/// A post built from known metadata with the placeholder body
pub fn stub_post(meta: &PostMetadata) -> Post {
    Post::from_metadata(meta, PLACEHOLDER_CONTENT.to_string())
}
