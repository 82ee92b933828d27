//! Content module - Markdown posts: reading, parsing, querying and checking

pub mod accessor;
pub mod checker;
pub mod error;
mod frontmatter;
mod markdown;
mod post;
pub mod repository;
pub mod samples;

pub use accessor::ContentDir;
pub use checker::{validate, ConsistencyReport};
pub use error::{LoadError, LoadResult};
pub use frontmatter::FrontMatter;
pub use markdown::{html_escape, MarkdownRenderer};
pub use post::{format_iso, parse_date_string, slug_from_filename, Post, PostMetadata};
pub use repository::PostRepository;
pub use samples::{SampleSet, PLACEHOLDER_CONTENT};
