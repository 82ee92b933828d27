//! Post repository - the memoized post collection and its query views

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use super::accessor::{ContentDir, CONTENT_EXTENSIONS};
use super::error::{LoadError, LoadResult};
use super::samples::{SampleSet, PLACEHOLDER_CONTENT};
use super::{FrontMatter, Post};
use crate::config::ContentMode;

/// Read, parse and assemble a single content file
pub fn load_post(dir: &ContentDir, filename: &str) -> LoadResult<Post> {
    let text = dir.try_read(filename)?;
    let (fm, body) = FrontMatter::parse(&text)?;
    Post::try_assemble(filename, &fm, body)
}

/// Slugs come from URLs; anything that could escape the content directory is refused
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.contains(['/', '\\']) && !slug.contains("..")
}

/// Owns the post collection for the lifetime of the process.
///
/// The collection is computed on first use and served from memory afterwards;
/// edits on disk are only seen after [`PostRepository::invalidate`] or a restart.
/// None of the query methods fail: problems are logged and degrade to empty
/// results, `None`, or the sample stubs in development modes.
#[derive(Debug)]
pub struct PostRepository {
    dir: ContentDir,
    mode: ContentMode,
    samples: SampleSet,
    cache: RwLock<Option<Arc<Vec<Post>>>>,
}

impl PostRepository {
    /// Repository over `dir` using the built-in sample posts as fallback
    pub fn new(dir: ContentDir, mode: ContentMode) -> Self {
        Self::with_samples(dir, mode, SampleSet::builtin())
    }

    pub fn with_samples(dir: ContentDir, mode: ContentMode, samples: SampleSet) -> Self {
        Self {
            dir,
            mode,
            samples,
            cache: RwLock::new(None),
        }
    }

    pub fn mode(&self) -> ContentMode {
        self.mode
    }

    pub fn content_dir(&self) -> &ContentDir {
        &self.dir
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// All posts, newest first. Computed once, then shared.
    pub fn get_all_posts(&self) -> Arc<Vec<Post>> {
        if let Some(posts) = self.cached() {
            return posts;
        }

        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // another caller may have filled it while we waited
        if let Some(posts) = guard.as_ref() {
            return Arc::clone(posts);
        }

        let posts = Arc::new(self.compute());
        *guard = Some(Arc::clone(&posts));
        posts
    }

    /// Look a post up by slug.
    ///
    /// Falls back to reading `<slug>.md` / `<slug>.mdx` directly when the
    /// cached collection has no match. A post found that way is returned but
    /// not added to the cache. Only the direct read refuses path-like slugs.
    pub fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        let posts = self.get_all_posts();
        if let Some(post) = posts.iter().find(|p| p.slug == slug) {
            return Some(post.clone());
        }

        if !is_safe_slug(slug) {
            tracing::warn!("Refusing suspicious slug {:?}", slug);
            return None;
        }

        for ext in CONTENT_EXTENSIONS {
            let filename = format!("{}{}", slug, ext);
            match load_post(&self.dir, &filename) {
                Ok(post) => {
                    tracing::debug!("Found {} outside the cached collection", filename);
                    return Some(post);
                }
                Err(LoadError::NotFound(_)) => continue,
                Err(e) => {
                    e.log(&format!("Loading post {}", slug));
                    return None;
                }
            }
        }

        tracing::debug!("No post with slug {}", slug);
        None
    }

    /// Posts carrying `tag` (exact, case-sensitive match), newest first
    pub fn get_posts_by_tag(&self, tag: &str) -> Vec<Post> {
        self.get_all_posts()
            .iter()
            .filter(|p| p.has_tag(tag))
            .cloned()
            .collect()
    }

    /// Every tag used by any post, deduplicated and sorted
    pub fn get_all_tags(&self) -> Vec<String> {
        self.get_all_posts()
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Drop the cached collection so the next read recomputes it
    pub fn invalidate(&self) {
        let mut guard = self.cache.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            tracing::debug!("Post cache invalidated");
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached().is_some()
    }

    fn cached(&self) -> Option<Arc<Vec<Post>>> {
        self.cache
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(Arc::clone)
    }

    fn compute(&self) -> Vec<Post> {
        match self.try_compute() {
            Ok(posts) => {
                tracing::info!("Loaded {} posts from {:?}", posts.len(), self.dir.root());
                posts
            }
            Err(e) => {
                e.log("Loading posts");
                self.degraded()
            }
        }
    }

    /// What every failure turns into: stubs in development, nothing otherwise
    fn degraded(&self) -> Vec<Post> {
        if self.mode.is_development() {
            tracing::info!("Using {} sample stubs", self.samples.metadata().len());
            sort_newest_first(self.samples.stub_posts())
        } else {
            Vec::new()
        }
    }

    fn try_compute(&self) -> LoadResult<Vec<Post>> {
        if self.mode == ContentMode::MockOnly {
            return Ok(self.mock_posts());
        }

        let files = self.list_files()?;
        let mut seen = HashSet::new();
        let mut posts = Vec::with_capacity(files.len());

        for filename in &files {
            match load_post(&self.dir, filename) {
                Ok(post) => {
                    if seen.insert(post.slug.clone()) {
                        posts.push(post);
                    } else {
                        tracing::warn!("Skipping {}: duplicate slug {}", filename, post.slug);
                    }
                }
                Err(LoadError::Io(reason)) => return Err(LoadError::Io(reason)),
                Err(e) => e.log(&format!("Skipping {}", filename)),
            }
        }

        Ok(sort_newest_first(posts))
    }

    /// Content file names, bootstrapping the samples once in development mode
    fn list_files(&self) -> LoadResult<Vec<String>> {
        match self.dir.try_list() {
            Ok(files) if !files.is_empty() => return Ok(files),
            Ok(_) | Err(LoadError::NotFound(_)) if self.mode.is_development() => {}
            Ok(_) => return Err(no_content(&self.dir)),
            Err(e) => return Err(e),
        }

        tracing::warn!("No content in {:?}, writing sample posts", self.dir.root());
        self.samples.materialize(&self.dir, self.mode);

        match self.dir.try_list()? {
            files if files.is_empty() => Err(no_content(&self.dir)),
            files => Ok(files),
        }
    }

    /// Sample metadata with bodies read from disk where available
    fn mock_posts(&self) -> Vec<Post> {
        let posts = self
            .samples
            .metadata()
            .iter()
            .map(|meta| {
                let body = self
                    .dir
                    .try_read(&meta.filename)
                    .and_then(|text| {
                        FrontMatter::parse(&text).map(|(_, body)| body.to_string())
                    })
                    .unwrap_or_else(|e| {
                        e.log(&format!("Loading body of {}", meta.filename));
                        PLACEHOLDER_CONTENT.to_string()
                    });
                Post::from_metadata(meta, body)
            })
            .collect();
        sort_newest_first(posts)
    }
}

fn no_content(dir: &ContentDir) -> LoadError {
    LoadError::NotFound(format!("no content files in {}", dir.root().display()))
}

/// Stable: posts sharing a date keep their listing order
fn sort_newest_first(mut posts: Vec<Post>) -> Vec<Post> {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
    posts
}
