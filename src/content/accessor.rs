//! File access for the content directory

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{LoadError, LoadResult};

/// Extensions recognised as post sources
pub const CONTENT_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// Check if a file name is a content file
pub fn is_content_file(name: &str) -> bool {
    CONTENT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Thin wrapper around the directory that holds the Markdown posts.
///
/// The plain methods never fail; they log and return a neutral value.
/// The `try_` variants keep the failure class for callers that need it.
#[derive(Debug, Clone)]
pub struct ContentDir {
    root: PathBuf,
}

impl ContentDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a file inside the content directory
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// True iff the directory is present and inspectable
    pub fn directory_exists(&self) -> bool {
        match fs::metadata(&self.root) {
            Ok(meta) => meta.is_dir(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::error!("Failed to inspect {:?}: {}", self.root, e);
                false
            }
        }
    }

    pub fn file_exists(&self, name: &str) -> bool {
        match fs::metadata(self.path_of(name)) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                tracing::error!("Failed to inspect {:?}: {}", self.path_of(name), e);
                false
            }
        }
    }

    /// List content file names (not paths), sorted by name
    pub fn try_list(&self) -> LoadResult<Vec<String>> {
        if !self.directory_exists() {
            return Err(LoadError::NotFound(format!(
                "content directory {}",
                self.root.display()
            )));
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| LoadError::Io(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_content_file(name) {
                    names.push(name.to_string());
                }
            }
        }

        Ok(names)
    }

    /// List content file names; empty when the directory is missing or unreadable
    pub fn list_content_files(&self) -> Vec<String> {
        self.try_list().unwrap_or_else(|e| {
            e.log("Listing content files");
            Vec::new()
        })
    }

    /// Read a file; anything that is not a regular file counts as missing
    pub fn try_read(&self, name: &str) -> LoadResult<String> {
        let path = self.path_of(name);
        if let Ok(meta) = fs::metadata(&path) {
            if !meta.is_file() {
                return Err(LoadError::NotFound(format!("{} is not a file", path.display())));
            }
        }
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io(format!("{}: {}", path.display(), e)),
        })
    }

    /// Raw text of a file, `None` if absent or unreadable
    pub fn read_file(&self, name: &str) -> Option<String> {
        match self.try_read(name) {
            Ok(text) => Some(text),
            Err(e) => {
                e.log("Reading content file");
                None
            }
        }
    }

    /// Create the directory (recursively) if it is missing
    pub fn ensure_directory(&self) -> bool {
        if self.directory_exists() {
            return true;
        }
        match fs::create_dir_all(&self.root) {
            Ok(()) => {
                tracing::info!("Created content directory {:?}", self.root);
                true
            }
            Err(e) => {
                tracing::error!("Failed to create {:?}: {}", self.root, e);
                false
            }
        }
    }

    /// Write a file, creating the directory first. Returns whether it succeeded.
    pub fn write_file(&self, name: &str, content: &str) -> bool {
        if !self.ensure_directory() {
            return false;
        }
        let path = self.path_of(name);
        match fs::write(&path, content) {
            Ok(()) => {
                tracing::info!("Wrote {:?}", path);
                true
            }
            Err(e) => {
                tracing::error!("Failed to write {:?}: {}", path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = ContentDir::new(tmp.path().join("blogs"));

        assert!(!dir.directory_exists());
        assert!(dir.list_content_files().is_empty());
        assert!(matches!(dir.try_list(), Err(LoadError::NotFound(_))));
        assert_eq!(dir.read_file("a.md"), None);
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let dir = ContentDir::new(tmp.path());
        fs::write(tmp.path().join("b.md"), "b").unwrap();
        fs::write(tmp.path().join("a.mdx"), "a").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(tmp.path().join("nested.md")).unwrap();

        assert_eq!(dir.list_content_files(), vec!["a.mdx", "b.md"]);
    }

    #[test]
    fn test_write_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = ContentDir::new(tmp.path().join("deep").join("blogs"));

        assert!(dir.write_file("hello.md", "# Hello"));
        assert!(dir.directory_exists());
        assert!(dir.file_exists("hello.md"));
        assert_eq!(dir.read_file("hello.md").as_deref(), Some("# Hello"));
        assert!(matches!(dir.try_read("other.md"), Err(LoadError::NotFound(_))));
    }

    #[test]
    fn test_read_directory_counts_as_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = ContentDir::new(tmp.path());
        fs::create_dir(tmp.path().join("folder.md")).unwrap();

        assert!(matches!(dir.try_read("folder.md"), Err(LoadError::NotFound(_))));
        assert_eq!(dir.read_file("folder.md"), None);
    }

    #[test]
    fn test_read_invalid_utf8_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let dir = ContentDir::new(tmp.path());
        fs::write(tmp.path().join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(dir.try_read("binary.md"), Err(LoadError::Io(_))));
    }

    #[test]
    fn test_is_content_file() {
        assert!(is_content_file("post.md"));
        assert!(is_content_file("post.mdx"));
        assert!(!is_content_file("post.markdown"));
        assert!(!is_content_file("md"));
    }
}
