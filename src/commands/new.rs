//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::Folio;

#[derive(Serialize)]
struct Scaffold<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    author: &'a str,
    tags: Vec<String>,
}

/// Write a new post skeleton. The slug defaults to the slugified title.
pub fn create_post(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from {:?}", title);
    }

    let filename = format!("{}.md", slug);
    let content = folio.content();
    if content.file_exists(&filename) {
        anyhow::bail!("File already exists: {:?}", content.path_of(&filename));
    }

    let header = Scaffold {
        title,
        description: "",
        date: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        author: &folio.config.author,
        tags: Vec::new(),
    };
    let text = format!("---\n{}---\n\n# {}\n", serde_yaml::to_string(&header)?, title);

    if !content.write_file(&filename, &text) {
        anyhow::bail!("Failed to write {:?}", content.path_of(&filename));
    }

    let path = content.path_of(&filename);
    println!("Created: {:?}", path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::repository::load_post;
    use tempfile::TempDir;

    #[test]
    fn test_created_post_is_valid() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::with_config(tmp.path(), SiteConfig::default());

        let path = create_post(&folio, "Hello: A \"Quoted\" World", None).unwrap();
        assert_eq!(path.file_name().unwrap(), "hello-a-quoted-world.md");

        let post = load_post(&folio.content(), "hello-a-quoted-world.md").unwrap();
        assert_eq!(post.title, "Hello: A \"Quoted\" World");
        assert_eq!(post.author, "Anonymous");
        assert!(post.tags.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::with_config(tmp.path(), SiteConfig::default());

        create_post(&folio, "Twice", Some("twice")).unwrap();
        assert!(create_post(&folio, "Twice again", Some("twice")).is_err());
    }
}
