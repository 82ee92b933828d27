//! List site content

use anyhow::Result;
use std::collections::BTreeMap;

use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    let repo = folio.repository();

    match content_type {
        "post" | "posts" => {
            let posts = repo.get_all_posts();
            println!("Posts ({}):", posts.len());
            for post in posts.iter() {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(&repo.get_all_posts());
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

/// Tag usage, most used first, ties in name order
fn tag_counts(posts: &[crate::content::Post]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{parse_date_string, Post};

    fn tagged(slug: &str, tags: &[&str]) -> Post {
        Post {
            id: slug.to_string(),
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            date: parse_date_string("2024-01-01").unwrap(),
            author: "Anonymous".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            thumbnail: None,
            content: String::new(),
            filename: format!("{}.md", slug),
        }
    }

    #[test]
    fn test_tag_counts_order() {
        let posts = vec![
            tagged("a", &["web", "rust"]),
            tagged("b", &["rust"]),
            tagged("c", &["api"]),
        ];
        assert_eq!(
            tag_counts(&posts),
            vec![
                ("rust".to_string(), 2),
                ("api".to_string(), 1),
                ("web".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let folio = Folio::with_config(tmp.path(), SiteConfig::default());
        assert!(run(&folio, "category").is_err());
        assert!(run(&folio, "posts").is_ok());
    }
}
