//! HTML views for the blog listing, single posts and tags

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::config::SiteConfig;
use crate::content::{html_escape, Post};

const STYLE: &str = r#"
body { max-width: 46rem; margin: 2rem auto; padding: 0 1rem; font-family: system-ui, sans-serif; line-height: 1.6; color: #222; }
header a, nav a { color: inherit; text-decoration: none; margin-right: 1rem; }
.post-meta { color: #666; font-size: 0.9rem; }
.tags a { display: inline-block; margin-right: 0.5rem; font-size: 0.85rem; }
pre { overflow-x: auto; padding: 0.75rem; }
table { border-collapse: collapse; }
td, th { border: 1px solid #ddd; padding: 0.25rem 0.5rem; }
"#;

/// Link target for a tag page
pub fn tag_href(tag: &str) -> String {
    format!("/tag/{}", utf8_percent_encode(tag, NON_ALPHANUMERIC))
}

/// Absolute address of a post, `None` when no site url is configured
pub fn post_url(config: &SiteConfig, slug: &str) -> Option<String> {
    let base = config.url.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }
    Some(format!(
        "{}/blog/{}",
        base,
        utf8_percent_encode(slug, NON_ALPHANUMERIC)
    ))
}

/// Wrap a page body in the site chrome
pub fn layout(
    config: &SiteConfig,
    page_title: Option<&str>,
    canonical: Option<&str>,
    body: &str,
) -> String {
    let title = match page_title {
        Some(page_title) => format!("{} | {}", html_escape(page_title), html_escape(&config.title)),
        None => html_escape(&config.title),
    };
    let canonical = canonical
        .map(|href| format!("\n<link rel=\"canonical\" href=\"{}\">", html_escape(href)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="description" content="{description}">{canonical}
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header><a href="/"><strong>{site}</strong></a></header>
<nav><a href="/blog">Blog</a><a href="/tags">Tags</a></nav>
<main>
{body}
</main>
</body>
</html>
"#,
        description = html_escape(&config.description),
        canonical = canonical,
        title = title,
        style = STYLE,
        site = html_escape(&config.title),
        body = body,
    )
}

fn tag_links(tags: &[String]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let links: Vec<String> = tags
        .iter()
        .map(|t| format!(r#"<a href="{}">#{}</a>"#, tag_href(t), html_escape(t)))
        .collect();
    format!(r#"<div class="tags">{}</div>"#, links.join(""))
}

fn post_summary(post: &Post) -> String {
    format!(
        r#"<article>
<h2><a href="/blog/{slug}">{title}</a></h2>
<div class="post-meta">{date} &middot; {author}</div>
<p>{description}</p>
{tags}
</article>"#,
        slug = utf8_percent_encode(&post.slug, NON_ALPHANUMERIC),
        title = html_escape(&post.title),
        date = post.date.format("%B %d, %Y"),
        author = html_escape(&post.author),
        description = html_escape(&post.description),
        tags = tag_links(&post.tags),
    )
}

/// Listing of posts, newest first
pub fn post_list(config: &SiteConfig, heading: &str, posts: &[Post]) -> String {
    let items = if posts.is_empty() {
        "<p>No posts yet.</p>".to_string()
    } else {
        posts.iter().map(post_summary).collect::<Vec<_>>().join("\n")
    };
    let body = format!("<h1>{}</h1>\n{}", html_escape(heading), items);
    layout(config, Some(heading), None, &body)
}

/// A single post; `content_html` is the rendered Markdown body
pub fn post_page(config: &SiteConfig, post: &Post, content_html: &str) -> String {
    let thumbnail = post
        .thumbnail
        .as_deref()
        .map(|src| {
            format!(
                r#"<img src="{}" alt="{}">"#,
                html_escape(src),
                html_escape(&post.title)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"<article>
<h1>{title}</h1>
<div class="post-meta">{date} &middot; {author}</div>
{tags}
{thumbnail}
{content}
</article>"#,
        title = html_escape(&post.title),
        date = post.date.format("%B %d, %Y"),
        author = html_escape(&post.author),
        tags = tag_links(&post.tags),
        thumbnail = thumbnail,
        content = content_html,
    );
    let canonical = post_url(config, &post.slug);
    layout(config, Some(&post.title), canonical.as_deref(), &body)
}

/// Index of all tags
pub fn tag_index(config: &SiteConfig, tags: &[String]) -> String {
    let body = if tags.is_empty() {
        "<h1>Tags</h1>\n<p>No tags yet.</p>".to_string()
    } else {
        let items: Vec<String> = tags
            .iter()
            .map(|t| format!(r#"<li><a href="{}">{}</a></li>"#, tag_href(t), html_escape(t)))
            .collect();
        format!("<h1>Tags</h1>\n<ul>\n{}\n</ul>", items.join("\n"))
    };
    layout(config, Some("Tags"), None, &body)
}

pub fn not_found(config: &SiteConfig, what: &str) -> String {
    let body = format!(
        "<h1>Not found</h1>\n<p>{}</p>\n<p><a href=\"/blog\">Back to the blog</a></p>",
        html_escape(what)
    );
    layout(config, Some("Not found"), None, &body)
}
