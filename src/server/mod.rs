//! HTTP server: the JSON API plus plain HTML views of the blog

pub mod pages;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{self, MarkdownRenderer, PostRepository};
use crate::Folio;

/// Shared by every request
pub struct AppState {
    pub config: SiteConfig,
    pub repo: PostRepository,
    pub renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(folio: &Folio) -> Self {
        Self {
            config: folio.config.clone(),
            repo: folio.repository(),
            renderer: MarkdownRenderer::from_config(&folio.config.highlight),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    pub slug: Option<String>,
    pub tag: Option<String>,
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/posts", get(api_posts))
        .route("/api/tags", get(api_tags))
        .route("/api/blog-validation", get(api_validation))
        .route("/", get(blog_index))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .route("/tags", get(tags_index))
        .route("/tag/:tag", get(tag_posts))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(folio: &Folio, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(folio));
    tracing::info!(
        "Serving {:?} in {:?} mode",
        state.repo.content_dir().root(),
        state.repo.mode()
    );
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run repository work off the async executor; the content layer does blocking file I/O
async fn blocking<T, F>(state: &Arc<AppState>, f: F) -> Result<T, tokio::task::JoinError>
where
    T: Send + 'static,
    F: FnOnce(&AppState) -> T + Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state)).await
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Treat `?slug=` the same as no parameter
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn api_posts(State(state): State<Arc<AppState>>, Query(query): Query<PostsQuery>) -> Response {
    let slug = non_empty(query.slug);
    let tag = non_empty(query.tag);

    if let Some(slug) = slug {
        return match blocking(&state, move |s| s.repo.get_post_by_slug(&slug)).await {
            Ok(Some(post)) => Json(post).into_response(),
            Ok(None) => json_error(StatusCode::NOT_FOUND, "Post not found"),
            Err(e) => {
                tracing::error!("Error fetching post: {}", e);
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch posts")
            }
        };
    }

    let result = match tag {
        Some(tag) => blocking(&state, move |s| s.repo.get_posts_by_tag(&tag)).await,
        None => blocking(&state, |s| s.repo.get_all_posts().as_ref().clone()).await,
    };
    match result {
        Ok(posts) => Json(posts).into_response(),
        Err(e) => {
            tracing::error!("Error fetching posts: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch posts")
        }
    }
}

async fn api_tags(State(state): State<Arc<AppState>>) -> Response {
    match blocking(&state, |s| s.repo.get_all_tags()).await {
        Ok(tags) => Json(tags).into_response(),
        Err(e) => {
            tracing::error!("Error fetching tags: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch tags")
        }
    }
}

async fn api_validation(State(state): State<Arc<AppState>>) -> Response {
    let result = blocking(&state, |s| {
        content::validate(s.repo.content_dir(), s.repo.samples())
    })
    .await;

    match result {
        Ok(report) if report.valid => Json(json!({
            "status": "success",
            "message": "Blog system is consistent",
            "data": report,
        }))
        .into_response(),
        // inconsistent content is not a server error
        Ok(report) => Json(json!({
            "status": "warning",
            "message": "Blog system has inconsistencies",
            "data": report,
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Error validating blog consistency: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Failed to validate blog consistency",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

fn html_error(state: &AppState, status: StatusCode, what: &str) -> Response {
    (status, Html(pages::not_found(&state.config, what))).into_response()
}

fn internal_error(state: &AppState, e: tokio::task::JoinError) -> Response {
    tracing::error!("Error rendering page: {}", e);
    html_error(state, StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
}

async fn blog_index(State(state): State<Arc<AppState>>) -> Response {
    match blocking(&state, |s| pages::post_list(&s.config, "Blog", &s.repo.get_all_posts())).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(&state, e),
    }
}

async fn blog_post(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    let rendered = blocking(&state, move |s| {
        s.repo.get_post_by_slug(&slug).map(|post| {
            let content = s.renderer.render(&post.content);
            pages::post_page(&s.config, &post, &content)
        })
    })
    .await;

    match rendered {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => html_error(&state, StatusCode::NOT_FOUND, "No post with that name."),
        Err(e) => internal_error(&state, e),
    }
}

async fn tags_index(State(state): State<Arc<AppState>>) -> Response {
    match blocking(&state, |s| pages::tag_index(&s.config, &s.repo.get_all_tags())).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(&state, e),
    }
}

async fn tag_posts(State(state): State<Arc<AppState>>, Path(tag): Path<String>) -> Response {
    let rendered = blocking(&state, move |s| {
        let posts = s.repo.get_posts_by_tag(&tag);
        pages::post_list(&s.config, &format!("Posts tagged \"{}\"", tag), &posts)
    })
    .await;

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => internal_error(&state, e),
    }
}

async fn not_found(State(state): State<Arc<AppState>>) -> Response {
    html_error(&state, StatusCode::NOT_FOUND, "There is nothing at this address.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentMode;
    use crate::content::ContentDir;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn state_for(dir: &std::path::Path, mode: ContentMode) -> Arc<AppState> {
        Arc::new(AppState {
            config: SiteConfig::default(),
            repo: PostRepository::new(ContentDir::new(dir), mode),
            renderer: MarkdownRenderer::new(),
        })
    }

    fn site_with_posts() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("first.md"),
            "---\ntitle: First\ndate: 2024-01-01\ntags:\n  - rust\n---\nHello from **first**",
        )
        .unwrap();
        fs::write(
            tmp.path().join("second.md"),
            "---\ntitle: Second\ndate: 2024-02-01\ntags:\n  - rust\n  - web\n---\nSecond body",
        )
        .unwrap();
        tmp
    }

    async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_api_posts_lists_newest_first() {
        let tmp = site_with_posts();
        let (status, body) = get(state_for(tmp.path(), ContentMode::Strict), "/api/posts").await;

        assert_eq!(status, StatusCode::OK);
        let posts: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(posts[0]["slug"], "second");
        assert_eq!(posts[1]["slug"], "first");
        assert_eq!(posts[1]["date"], "2024-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_api_posts_by_slug_and_tag() {
        let tmp = site_with_posts();
        let state = state_for(tmp.path(), ContentMode::Strict);

        let (status, body) = get(Arc::clone(&state), "/api/posts?slug=first").await;
        assert_eq!(status, StatusCode::OK);
        let post: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(post["title"], "First");

        let (status, body) = get(Arc::clone(&state), "/api/posts?slug=nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Post not found"));

        let (_, body) = get(state, "/api/posts?tag=web").await;
        let posts: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(posts.as_array().unwrap().len(), 1);
        assert_eq!(posts[0]["slug"], "second");
    }

    #[tokio::test]
    async fn test_api_tags() {
        let tmp = site_with_posts();
        let (status, body) = get(state_for(tmp.path(), ContentMode::Strict), "/api/tags").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"["rust","web"]"#);
    }

    #[tokio::test]
    async fn test_api_posts_empty_site() {
        let tmp = TempDir::new().unwrap();
        let (status, body) = get(state_for(tmp.path(), ContentMode::Strict), "/api/posts").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_validation_reports_warning_with_ok_status() {
        let tmp = site_with_posts();
        let (status, body) =
            get(state_for(tmp.path(), ContentMode::Strict), "/api/blog-validation").await;

        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["status"], "warning");
        assert_eq!(value["data"]["valid"], false);
        // none of the built-in samples are on disk
        assert!(!value["data"]["missingFiles"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_html_pages() {
        let tmp = site_with_posts();
        let state = state_for(tmp.path(), ContentMode::Strict);

        let (status, body) = get(Arc::clone(&state), "/blog").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("First") && body.contains("Second"));

        let (status, body) = get(Arc::clone(&state), "/blog/first").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<strong>first</strong>"));

        let (status, _) = get(Arc::clone(&state), "/blog/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get(Arc::clone(&state), "/tag/web").await;
        assert!(body.contains("Second") && !body.contains("/blog/first"));

        let (status, _) = get(state, "/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
