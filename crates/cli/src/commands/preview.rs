use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use blog_kit_generator::generate_site;
use std::fmt::Write;
use std::{net::SocketAddr, path::PathBuf};
use tower::ServiceExt;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::site::{LoadedSite, load_site};

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
}

/// Serve the feed and the other generated outputs for local development.
///
/// Every request re-reads site.toml and the content directory, so edits show
/// up on the next request, including a moved feed path. Invalid posts are
/// left out of the outputs and listed on the index page. Paths that match no
/// generated output are served from the public directory.
///
/// # Arguments
///
/// * `path` - Path to site directory containing site.toml
/// * `port` - Port to serve on (default: 8080)
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📰 Starting preview server...");
    println!("   Site: {}", path.display());

    let site = load_site(&path)?;
    println!("   ✓ Loaded: {}", site.config.site.title);
    println!("   ✓ Posts: {}", site.collection.entries.len());
    if !site.collection.is_valid() {
        println!("   ⚠ Invalid posts: {}", site.collection.failures.len());
    }

    let generated = generate_site(&site.collection.entries, &site.config)?;

    let app = router(AppState {
        site_path: path.clone(),
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("\n🚀 Preview ready at: http://localhost:{}", port);
    for (page, _) in &generated.pages {
        println!("   http://localhost:{}/{}", port, page);
    }
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .fallback(generated_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn error_response(err: anyhow::Error) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Configuration error:\n\n{:#}\n", err),
    )
        .into_response()
}

fn content_type(page: &str) -> &'static str {
    if page.ends_with(".json") {
        "application/json"
    } else if page.ends_with(".xml") {
        "application/xml; charset=utf-8"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Regenerate the outputs and return the one at the request path, falling
/// back to the public directory
async fn generated_handler(State(state): State<AppState>, request: Request) -> Response {
    let site = match load_site(&state.site_path) {
        Ok(site) => site,
        Err(e) => return error_response(e),
    };

    for failure in &site.collection.failures {
        tracing::warn!(%failure, "left out of preview");
    }

    let generated = match generate_site(&site.collection.entries, &site.config) {
        Ok(generated) => generated,
        Err(e) => return error_response(e),
    };

    let requested = request.uri().path().trim_start_matches('/').to_string();
    let found = generated
        .pages
        .into_iter()
        .find(|(page, _)| *page == requested);
    if let Some((page, contents)) = found {
        return ([(header::CONTENT_TYPE, content_type(&page))], contents).into_response();
    }

    let public_dir = state.site_path.join(&site.config.build.public_dir);
    match ServeDir::new(public_dir).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(infallible) => match infallible {},
    }
}

/// Plain-text status page: outputs and any invalid posts
async fn index_handler(State(state): State<AppState>) -> Response {
    match load_site(&state.site_path) {
        Ok(site) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            status_page(&site),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

fn status_page(site: &LoadedSite) -> String {
    let mut out = String::new();
    let entries = &site.collection.entries;
    let drafts = entries.iter().filter(|e| e.post.draft).count();

    let _ = writeln!(out, "{} | Preview\n", site.config.site.title);
    let _ = writeln!(
        out,
        "{} posts ({} drafts), {} invalid\n",
        entries.len(),
        drafts,
        site.collection.failures.len()
    );

    match generate_site(entries, &site.config) {
        Ok(generated) => {
            out.push_str("Outputs:\n");
            for (page, _) in &generated.pages {
                let _ = writeln!(out, "  /{}", page);
            }
        }
        Err(e) => {
            let _ = writeln!(out, "Generation failed: {:#}", e);
        }
    }

    if !site.collection.failures.is_empty() {
        out.push_str("\nInvalid posts:\n");
        for failure in &site.collection.failures {
            let _ = writeln!(out, "  {}", failure);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("site.toml"),
            "[site]\norigin = \"https://khoivan.dev\"\ntitle = \"Khoi Van\"\ndescription = \"Blog\"\n",
        )
        .unwrap();
        let blog = dir.path().join("src/content/blog");
        fs::create_dir_all(&blog).unwrap();
        fs::write(
            blog.join("ok.md"),
            "---\ntitle: OK\ndescription: d\npubDate: 2024-01-01\n---\n",
        )
        .unwrap();
        fs::write(blog.join("bad.md"), "---\ntitle: Bad\n---\n").unwrap();
        dir
    }

    #[test]
    fn test_status_page_lists_outputs_and_failures() {
        let dir = create_site();
        let site = load_site(dir.path()).unwrap();
        let page = status_page(&site);

        assert!(page.starts_with("Khoi Van | Preview"));
        assert!(page.contains("1 posts (0 drafts), 1 invalid"));
        assert!(page.contains("  /rss.xml"));
        assert!(page.contains("bad.md"));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("rss.xml"), "application/xml; charset=utf-8");
        assert_eq!(content_type("search-index.json"), "application/json");
    }

    async fn fetch(dir: &TempDir, uri: &str) -> Response {
        let app = router(AppState {
            site_path: dir.path().to_path_buf(),
        });
        let request = axum::http::Request::builder()
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_serves_feed() {
        let dir = create_site();

        let response = fetch(&dir, "/rss.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_feed_path_change_is_picked_up_without_restart() {
        let dir = create_site();
        assert_eq!(fetch(&dir, "/rss.xml").await.status(), StatusCode::OK);

        let toml = fs::read_to_string(dir.path().join("site.toml")).unwrap();
        fs::write(
            dir.path().join("site.toml"),
            format!("{}\n[feed]\npath = \"feeds/blog.xml\"\n", toml),
        )
        .unwrap();

        assert_eq!(fetch(&dir, "/feeds/blog.xml").await.status(), StatusCode::OK);
        assert_eq!(fetch(&dir, "/rss.xml").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_paths_fall_back_to_public_dir() {
        let dir = create_site();
        fs::create_dir_all(dir.path().join("public")).unwrap();
        fs::write(dir.path().join("public/rss-styles.xsl"), "<xsl/>").unwrap();

        assert_eq!(fetch(&dir, "/rss-styles.xsl").await.status(), StatusCode::OK);
        assert_eq!(fetch(&dir, "/missing.css").await.status(), StatusCode::NOT_FOUND);
    }
}
