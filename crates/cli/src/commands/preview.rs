use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use folio_kit_core::{SITE_TOML, parse_site_toml};
use folio_kit_generator::clock::SystemClock;
use folio_kit_generator::document::html_escape;
use folio_kit_generator::{
    GenerateOptions, GeneratedSite, INDEX_PAGE, NOT_FOUND_PAGE, generate_from_dir,
};
use notify::{Event as NotifyEvent, EventKind, RecursiveMode, Watcher};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use super::build::STATIC_DIR;

#[derive(Clone)]
struct AppState {
    site_path: PathBuf,
    reload_tx: broadcast::Sender<()>,
}

/// Start preview server with hot reload for local development.
///
/// Every request regenerates the site from disk, so edits to site.toml,
/// posts or the avatar show up on the next load. Files under `static/`
/// are served as-is and a file watcher pushes reload events over SSE.
///
/// # Arguments
///
/// * `path` - Path to site directory containing site.toml
/// * `port` - Port to serve on (default: 8080)
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    println!("📝 Starting preview server...");
    println!("   Site: {}", path.display());

    if !path.exists() {
        anyhow::bail!(
            "Site directory does not exist: {}\nRun 'folio-kit init {}' first",
            path.display(),
            path.display()
        );
    }

    let site_toml_path = path.join(SITE_TOML);
    if !site_toml_path.exists() {
        anyhow::bail!(
            "{} not found in {}\nRun 'folio-kit init {}' first",
            SITE_TOML,
            path.display(),
            path.display()
        );
    }

    let config = parse_site_toml(&site_toml_path).context("Failed to parse site.toml")?;

    println!("   ✓ Loaded: {}", config.site.title);
    println!("   ✓ Owner: {}", config.site.owner);

    let (reload_tx, _) = broadcast::channel::<()>(100);

    let state = AppState {
        site_path: path.clone(),
        reload_tx: reload_tx.clone(),
    };

    let app = Router::new()
        .route("/_reload", get(sse_handler))
        .fallback(page_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let watcher_path = path.clone();
    let watcher_tx = reload_tx.clone();
    tokio::spawn(async move {
        if let Err(e) = watch_files(watcher_path, watcher_tx).await {
            tracing::error!(error = %e, "file watcher stopped");
        }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!(
        "\n🚀 Preview ready at: http://localhost:{}{}",
        port,
        config.site.root_path()
    );
    println!("   Press Ctrl+C to stop\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to port")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Watch for file changes and trigger reload
async fn watch_files(path: PathBuf, reload_tx: broadcast::Sender<()>) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher =
        notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        })?;

    watcher.watch(&path, RecursiveMode::Recursive)?;

    while let Some(event) = rx.recv().await {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {
                // Editors write hidden swap files and `~` backups
                if event.paths.iter().any(|p| {
                    let filename = p.file_name().unwrap_or_default().to_string_lossy();
                    !filename.starts_with('.') && !filename.ends_with('~')
                }) {
                    tracing::debug!(paths = ?event.paths, "change detected");
                    println!("   📝 File changed, reloading...");
                    let _ = reload_tx.send(());
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// SSE endpoint for hot reload
async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl futures::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let mut rx = state.reload_tx.subscribe();

    let stream = async_stream::stream! {
        loop {
            if rx.recv().await.is_ok() {
                yield Ok(Event::default().data("reload"));
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    respond(&state, uri.path()).await
}

/// Serve one request path: generated pages and avatar assets first, then
/// `static/`, then the site's 404 page.
async fn respond(state: &AppState, request_path: &str) -> Response {
    let site = match render_site(state.site_path.clone()).await {
        Ok(site) => site,
        Err(e) => {
            tracing::warn!(error = %e, "site generation failed");
            return error_page(&e);
        }
    };

    // Resolve against this render's prefix, not the one read at startup
    let Some(relative) = resolve_request_path(request_path, &site.path_prefix) else {
        return not_found(&site);
    };

    if let Some(html) = site.page(&relative) {
        return Html(html.to_string()).into_response();
    }

    if let Some(data) = site.asset(&relative) {
        return with_content_type(&relative, data.to_vec());
    }

    let static_file = state.site_path.join(STATIC_DIR).join(&relative);
    if let Ok(data) = tokio::fs::read(&static_file).await {
        return with_content_type(&relative, data);
    }

    tracing::debug!(path = request_path, "no page or file for request");
    not_found(&site)
}

async fn render_site(site_path: PathBuf) -> Result<GeneratedSite> {
    let site = tokio::task::spawn_blocking(move || {
        generate_from_dir(
            &site_path,
            Arc::new(SystemClock),
            GenerateOptions { live_reload: true },
        )
    })
    .await??;
    Ok(site)
}

/// Map a request path onto a file path relative to the generated site.
///
/// Returns `None` for paths outside the configured prefix or paths that try
/// to climb out of the site with `..`.
fn resolve_request_path(request_path: &str, path_prefix: &str) -> Option<String> {
    let path = if path_prefix.is_empty() {
        request_path
    } else {
        let rest = request_path.strip_prefix(path_prefix)?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        rest
    };

    let path = path.trim_start_matches('/');
    if path.split('/').any(|segment| segment == ".." || segment.contains('\\')) {
        return None;
    }

    if path.is_empty() || path.ends_with('/') {
        return Some(format!("{}{}", path, INDEX_PAGE));
    }

    let last = path.rsplit('/').next().unwrap_or(path);
    if last.contains('.') {
        Some(path.to_string())
    } else {
        Some(format!("{}/{}", path, INDEX_PAGE))
    }
}

fn with_content_type(path: &str, data: Vec<u8>) -> Response {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    ([(header::CONTENT_TYPE, mime.to_string())], data).into_response()
}

fn not_found(site: &GeneratedSite) -> Response {
    match site.page(NOT_FOUND_PAGE) {
        Some(html) => (StatusCode::NOT_FOUND, Html(html.to_string())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn error_page(error: &anyhow::Error) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html><head><title>Error</title></head><body>
<h1>Site Generation Error</h1>
<pre>{}</pre>
<script>
    const eventSource = new EventSource('/_reload');
    eventSource.onmessage = () => location.reload();
</script>
</body></html>"#,
        html_escape(&format!("{:#}", error))
    );
    (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_kit_core::POSTS_DIR;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    const SITE: &str = r##"
[site]
title = "Preview Blog"
owner = "Jane"

[author]
name = "Jane"

[social]
github = "jane"
"##;

    fn site_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SITE_TOML), SITE).unwrap();
        fs::create_dir_all(dir.path().join("images")).unwrap();
        RgbImage::from_pixel(64, 64, Rgb([10, 20, 30]))
            .save(dir.path().join("images/profile-pic.jpg"))
            .unwrap();
        let posts = dir.path().join(POSTS_DIR);
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("first.md"),
            "+++\ntitle = \"First\"\ndate = \"2024-03-01\"\n+++\nBody\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join(STATIC_DIR)).unwrap();
        fs::write(dir.path().join(STATIC_DIR).join("robots.txt"), "User-agent: *").unwrap();
        dir
    }

    fn state(dir: &TempDir) -> AppState {
        let (reload_tx, _) = broadcast::channel(1);
        AppState {
            site_path: dir.path().to_path_buf(),
            reload_tx,
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_resolve_request_path_without_prefix() {
        assert_eq!(resolve_request_path("/", ""), Some("index.html".to_string()));
        assert_eq!(
            resolve_request_path("/posts/first/", ""),
            Some("posts/first/index.html".to_string())
        );
        assert_eq!(
            resolve_request_path("/posts/first", ""),
            Some("posts/first/index.html".to_string())
        );
        assert_eq!(
            resolve_request_path("/images/avatar.webp", ""),
            Some("images/avatar.webp".to_string())
        );
        assert_eq!(resolve_request_path("/../secret.txt", ""), None);
    }

    #[test]
    fn test_resolve_request_path_with_prefix() {
        assert_eq!(
            resolve_request_path("/blog", "/blog"),
            Some("index.html".to_string())
        );
        assert_eq!(
            resolve_request_path("/blog/posts/first/", "/blog"),
            Some("posts/first/index.html".to_string())
        );
        assert_eq!(resolve_request_path("/", "/blog"), None);
        assert_eq!(resolve_request_path("/blogger/", "/blog"), None);
    }

    #[tokio::test]
    async fn test_serves_home_with_live_reload() {
        let dir = site_dir();
        let response = respond(&state(&dir), "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Preview Blog"));
        assert!(html.contains("/_reload"));
    }

    #[tokio::test]
    async fn test_serves_post_avatar_and_static_file() {
        let dir = site_dir();
        let state = state(&dir);

        let post = respond(&state, "/posts/first/").await;
        assert_eq!(post.status(), StatusCode::OK);
        assert!(body_text(post).await.contains("First"));

        let avatar = respond(&state, "/images/avatar.png").await;
        assert_eq!(avatar.status(), StatusCode::OK);
        assert_eq!(avatar.headers()[header::CONTENT_TYPE], "image/png");

        let robots = respond(&state, "/robots.txt").await;
        assert_eq!(robots.status(), StatusCode::OK);
        assert_eq!(body_text(robots).await, "User-agent: *");
    }

    #[tokio::test]
    async fn test_unknown_path_serves_not_found_page() {
        let dir = site_dir();
        let response = respond(&state(&dir), "/missing/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Not Found"));
    }

    #[tokio::test]
    async fn test_path_prefix_change_applies_without_restart() {
        let dir = site_dir();
        let state = state(&dir);
        assert_eq!(respond(&state, "/").await.status(), StatusCode::OK);

        let prefixed = SITE.replace(
            "owner = \"Jane\"\n",
            "owner = \"Jane\"\npath_prefix = \"/blog\"\n",
        );
        fs::write(dir.path().join(SITE_TOML), prefixed).unwrap();

        let home = respond(&state, "/blog/").await;
        assert_eq!(home.status(), StatusCode::OK);
        assert!(body_text(home).await.contains(r#"href="/blog/posts/first/""#));

        let post = respond(&state, "/blog/posts/first/").await;
        assert_eq!(post.status(), StatusCode::OK);

        assert_eq!(respond(&state, "/").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_broken_config_shows_error_page() {
        let dir = site_dir();
        fs::write(dir.path().join(SITE_TOML), "[site]\ntitle = \"x\"\n").unwrap();

        let response = respond(&state(&dir), "/").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Site Generation Error"));
    }
}
