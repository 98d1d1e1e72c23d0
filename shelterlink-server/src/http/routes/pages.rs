//! Static HTML pages
//!
//! `GET /pages` serves `<pages_dir>/index.html`; `GET /pages/{*slug}` serves
//! `<pages_dir>/<slug>.html`. Slugs may contain `/` but no empty, `.` or
//! `..` segments, no backslashes and no NUL bytes.

use std::io::ErrorKind;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::http::server::AppState;

const NOT_FOUND_HTML: &str = "<h1>Page not found</h1>";

/// GET /pages
async fn index(State(state): State<Arc<AppState>>) -> Response {
    serve(&state.pages_dir, "").await
}

/// GET /pages/{*slug}
async fn page(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    serve(&state.pages_dir, &slug).await
}

async fn serve(root: &FsPath, slug: &str) -> Response {
    let Some(path) = page_path(root, slug) else {
        return not_found();
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e)
            if matches!(
                e.kind(),
                ErrorKind::NotFound | ErrorKind::InvalidInput | ErrorKind::IsADirectory
            ) =>
        {
            not_found()
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read page");
            (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Internal error</h1>")).into_response()
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_HTML)).into_response()
}

/// Map a slug to a file under `root`, or `None` if the slug is unsafe.
fn page_path(root: &FsPath, slug: &str) -> Option<PathBuf> {
    let slug = slug.trim_matches('/');
    if slug.is_empty() {
        return Some(root.join("index.html"));
    }

    let segments: Vec<&str> = slug.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains(['\\', '\0']))
    {
        return None;
    }

    let (file, dirs) = segments.split_last()?;
    let mut path = root.to_path_buf();
    path.extend(dirs);
    path.push(format!("{file}.html"));
    Some(path)
}

/// Page routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pages", get(index))
        .route("/pages/{*slug}", get(page))
}
