//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! resolution against the fixed dashboard route table, and access logging.
//!
//! The route table is five entries, so resolution is an ordered linear
//! match rather than anything cleverer.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Directory names under the project root, fixed by the asset layout.
const PAGES_DIR: &str = "pages";
const JS_DIR: &str = "js";
const DATA_DIR: &str = "data";

/// A request path resolved to a file under one of the asset directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Asset directory relative to the project root
    pub dir: &'static str,
    /// File path relative to `dir`; may contain sub-directories
    pub file: String,
}

impl ResolvedRoute {
    fn page(file: &str) -> Self {
        Self {
            dir: PAGES_DIR,
            file: file.to_string(),
        }
    }

    fn tree(dir: &'static str, file: &str) -> Self {
        Self {
            dir,
            file: file.to_string(),
        }
    }
}

/// Resolve a request path against the fixed route table.
///
/// `/dashboard/<location>` serves the same page for every location value;
/// the parameter is interpreted client-side. Empty parameters and paths
/// outside the table resolve to `None` (404).
pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    if path == "/" {
        return Some(ResolvedRoute::page("index.html"));
    }
    if path == "/dashboard" {
        return Some(ResolvedRoute::page("dashboard.html"));
    }
    if let Some(location) = path.strip_prefix("/dashboard/") {
        if location.is_empty() {
            return None;
        }
        return Some(ResolvedRoute::page("dashboard.html"));
    }
    if let Some(filename) = path.strip_prefix("/js/") {
        if filename.is_empty() {
            return None;
        }
        return Some(ResolvedRoute::tree(JS_DIR, filename));
    }
    if let Some(filename) = path.strip_prefix("/data/") {
        if filename.is_empty() {
            return None;
        }
        return Some(ResolvedRoute::tree(DATA_DIR, filename));
    }
    None
}

/// Request context encapsulating what asset serving needs from the request
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();
    let is_head = *method == Method::HEAD;

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        method.to_string(),
        path.to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_value(&req, "referer");
    entry.user_agent = header_value(&req, "user-agent");

    let response = if let Some(resp) = check_http_method(method) {
        resp
    } else {
        let ctx = RequestContext {
            path,
            is_head,
            if_none_match: header_value(&req, "if-none-match"),
            range_header: header_value(&req, "range"),
        };

        match resolve(ctx.path) {
            Some(route) => static_files::serve(&ctx, &state, &route).await,
            None => http::build_404_response(),
        }
    };

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return the response for anything but GET/HEAD
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}


#[cfg(test)]
mod request_tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::fs;
    use std::path::Path;

    fn site_with(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn state_for(root: &Path) -> Arc<AppState> {
        let mut cfg = Config::load_from("no-such-config").unwrap();
        cfg.site.root = root.to_path_buf();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(cfg))
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    fn get(path: &str) -> Request<()> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(())
            .unwrap()
    }

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_serves_home_page_bytes() {
        let site = site_with(&[("pages/index.html", "<html>home</html>")]);
        let state = state_for(site.path());

        let response = handle_request(get("/"), peer(), state).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(body_of(response).await, "<html>home</html>");
    }

    #[tokio::test]
    async fn test_dashboard_location_is_byte_identical_to_dashboard() {
        let site = site_with(&[("pages/dashboard.html", "<html>dashboard</html>")]);
        let state = state_for(site.path());

        let plain = handle_request(get("/dashboard"), peer(), Arc::clone(&state))
            .await
            .unwrap();
        let with_location = handle_request(get("/dashboard/library/2nd-floor"), peer(), state)
            .await
            .unwrap();

        assert_eq!(plain.status(), 200);
        assert_eq!(with_location.status(), 200);
        assert_eq!(body_of(plain).await, body_of(with_location).await);
    }

    #[tokio::test]
    async fn test_missing_and_unrouted_paths_are_404() {
        let site = site_with(&[("js/data-manager.js", "// manager")]);
        let state = state_for(site.path());

        let missing = handle_request(get("/js/absent.js"), peer(), Arc::clone(&state))
            .await
            .unwrap();
        assert_eq!(missing.status(), 404);

        let unrouted = handle_request(get("/admin"), peer(), state).await.unwrap();
        assert_eq!(unrouted.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_request_is_404() {
        let site = site_with(&[("js/app.js", "// app"), ("secret.txt", "top secret")]);
        let state = state_for(site.path());

        let response = handle_request(get("/js/../secret.txt"), peer(), state)
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_conditional_get_roundtrip() {
        let site = site_with(&[("data/locations.json", "{\"locations\":[]}")]);
        let state = state_for(site.path());

        let first = handle_request(get("/data/locations.json"), peer(), Arc::clone(&state))
            .await
            .unwrap();
        let etag = first.headers()["ETag"].to_str().unwrap().to_string();

        let revalidation = Request::builder()
            .method(Method::GET)
            .uri("/data/locations.json")
            .header("if-none-match", &etag)
            .body(())
            .unwrap();
        let second = handle_request(revalidation, peer(), state).await.unwrap();
        assert_eq!(second.status(), 304);
        assert!(body_of(second).await.is_empty());
    }

    #[tokio::test]
    async fn test_head_keeps_headers_drops_body() {
        let site = site_with(&[("pages/index.html", "<html>home</html>")]);
        let state = state_for(site.path());

        let head = Request::builder()
            .method(Method::HEAD)
            .uri("/")
            .body(())
            .unwrap();
        let response = handle_request(head, peer(), state).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "17");
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_range_request_roundtrip() {
        let site = site_with(&[("js/data-manager.js", "0123456789")]);
        let state = state_for(site.path());

        let ranged = Request::builder()
            .method(Method::GET)
            .uri("/js/data-manager.js")
            .header("range", "bytes=2-5")
            .body(())
            .unwrap();
        let response = handle_request(ranged, peer(), state).await.unwrap();
        assert_eq!(response.status(), 206);
        assert_eq!(response.headers()["Content-Range"], "bytes 2-5/10");
        assert_eq!(body_of(response).await, "2345");
    }

    #[tokio::test]
    async fn test_post_is_405() {
        let site = site_with(&[("pages/index.html", "<html>home</html>")]);
        let state = state_for(site.path());

        let post = Request::builder()
            .method(Method::POST)
            .uri("/")
            .body(())
            .unwrap();
        let response = handle_request(post, peer(), state).await.unwrap();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");
    }
}
