//! Static asset serving module
//!
//! Loads resolved assets from disk, enforces that resolved paths stay
//! inside their asset directory, and builds the conditional/range-aware
//! responses.

use crate::config::AppState;
use crate::handler::router::{RequestContext, ResolvedRoute};
use crate::http::range::RangeOutcome;
use crate::http::{self, cache, mime, range};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

/// Serve a resolved route from the configured asset tree.
pub async fn serve(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
    route: &ResolvedRoute,
) -> Response<Full<Bytes>> {
    match load_asset(&state.config.site.root, route).await {
        Some((content, content_type)) => build_asset_response(&content, content_type, ctx),
        None => http::build_404_response(),
    }
}

/// Read an asset from disk, refusing anything that resolves outside its
/// asset directory.
///
/// The containment check is explicit: both the directory and the candidate
/// file are canonicalized, and the file must remain under the directory.
/// Traversal sequences and absolute-path tricks in the request fail the
/// check and read as missing.
pub async fn load_asset(root: &Path, route: &ResolvedRoute) -> Option<(Vec<u8>, &'static str)> {
    let base_dir = root.join(route.dir);

    let base_canonical = match base_dir.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Asset directory not found or inaccessible '{}': {e}",
                base_dir.display()
            ));
            return None;
        }
    };

    // A missing file is a plain 404, not worth a log line
    let candidate = base_dir.join(&route.file);
    let Ok(file_canonical) = candidate.canonicalize() else {
        return None;
    };

    if !file_canonical.starts_with(&base_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            route.file,
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(content) => content,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::content_type_for(file_canonical.extension().and_then(|e| e.to_str()));

    Some((content, content_type))
}

/// Build the response for loaded asset bytes: conditional GET first, then
/// range evaluation, then the full 200.
fn build_asset_response(
    data: &[u8],
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let total_size = data.len();
    match range::evaluate_range(ctx.range_header.as_deref(), total_size) {
        RangeOutcome::Partial(byte_range) => {
            let body = if ctx.is_head {
                Bytes::new()
            } else {
                Bytes::from(data[byte_range.start..=byte_range.end].to_vec())
            };
            http::response::build_partial_response(
                body,
                content_type,
                &etag,
                byte_range.start,
                byte_range.end,
                total_size,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total_size),
        RangeOutcome::Full => http::response::build_asset_response(
            Bytes::from(data.to_owned()),
            content_type,
            &etag,
            ctx.is_head,
        ),
    }
}
