//! The demo application: static files behind the conditional policies.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::conditional::{
    etag_handler, last_modified_handler, not_modified, EntityTag, ObservationMode,
};
use crate::config::Config;
use crate::http::handler::SharedHandler;
use crate::http::response::StatusCode;
use crate::server::static_files::StaticFiles;

/// Strong entity-tag over a response body.
pub fn content_tag(body: &[u8]) -> EntityTag {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    EntityTag::strong(format!("{:x}", hasher.finish()))
}

/// Builds the handler chain:
///
/// ```text
/// not_modified ──▶ etag (cfg.etag_mode) ──▶ last_modified (BeforeHeaders) ──▶ StaticFiles
/// ```
pub fn build(cfg: &Config) -> SharedHandler {
    let files = Arc::new(StaticFiles::new(&cfg.root_dir));

    let mtimes = Arc::clone(&files);
    let dated = last_modified_handler(
        move |_, req| mtimes.modified(&req.path),
        ObservationMode::BeforeHeaders,
        Arc::clone(&files),
    );

    let tags = Arc::clone(&files);
    let tagged = etag_handler(
        move |observed, req| {
            if observed.is_some_and(|o| o.status() != StatusCode::OK) {
                return None;
            }
            match observed.and_then(|o| o.body()) {
                Some(body) => Some(content_tag(body)),
                None => tags.file_tag(&req.path),
            }
        },
        cfg.etag_mode,
        dated,
    );

    tracing::debug!(
        root = %cfg.root_dir.display(),
        etag_mode = ?cfg.etag_mode,
        comparison = ?cfg.etag_comparison,
        "handler chain built"
    );

    Arc::new(not_modified(cfg.etag_comparison, tagged))
}
