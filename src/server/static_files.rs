//! Static file serving.
//!
//! The handler only produces bodies; validators are attached by the
//! conditional policies composed around it in [`crate::server::app`].

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::conditional::EntityTag;
use crate::http::handler::Handler;
use crate::http::headers::CONTENT_TYPE;
use crate::http::mime::content_type_for;
use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

const INDEX_FILE: &str = "index.html";

/// Serves files below a root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path to a file inside the root.
    ///
    /// Directories resolve to their `index.html`. Anything that canonicalizes
    /// outside the root is refused.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let path = request_path.split(['?', '#']).next().unwrap_or_default();
        let relative = path.trim_start_matches('/');

        let root = match self.root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(root = %self.root.display(), error = %e, "static root not accessible");
                return None;
            }
        };

        let mut candidate = root.join(relative);
        if candidate.is_dir() {
            candidate = candidate.join(INDEX_FILE);
        }

        let resolved = candidate.canonicalize().ok()?;
        if !resolved.starts_with(&root) {
            tracing::warn!(path = request_path, "path traversal attempt blocked");
            return None;
        }

        resolved.is_file().then_some(resolved)
    }

    /// The file's modification time.
    pub fn modified(&self, request_path: &str) -> Option<DateTime<Utc>> {
        let file = self.resolve(request_path)?;
        let modified = std::fs::metadata(file).ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    /// A weak entity-tag derived from the file's size and mtime, usable
    /// before the body has been produced.
    pub fn file_tag(&self, request_path: &str) -> Option<EntityTag> {
        let file = self.resolve(request_path)?;
        let meta = std::fs::metadata(file).ok()?;
        let mtime = meta.modified().ok()?.duration_since(UNIX_EPOCH).ok()?;
        Some(EntityTag::weak(format!("{:x}-{:x}", meta.len(), mtime.as_secs())))
    }
}

impl Handler for StaticFiles {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()> {
        if !matches!(req.method, Method::GET | Method::HEAD) {
            w.headers_mut().set("Allow", "GET, HEAD");
            w.write_header(StatusCode::METHOD_NOT_ALLOWED);
            return Ok(());
        }

        let Some(file) = self.resolve(&req.path) else {
            w.headers_mut().set(CONTENT_TYPE, "text/plain");
            w.write_header(StatusCode::NOT_FOUND);
            w.write_all(b"404 Not Found")?;
            return Ok(());
        };

        let content = std::fs::read(&file)
            .with_context(|| format!("reading {}", file.display()))?;

        let extension = file.extension().and_then(|e| e.to_str());
        w.headers_mut().set(CONTENT_TYPE, content_type_for(extension));
        w.write_header(StatusCode::OK);
        w.write_all(&content)?;
        Ok(())
    }
}
