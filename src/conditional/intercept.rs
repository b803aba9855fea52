//! Response interception.
//!
//! An [`Intercept`] handler wraps the next handler in the chain and gives a
//! hook a chance to look at (and rewrite the status of) the response before
//! the status line is committed. When the hook runs, and how much of the
//! response it can see, is chosen by an [`ObservationMode`]:
//!
//! ```text
//!  BeforeHeaders   hook ──▶ next handler ──▶ writer
//!  AfterHeaders    next handler ──▶ [first write | finish] ──▶ hook ──▶ commit ──▶ stream body
//!  AfterResponse   next handler ──▶ buffer body ──▶ finish ──▶ hook ──▶ commit ──▶ flush body
//! ```
//!
//! Headers are never buffered: the interceptor hands out the underlying
//! writer's header collection, so header writes are visible immediately.

use std::io;
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use serde::Deserialize;

use crate::http::handler::Handler;
use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;

/// When a hook runs and what response state it may observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationMode {
    /// Before the next handler runs. Nothing can be observed.
    BeforeHeaders,
    /// When the next handler starts its body (or finishes without one).
    /// Headers and status are observable; the body is not.
    AfterHeaders,
    /// After the next handler completes. Headers, status and the fully
    /// buffered body are observable.
    ///
    /// The whole body is held in memory for the duration of the request.
    AfterResponse,
}

/// Response state a hook or producer may inspect.
#[derive(Debug, Clone, Copy)]
pub struct Observed<'a> {
    headers: &'a Headers,
    status: StatusCode,
    body: Option<&'a [u8]>,
}

impl<'a> Observed<'a> {
    pub fn headers(&self) -> &'a Headers {
        self.headers
    }

    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers.get(name)
    }

    /// The status the downstream handler asked for (200 if it never did).
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The buffered body, only in [`ObservationMode::AfterResponse`] and only
    /// when the downstream handler wrote something.
    pub fn body(&self) -> Option<&'a [u8]> {
        self.body
    }
}

/// What a hook gets to work with.
///
/// Headers are always writable. Whether anything is observable depends on
/// the mode the hook was installed with; see [`ResponseView::observed`].
pub struct ResponseView<'a> {
    headers: &'a mut Headers,
    observed: Option<(StatusCode, Option<&'a [u8]>)>,
}

impl<'a> ResponseView<'a> {
    fn blind(headers: &'a mut Headers) -> Self {
        Self {
            headers,
            observed: None,
        }
    }

    fn observing(headers: &'a mut Headers, status: StatusCode, body: Option<&'a [u8]>) -> Self {
        Self {
            headers,
            observed: Some((status, body)),
        }
    }

    /// The downstream response, or `None` in [`ObservationMode::BeforeHeaders`].
    pub fn observed(&self) -> Option<Observed<'_>> {
        self.observed.map(|(status, body)| Observed {
            headers: &*self.headers,
            status,
            body,
        })
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut *self.headers
    }
}

/// A hook receives the response view, the request and the candidate status,
/// and returns the status to commit.
pub type Hook = Arc<dyn Fn(&mut ResponseView<'_>, &Request, StatusCode) -> StatusCode + Send + Sync>;

/// Builds a [`Hook`] from a closure.
pub fn hook<F>(f: F) -> Hook
where
    F: Fn(&mut ResponseView<'_>, &Request, StatusCode) -> StatusCode + Send + Sync + 'static,
{
    Arc::new(f)
}

enum Capture {
    /// Body bytes go straight to the underlying writer once committed.
    Streaming,
    /// Body bytes are held until [`InterceptedResponse::flush`]. `None` until
    /// the first write.
    Buffered(Option<BytesMut>),
}

/// A response writer that defers the status commit until its hook has run.
///
/// Created per request by [`Intercept`]; never outlives the request.
pub struct InterceptedResponse<'a> {
    inner: &'a mut dyn ResponseWriter,
    request: &'a Request,
    status: StatusCode,
    capture: Capture,
    hook: Option<Hook>,
    committed: bool,
}

impl<'a> InterceptedResponse<'a> {
    /// Wraps `inner`. `BeforeHeaders` hooks never see a decorated writer,
    /// so only the two deferring modes are accepted; `buffer_body` selects
    /// [`ObservationMode::AfterResponse`].
    pub fn new(
        inner: &'a mut dyn ResponseWriter,
        request: &'a Request,
        hook: Hook,
        buffer_body: bool,
    ) -> Self {
        let capture = if buffer_body {
            Capture::Buffered(None)
        } else {
            Capture::Streaming
        };

        Self {
            inner,
            request,
            status: StatusCode::new(0),
            capture,
            hook: Some(hook),
            committed: false,
        }
    }

    /// Commits the status line exactly once, running the hook first.
    fn commit(&mut self) {
        if self.committed {
            return;
        }
        self.committed = true;

        let mut status = self.status.or_ok();
        if let Some(hook) = self.hook.take() {
            let body = match &self.capture {
                Capture::Buffered(body) => body.as_deref(),
                Capture::Streaming => None,
            };
            let mut view = ResponseView::observing(self.inner.headers_mut(), status, body);
            status = (*hook)(&mut view, self.request, status).or_ok();
            tracing::trace!(path = %self.request.path, status = status.as_u16(), "response hook ran");
        }

        self.inner.write_header(status);
    }

    /// Finishes the response.
    ///
    /// Guarantees the hook has run and the status is committed, even when the
    /// downstream handler wrote nothing. In buffering mode the captured body is
    /// then written through in one go.
    pub fn flush(&mut self) -> io::Result<()> {
        self.commit();

        if let Capture::Buffered(Some(body)) = &mut self.capture {
            let body = body.split().freeze();
            self.inner.write_all(&body)?;
        }

        Ok(())
    }
}

impl ResponseWriter for InterceptedResponse<'_> {
    fn headers(&self) -> &Headers {
        self.inner.headers()
    }

    fn headers_mut(&mut self) -> &mut Headers {
        self.inner.headers_mut()
    }

    fn write_header(&mut self, status: StatusCode) {
        if self.committed {
            tracing::warn!(
                path = %self.request.path,
                attempted = status.as_u16(),
                "write_header after the response was committed"
            );
            return;
        }
        self.status = status;
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Capture::Buffered(body) = &mut self.capture {
            body.get_or_insert_with(BytesMut::new).extend_from_slice(buf);
            return Ok(buf.len());
        }

        self.commit();
        self.inner.write(buf)
    }

    fn buffered_body(&self) -> Option<&[u8]> {
        match &self.capture {
            Capture::Buffered(body) => body.as_deref(),
            Capture::Streaming => None,
        }
    }
}

/// Handler decorator that installs a hook in front of `next`.
pub struct Intercept<H> {
    hook: Hook,
    mode: ObservationMode,
    next: H,
}

/// Wraps `next` so that `hook` runs at the point `mode` describes.
pub fn intercept<H: Handler>(hook: Hook, mode: ObservationMode, next: H) -> Intercept<H> {
    Intercept { hook, mode, next }
}

impl<H> Intercept<H> {
    /// The observation mode the hook was installed with.
    pub fn mode(&self) -> ObservationMode {
        self.mode
    }
}

impl<H: Handler> Handler for Intercept<H> {
    fn serve(&self, w: &mut dyn ResponseWriter, req: &Request) -> anyhow::Result<()> {
        let buffer_body = match self.mode {
            ObservationMode::BeforeHeaders => {
                let mut view = ResponseView::blind(w.headers_mut());
                (*self.hook)(&mut view, req, StatusCode::OK);
                return self.next.serve(w, req);
            }
            ObservationMode::AfterHeaders => false,
            ObservationMode::AfterResponse => true,
        };

        let mut rw = InterceptedResponse::new(w, req, Arc::clone(&self.hook), buffer_body);
        self.next.serve(&mut rw, req)?;
        rw.flush()
            .with_context(|| format!("flushing intercepted response for {}", req.path))
    }
}
