//! Conditional request policies.
//!
//! Each constructor takes the next handler and returns a decorated one, so
//! policies compose by nesting. A typical chain puts the matcher outermost so
//! it sees the validators the inner policies emit:
//!
//! ```ignore
//! let app = not_modified(
//!     Comparison::Weak,
//!     etag_handler(tag_of_body, ObservationMode::AfterResponse,
//!         last_modified_constant(deployed_at, files)),
//! );
//! ```

use chrono::{DateTime, Utc};

use crate::conditional::etag::{Comparison, EntityTag};
use crate::conditional::intercept::{hook, intercept, Intercept, ObservationMode, Observed};
use crate::http::date::{format_http_date, parse_http_date};
use crate::http::handler::Handler;
use crate::http::headers::{Headers, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use crate::http::request::Request;
use crate::http::response::StatusCode;

/// Sets the `ETag` response header from `producer`.
///
/// The producer sees `None` in [`ObservationMode::BeforeHeaders`], the
/// downstream headers in `AfterHeaders`, and headers plus buffered body in
/// `AfterResponse`. Returning `None` leaves the header unset.
pub fn etag_handler<H, F>(producer: F, mode: ObservationMode, next: H) -> Intercept<H>
where
    H: Handler,
    F: Fn(Option<Observed<'_>>, &Request) -> Option<EntityTag> + Send + Sync + 'static,
{
    intercept(
        hook(move |view, req, status| {
            if let Some(tag) = producer(view.observed(), req) {
                view.headers_mut().set(ETAG, tag.to_string());
            }
            status
        }),
        mode,
        next,
    )
}

/// Sets the `Last-Modified` response header from `producer`, in RFC 1123
/// form converted to GMT. Returning `None` leaves the header unset.
pub fn last_modified_handler<H, F>(producer: F, mode: ObservationMode, next: H) -> Intercept<H>
where
    H: Handler,
    F: Fn(Option<Observed<'_>>, &Request) -> Option<DateTime<Utc>> + Send + Sync + 'static,
{
    intercept(
        hook(move |view, req, status| {
            if let Some(modified) = producer(view.observed(), req) {
                view.headers_mut().set(LAST_MODIFIED, format_http_date(&modified));
            }
            status
        }),
        mode,
        next,
    )
}

/// Sets `Last-Modified` to the same instant on every response.
pub fn last_modified_constant<H: Handler>(modified: DateTime<Utc>, next: H) -> Intercept<H> {
    let value = format_http_date(&modified);

    intercept(
        hook(move |view, _req, status| {
            view.headers_mut().set(LAST_MODIFIED, value.as_str());
            status
        }),
        ObservationMode::BeforeHeaders,
        next,
    )
}

/// Answers 304 Not Modified when the request's validators match the
/// response's.
///
/// `If-None-Match` is checked against `ETag` first. When the request carries
/// `If-None-Match`, `If-Modified-Since` is ignored entirely (RFC 7232,
/// section 3.3), even if the entity-tag check cannot be decided. Anything
/// unparseable leaves the response alone.
pub fn not_modified<H: Handler>(comparison: Comparison, next: H) -> Intercept<H> {
    intercept(
        hook(move |view, req, status| match view.observed() {
            Some(observed) => evaluate(observed.headers(), req, comparison, status),
            None => status,
        }),
        ObservationMode::AfterHeaders,
        next,
    )
}

fn evaluate(response: &Headers, req: &Request, comparison: Comparison, status: StatusCode) -> StatusCode {
    let not_modified = match req.headers.get_non_empty(IF_NONE_MATCH) {
        Some(if_none_match) => etag_matches(response, if_none_match, comparison),
        None => unmodified_since(response, req),
    };

    if not_modified {
        tracing::debug!(path = %req.path, original = status.as_u16(), "validators match, answering 304");
        StatusCode::NOT_MODIFIED
    } else {
        status
    }
}

fn etag_matches(response: &Headers, if_none_match: &str, comparison: Comparison) -> bool {
    let Some(etag) = response.get_non_empty(ETAG) else {
        return false;
    };

    match (EntityTag::parse(if_none_match), EntityTag::parse(etag)) {
        (Some(requested), Some(current)) => requested.equal(&current, comparison),
        _ => {
            tracing::debug!(if_none_match, etag, "unparseable entity-tag, skipping match");
            false
        }
    }
}

fn unmodified_since(response: &Headers, req: &Request) -> bool {
    let (Some(since), Some(modified)) = (
        req.headers.get_non_empty(IF_MODIFIED_SINCE),
        response.get_non_empty(LAST_MODIFIED),
    ) else {
        return false;
    };

    if since == modified {
        return true;
    }

    match (parse_http_date(since), parse_http_date(modified)) {
        (Some(since), Some(modified)) => modified <= since,
        _ => {
            tracing::debug!(if_modified_since = since, last_modified = modified, "unparseable date, skipping match");
            false
        }
    }
}
