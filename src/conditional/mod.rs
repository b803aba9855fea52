//! Conditional requests (RFC 7232).
//!
//! # Architecture
//!
//! - **`etag`**: the [`EntityTag`] validator and its strong/weak comparison
//! - **`intercept`**: the response decorator that defers the status commit
//!   until a hook has looked at the response
//! - **`policy`**: hooks that emit `ETag` / `Last-Modified` and answer
//!   `If-None-Match` / `If-Modified-Since` with 304
//!
//! Nothing here generates validators; callers supply producer closures.

pub mod etag;
pub mod intercept;
pub mod policy;

pub use etag::{Comparison, EntityTag};
pub use intercept::{
    hook, intercept, Hook, Intercept, InterceptedResponse, ObservationMode, Observed, ResponseView,
};
pub use policy::{etag_handler, last_modified_constant, last_modified_handler, not_modified};
