//! revalidate - conditional HTTP requests (RFC 7232)
//!
//! Core library: entity-tags, the response interceptor and the `ETag` /
//! `Last-Modified` / 304 policies, plus the small HTTP/1.1 stack the demo
//! server runs on.

pub mod conditional;
pub mod config;
pub mod http;
pub mod server;
