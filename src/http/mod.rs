//! HTTP primitives and a minimal HTTP/1.1 host stack.
//!
//! # Architecture
//!
//! - **`headers`**: case-insensitive header collection and header name constants
//! - **`request`** / **`response`**: request, status code and committed response types
//! - **`writer`**: the [`writer::ResponseWriter`] seam, the in-memory recorder and wire serialization
//! - **`handler`**: the [`handler::Handler`] trait every layer of a chain implements
//! - **`date`**: RFC 1123 date formatting and parsing
//! - **`parser`**: parses incoming HTTP requests from byte buffers
//! - **`connection`**: per-connection request/response state machine
//! - **`mime`**: Content-Type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Run the handler chain on the blocking pool
//!        └──────┬───────────┘
//!               │ Response committed
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ Keep-Alive → Reading (same connection)
//!               └─ Close → Closed
//! ```

pub mod connection;
pub mod date;
pub mod handler;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
