use std::fmt;

use crate::http::headers::{Headers, CONTENT_LENGTH, CONTENT_TYPE};

/// HTTP status code.
///
/// Any numeric code can be carried; the associated constants cover the codes
/// this crate produces itself. A code below 100 means "not set yet" and is
/// normalized to 200 before anything commits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    /// 200 OK
    pub const OK: StatusCode = StatusCode(200);
    /// 201 Created
    pub const CREATED: StatusCode = StatusCode(201);
    /// 204 No Content
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    /// 304 Not Modified
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    /// 400 Bad Request
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    /// 404 Not Found
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    /// 405 Method Not Allowed
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    /// 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);

    pub const fn new(code: u16) -> Self {
        StatusCode(code)
    }

    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use revalidate::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.as_u16(), 200);
    /// assert_eq!(StatusCode::NOT_MODIFIED.as_u16(), 304);
    /// ```
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Maps the "unset" range (below 100) to 200.
    pub fn or_ok(self) -> StatusCode {
        if self.0 < 100 { StatusCode::OK } else { self }
    }

    /// Whether a response with this status may carry a body.
    pub fn allows_body(&self) -> bool {
        !matches!(self.0, 100..=199 | 204 | 304)
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use revalidate::http::response::StatusCode;
    /// assert_eq!(StatusCode::OK.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NOT_MODIFIED.reason_phrase(), "Not Modified");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self.0 {
            100 => "Continue",
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            412 => "Precondition Failed",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::OK
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

/// A complete HTTP response, as committed by a writer.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// HTTP headers
    pub headers: Headers,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::OK)
///     .header("Content-Type", "application/json")
///     .body(b"{}".to_vec())
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the final Response.
    ///
    /// Adds a Content-Length header when the status allows a body and none was set.
    pub fn build(mut self) -> Response {
        if self.status.allows_body() && !self.headers.contains(CONTENT_LENGTH) {
            self.headers.set(CONTENT_LENGTH, self.body.len().to_string());
        }

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Creates a simple 200 OK response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::OK)
            .body(body.into())
            .build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NOT_FOUND)
            .header(CONTENT_TYPE, "text/plain")
            .body(b"404 Not Found".to_vec())
            .build()
    }

    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BAD_REQUEST)
            .header(CONTENT_TYPE, "text/plain")
            .body(b"400 Bad Request".to_vec())
            .build()
    }

    pub fn internal_error() -> Self {
        ResponseBuilder::new(StatusCode::INTERNAL_SERVER_ERROR)
            .header(CONTENT_TYPE, "text/plain")
            .body(b"500 Internal Server Error".to_vec())
            .build()
    }
}
