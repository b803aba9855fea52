use crate::http::headers::{Headers, CONNECTION, CONTENT_LENGTH};

/// HTTP request methods.
///
/// Only GET and HEAD are served by the static file handler; the others are
/// parsed so handlers can answer them with 405.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

/// A parsed HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The request path/URL (e.g., "/index.html")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers
    pub headers: Headers,
    /// Request body for POST/PUT requests
    pub body: Vec<u8>,
}

/// Builder for constructing Request objects.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl Method {
    /// Parses an HTTP method from its (case-sensitive) token.
    ///
    /// # Example
    ///
    /// ```
    /// # use revalidate::http::request::Method;
    /// assert_eq!(Method::from_token("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_token("get"), None);
    /// ```
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Builds the request. Method defaults to GET and path to `/`.
    pub fn build(self) -> Request {
        Request {
            method: self.method.unwrap_or(Method::GET),
            path: self.path.unwrap_or_else(|| "/".to_string()),
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Request {
    /// Shorthand for a bodiless GET request.
    pub fn get(path: impl Into<String>) -> Self {
        RequestBuilder::new().path(path).build()
    }

    /// Retrieves a header value by name, ignoring ASCII case.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Returns 0 if Content-Length is missing or not a valid number.
    pub fn content_length(&self) -> usize {
        self.header(CONTENT_LENGTH)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Determines whether the connection should remain open after the response.
    ///
    /// HTTP/1.1 defaults to keep-alive; HTTP/1.0 needs an explicit
    /// `Connection: keep-alive`.
    pub fn keep_alive(&self) -> bool {
        match self.header(CONNECTION) {
            Some(v) if v.eq_ignore_ascii_case("close") => false,
            Some(v) if v.eq_ignore_ascii_case("keep-alive") => true,
            _ => self.version != "HTTP/1.0",
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
