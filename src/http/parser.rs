use std::fmt;

use crate::http::headers::{Headers, CONTENT_LENGTH};
use crate::http::request::{Method, Request};

/// Upper bound on the request line plus header block.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;
/// Upper bound on a declared `Content-Length`.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    HeadTooLarge,
    BodyTooLarge,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidMethod => "unknown request method",
            ParseError::InvalidHeader => "malformed header line",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::HeadTooLarge => "request head too large",
            ParseError::BodyTooLarge => "request body too large",
            ParseError::Incomplete => "incomplete request",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// [`ParseError::Incomplete`] when more input is needed.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let headers_end = match find_headers_end(buf) {
        Some(end) => end,
        None if buf.len() > MAX_HEAD_BYTES => return Err(ParseError::HeadTooLarge),
        None => return Err(ParseError::Incomplete),
    };
    if headers_end > MAX_HEAD_BYTES {
        return Err(ParseError::HeadTooLarge);
    }

    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    let method = Method::from_token(method_str).ok_or(ParseError::InvalidMethod)?;

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::InvalidHeader);
        }

        headers.append(key, value.trim());
    }

    let content_length = headers
        .get(CONTENT_LENGTH)
        .map(|v| v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?
        .unwrap_or(0);
    if content_length > MAX_BODY_BYTES {
        return Err(ParseError::BodyTooLarge);
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    Ok((request, headers_end + 4 + content_length))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
