use std::io;

use bytes::BytesMut;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::http::headers::{Headers, CONTENT_LENGTH};
use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.1";

/// The outbound half of an HTTP exchange.
///
/// Headers stay mutable until the status line is committed by
/// [`ResponseWriter::write_header`]; the first [`ResponseWriter::write`]
/// commits an implicit 200 when no status was written.
pub trait ResponseWriter {
    fn headers(&self) -> &Headers;

    fn headers_mut(&mut self) -> &mut Headers;

    /// Commits (or, for a decorator, records) the status code.
    fn write_header(&mut self, status: StatusCode);

    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// The captured body of a buffering writer.
    ///
    /// `None` means no buffer is available, which is different from
    /// `Some(&[])`.
    fn buffered_body(&self) -> Option<&[u8]> {
        None
    }

    fn write_all(&mut self, mut buf: &[u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole response body",
                    ));
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

/// In-memory response writer.
///
/// The connection runs handlers against a recorder and serializes the result;
/// tests use it to inspect what a handler chain committed.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: Headers,
    body: BytesMut,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed status, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Finishes the exchange. An uncommitted response reports 200.
    pub fn into_response(self) -> Response {
        Response {
            status: self.status.unwrap_or(StatusCode::OK),
            headers: self.headers,
            body: self.body.to_vec(),
        }
    }
}

impl ResponseWriter for ResponseRecorder {
    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn write_header(&mut self, status: StatusCode) {
        if let Some(committed) = self.status {
            tracing::warn!(
                committed = committed.as_u16(),
                attempted = status.as_u16(),
                "superfluous write_header call"
            );
            return;
        }
        self.status = Some(status.or_ok());
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.status.is_none() {
            self.write_header(StatusCode::OK);
        }

        let status = self.status.unwrap_or_default();
        if !status.allows_body() {
            tracing::trace!(
                status = status.as_u16(),
                len = buf.len(),
                "discarding body bytes for bodiless status"
            );
            return Ok(buf.len());
        }

        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Serializes a response into HTTP/1.1 wire bytes.
///
/// With `head_only` the body is left out but the headers, including
/// Content-Length, describe the full representation.
pub fn serialize_response(resp: &Response, head_only: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + resp.body.len());

    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    for (k, v) in resp.headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    if resp.status.allows_body() && !resp.headers.contains(CONTENT_LENGTH) {
        buf.extend_from_slice(format!("{}: {}\r\n", CONTENT_LENGTH, resp.body.len()).as_bytes());
    }

    buf.extend_from_slice(b"\r\n");

    if !head_only && resp.status.allows_body() {
        buf.extend_from_slice(&resp.body);
    }

    buf
}

/// Writes serialized response bytes to a client socket, resuming across
/// partial writes.
pub struct WireWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl WireWriter {
    pub fn new(response: &Response, head_only: bool) -> Self {
        Self {
            buffer: serialize_response(response, head_only),
            written: 0,
        }
    }

    pub async fn write_to_stream(&mut self, stream: &mut TcpStream) -> anyhow::Result<()> {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        Ok(())
    }
}
