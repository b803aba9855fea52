use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::http::handler::{Handler, SharedHandler};
use crate::http::headers::CONNECTION;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::{ResponseRecorder, WireWriter};

pub struct Connection {
    stream: TcpStream,
    handler: SharedHandler,
    buffer: Vec<u8>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(WireWriter, bool), // bool = keep_alive?
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, handler: SharedHandler) -> Self {
        Self {
            stream,
            handler,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(e) if e.downcast_ref::<ParseError>().is_some() => {
                            tracing::warn!(error = %e, "rejecting malformed request");
                            let mut response = Response::bad_request();
                            response.headers.set(CONNECTION, "close");
                            ConnectionState::Writing(WireWriter::new(&response, false), false)
                        }
                        Err(e) => return Err(e),
                    };
                }

                ConnectionState::Processing(req) => {
                    let keep_alive = req.keep_alive();
                    let head_only = req.is_head();

                    let handler = SharedHandler::clone(&self.handler);
                    let mut response =
                        tokio::task::spawn_blocking(move || dispatch(&*handler, &req)).await?;
                    if !keep_alive {
                        response.headers.set(CONNECTION, "close");
                    }

                    let writer = WireWriter::new(&response, head_only);
                    self.state = ConnectionState::Writing(writer, keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

                    if keep_alive {
                        self.state = ConnectionState::Reading;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    pub async fn read_request(&mut self) -> anyhow::Result<Option<Request>> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Err(anyhow::Error::new(e).context("HTTP parse error"));
                }
            }

            let mut temp = [0u8; 1024];
            let n = self.stream.read(&mut temp).await?;

            if n == 0 {
                // Client closed connection
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }
}

/// Runs `handler` against a fresh recorder.
///
/// A failing handler gets a generic 500 instead of whatever it had written so far.
pub fn dispatch(handler: &dyn Handler, req: &Request) -> Response {
    let mut recorder = ResponseRecorder::new();

    match handler.serve(&mut recorder, req) {
        Ok(()) => {
            let response = recorder.into_response();
            tracing::info!(
                method = req.method.as_str(),
                path = %req.path,
                status = response.status.as_u16(),
                "request served"
            );
            response
        }
        Err(e) => {
            tracing::error!(
                method = req.method.as_str(),
                path = %req.path,
                error = format_args!("{e:#}"),
                "handler failed"
            );
            Response::internal_error()
        }
    }
}
