//! TCP transport for the operation protocol.
//!
//! Framing is newline-delimited JSON: each request object ends with `\n`
//! and gets exactly one response line. Requests on one connection are
//! answered in order; connections are served concurrently.

use crate::dispatch::Dispatcher;
use crate::protocol::{ErrorCode, OperationError, OperationResponse};
use anyhow::{Context, Result};
use bookshelf_core::BookRepository;
use log::{debug, error, info, warn};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

/// Monotonic per-process connection counter used to tag log lines.
static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Outcome of one bounded line read.
#[derive(Debug, PartialEq, Eq)]
pub enum LineRead {
    Line(String),
    /// The line exceeded the limit and was drained up to its newline.
    Oversized(usize),
    Eof,
}

/// Reads one `\n`-terminated line without buffering more than `max_bytes`
/// of content.
///
/// Invalid UTF-8 is replaced lossily; the trailing newline is stripped.
pub async fn read_line_bounded<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    max_bytes: usize,
) -> io::Result<LineRead> {
    let mut raw = Vec::new();
    let mut total = 0usize;
    let mut oversized = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            if total == 0 {
                return Ok(LineRead::Eof);
            }
            break;
        }

        let (end, found_newline) = match available.iter().position(|&b| b == b'\n') {
            Some(pos) => (pos + 1, true),
            None => (available.len(), false),
        };

        // The terminating newline does not count toward the limit.
        let content = total + end - usize::from(found_newline);
        if !oversized && content > max_bytes {
            oversized = true;
            raw.clear();
        }
        if !oversized {
            raw.extend_from_slice(&available[..end]);
        }
        total += end;
        reader.consume(end);

        if found_newline {
            break;
        }
    }

    if oversized {
        return Ok(LineRead::Oversized(total));
    }

    let line = String::from_utf8(raw)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
    Ok(LineRead::Line(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Bound listener plus the dispatcher shared by every connection.
pub struct CatalogServer<R: BookRepository> {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher<R>>,
    max_line_bytes: usize,
}

impl<R> CatalogServer<R>
where
    R: BookRepository + Send + Sync + 'static,
{
    pub async fn bind(
        addr: SocketAddr,
        dispatcher: Dispatcher<R>,
        max_line_bytes: usize,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr).await.with_context(|| {
            format!("failed to bind TCP listener to {addr}; address may be in use")
        })?;
        Ok(Self {
            listener,
            dispatcher: Arc::new(dispatcher),
            max_line_bytes,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read listener address")
    }

    /// Accepts connections until `shutdown` resolves.
    pub async fn serve_until(self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tokio::pin!(shutdown);
        info!(
            "event=server_listen module=server status=ok addr={} max_line_bytes={}",
            self.local_addr()?,
            self.max_line_bytes
        );

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => {
                    info!("event=server_shutdown module=server status=ok");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(err) => {
                        // Transient; keep accepting.
                        error!("event=server_accept module=server status=error error={}", err);
                        continue;
                    }
                },
            };

            let conn_tag = format!(
                "C{:03}",
                CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed)
            );
            let dispatcher = Arc::clone(&self.dispatcher);
            let max_line_bytes = self.max_line_bytes;
            tokio::spawn(async move {
                debug!("event=conn_open module=server conn={} peer={}", conn_tag, peer);
                match serve_connection(stream, &dispatcher, max_line_bytes).await {
                    Ok(served) => debug!(
                        "event=conn_close module=server status=ok conn={} requests={}",
                        conn_tag, served
                    ),
                    Err(err) => warn!(
                        "event=conn_close module=server status=error conn={} error={}",
                        conn_tag, err
                    ),
                }
            });
        }
    }
}

/// Serves one connection to EOF and returns the number of responses sent.
async fn serve_connection<R: BookRepository>(
    stream: TcpStream,
    dispatcher: &Dispatcher<R>,
    max_line_bytes: usize,
) -> io::Result<u64> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut served = 0u64;

    loop {
        let response = match read_line_bounded(&mut reader, max_line_bytes).await? {
            LineRead::Eof => return Ok(served),
            LineRead::Line(line) if line.trim().is_empty() => continue,
            LineRead::Line(line) => dispatcher.execute_line(&line),
            LineRead::Oversized(size) => {
                warn!(
                    "event=request_rejected module=server status=error error_code=BAD_REQUEST bytes={}",
                    size
                );
                OperationResponse::rejected(OperationError::new(
                    ErrorCode::BadRequest,
                    format!("request line exceeds {max_line_bytes} byte limit ({size} bytes)"),
                ))
            }
        };

        let mut encoded = serde_json::to_vec(&response).map_err(io::Error::from)?;
        encoded.push(b'\n');
        write_half.write_all(&encoded).await?;
        write_half.flush().await?;
        served += 1;
    }
}
