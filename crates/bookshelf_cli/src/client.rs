//! Catalog client over the newline-delimited JSON transport.

use anyhow::{bail, Context, Result};
use bookshelf_core::Book;
use bookshelf_server::schema::{BOOK, BOOKS, CREATE_BOOK, DELETE_BOOK, SCHEMA, UPDATE_BOOK};
use bookshelf_server::{OperationError, OperationRequest, OperationResponse};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

/// Operation failure as seen by the caller.
#[derive(Debug)]
pub enum ClientError {
    /// The server answered with an error envelope.
    Operation(OperationError),
    /// Connection, framing or decoding failure.
    Transport(anyhow::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Operation(err) => write!(f, "{}", err.message),
            Self::Transport(err) => write!(f, "{err:#}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<anyhow::Error> for ClientError {
    fn from(value: anyhow::Error) -> Self {
        Self::Transport(value)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub struct CatalogClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl CatalogClient {
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("failed to connect to {addr}"))?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    /// Sends one request and waits for its response line.
    pub async fn request(&mut self, request: &OperationRequest) -> Result<OperationResponse> {
        let mut line = serde_json::to_vec(request).context("failed to encode request")?;
        line.push(b'\n');
        self.writer
            .write_all(&line)
            .await
            .context("failed to send request")?;

        let mut response = String::new();
        let read = self
            .reader
            .read_line(&mut response)
            .await
            .context("failed to read response")?;
        if read == 0 {
            bail!("server closed the connection");
        }
        serde_json::from_str(&response).context("failed to decode response")
    }

    async fn call(&mut self, operation_name: &str, variables: Value) -> ClientResult<Value> {
        let response = self
            .request(&OperationRequest::new(operation_name, variables))
            .await?;
        response
            .into_result(operation_name)
            .map_err(ClientError::Operation)
    }

    pub async fn books(&mut self) -> ClientResult<Vec<Book>> {
        decode(self.call(BOOKS, Value::Null).await?)
    }

    pub async fn book(&mut self, id: &str) -> ClientResult<Option<Book>> {
        decode(self.call(BOOK, json!({ "id": id })).await?)
    }

    pub async fn create_book(&mut self, title: &str, author: &str) -> ClientResult<Book> {
        decode(
            self.call(CREATE_BOOK, json!({ "title": title, "author": author }))
                .await?,
        )
    }

    pub async fn update_book(
        &mut self,
        id: &str,
        title: Option<&str>,
        author: Option<&str>,
    ) -> ClientResult<Book> {
        decode(
            self.call(
                UPDATE_BOOK,
                json!({ "id": id, "title": title, "author": author }),
            )
            .await?,
        )
    }

    pub async fn delete_book(&mut self, id: &str) -> ClientResult<bool> {
        decode(self.call(DELETE_BOOK, json!({ "id": id })).await?)
    }

    pub async fn schema(&mut self) -> ClientResult<String> {
        decode(self.call(SCHEMA, Value::Null).await?)
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> ClientResult<T> {
    serde_json::from_value(value)
        .context("unexpected response shape")
        .map_err(ClientError::Transport)
}
