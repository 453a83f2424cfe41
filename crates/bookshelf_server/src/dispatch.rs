//! Request dispatch onto the catalog service.
//!
//! # Responsibility
//! - Decode one request line, run it against `BookService`, encode the
//!   response envelope.
//! - Emit one structured log line per request.
//!
//! # Invariants
//! - Never panics on client input; every failure becomes an envelope.
//! - A failed operation does not modify the catalog.

use crate::protocol::{ErrorCode, OperationError, OperationRequest, OperationResponse};
use crate::schema::{Operation, SCHEMA_SDL};
use bookshelf_core::{BookError, BookRepository, BookService};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use uuid::Uuid;

pub struct Dispatcher<R: BookRepository> {
    service: BookService<R>,
}

impl<R: BookRepository> Dispatcher<R> {
    pub fn new(service: BookService<R>) -> Self {
        Self { service }
    }

    /// Handles one raw request line.
    pub fn execute_line(&self, line: &str) -> OperationResponse {
        match serde_json::from_str::<OperationRequest>(line) {
            Ok(request) => self.execute(&request),
            Err(err) => {
                warn!(
                    "event=operation module=server status=error error_code=BAD_REQUEST error={}",
                    err
                );
                OperationResponse::rejected(OperationError::new(
                    ErrorCode::BadRequest,
                    format!("invalid request: {err}"),
                ))
            }
        }
    }

    pub fn execute(&self, request: &OperationRequest) -> OperationResponse {
        let request_id = Uuid::new_v4();
        let started_at = Instant::now();

        let response = match Operation::parse(request) {
            Ok(operation) => {
                let name = operation.name();
                match self.run(operation) {
                    Ok(value) => OperationResponse::success(name, value),
                    Err(err) => OperationResponse::failure(name, err),
                }
            }
            Err(err) => OperationResponse::failure(&request.operation_name, err),
        };

        match response.errors.first() {
            None => info!(
                "event=operation module=server status=ok op={} request_id={} duration_us={}",
                request.operation_name,
                request_id,
                started_at.elapsed().as_micros()
            ),
            Some(err) => warn!(
                "event=operation module=server status=error op={} request_id={} duration_us={} error_code={:?}",
                request.operation_name,
                request_id,
                started_at.elapsed().as_micros(),
                err.code()
            ),
        }
        response
    }

    fn run(&self, operation: Operation) -> Result<Value, OperationError> {
        debug!("event=operation_run module=server op={}", operation.name());
        match operation {
            Operation::Books => encode(&self.service.list_books()),
            Operation::Book { id } => encode(&self.service.get_book(&id)),
            Operation::CreateBook(input) => encode(&self.service.create_book(input)),
            Operation::UpdateBook { id, patch } => self
                .service
                .update_book(&id, &patch)
                .map_err(domain_error)
                .and_then(|book| encode(&book)),
            Operation::DeleteBook { id } => self
                .service
                .delete_book(&id)
                .map(Value::Bool)
                .map_err(domain_error),
            Operation::Schema => Ok(Value::String(SCHEMA_SDL.to_string())),
        }
    }
}

fn domain_error(err: BookError) -> OperationError {
    match err {
        BookError::NotFound(_) => OperationError::new(ErrorCode::NotFound, err.to_string()),
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, OperationError> {
    serde_json::to_value(value).map_err(|err| {
        OperationError::new(
            ErrorCode::InternalServerError,
            format!("failed to encode result: {err}"),
        )
    })
}
