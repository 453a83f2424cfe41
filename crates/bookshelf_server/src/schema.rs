//! Catalog schema: operation names and variable decoding.
//!
//! # Responsibility
//! - Map a named request onto one typed catalog operation.
//! - Enforce required-argument presence and scalar types.
//!
//! # Invariants
//! - `ID` variables accept strings and integers; integers are rendered to
//!   their decimal string form.
//! - `String` variables accept only strings; explicit `null` counts as
//!   omitted for optional arguments.

use crate::protocol::{ErrorCode, OperationError, OperationRequest};
use bookshelf_core::{BookId, BookPatch, NewBook};
use serde_json::{Map, Value};

/// Schema definition served by the `__schema` operation.
pub const SCHEMA_SDL: &str = r#"type Book {
  id: ID!
  title: String!
  author: String!
}

type Query {
  books: [Book]
  book(id: ID!): Book
}

type Mutation {
  createBook(title: String!, author: String!): Book
  updateBook(id: ID!, title: String, author: String): Book
  deleteBook(id: ID!): Boolean
}
"#;

pub const BOOKS: &str = "books";
pub const BOOK: &str = "book";
pub const CREATE_BOOK: &str = "createBook";
pub const UPDATE_BOOK: &str = "updateBook";
pub const DELETE_BOOK: &str = "deleteBook";
pub const SCHEMA: &str = "__schema";

/// A decoded catalog operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Books,
    Book { id: BookId },
    CreateBook(NewBook),
    UpdateBook { id: BookId, patch: BookPatch },
    DeleteBook { id: BookId },
    Schema,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Books => BOOKS,
            Self::Book { .. } => BOOK,
            Self::CreateBook(_) => CREATE_BOOK,
            Self::UpdateBook { .. } => UPDATE_BOOK,
            Self::DeleteBook { .. } => DELETE_BOOK,
            Self::Schema => SCHEMA,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::CreateBook(_) | Self::UpdateBook { .. } | Self::DeleteBook { .. }
        )
    }

    /// Decodes `request` into an operation.
    ///
    /// # Errors
    /// - `UNKNOWN_OPERATION` for names outside the schema.
    /// - `BAD_USER_INPUT` for non-object variables, missing required
    ///   variables or wrongly typed values.
    pub fn parse(request: &OperationRequest) -> Result<Self, OperationError> {
        let empty = Map::new();
        let vars = match &request.variables {
            Value::Null => &empty,
            Value::Object(vars) => vars,
            other => {
                return Err(OperationError::new(
                    ErrorCode::BadUserInput,
                    format!("variables must be an object, got {}", type_label(other)),
                ))
            }
        };

        match request.operation_name.as_str() {
            BOOKS => Ok(Self::Books),
            BOOK => Ok(Self::Book {
                id: required_id(vars, "id")?,
            }),
            CREATE_BOOK => Ok(Self::CreateBook(NewBook::new(
                required_string(vars, "title")?,
                required_string(vars, "author")?,
            ))),
            UPDATE_BOOK => Ok(Self::UpdateBook {
                id: required_id(vars, "id")?,
                patch: BookPatch {
                    title: optional_string(vars, "title")?,
                    author: optional_string(vars, "author")?,
                },
            }),
            DELETE_BOOK => Ok(Self::DeleteBook {
                id: required_id(vars, "id")?,
            }),
            SCHEMA => Ok(Self::Schema),
            other => Err(OperationError::new(
                ErrorCode::UnknownOperation,
                format!("Cannot query field \"{other}\" on the catalog schema."),
            )),
        }
    }
}

fn required_id(vars: &Map<String, Value>, name: &str) -> Result<BookId, OperationError> {
    match vars.get(name) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Number(value)) if value.is_i64() || value.is_u64() => Ok(value.to_string()),
        None | Some(Value::Null) => Err(missing(name, "ID!")),
        Some(other) => Err(invalid(name, "ID", other)),
    }
}

fn required_string(vars: &Map<String, Value>, name: &str) -> Result<String, OperationError> {
    optional_string(vars, name)?.ok_or_else(|| missing(name, "String!"))
}

fn optional_string(
    vars: &Map<String, Value>,
    name: &str,
) -> Result<Option<String>, OperationError> {
    match vars.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(invalid(name, "String", other)),
    }
}

fn missing(name: &str, type_name: &str) -> OperationError {
    OperationError::new(
        ErrorCode::BadUserInput,
        format!("Variable \"${name}\" of required type \"{type_name}\" was not provided."),
    )
}

fn invalid(name: &str, type_name: &str, value: &Value) -> OperationError {
    OperationError::new(
        ErrorCode::BadUserInput,
        format!("Variable \"${name}\" got invalid value {value}; expected type \"{type_name}\"."),
    )
}

fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
