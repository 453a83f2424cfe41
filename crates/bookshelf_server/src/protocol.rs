//! Wire types for the operation protocol.
//!
//! One request object per line in, one response object per line out. The
//! response shape follows GraphQL: `data` keyed by operation name plus an
//! optional `errors` list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named catalog operation with its variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub operation_name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub variables: Value,
}

impl OperationRequest {
    pub fn new(operation_name: impl Into<String>, variables: Value) -> Self {
        Self {
            operation_name: operation_name.into(),
            variables,
        }
    }
}

/// Error classes reported in `extensions.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// An id-keyed mutation matched no record.
    NotFound,
    /// A required variable is missing or has the wrong type.
    BadUserInput,
    UnknownOperation,
    /// The line was not a valid request object.
    BadRequest,
    /// The result could not be encoded.
    InternalServerError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorExtensions {
    pub code: ErrorCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    pub extensions: ErrorExtensions,
}

impl OperationError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
            extensions: ErrorExtensions { code },
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.extensions.code
    }

    fn at(mut self, operation_name: &str) -> Self {
        self.path = vec![operation_name.to_string()];
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<OperationError>,
}

impl OperationResponse {
    pub fn success(operation_name: &str, value: Value) -> Self {
        Self {
            data: Some(keyed(operation_name, value)),
            errors: Vec::new(),
        }
    }

    /// Operation-level failure: `data.<name>` is null and the error carries
    /// the operation path.
    pub fn failure(operation_name: &str, error: OperationError) -> Self {
        Self {
            data: Some(keyed(operation_name, Value::Null)),
            errors: vec![error.at(operation_name)],
        }
    }

    /// Request-level failure: nothing was executed.
    pub fn rejected(error: OperationError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Extracts `data.<name>`, or the first error.
    pub fn into_result(self, operation_name: &str) -> Result<Value, OperationError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(self
            .data
            .and_then(|mut data| data.get_mut(operation_name).map(Value::take))
            .unwrap_or(Value::Null))
    }
}

fn keyed(operation_name: &str, value: Value) -> Value {
    let mut data = Map::new();
    data.insert(operation_name.to_string(), value);
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, OperationError, OperationRequest, OperationResponse};
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_and_optional_variables() {
        let request: OperationRequest =
            serde_json::from_value(json!({ "operationName": "books" })).unwrap();
        assert_eq!(request.operation_name, "books");
        assert!(request.variables.is_null());

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({ "operationName": "books" }));
    }

    #[test]
    fn failure_nulls_data_and_sets_path() {
        let response = OperationResponse::failure(
            "deleteBook",
            OperationError::new(ErrorCode::NotFound, "Book not found"),
        );

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "data": { "deleteBook": null },
                "errors": [{
                    "message": "Book not found",
                    "path": ["deleteBook"],
                    "extensions": { "code": "NOT_FOUND" }
                }]
            })
        );
    }

    #[test]
    fn into_result_prefers_errors() {
        let ok = OperationResponse::success("deleteBook", json!(true));
        assert_eq!(ok.into_result("deleteBook").unwrap(), json!(true));

        let rejected =
            OperationResponse::rejected(OperationError::new(ErrorCode::BadRequest, "bad"));
        let err = rejected.into_result("books").unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
    }
}
