//! Mapping of pipeline errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tabmerge_ingest::IngestError;
use tabmerge_model::ModelError;
use tabmerge_output::OutputError;
use tabmerge_persistence::PersistError;
use tabmerge_transform::TransformError;
use thiserror::Error;

/// Error returned by handlers. Rendered as `{ "error": code, "message": text }`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid or missing API key")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidName(String),

    /// Query parameter that does not parse.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    MalformedInput(String),

    #[error("{0}")]
    RowLimitExceeded(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    SinkUnavailable(String),

    #[error("{0}")]
    SchemaMismatch(String),

    #[error("{0}")]
    TableExists(String),

    /// Logged with its detail; clients only see a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::InvalidName(_) => "invalid_name",
            Self::BadRequest(_) => "bad_request",
            Self::MalformedInput(_) => "malformed_input",
            Self::RowLimitExceeded(_) => "row_limit_exceeded",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::SinkUnavailable(_) => "sink_unavailable",
            Self::SchemaMismatch(_) => "schema_mismatch",
            Self::TableExists(_) => "table_exists",
            Self::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidName(_) | Self::BadRequest(_) | Self::UnsupportedFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::MalformedInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::RowLimitExceeded(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::SinkUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::SchemaMismatch(_) | Self::TableExists(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed");
        }
        let body = ErrorBody {
            error: self.code(),
            message: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidName { .. } => Self::InvalidName(err.to_string()),
            _ if err.is_not_found() => Self::NotFound(err.to_string()),
            _ if err.is_malformed() => Self::MalformedInput(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnsupportedFormat { .. } => Self::UnsupportedFormat(err.to_string()),
            ModelError::ColumnNotFound { .. } => Self::BadRequest(err.to_string()),
            ModelError::DuplicateColumn { .. } => Self::MalformedInput(err.to_string()),
            ModelError::DataFrame { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Ingest(inner) => inner.into(),
            TransformError::Model(inner) => inner.into(),
            TransformError::RowLimitExceeded { .. } => Self::RowLimitExceeded(err.to_string()),
            _ if err.is_not_found() => Self::NotFound(err.to_string()),
            _ if err.is_malformed() => Self::MalformedInput(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<OutputError> for ApiError {
    fn from(err: OutputError) -> Self {
        match err {
            OutputError::Model(inner) => inner.into(),
            OutputError::RowLimitExceeded { .. } | OutputError::SheetTooLarge { .. } => {
                Self::RowLimitExceeded(err.to_string())
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match &err {
            PersistError::SinkUnavailable { .. } => Self::SinkUnavailable(err.user_message()),
            PersistError::TableExists { .. } => Self::TableExists(err.user_message()),
            PersistError::SchemaMismatch { .. } => Self::SchemaMismatch(err.to_string()),
            PersistError::InvalidTableName { .. } => Self::InvalidName(err.user_message()),
            PersistError::NoColumns { .. } => Self::MalformedInput(err.user_message()),
            PersistError::Model(_) | PersistError::Sql { .. } | PersistError::Task { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::Unauthorized, 401),
            (ApiError::NotFound(String::new()), 404),
            (ApiError::InvalidName(String::new()), 400),
            (ApiError::MalformedInput(String::new()), 422),
            (ApiError::RowLimitExceeded(String::new()), 413),
            (ApiError::UnsupportedFormat(String::new()), 400),
            (ApiError::SinkUnavailable(String::new()), 503),
            (ApiError::SchemaMismatch(String::new()), 409),
            (ApiError::TableExists(String::new()), 409),
            (ApiError::Internal(String::new()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status().as_u16(), status, "{}", err.code());
        }
    }

    #[test]
    fn test_transform_errors_are_classified() {
        let err: ApiError = TransformError::Ingest(IngestError::DatasetNotFound {
            name: "x.csv".to_string(),
        })
        .into();
        assert_eq!(err.code(), "not_found");

        let err: ApiError = TransformError::Ingest(IngestError::InvalidName {
            name: "../x".to_string(),
        })
        .into();
        assert_eq!(err.code(), "invalid_name");

        let err: ApiError = TransformError::Ingest(IngestError::EmptyCsv {
            path: PathBuf::from("x.csv"),
        })
        .into();
        assert_eq!(err.code(), "malformed_input");

        let err: ApiError = TransformError::RowLimitExceeded { rows: 9, limit: 3 }.into();
        assert_eq!(err.code(), "row_limit_exceeded");
    }

    #[test]
    fn test_persist_errors_are_classified() {
        let err: ApiError = PersistError::NoColumns {
            table: "t".to_string(),
        }
        .into();
        assert_eq!(err.code(), "malformed_input");

        let err: ApiError = PersistError::Sql {
            table: "t".to_string(),
            message: "use DROP VIEW to delete view t".to_string(),
        }
        .into();
        assert_eq!(err.code(), "internal");

        let err: ApiError = PersistError::SinkUnavailable {
            path: PathBuf::from("db/etl.db"),
            message: "database is locked".to_string(),
        }
        .into();
        assert_eq!(err.code(), "sink_unavailable");
    }

    #[test]
    fn test_sheet_too_large_is_a_row_limit() {
        let err: ApiError = OutputError::SheetTooLarge {
            rows: 2_000_000,
            columns: 3,
        }
        .into();
        assert_eq!(err.code(), "row_limit_exceeded");
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::Internal("disk on fire".to_string());
        assert_eq!(err.public_message(), "internal server error");
    }
}
