use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Field name → human readable problem, reported all at once.
pub type FieldErrors = BTreeMap<String, String>;

pub type RestResult<T> = Result<T, RestErr>;

/// Classified failure shared by every layer. Each variant maps to one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestErr {
    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    WrongCredentials(String),
}

/// JSON body written for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub status: u16,
    pub error: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<&'a FieldErrors>,
}

impl RestErr {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn wrong_credentials(msg: impl Into<String>) -> Self {
        Self::WrongCredentials(msg.into())
    }

    pub fn validation(msg: impl Into<String>, fields: FieldErrors) -> Self {
        Self::Validation {
            message: msg.into(),
            fields,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Duplicate(_) => StatusCode::CONFLICT,
            Self::WrongCredentials(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Validation { .. } => "validation",
            Self::NotFound(_) => "not_found",
            Self::Internal(_) => "internal_server_error",
            Self::Duplicate(_) => "duplicated",
            Self::WrongCredentials(_) => "wrong_credentials",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::NotFound(m)
            | Self::Internal(m)
            | Self::Duplicate(m)
            | Self::WrongCredentials(m) => m,
            Self::Validation { message, .. } => message,
        }
    }

    pub fn fields(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } => Some(fields),
            _ => None,
        }
    }

    pub fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            status: self.status().as_u16(),
            error: self.kind(),
            message: self.message(),
            fields: self.fields(),
        }
    }
}

impl IntoResponse for RestErr {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

/// Wraps a driver failure into an internal error that keeps the driver message.
/// Logged at `error` once, when the response is built.
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> RestErr {
    move |e| {
        debug!(error = %e, context, "database error");
        RestErr::internal(format!("{context}: {e}"))
    }
}
