use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// One failed field check, reported in 422 responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            kind,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Not enough privileges")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Extractor rejection that is not a validation failure, e.g. a wrong content type.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rejected { status, .. } => *status,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".into(),
            AppError::Validation(errors) => errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }

    /// Request input that could not be deserialized.
    fn malformed(field: &'static str, message: String) -> Self {
        AppError::Validation(vec![FieldError::new(field, "value_error", message)])
    }

    fn rejected(status: StatusCode, message: String) -> Self {
        AppError::Rejected { status, message }
    }
}

impl From<JsonRejection> for AppError {
    fn from(r: JsonRejection) -> Self {
        if matches!(
            r,
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_)
        ) {
            AppError::malformed("body", r.body_text())
        } else {
            AppError::rejected(r.status(), r.body_text())
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(r: FormRejection) -> Self {
        if matches!(
            r,
            FormRejection::FailedToDeserializeForm(_)
                | FormRejection::FailedToDeserializeFormBody(_)
        ) {
            AppError::malformed("body", r.body_text())
        } else {
            AppError::rejected(r.status(), r.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(r: QueryRejection) -> Self {
        if matches!(r, QueryRejection::FailedToDeserializeQueryString(_)) {
            AppError::malformed("query", r.body_text())
        } else {
            AppError::rejected(r.status(), r.body_text())
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(r: PathRejection) -> Self {
        if matches!(r, PathRejection::FailedToDeserializePathParams(_)) {
            AppError::malformed("path", r.body_text())
        } else {
            AppError::rejected(r.status(), r.body_text())
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        match self {
            AppError::Validation(errors) => (
                status,
                Json(json!({
                    "error": "Validation Error",
                    "detail": errors,
                    "status_code": status.as_u16(),
                })),
            )
                .into_response(),
            other => {
                let body = Json(json!({
                    "error": "HTTP Error",
                    "detail": other.public_message(),
                    "status_code": status.as_u16(),
                }));
                if status == StatusCode::UNAUTHORIZED {
                    (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
                } else {
                    (status, body).into_response()
                }
            }
        }
    }
}
