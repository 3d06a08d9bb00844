use axum::http::header::HeaderName;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use precondition::store::{GetError, UpdateError};
use precondition::{ConflictError, PreconditionError};

/// Errors returned by the HTTP handlers, rendered as a JSON `{error, message}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("report {0} was not found")]
    NotFound(u64),

    #[error("this resource requires the If-Match header for updates")]
    PreconditionRequired,

    #[error(
        "the resource has been modified since you fetched it, \
         fetch the latest version and try again"
    )]
    PreconditionFailed(#[source] ConflictError),

    #[error("the {0} header is not a valid entity tag")]
    InvalidHeader(HeaderName),

    /// The request could not be decoded into the handler arguments.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub(crate) fn from_get(id: u64, err: GetError) -> Self {
        match err {
            GetError::NotFound => Self::NotFound(id),
            GetError::Internal(err) => Self::Internal(err),
        }
    }

    pub(crate) fn from_update(id: u64, err: UpdateError) -> Self {
        match err {
            UpdateError::NotFound => Self::NotFound(id),
            UpdateError::Precondition(PreconditionError::Required) => Self::PreconditionRequired,
            UpdateError::Precondition(PreconditionError::Failed(conflict)) => {
                Self::PreconditionFailed(conflict)
            }
            UpdateError::Precondition(PreconditionError::Token(err)) => Self::Internal(err.into()),
            UpdateError::Internal(err) => Self::Internal(err),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PreconditionRequired => StatusCode::PRECONDITION_REQUIRED,
            Self::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            Self::InvalidHeader(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Self::Internal(err) => tracing::error!(error = ?err, "request failed"),
            Self::PreconditionFailed(conflict) => {
                tracing::warn!(%conflict, "lost update prevented")
            }
            _ => tracing::debug!(error = %self, "request rejected"),
        }

        let body = json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}
