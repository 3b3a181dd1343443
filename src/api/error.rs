use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Failures a request handler can end with.
///
/// Store and template failures are logged in full and shown to the client as a
/// generic 500. Client mistakes become a 400 with a short explanation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("template error: {0}")]
    Render(#[from] askama::Error),

    #[error("session signing error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("request has no Referer header to return to")]
    MissingReferrer,

    #[error("invalid form field `{0}`")]
    InvalidForm(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Store(_) | Self::Render(_) | Self::Session(_) => {
                tracing::error!("Internal error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
            Self::MissingReferrer | Self::InvalidForm(_) => {
                tracing::warn!("Bad request: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
        }
    }
}
