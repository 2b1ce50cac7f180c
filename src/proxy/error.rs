use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Why a request could not be forwarded to the backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[source] serde_json::Error),
    #[error("backend request failed: {0}")]
    Backend(#[from] reqwest::Error),
}

/// Errors returned to proxy callers as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Recipe URL is required")]
    MissingRecipeUrl,
    #[error("Message is required")]
    MissingMessage,
    #[error("Failed to process recipe")]
    Recipe(#[source] ForwardError),
    #[error("Failed to process message")]
    Chat(#[source] ForwardError),
}

impl ProxyError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingRecipeUrl | Self::MissingMessage => StatusCode::BAD_REQUEST,
            Self::Recipe(_) | Self::Chat(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            Self::Recipe(cause) => error!(error = %cause, "Error processing recipe"),
            Self::Chat(cause) => error!(error = %cause, "Error in chat API"),
            Self::MissingRecipeUrl | Self::MissingMessage => {}
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
