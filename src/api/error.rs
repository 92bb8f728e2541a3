use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::PortfolioError;

/// Error returned by handlers. Body: `{"error": <message>, "kind": <stable kind>}`.
#[derive(Debug)]
pub enum ApiError {
    Portfolio(PortfolioError),
    MethodNotAllowed,
}

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        ApiError::Portfolio(err)
    }
}

fn status_for(err: &PortfolioError) -> StatusCode {
    match err {
        PortfolioError::InvalidInput(_)
        | PortfolioError::InsufficientFunds { .. }
        | PortfolioError::OverSell { .. } => StatusCode::BAD_REQUEST,
        PortfolioError::PositionNotFound(_) => StatusCode::NOT_FOUND,
        PortfolioError::DegenerateState(_) => StatusCode::CONFLICT,
        PortfolioError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        PortfolioError::UpstreamQuoteError(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Portfolio(err) => (status_for(&err), err.kind(), err.to_string()),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "incorrect HTTP method supplied".to_string(),
            ),
        };
        if status.is_server_error() {
            tracing::error!(%status, kind, "{message}");
        }
        (
            status,
            Json(serde_json::json!({ "error": message, "kind": kind })),
        )
            .into_response()
    }
}
