//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::offer::OfferError;
use crate::routes::responses::ErrorResponse;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Offer(#[from] OfferError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Offer(e) => match e {
                OfferError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "item_not_found"),
                OfferError::Incomplete(_) => (StatusCode::CONFLICT, "incomplete_items"),
                OfferError::NotAtTypeStep(_)
                | OfferError::NoNextStep(_)
                | OfferError::NoPreviousStep(_)
                | OfferError::NotAtPreview(_) => (StatusCode::CONFLICT, "invalid_step"),
                OfferError::Closed => (StatusCode::CONFLICT, "session_closed"),
                OfferError::ListNotUsed { .. }
                | OfferError::PurposeNotAllowed
                | OfferError::NotRental(_)
                | OfferError::NotSeasonal(_)
                | OfferError::NotOptibrush(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "invalid_operation")
                }
                OfferError::Pricing(_) => (StatusCode::BAD_REQUEST, "invalid_pricing_input"),
            },
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Wizard step the offer is blocked at, for step-related errors
    fn details(&self) -> Option<serde_json::Value> {
        let step = match self {
            AppError::Offer(
                OfferError::Incomplete(step)
                | OfferError::NotAtTypeStep(step)
                | OfferError::NoNextStep(step)
                | OfferError::NoPreviousStep(step)
                | OfferError::NotAtPreview(step),
            ) => step,
            _ => return None,
        };
        Some(json!({ "step": step }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();
        let details = self.details();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal error".to_string()
            }
            other => {
                tracing::debug!("Request rejected: {}", other);
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::WizardStep;

    #[test]
    fn test_offer_error_status() {
        let err = AppError::from(OfferError::Incomplete(WizardStep::ItemsNajem));
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

        let err = AppError::from(OfferError::ItemNotFound(4));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_step_errors_report_the_step() {
        let err = AppError::from(OfferError::Incomplete(WizardStep::ItemsNajem));
        assert_eq!(err.details(), Some(json!({ "step": "items-najem" })));

        let err = AppError::from(OfferError::ItemNotFound(4));
        assert_eq!(err.details(), None);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = AppError::Internal("pool exhausted".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
