use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Client-facing failures. The display string is the whole response body;
/// underlying causes are logged where they occur and never included here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Username not found")]
    UserNotFound,

    #[error("Amount not specified")]
    AmountNotSpecified,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Amount too low")]
    AmountTooLow,

    #[error("Failed to create invoice")]
    InvoiceCreation,

    #[error("Failed to encode LNURL")]
    LnurlEncoding,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::AmountNotSpecified | Self::InvalidAmount | Self::AmountTooLow => {
                StatusCode::BAD_REQUEST
            }
            Self::InvoiceCreation | Self::LnurlEncoding => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
