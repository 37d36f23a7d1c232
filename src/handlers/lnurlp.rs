use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::{
    app_state::AppState,
    error::ApiError,
    lightning::{Invoice, InvoiceRequest},
    lnurl::PayMetadata,
    users::is_valid_username,
};

const PAY_REQUEST_TAG: &str = "payRequest";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequestResponse {
    pub callback: String,
    pub max_sendable: u64,
    pub min_sendable: u64,
    pub metadata: String,
    pub tag: String,
}

/// GET /.well-known/lnurlp/{username}
/// LUD-16 discovery: advertises sendable bounds, metadata and the callback
pub async fn pay_request(
    username: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<PayRequestResponse>, ApiError> {
    // A name that does not even decode cannot be registered
    let Ok(Path(username)) = username else {
        return Err(ApiError::NotFound);
    };
    if !is_valid_username(&username) {
        return Err(ApiError::NotFound);
    }

    let user = state
        .users
        .lookup(&username)
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(PayRequestResponse {
        callback: state.config.callback_url(&username),
        max_sendable: user.max_sendable,
        min_sendable: user.min_sendable,
        metadata: user.metadata.as_json().to_string(),
        tag: PAY_REQUEST_TAG.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    amount: Option<String>, // millisatoshis
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub pr: String,
}

/// GET /api/callback/{username}?amount={msats}
/// Creates an invoice committing to the user's metadata
pub async fn callback(
    username: Result<Path<String>, PathRejection>,
    params: Result<Query<CallbackParams>, QueryRejection>,
    State(state): State<AppState>,
) -> Result<Json<CallbackResponse>, ApiError> {
    let Path(username) = username.map_err(|_| ApiError::UserNotFound)?;
    let user = state
        .users
        .lookup(&username)
        .ok_or(ApiError::UserNotFound)?;

    // Malformed query strings, e.g. a repeated `amount`
    let Query(params) = params.map_err(|e| {
        tracing::debug!("Rejected callback query: {}", e);
        ApiError::InvalidAmount
    })?;

    let amount = params
        .amount
        .as_deref()
        .filter(|amount| !amount.is_empty())
        .ok_or(ApiError::AmountNotSpecified)?;

    let value = amount_to_sats(amount)?;

    // Not checked against min/maxSendable, only the 1 sat floor
    let request = InvoiceRequest {
        value,
        description_hash: user.metadata.description_hash(),
    };

    let invoice = state
        .lightning
        .create_invoice(&request)
        .await
        .map_err(|e| {
            tracing::error!("Error creating invoice for {}: {:#}", username, e);
            ApiError::InvoiceCreation
        })?;

    inspect_invoice(&invoice.payment_request, &user.metadata);

    Ok(Json(CallbackResponse {
        pr: invoice.payment_request,
    }))
}

/// Millisatoshis to whole satoshis, dropping the remainder
fn amount_to_sats(amount: &str) -> Result<u64, ApiError> {
    let msats: u64 = amount.parse().map_err(|_| ApiError::InvalidAmount)?;
    let sats = msats / 1000;
    if sats < 1 {
        return Err(ApiError::AmountTooLow);
    }
    Ok(sats)
}

/// Diagnostics only; the payment request is returned as is.
fn inspect_invoice(payment_request: &str, metadata: &PayMetadata) {
    match Invoice::from_str(payment_request) {
        Ok(invoice) => {
            tracing::info!(
                payment_hash = %invoice.payment_hash(),
                amount_msats = ?invoice.amount_msats(),
                "Created invoice"
            );
            if !invoice.commits_to(&metadata.digest()) {
                tracing::warn!(
                    payment_hash = %invoice.payment_hash(),
                    "Invoice does not commit to the metadata description hash"
                );
            }
        }
        Err(e) => tracing::warn!("Node returned an unparseable invoice: {}", e),
    }
}
