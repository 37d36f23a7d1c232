use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use serde::Serialize;

use crate::{app_state::AppState, error::ApiError, lnurl::encode_lnurl};

#[derive(Debug, Serialize)]
pub struct LnurlResponse {
    pub lnurl: String,
}

/// GET /api/getLnurl/{username}
/// Bech32 LNURL of the user's discovery endpoint, for sharing out of band
pub async fn get_lnurl(
    username: Result<Path<String>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<LnurlResponse>, ApiError> {
    let Path(username) = username.map_err(|_| ApiError::UserNotFound)?;
    state
        .users
        .lookup(&username)
        .ok_or(ApiError::UserNotFound)?;

    let url = state.config.pay_request_url(&username);
    let lnurl = encode_lnurl(&url).map_err(|e| {
        tracing::error!("Failed to encode LNURL for {}: {:#}", url, e);
        ApiError::LnurlEncoding
    })?;

    Ok(Json(LnurlResponse { lnurl }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{handlers::username, lightning::mock::MockLightning, lnurl::decode_lnurl};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_lnurl() {
        let state = AppState::for_tests(Arc::new(MockLightning::default()));

        let Json(response) = get_lnurl(username("austin"), State(state))
            .await
            .unwrap();

        assert!(response.lnurl.starts_with("LNURL"));
        assert_eq!(
            decode_lnurl(&response.lnurl).unwrap(),
            "https://pay.example.com/.well-known/lnurlp/austin"
        );
    }

    #[tokio::test]
    async fn test_get_lnurl_unknown_user() {
        let state = AppState::for_tests(Arc::new(MockLightning::default()));

        for name in ["nobody", "undefined", ""] {
            let result = get_lnurl(username(name), State(state.clone())).await;
            assert!(matches!(result, Err(ApiError::UserNotFound)), "{name:?}");
        }
    }
}
