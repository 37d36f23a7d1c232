pub mod lnurl;
pub mod lnurlp;

use crate::error::ApiError;

/// Unmatched routes, including `/.well-known/lnurlp/` with no username
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
pub(crate) fn username(
    name: &str,
) -> Result<axum::extract::Path<String>, axum::extract::rejection::PathRejection> {
    Ok(axum::extract::Path(name.to_string()))
}
