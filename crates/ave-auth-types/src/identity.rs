//! Gateway-injected identity headers extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;

use ave_core::error::AppError;

pub const USER_ID_HEADER: &str = "x-ave-user-id";

/// Acting user injected by the gateway via `x-ave-user-id`.
///
/// Rejects with 401 if the header is absent or not an integer id.
/// Staff/permission enforcement (403) is done by handlers after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: i32,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Extract synchronously and return a 'static future so the borrow of
    // `parts` does not leak into the returned `impl Future`.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i32>().ok());

        async move {
            let Some(user_id) = user_id else {
                tracing::debug!("missing or malformed {USER_ID_HEADER} header");
                return Err(AppError::Unauthorized);
            };
            Ok(Self { user_id })
        }
    }
}
