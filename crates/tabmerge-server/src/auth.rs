//! API key middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Compares keys in time independent of where they first differ.
fn key_matches(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Rejects requests whose `X-API-Key` header is absent or wrong.
///
/// Runs before any handler, so a rejected request never touches the
/// catalog, the pipeline or the sink.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(key) if key_matches(key, &state.config.api_key) => Ok(next.run(request).await),
        _ => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected request without a valid API key"
            );
            Err(ApiError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_matches() {
        assert!(key_matches("secret", "secret"));
        assert!(!key_matches("secreT", "secret"));
        assert!(!key_matches("secret-and-more", "secret"));
        assert!(!key_matches("", "secret"));
    }
}
