use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::error::ApiError;
use crate::http::AppState;

/// Accepts requests carrying `Authorization: Bearer <token>` for a known
/// admin session token. Issuing the tokens happens outside this service.
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    tokens: Arc<HashSet<String>>,
}

impl AdminGate {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Arc::new(tokens.into_iter().map(Into::into).collect()),
        }
    }

    pub fn allows(&self, headers: &HeaderMap) -> bool {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| self.tokens.contains(token.trim()))
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        if self.allows(headers) {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }
}

/// Route layer for everything under `/admin`.
pub async fn require_admin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Err(err) = state.gate.check(request.headers()) {
        tracing::warn!(uri = %request.uri(), "admin request without a valid token");
        return err.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn only_known_bearer_tokens_pass() {
        let gate = AdminGate::new(["s3cret"]);
        assert!(gate.allows(&headers("Bearer s3cret")));
        assert!(!gate.allows(&headers("Bearer nope")));
        assert!(!gate.allows(&headers("s3cret")));
        assert!(!gate.allows(&HeaderMap::new()));
    }

    #[test]
    fn empty_gate_rejects_everyone() {
        let gate = AdminGate::default();
        assert!(!gate.allows(&headers("Bearer ")));
        assert!(matches!(gate.check(&HeaderMap::new()), Err(ApiError::Unauthorized)));
    }
}
