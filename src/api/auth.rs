use crate::api::AppState;
use crate::config::{AuthConfig, AuthMode};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves the caller's user id from request headers
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String>;
}

/// Trusts a user id forwarded by an upstream gateway
pub struct TrustedHeaderAuthenticator {
    header: String,
}

impl TrustedHeaderAuthenticator {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl Authenticator for TrustedHeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String> {
        let user = headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Authentication(format!("Missing '{}' header", self.header))
            })?;

        Ok(user.to_string())
    }
}

/// Looks bearer tokens up in a fixed token -> user table
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, String>,
}

impl StaticTokenAuthenticator {
    pub fn new(tokens: HashMap<String, String>) -> Self {
        Self { tokens }
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<String> {
        let token = bearer_token(headers)
            .ok_or_else(|| AppError::Authentication("Missing bearer token".to_string()))?;

        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Authentication("Invalid token".to_string()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

/// Build the authenticator selected by `auth.mode`
pub fn from_config(config: &AuthConfig) -> Result<Arc<dyn Authenticator>> {
    match config.mode {
        AuthMode::TrustedHeader => {
            if config.header.trim().is_empty() {
                return Err(AppError::Configuration(
                    "auth.header must not be empty".to_string(),
                ));
            }
            tracing::info!(header = %config.header, "Using trusted header authentication");
            Ok(Arc::new(TrustedHeaderAuthenticator::new(config.header.clone())))
        }
        AuthMode::StaticTokens => {
            if config.tokens.is_empty() {
                tracing::warn!("Static token authentication has no tokens configured");
            }
            tracing::info!(tokens = config.tokens.len(), "Using static token authentication");
            Ok(Arc::new(StaticTokenAuthenticator::new(config.tokens.clone())))
        }
    }
}

/// The authenticated caller of an `/api` route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        state
            .authenticator
            .authenticate(&parts.headers)
            .map(AuthenticatedUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_trusted_header() {
        let auth = TrustedHeaderAuthenticator::new("x-user-id");
        let mut headers = HeaderMap::new();

        assert!(matches!(
            auth.authenticate(&headers),
            Err(AppError::Authentication(_))
        ));

        headers.insert("x-user-id", HeaderValue::from_static(" alice "));
        assert_eq!(auth.authenticate(&headers).unwrap(), "alice");
    }

    #[test]
    fn test_static_tokens() {
        let tokens = HashMap::from([("secret".to_string(), "bob".to_string())]);
        let auth = StaticTokenAuthenticator::new(tokens);
        let mut headers = HeaderMap::new();

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        assert_eq!(auth.authenticate(&headers).unwrap(), "bob");

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer wrong"));
        assert!(auth.authenticate(&headers).is_err());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic secret"));
        assert!(auth.authenticate(&headers).is_err());
    }

    #[test]
    fn test_from_config_rejects_blank_header() {
        let config = AuthConfig {
            header: " ".to_string(),
            ..AuthConfig::default()
        };
        assert!(matches!(
            from_config(&config),
            Err(AppError::Configuration(_))
        ));
    }
}
