//! OAuth 2.0 JWT-bearer grant for service accounts.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::credentials::{CredentialsError, ServiceAccountKey};

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh a cached token this long before it actually expires.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub fn assertion_claims(key: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims {
    AssertionClaims {
        iss: key.client_email.clone(),
        scope: ANALYTICS_READONLY_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ASSERTION_LIFETIME_SECS)).timestamp(),
    }
}

/// Sign the RS256 assertion exchanged for an access token.
pub fn sign_assertion(
    key: &ServiceAccountKey,
    encoding_key: &EncodingKey,
    now: DateTime<Utc>,
) -> Result<String> {
    encode(
        &Header::new(Algorithm::RS256),
        &assertion_claims(key, now),
        encoding_key,
    )
    .map_err(|e| anyhow!("sign_assertion: {e}"))
}

/// Access-token source for one service account.
///
/// Holds at most one token; a fresh one is fetched when the cached token is
/// missing or within [`EXPIRY_SKEW_SECS`] of expiry. The private key is parsed
/// once, at construction.
pub struct TokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self, CredentialsError> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            key,
            encoding_key,
            client,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_SKEW_SECS) > now {
                return Ok(token.access_token.clone());
            }
        }

        let fresh = self.fetch(now).await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<CachedToken> {
        let assertion = sign_assertion(&self.key, &self.encoding_key, now)?;
        let resp = self
            .client
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("OAuth token request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OAuth token error {status}: {body}");
        }

        let token: TokenResponse = resp
            .json()
            .await
            .context("OAuth token response parse failed")?;
        info!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Fetched analytics access token"
        );
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assertion_claims_target_token_uri_with_readonly_scope() {
        let key = ServiceAccountKey::from_json(
            r#"{
                "client_email": "reporter@demo.iam.gserviceaccount.com",
                "private_key": "pem",
                "token_uri": "https://oauth2.example.com/token"
            }"#,
        )
        .expect("parse");
        let now = Utc::now();

        let claims = assertion_claims(&key, now);
        assert_eq!(claims.iss, "reporter@demo.iam.gserviceaccount.com");
        assert_eq!(claims.aud, "https://oauth2.example.com/token");
        assert_eq!(claims.scope, ANALYTICS_READONLY_SCOPE);
        assert_eq!(claims.exp - claims.iat, ASSERTION_LIFETIME_SECS);
    }

    #[test]
    fn token_source_rejects_garbage_key() {
        let key = ServiceAccountKey::from_json(
            r#"{"client_email": "a@b.c", "private_key": "not a pem"}"#,
        )
        .expect("parse");
        assert!(matches!(
            TokenSource::new(key, Client::new()),
            Err(CredentialsError::InvalidKey(_))
        ));
    }
}
