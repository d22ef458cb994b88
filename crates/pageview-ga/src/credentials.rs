use std::path::{Path, PathBuf};

use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("credentials file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read credentials file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("credentials file {} is not a service-account key", .0.display())]
    NotServiceAccount(PathBuf),

    #[error("invalid service-account private key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// The subset of a Google service-account JSON key this client needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("key_type", &self.key_type)
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialsError> {
        if !path.exists() {
            return Err(CredentialsError::NotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CredentialsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let key = Self::from_json(&raw).map_err(|source| CredentialsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(_) => Err(CredentialsError::NotServiceAccount(path.to_path_buf())),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Parse `private_key` as an RSA PEM signing key.
    pub fn encoding_key(&self) -> Result<EncodingKey, CredentialsError> {
        Ok(EncodingKey::from_rsa_pem(self.private_key.as_bytes())?)
    }
}
