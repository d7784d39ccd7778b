//! Pinning service client.
//!
//! Uploads candidate images to a Pinata-compatible pinning gateway and
//! derives the public gateway URL that gets written on-chain. Credentials
//! come from the config file, with the `PINATA_JWT` environment variable
//! taking precedence. One outbound HTTP request per call, no retries.

use crate::config::PinningConfig;
use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PinError {
    #[error("pinning transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("pinning service rejected the request ({status})")]
    Rejected { status: reqwest::StatusCode },
}

/// Upload response; only the content identifier is consumed downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
}

#[derive(Clone)]
pub struct PinningClient {
    http: reqwest::Client,
    api_url: String,
    gateway_url: String,
    jwt: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl PinningClient {
    pub fn new(config: &PinningConfig) -> Self {
        let jwt = std::env::var("PINATA_JWT")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| config.jwt.clone());
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
            jwt,
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(jwt) = &self.jwt {
            request.bearer_auth(jwt)
        } else if let (Some(key), Some(secret)) = (&self.api_key, &self.api_secret) {
            request
                .header("pinata_api_key", key)
                .header("pinata_secret_api_key", secret)
        } else {
            request
        }
    }

    /// Upload one file and return the pin record with its content
    /// identifier.
    pub async fn pin_file(&self, path: &Path) -> Result<PinResponse, PinError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| PinError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();
        let form =
            multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .authorize(self.http.post(format!("{}/pinning/pinFileToIPFS", self.api_url)))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PinError::Rejected {
                status: response.status(),
            });
        }
        let pinned: PinResponse = response.json().await?;
        debug!(hash = %pinned.ipfs_hash, "pinned file");
        Ok(pinned)
    }

    /// Best-effort credential check; callers consume only ok/err.
    pub async fn test_authentication(&self) -> Result<(), PinError> {
        let response = self
            .authorize(self.http.get(format!("{}/data/testAuthentication", self.api_url)))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PinError::Rejected {
                status: response.status(),
            });
        }
        Ok(())
    }

    /// Public URL for a pinned content identifier, as written on-chain.
    pub fn gateway_url(&self, hash: &str) -> String {
        format!("{}/ipfs/{}", self.gateway_url, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pin_response() {
        // Extra response fields (PinSize, Timestamp) are ignored.
        let json = r#"{"IpfsHash":"Qm123","PinSize":12345,"Timestamp":"2024-01-01T00:00:00Z"}"#;
        let resp: PinResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.ipfs_hash, "Qm123");
    }

    #[test]
    fn gateway_url_joins_hash() {
        let client = PinningClient::new(&PinningConfig::default());
        assert_eq!(
            client.gateway_url("Qm123"),
            "https://gateway.pinata.cloud/ipfs/Qm123"
        );
    }
}
