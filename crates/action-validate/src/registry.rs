use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaFetchError;

/// HTTP client for a schema registry serving `GET {base}/schemas/{type}`.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: String,
    client: Client,
    max_schema_size: usize,
}

impl RegistryClient {
    pub fn new(base_url: impl Into<String>, client: Client, max_schema_size: usize) -> Self {
        Self {
            base_url: base_url.into(),
            client,
            max_schema_size,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the schema document URL for an action type.
    ///
    /// The type is appended as a single percent-encoded path segment.
    pub fn schema_url(&self, action_type: &str) -> Result<Url, SchemaFetchError> {
        let invalid = |message: String| SchemaFetchError::InvalidUrl {
            url: self.base_url.clone(),
            message,
        };

        let mut url = Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["schemas", action_type]);

        Ok(url)
    }

    /// Download and parse the schema document for an action type.
    pub async fn fetch(&self, action_type: &str) -> Result<Value, SchemaFetchError> {
        let url = self.schema_url(action_type)?;
        debug!(action_type, %url, "downloading schema");

        let mut response = self.client.get(url).send().await?.error_for_status()?;

        let too_large = || SchemaFetchError::TooLarge {
            action_type: action_type.to_string(),
            limit: self.max_schema_size,
        };

        if let Some(length) = response.content_length() {
            if length > self.max_schema_size as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len().saturating_add(chunk.len()) > self.max_schema_size {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        serde_json::from_slice(&body).map_err(|err| SchemaFetchError::InvalidJson {
            action_type: action_type.to_string(),
            source: err.into(),
        })
    }
}
