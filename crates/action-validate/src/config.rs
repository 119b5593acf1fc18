use std::time::Duration;

use action_validate_schema::SchemaConfig;

/// Controls schema fetching and compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Whole-request timeout for schema downloads. `None` defers to the transport.
    pub timeout: Option<Duration>,
    /// Connection timeout for schema downloads.
    pub connect_timeout: Option<Duration>,
    /// Maximum bytes accepted for a single schema document.
    pub max_schema_size: usize,
    /// Options used to compile fetched schemas.
    pub schema: SchemaConfig,
}

impl ValidatorConfig {
    pub(crate) fn build_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder.build()
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            max_schema_size: 256 * 1024,
            schema: SchemaConfig::default(),
        }
    }
}
