use std::fmt;
use std::sync::Arc;

use action_validate_schema::{compile, CompiledSchema};
use reqwest::Client;

use crate::action::ActionLike;
use crate::cache::ValidatorCache;
use crate::config::ValidatorConfig;
use crate::error::Result;
use crate::registry::RegistryClient;

/// Create a validator for the schema registry at `schemas_base_url`.
///
/// Every call returns an instance with its own cache, so validators for
/// different registries never see each other's schemas. The URL is not
/// checked until the first schema download.
pub fn make_validator(schemas_base_url: impl Into<String>) -> ActionValidator {
    ActionValidator::new(schemas_base_url)
}

/// Validates actions against schemas fetched from a schema registry.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct ActionValidator {
    inner: Arc<Inner>,
}

struct Inner {
    registry: RegistryClient,
    cache: ValidatorCache,
    config: ValidatorConfig,
}

impl ActionValidator {
    /// Create a validator with default config.
    pub fn new(schemas_base_url: impl Into<String>) -> Self {
        Self::with_client(schemas_base_url, Client::new(), ValidatorConfig::default())
    }

    /// Create a validator with explicit config.
    pub fn with_config(
        schemas_base_url: impl Into<String>,
        config: ValidatorConfig,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = config.build_client()?;
        Ok(Self::with_client(schemas_base_url, client, config))
    }

    /// Create a validator that downloads schemas through an existing HTTP client.
    ///
    /// Timeouts in `config` are ignored here; they belong to `client`.
    pub fn with_client(
        schemas_base_url: impl Into<String>,
        client: Client,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: RegistryClient::new(schemas_base_url, client, config.max_schema_size),
                cache: ValidatorCache::new(),
                config,
            }),
        }
    }

    /// Validate an action's payload against the schema for its type.
    pub async fn validate<A: ActionLike>(&self, action: A) -> Result<()> {
        let action_type = action.action_type();
        let schema = self.preload(action_type).await?;
        schema.validate(action_type, action.payload())?;
        Ok(())
    }

    /// Fetch and compile the schema for `action_type` unless already cached.
    pub async fn preload(&self, action_type: &str) -> Result<Arc<CompiledSchema>> {
        self.inner
            .cache
            .get_or_fill(action_type, move || self.download(action_type))
            .await
    }

    async fn download(&self, action_type: &str) -> Result<Arc<CompiledSchema>> {
        let schema = self.inner.registry.fetch(action_type).await?;
        let compiled = compile(&schema, &self.inner.config.schema)?;
        Ok(Arc::new(compiled))
    }

    /// Check if a compiled validator is cached for `action_type`.
    pub fn is_cached(&self, action_type: &str) -> bool {
        self.inner.cache.contains(action_type)
    }

    /// Action types with cached validators, sorted.
    pub fn cached_types(&self) -> Vec<String> {
        self.inner.cache.types()
    }

    pub fn base_url(&self) -> &str {
        self.inner.registry.base_url()
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.inner.config
    }
}

impl fmt::Debug for ActionValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionValidator")
            .field("base_url", &self.base_url())
            .field("cache", &self.inner.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::action::Action;
    use crate::error::{SchemaFetchError, ValidateError};

    #[test]
    fn factory_does_not_check_url() {
        let validator = make_validator("definitely not a url");
        assert_eq!(validator.base_url(), "definitely not a url");
        assert!(validator.cached_types().is_empty());
        assert_eq!(validator.config(), &ValidatorConfig::default());
    }

    #[tokio::test]
    async fn bad_url_fails_as_fetch_error_and_caches_nothing() {
        let validator = make_validator("definitely not a url");
        let err = validator
            .validate(Action::new("fruit", json!({ "fruit": "bananas" })))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ValidateError::SchemaFetch(SchemaFetchError::InvalidUrl { .. })
        ));
        assert!(!validator.is_cached("fruit"));
    }

    #[test]
    fn clones_share_cache() {
        let validator = make_validator("http://127.0.0.1:1");
        let clone = validator.clone();
        assert!(Arc::ptr_eq(&validator.inner, &clone.inner));
    }

    #[test]
    fn separate_factory_calls_do_not_share_cache() {
        let a = make_validator("http://127.0.0.1:1");
        let b = make_validator("http://127.0.0.1:1");
        assert!(!Arc::ptr_eq(&a.inner, &b.inner));
    }

    #[test]
    fn with_config_keeps_config() {
        let config = ValidatorConfig {
            timeout: Some(std::time::Duration::from_secs(2)),
            max_schema_size: 1024,
            ..ValidatorConfig::default()
        };
        let validator = ActionValidator::with_config("http://127.0.0.1:1", config).unwrap();
        assert_eq!(validator.config(), &config);
        assert!(format!("{validator:?}").contains("http://127.0.0.1:1"));
    }
}
