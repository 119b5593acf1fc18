use jsonschema::Draft;

/// Controls how schema documents are compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Draft used to interpret schema keywords.
    pub draft: Draft,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            draft: Draft::Draft7,
        }
    }
}
