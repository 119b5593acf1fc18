use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::ValidationError;

/// A schema document compiled into a reusable validator.
pub struct CompiledSchema {
    validator: Validator,
}

impl CompiledSchema {
    pub(crate) fn new(validator: Validator) -> Self {
        Self { validator }
    }

    /// Check a payload without collecting error details.
    pub fn is_valid(&self, payload: &Value) -> bool {
        self.validator.is_valid(payload)
    }

    /// Error messages for a payload, in the order the validator reports them.
    pub fn errors(&self, payload: &Value) -> Vec<String> {
        self.validator
            .iter_errors(payload)
            .map(|err| err.to_string())
            .collect()
    }

    /// Validate the payload of an action of type `action_type`.
    pub fn validate(&self, action_type: &str, payload: &Value) -> Result<(), ValidationError> {
        if self.is_valid(payload) {
            return Ok(());
        }

        Err(ValidationError::new(action_type, self.errors(payload)))
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}
