use std::fmt;

/// A schema document could not be compiled into a validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to compile schema: {message}")]
pub struct CompileError {
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A payload did not satisfy the schema registered for its action type.
///
/// Renders as `payload invalid for action.type={type}`, followed by `": "`
/// and the validator messages joined with `","` when any are available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub action_type: String,
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(action_type: impl Into<String>, messages: Vec<String>) -> Self {
        Self {
            action_type: action_type.into(),
            messages,
        }
    }

    /// True when the validator reported structured error details.
    pub fn has_details(&self) -> bool {
        !self.messages.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload invalid for action.type={}", self.action_type)?;
        if self.has_details() {
            write!(f, ": {}", self.messages.join(","))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
