use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed message whose payload is checked against the schema for its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
        }
    }
}

/// Anything that carries an action type and a payload.
pub trait ActionLike {
    fn action_type(&self) -> &str;
    fn payload(&self) -> &Value;
}

impl ActionLike for Action {
    fn action_type(&self) -> &str {
        &self.action_type
    }

    fn payload(&self) -> &Value {
        &self.payload
    }
}

impl<A: ActionLike + ?Sized> ActionLike for &A {
    fn action_type(&self) -> &str {
        (**self).action_type()
    }

    fn payload(&self) -> &Value {
        (**self).payload()
    }
}

impl<S: AsRef<str>> ActionLike for (S, Value) {
    fn action_type(&self) -> &str {
        self.0.as_ref()
    }

    fn payload(&self) -> &Value {
        &self.1
    }
}
