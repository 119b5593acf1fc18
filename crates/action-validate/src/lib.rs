//! Validate action payloads against JSON Schemas served by a schema registry.
//!
//! An action is a message with a `type` discriminator and a `payload`. The
//! validator fetches `{base}/schemas/{type}` on first use, compiles the
//! document, and keeps the compiled validator for every later action of the
//! same type.
//!
//! ```no_run
//! # async fn run() -> action_validate::Result<()> {
//! use action_validate::{make_validator, Action};
//! use serde_json::json;
//!
//! let validate = make_validator("http://schemas.example.com");
//! validate
//!     .validate(Action::new("fruit", json!({ "fruit": "bananas" })))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Crate Structure
//!
//! - [`action`] — the action model and the [`ActionLike`] seam
//! - [`registry`] — HTTP client for the schema registry
//! - [`cache`] — per-instance, single-flight cache of compiled validators
//! - [`validator`] — the [`ActionValidator`] factory
//! - [`schema`] — re-export of the schema compilation crate

pub mod action;
pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod validator;

/// Re-export schema compilation types.
pub mod schema {
    pub use action_validate_schema::*;
}

pub use action::{Action, ActionLike};
pub use config::ValidatorConfig;
pub use error::{Result, SchemaFetchError, ValidateError};
pub use validator::{make_validator, ActionValidator};
