//! JSON Schema compilation and payload validation for typed actions.
//!
//! This crate is the network-free half of `action-validate`: it turns a
//! schema document into a reusable [`CompiledSchema`] and reports payload
//! failures as a [`ValidationError`] with a stable, human-readable message.

pub mod compile;
pub mod config;
pub mod error;
pub mod validator;

pub use compile::{compile, compile_str};
pub use config::SchemaConfig;
pub use error::{CompileError, ValidationError};
pub use jsonschema::Draft;
pub use validator::CompiledSchema;
