use serde_json::Value;
use tracing::debug;

use crate::config::SchemaConfig;
use crate::error::CompileError;
use crate::validator::CompiledSchema;

/// Compile a schema document.
pub fn compile(schema: &Value, config: &SchemaConfig) -> Result<CompiledSchema, CompileError> {
    debug!(draft = ?config.draft, "compiling schema");

    let validator = jsonschema::options()
        .with_draft(config.draft)
        .build(schema)
        .map_err(|err| CompileError::new(err.to_string()))?;

    Ok(CompiledSchema::new(validator))
}

/// Parse and compile a schema document from a JSON string.
pub fn compile_str(schema_json: &str, config: &SchemaConfig) -> Result<CompiledSchema, CompileError> {
    let schema: Value = serde_json::from_str(schema_json)
        .map_err(|err| CompileError::new(format!("schema is not valid JSON: {err}")))?;
    compile(&schema, config)
}
