//! Tool Catalog
//!
//! Information Hiding:
//! - Tool storage and lookup implementation hidden
//! - Argument validation and default application internalized
//! - Correlation-id assignment hidden from callers

use super::{
    Tool, ToolCallEnvelope, ToolErrorCode, ToolMetadata, ToolResultEnvelope,
};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Fixed catalog of callable tools, kept in declaration order
pub struct ToolCatalog {
    tools: Vec<Arc<dyn Tool>>,
    next_id: AtomicU64,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a tool. Registration order is the catalog order.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.metadata().name;
        tracing::info!(tool = %name, "registering tool");
        self.tools.push(tool);
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.metadata().name == name)
    }

    /// Static tool descriptors in declaration order
    pub fn list_tools(&self) -> Vec<ToolMetadata> {
        self.tools.iter().map(|t| t.metadata()).collect()
    }

    /// Tool descriptions formatted for LLM prompts
    pub fn tools_description(&self) -> String {
        let mut descriptions = Vec::new();
        for tool in &self.tools {
            let metadata = tool.metadata();
            let params = metadata
                .parameters
                .iter()
                .map(|p| {
                    let required = if p.required { "required" } else { "optional" };
                    format!(
                        "  - {} ({}): {} [{}]",
                        p.name, p.param_type, p.description, required
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");

            descriptions.push(format!(
                "Tool: {}\nDescription: {}\nParameters:\n{}",
                metadata.name, metadata.description, params
            ));
        }
        descriptions.join("\n\n")
    }

    /// Call a tool by name. Always returns an envelope: client errors
    /// (unknown tool, bad arguments) and execution failures are carried
    /// as failure outcomes, never raised.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResultEnvelope {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let request = ToolCallEnvelope {
            id,
            name: name.to_string(),
            arguments,
        };
        tracing::debug!(id, tool = name, "tool call issued");

        let tool = match self.tools.iter().find(|t| t.metadata().name == name) {
            Some(t) => t,
            None => {
                return ToolResultEnvelope::failure(
                    id,
                    ToolErrorCode::UnknownTool,
                    format!("unknown tool '{}'", name),
                );
            }
        };

        let args = match validate_arguments(&tool.metadata(), request.arguments) {
            Ok(args) => args,
            Err(message) => {
                return ToolResultEnvelope::failure(id, ToolErrorCode::InvalidArguments, message);
            }
        };

        match tool.execute(args).await {
            Ok(payload) => {
                tracing::debug!(id, tool = name, "tool call succeeded");
                ToolResultEnvelope::success(id, payload)
            }
            Err(e) => {
                tracing::warn!(id, tool = name, error = %e, "tool execution failed");
                ToolResultEnvelope::failure(
                    id,
                    ToolErrorCode::ToolExecutionError,
                    format!("tool '{}' execution failed: {}", name, e),
                )
            }
        }
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Check arguments against the declared schema, filling in defaults for
/// omitted optional parameters. Returns the explicit offending field on
/// mismatch.
fn validate_arguments(metadata: &ToolMetadata, arguments: Value) -> Result<Value, String> {
    let mut args: Map<String, Value> = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(format!(
                "arguments must be a JSON object, got {}",
                type_name(&other)
            ));
        }
    };

    for param in &metadata.parameters {
        match args.get(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(format!("missing required parameter '{}'", param.name));
                }
                if let Some(default) = &param.default {
                    args.insert(param.name.clone(), default.clone());
                }
            }
            Some(value) => {
                if !type_matches(&param.param_type, value) {
                    return Err(format!(
                        "parameter '{}' must be of type {}, got {}",
                        param.name,
                        param.param_type,
                        type_name(value)
                    ));
                }
            }
        }
    }

    Ok(Value::Object(args))
}

fn type_matches(param_type: &str, value: &Value) -> bool {
    match param_type {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
