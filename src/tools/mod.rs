//! Tool Invocation Layer
//!
//! Information Hiding:
//! - Tool execution details hidden behind trait
//! - Schema validation and correlation-id discipline internalized in the
//!   catalog
//! - Execution failures never escape as raised errors; callers always
//!   get a result envelope

pub mod catalog;
pub mod movies;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub use catalog::ToolCatalog;

/// Tool parameter schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: String,
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    pub fn required(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: true,
            default: None,
        }
    }

    pub fn optional(name: &str, param_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: param_type.to_string(),
            description: description.to_string(),
            required: false,
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Tool metadata - describes what the tool does and how to call it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl fmt::Display for ToolMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// Stable failure codes surfaced in result envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorCode {
    UnknownTool,
    InvalidArguments,
    ToolExecutionError,
}

/// A tool call as issued through the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallEnvelope {
    pub id: u64,
    pub name: String,
    pub arguments: Value,
}

/// Exactly one outcome per envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success { payload: Value },
    Failure { code: ToolErrorCode, message: String },
}

/// Result of one tool call, correlated to its request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResultEnvelope {
    pub id: u64,
    pub outcome: ToolOutcome,
}

impl ToolResultEnvelope {
    pub fn success(id: u64, payload: Value) -> Self {
        Self {
            id,
            outcome: ToolOutcome::Success { payload },
        }
    }

    pub fn failure(id: u64, code: ToolErrorCode, message: impl Into<String>) -> Self {
        Self {
            id,
            outcome: ToolOutcome::Failure {
                code,
                message: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            ToolOutcome::Success { payload } => Some(payload),
            ToolOutcome::Failure { .. } => None,
        }
    }
}

/// Tool trait - a named, schema-described capability
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get tool metadata (name, description, parameter schema)
    fn metadata(&self) -> ToolMetadata;

    /// Execute the tool with validated arguments
    async fn execute(&self, args: Value) -> Result<Value>;
}
