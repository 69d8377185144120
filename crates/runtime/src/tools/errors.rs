use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// Serializable: a failed operation travels back to the model as structured
/// data, never as an aborted conversation.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("access denied: {0}")]
    Denied(String),
    #[error("io error: {0}")]
    Io(String),
}
