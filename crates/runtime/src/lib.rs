//! Purser runtime — conversation orchestration and file tool execution.
//!
//! This crate maps one natural-language command to local file-system
//! operations through an LLM tool-calling exchange:
//!
//! - **Conversation**: sends the user text plus the tool schema, executes
//!   whatever tool calls the model emits, and asks the model for a final
//!   natural-language summary of the results.
//! - **FsToolHost**: the registry and executor for the six file operations
//!   (create_folder, create_file, read_file, write_file, modify_file,
//!   list_folder). Failures are returned to the model as data; a broken
//!   file operation never aborts the conversation.
//! - **Backend**: a trait abstracting the model provider, with an Anthropic
//!   implementation over `reqwest`.
//!
//! # Example
//!
//! ```ignore
//! use policy::Policy;
//! use runtime::{AnthropicBackend, Conversation, FsToolHost};
//!
//! # async fn example() -> Result<(), runtime::ModelError> {
//! let backend = AnthropicBackend::builder("sk-ant-api01-...", "claude-sonnet-4-20250514")
//!     .system("You are a file management assistant.")
//!     .build();
//! let host = FsToolHost::new(Policy::restrictive());
//!
//! let mut conversation = Conversation::new(backend, host);
//! let answer = conversation.run("create a folder called documents").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

mod conversation;
pub mod model;
pub mod providers;
pub mod tools;

// Conversation orchestration
pub use conversation::Conversation;

// Model protocol types
pub use model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolResult,
    ToolSpec, Usage,
};

// Provider backends
pub use providers::AnthropicBackend;

// Tool registry and execution
pub use tools::{FsOp, FsToolHost, ToolError, ToolHost};
