//! Provider backends.
//!
//! Each provider adapts the provider-agnostic [`crate::model`] types to one
//! concrete LLM service wire format.

mod anthropic;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder};
