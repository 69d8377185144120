//! Tool registry and execution.
//!
//! [`ToolHost`] is the boundary between the model loop and side effects.
//! [`FsToolHost`] implements it for the closed set of six file operations
//! in [`FsOp`].

pub mod errors;
mod fs_host;
mod host;
mod ops;

pub use errors::ToolError;
pub use fs_host::FsToolHost;
pub use host::ToolHost;
pub use ops::{ContentArgs, CreateFileArgs, FsOp, PathArgs};
