//! Path-scoped access policy for file operations.
//!
//! Core principle: **every file-system side effect is checked against an
//! explicit allowlist before it happens.**

mod capability;
mod error;
mod policy;

pub use capability::{Access, PathRequest};
pub use error::{Error, Result};
pub use policy::{AllowRules, Decision, DenyRules, Policy};
