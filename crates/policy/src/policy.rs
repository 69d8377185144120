//! Policy configuration and enforcement.

use crate::{Access, Error, PathRequest, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path};

/// Policy configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Policy {
    /// Paths that are explicitly allowed.
    #[serde(default)]
    pub allow: AllowRules,

    /// Access kinds that are denied outright (overrides allow).
    #[serde(default)]
    pub deny: DenyRules,
}

/// Rules for allowed paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowRules {
    /// Readable path patterns (prefix or glob).
    #[serde(default)]
    pub read: Vec<String>,

    /// Writable path patterns (prefix or glob).
    #[serde(default)]
    pub write: Vec<String>,
}

/// Rules for denied access kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DenyRules {
    /// Deny all requests of these access kinds. `deny.all = ["write"]`
    /// turns the assistant read-only regardless of allow rules.
    #[serde(default)]
    pub all: HashSet<Access>,
}

/// Result of a policy check.
#[derive(Debug, Clone)]
pub enum Decision {
    Allow,
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl Policy {
    /// Load policy from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse policy from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Default policy: confine reads and writes to the working directory.
    pub fn restrictive() -> Self {
        Self {
            allow: AllowRules {
                read: vec![".".to_string()],
                write: vec![".".to_string()],
            },
            deny: DenyRules::default(),
        }
    }

    /// Allow everything. Intended for tests and throwaway sandboxes.
    pub fn permissive() -> Self {
        Self {
            allow: AllowRules {
                read: vec!["*".to_string()],
                write: vec!["*".to_string()],
            },
            deny: DenyRules::default(),
        }
    }

    /// Check whether a path request is allowed.
    pub fn check(&self, request: &PathRequest) -> Decision {
        // Explicit denials win
        if self.deny.all.contains(&request.access) {
            return Decision::Deny {
                reason: format!("{:?} access is denied by policy", request.access),
            };
        }

        let allowlist = match request.access {
            Access::Read => &self.allow.read,
            Access::Write => &self.allow.write,
        };

        if Self::path_allowed(allowlist, &request.path) {
            Decision::Allow
        } else {
            Decision::Deny {
                reason: format!(
                    "path '{}' is not in the {:?} allowlist",
                    request.path, request.access
                ),
            }
        }
    }

    fn path_allowed(allowlist: &[String], path: &str) -> bool {
        for pattern in allowlist {
            if pattern == "*" || pattern == "**" {
                return true;
            }
            // "." scopes to the working directory: any relative path that
            // does not escape through a parent component.
            if pattern == "." {
                let p = Path::new(path);
                if p.is_relative()
                    && !p.components().any(|c| matches!(c, Component::ParentDir))
                {
                    return true;
                }
                continue;
            }
            if path.starts_with(pattern) {
                return true;
            }
            // Simple glob: foo/* matches foo/bar but not foo/bar/baz
            if let Some(prefix) = pattern.strip_suffix("/*") {
                if path.starts_with(prefix) && !path[prefix.len()..].trim_start_matches('/').contains('/') {
                    return true;
                }
            }
            // Recursive glob: foo/** matches foo/bar/baz
            if let Some(prefix) = pattern.strip_suffix("/**") {
                if path.starts_with(prefix) {
                    return true;
                }
            }
        }
        false
    }
}
