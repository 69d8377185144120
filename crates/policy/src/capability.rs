use serde::{Deserialize, Serialize};

/// The two ways an operation can touch the file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    Read,
    Write,
}

/// A request to access a path.
#[derive(Debug, Clone)]
pub struct PathRequest {
    pub access: Access,
    pub path: String,
}

impl PathRequest {
    pub fn new(access: Access, path: impl Into<String>) -> Self {
        Self {
            access,
            path: path.into(),
        }
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self::new(Access::Read, path)
    }

    pub fn write(path: impl Into<String>) -> Self {
        Self::new(Access::Write, path)
    }
}
