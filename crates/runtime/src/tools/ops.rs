//! The closed set of file operations exposed to the model.

use crate::model::ToolSpec;
use crate::tools::ToolError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Arguments for operations that take only a path.
#[derive(Debug, Clone, Deserialize)]
pub struct PathArgs {
    pub path: PathBuf,
}

/// Arguments for `create_file`; content is optional and defaults to empty.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFileArgs {
    pub path: PathBuf,
    #[serde(default)]
    pub content: String,
}

/// Arguments for operations that require both path and content.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentArgs {
    pub path: PathBuf,
    pub content: String,
}

/// A file operation the model may request.
///
/// The set is closed: a name outside it is rejected at decode time with
/// [`ToolError::NotFound`] rather than crashing the dispatch, and the
/// matchers below are exhaustive.
#[derive(Debug, Clone)]
pub enum FsOp {
    CreateFolder(PathArgs),
    CreateFile(CreateFileArgs),
    ReadFile(PathArgs),
    WriteFile(ContentArgs),
    ModifyFile(ContentArgs),
    ListFolder(PathArgs),
}

impl FsOp {
    /// Decode a named tool call into a typed operation.
    pub fn decode(name: &str, input: Value) -> Result<Self, ToolError> {
        match name {
            "create_folder" => Ok(Self::CreateFolder(args(name, input)?)),
            "create_file" => Ok(Self::CreateFile(args(name, input)?)),
            "read_file" => Ok(Self::ReadFile(args(name, input)?)),
            "write_file" => Ok(Self::WriteFile(args(name, input)?)),
            "modify_file" => Ok(Self::ModifyFile(args(name, input)?)),
            "list_folder" => Ok(Self::ListFolder(args(name, input)?)),
            other => Err(ToolError::NotFound(other.to_string())),
        }
    }

    /// The path this operation touches.
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateFolder(a) | Self::ReadFile(a) | Self::ListFolder(a) => &a.path,
            Self::CreateFile(a) => &a.path,
            Self::WriteFile(a) | Self::ModifyFile(a) => &a.path,
        }
    }

    /// Whether this operation only reads the file system.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::ReadFile(_) | Self::ListFolder(_))
    }

    /// Execute the operation against the local file system.
    ///
    /// Every underlying I/O failure maps to [`ToolError::Io`]; nothing
    /// propagates past this boundary.
    pub async fn run(self) -> Result<Value, ToolError> {
        match self {
            Self::CreateFolder(PathArgs { path }) => {
                fs::create_dir_all(&path).await.map_err(io_err)?;
                Ok(json!({ "result": format!("Folder created at {}", path.display()) }))
            }
            Self::CreateFile(CreateFileArgs { path, content }) => {
                fs::write(&path, content).await.map_err(io_err)?;
                Ok(json!({ "result": format!("File created at {}", path.display()) }))
            }
            Self::ReadFile(PathArgs { path }) => {
                let content = fs::read_to_string(&path).await.map_err(io_err)?;
                Ok(json!({ "result": content }))
            }
            Self::WriteFile(ContentArgs { path, content }) => {
                fs::write(&path, content).await.map_err(io_err)?;
                Ok(json!({ "result": format!("Content written to {}", path.display()) }))
            }
            Self::ModifyFile(ContentArgs { path, content }) => {
                // Append-only: existing data is never truncated.
                let mut file = fs::OpenOptions::new()
                    .append(true)
                    .create(true)
                    .open(&path)
                    .await
                    .map_err(io_err)?;
                file.write_all(content.as_bytes()).await.map_err(io_err)?;
                Ok(json!({ "result": format!("Content appended to {}", path.display()) }))
            }
            Self::ListFolder(PathArgs { path }) => {
                let mut entries = fs::read_dir(&path).await.map_err(io_err)?;
                let mut names = Vec::new();
                while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
                    names.push(entry.file_name().to_string_lossy().into_owned());
                }
                Ok(json!({ "result": names }))
            }
        }
    }

    /// Tool specifications for all six operations, in registry order.
    ///
    /// Built once at host construction; the registry never changes after
    /// startup.
    pub fn specs() -> Vec<ToolSpec> {
        vec![
            spec(
                "create_folder",
                "Create a new folder",
                path_schema("The path where to create the folder"),
            ),
            spec(
                "create_file",
                "Create a new file with optional content",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path where to create the file",
                        },
                        "content": {
                            "type": "string",
                            "description": "The content to write in the file (optional)",
                        },
                    },
                    "required": ["path"],
                }),
            ),
            spec(
                "read_file",
                "Read the contents of a file",
                path_schema("The path of the file to read"),
            ),
            spec(
                "write_file",
                "Write content to a file (overwrite)",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path of the file to write",
                        },
                        "content": {
                            "type": "string",
                            "description": "The content to write in the file",
                        },
                    },
                    "required": ["path", "content"],
                }),
            ),
            spec(
                "modify_file",
                "Append content to an existing file",
                json!({
                    "type": "object",
                    "properties": {
                        "path": {
                            "type": "string",
                            "description": "The path of the file to modify",
                        },
                        "content": {
                            "type": "string",
                            "description": "The content to append to the file",
                        },
                    },
                    "required": ["path", "content"],
                }),
            ),
            spec(
                "list_folder",
                "List the contents of a folder",
                path_schema("The path of the folder to list"),
            ),
        ]
    }
}

fn spec(name: &str, description: &str, schema: Value) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: description.to_string(),
        schema,
    }
}

fn path_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "path": {
                "type": "string",
                "description": description,
            },
        },
        "required": ["path"],
    })
}

fn args<T: DeserializeOwned>(name: &str, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(format!("{name}: {e}")))
}

fn io_err(e: std::io::Error) -> ToolError {
    ToolError::Io(e.to_string())
}
