//! File-system tool host.

use crate::model::{ToolCall, ToolSpec};
use crate::tools::{FsOp, ToolError, ToolHost};
use policy::{Decision, PathRequest, Policy};
use serde_json::Value;

/// Tool host executing the six file operations locally.
///
/// Holds the immutable tool registry and the access policy. Every failure
/// (unknown tool name, malformed arguments, policy denial, I/O error) comes
/// back as a [`ToolError`] for the model to react to; the host never aborts
/// the conversation.
pub struct FsToolHost {
    specs: Vec<ToolSpec>,
    policy: Policy,
}

impl FsToolHost {
    /// Create a host enforcing the given access policy.
    pub fn new(policy: Policy) -> Self {
        Self {
            specs: FsOp::specs(),
            policy,
        }
    }
}

impl Default for FsToolHost {
    fn default() -> Self {
        Self::new(Policy::restrictive())
    }
}

impl ToolHost for FsToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        let op = FsOp::decode(&call.name, call.input.clone())?;

        let path = op.path().to_string_lossy().into_owned();
        let request = if op.is_read() {
            PathRequest::read(path)
        } else {
            PathRequest::write(path)
        };
        if let Decision::Deny { reason } = self.policy.check(&request) {
            return Err(ToolError::Denied(reason));
        }

        tracing::debug!(tool = %call.name, id = %call.id, "executing file operation");
        op.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host() -> FsToolHost {
        FsToolHost::new(Policy::permissive())
    }

    fn call(name: &str, input: Value) -> ToolCall {
        ToolCall {
            id: "call_0".into(),
            name: name.into(),
            input,
        }
    }

    #[tokio::test]
    async fn create_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("documents");

        let output = host()
            .execute(&call("create_folder", json!({ "path": path })))
            .await
            .unwrap();

        assert!(path.is_dir());
        assert!(output["result"].as_str().unwrap().contains("Folder created"));
    }

    #[tokio::test]
    async fn create_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let host = host();

        host.execute(&call(
            "create_file",
            json!({ "path": path, "content": "Hello, World!" }),
        ))
        .await
        .unwrap();

        let output = host
            .execute(&call("read_file", json!({ "path": path })))
            .await
            .unwrap();
        assert_eq!(output["result"], "Hello, World!");
    }

    #[tokio::test]
    async fn write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        let host = host();

        host.execute(&call("create_file", json!({ "path": path, "content": "first" })))
            .await
            .unwrap();
        host.execute(&call("write_file", json!({ "path": path, "content": "second" })))
            .await
            .unwrap();

        let output = host
            .execute(&call("read_file", json!({ "path": path })))
            .await
            .unwrap();
        assert_eq!(output["result"], "second");
    }

    #[tokio::test]
    async fn modify_file_appends_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let host = host();

        host.execute(&call("create_file", json!({ "path": path, "content": "Initial\n" })))
            .await
            .unwrap();
        host.execute(&call("modify_file", json!({ "path": path, "content": "More" })))
            .await
            .unwrap();

        let output = host
            .execute(&call("read_file", json!({ "path": path })))
            .await
            .unwrap();
        assert_eq!(output["result"], "Initial\nMore");
    }

    #[tokio::test]
    async fn list_folder_returns_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();

        let output = host()
            .execute(&call("list_folder", json!({ "path": dir.path() })))
            .await
            .unwrap();

        let mut names: Vec<String> = output["result"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["a.txt", "b"]);
    }

    #[tokio::test]
    async fn missing_paths_yield_error_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        let host = host();

        let err = host
            .execute(&call("read_file", json!({ "path": missing })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));

        let err = host
            .execute(&call("list_folder", json!({ "path": missing })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }

    #[tokio::test]
    async fn unwritable_path_yields_error_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/parent/file.txt");

        let err = host()
            .execute(&call("create_file", json!({ "path": path, "content": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_recoverable_error() {
        let err = host()
            .execute(&call("teleport_file", json!({ "path": "a" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn policy_denial_is_reported_not_executed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.txt");

        // Restrictive policy only allows the working directory; the tempdir
        // is outside it.
        let host = FsToolHost::new(Policy::restrictive());
        let err = host
            .execute(&call("create_file", json!({ "path": path, "content": "x" })))
            .await
            .unwrap_err();

        assert!(matches!(err, ToolError::Denied(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn malformed_arguments_do_not_touch_disk() {
        let err = host()
            .execute(&call("write_file", json!({ "path": "a.txt" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
