//! Two-round conversation orchestration.

use crate::model::{Backend, Message, ModelError, ModelRequest, ToolResult};
use crate::tools::ToolHost;

/// Orchestrates one natural-language command through the model.
///
/// First round: user text plus the full tool schema. If the response carries
/// tool calls they are executed sequentially, in the order the model emitted
/// them, and every call gets exactly one result appended before the second
/// round. The second round carries no tool schema and its text is the final
/// answer. A first response without tool calls short-circuits: its text is
/// returned verbatim.
pub struct Conversation<B, H> {
    backend: B,
    host: H,
}

impl<B: Backend, H: ToolHost> Conversation<B, H> {
    pub fn new(backend: B, host: H) -> Self {
        Self { backend, host }
    }

    /// Run a single command to completion.
    ///
    /// Takes `&mut self`: one invocation at a time per conversation value.
    /// The message transcript is built fresh here and dropped on return;
    /// nothing persists across commands.
    pub async fn run(&mut self, user_input: &str) -> Result<String, ModelError> {
        let mut messages = vec![Message::user(user_input)];

        let response = self
            .backend
            .call(ModelRequest {
                messages: &messages,
                tools: self.host.specs(),
            })
            .await?;

        let calls = response.message.tool_calls();
        if calls.is_empty() {
            return Ok(response.message.text());
        }

        tracing::info!(count = calls.len(), "model requested tool calls");
        messages.push(response.message);

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            let result = match self.host.execute(call).await {
                Ok(output) => ToolResult::Success {
                    tool_call_id: call.id.clone(),
                    output,
                },
                Err(error) => {
                    tracing::debug!(tool = %call.name, %error, "tool call failed");
                    ToolResult::Failure {
                        tool_call_id: call.id.clone(),
                        error,
                    }
                }
            };
            results.push(result);
        }
        messages.push(Message::tool_results(results));

        // Summary round: no tool schema, the model only narrates the results.
        let summary = self
            .backend
            .call(ModelRequest {
                messages: &messages,
                tools: &[],
            })
            .await?;
        Ok(summary.message.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelResponse, Part, Role, ToolCall, Usage};
    use crate::tools::FsToolHost;
    use policy::Policy;
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend that replays canned assistant messages and records what each
    /// request looked like.
    struct ScriptedBackend {
        responses: Mutex<VecDeque<Message>>,
        requests: Mutex<Vec<RequestSnapshot>>,
    }

    struct RequestSnapshot {
        message_count: usize,
        tool_count: usize,
        tool_result_count: usize,
    }

    impl ScriptedBackend {
        fn new(responses: Vec<Message>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn snapshots(&self) -> std::sync::MutexGuard<'_, Vec<RequestSnapshot>> {
            self.requests.lock().unwrap()
        }
    }

    impl Backend for &ScriptedBackend {
        async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
            let tool_result_count = request
                .messages
                .iter()
                .flat_map(|m| &m.parts)
                .filter(|p| matches!(p, Part::ToolResult(_)))
                .count();
            self.requests.lock().unwrap().push(RequestSnapshot {
                message_count: request.messages.len(),
                tool_count: request.tools.len(),
                tool_result_count,
            });
            let message = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("backend called more times than scripted");
            Ok(ModelResponse {
                message,
                usage: Usage::default(),
            })
        }
    }

    fn assistant_with_calls(calls: Vec<(&str, &str, Value)>) -> Message {
        Message {
            role: Role::Assistant,
            parts: calls
                .into_iter()
                .map(|(id, name, input)| {
                    Part::ToolCall(ToolCall {
                        id: id.into(),
                        name: name.into(),
                        input,
                    })
                })
                .collect(),
        }
    }

    fn host() -> FsToolHost {
        FsToolHost::new(Policy::permissive())
    }

    #[tokio::test]
    async fn direct_answer_short_circuits() {
        let backend = ScriptedBackend::new(vec![Message::assistant("Just an answer.")]);
        let mut conversation = Conversation::new(&backend, host());

        let result = conversation.run("what can you do?").await.unwrap();

        assert_eq!(result, "Just an answer.");
        let snapshots = backend.snapshots();
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].tool_count, 6);
    }

    #[tokio::test]
    async fn create_folder_command_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("documents");

        let backend = ScriptedBackend::new(vec![
            assistant_with_calls(vec![(
                "call_1",
                "create_folder",
                json!({ "path": target }),
            )]),
            Message::assistant("Created the documents folder."),
        ]);
        let mut conversation = Conversation::new(&backend, host());

        let result = conversation
            .run("Create a folder called 'documents'")
            .await
            .unwrap();

        assert!(target.is_dir());
        assert_eq!(result, "Created the documents folder.");

        let snapshots = backend.snapshots();
        assert_eq!(snapshots.len(), 2);
        // Summary round: no tool schema, one result per call already appended.
        assert_eq!(snapshots[1].tool_count, 0);
        assert_eq!(snapshots[1].tool_result_count, 1);
        // user + assistant-with-calls + tool results
        assert_eq!(snapshots[1].message_count, 3);
    }

    #[tokio::test]
    async fn three_file_command_writes_all_contents() {
        let dir = tempfile::tempdir().unwrap();
        let calls = (1..=3)
            .map(|i| {
                (
                    format!("call_{i}"),
                    dir.path().join(format!("file{i}.txt")),
                    format!("This is file number {i}"),
                )
            })
            .collect::<Vec<_>>();

        let backend = ScriptedBackend::new(vec![
            Message {
                role: Role::Assistant,
                parts: calls
                    .iter()
                    .map(|(id, path, content)| {
                        Part::ToolCall(ToolCall {
                            id: id.clone(),
                            name: "create_file".into(),
                            input: json!({ "path": path, "content": content }),
                        })
                    })
                    .collect(),
            },
            Message::assistant("Created three files."),
        ]);
        let mut conversation = Conversation::new(&backend, host());

        conversation
            .run("Create 3 files, each containing its number")
            .await
            .unwrap();

        for (_, path, content) in &calls {
            assert_eq!(&std::fs::read_to_string(path).unwrap(), content);
        }
        assert_eq!(backend.snapshots()[1].tool_result_count, 3);
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_and_conversation_completes() {
        let backend = ScriptedBackend::new(vec![
            assistant_with_calls(vec![("call_1", "teleport_file", json!({ "path": "a" }))]),
            Message::assistant("That tool does not exist."),
        ]);
        let mut conversation = Conversation::new(&backend, host());

        let result = conversation.run("teleport my file").await.unwrap();

        // The failure went back to the model as data and the summary round
        // still ran.
        assert_eq!(result, "That tool does not exist.");
        let snapshots = backend.snapshots();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[1].tool_result_count, 1);
    }

    #[tokio::test]
    async fn failed_operation_does_not_abort_remaining_calls() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let created = dir.path().join("made.txt");

        let backend = ScriptedBackend::new(vec![
            assistant_with_calls(vec![
                ("call_1", "read_file", json!({ "path": missing })),
                ("call_2", "create_file", json!({ "path": created, "content": "ok" })),
            ]),
            Message::assistant("One failed, one worked."),
        ]);
        let mut conversation = Conversation::new(&backend, host());

        conversation.run("read one file, create another").await.unwrap();

        // The read failure became a result payload; the later call still ran.
        assert!(created.is_file());
        assert_eq!(backend.snapshots()[1].tool_result_count, 2);
    }
}
