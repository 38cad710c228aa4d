//! Form tool execution
//!
//! Per invocation: `Idle → Submitting → AwaitingLoad → Resolved`.
//!
//! 1. Open a uniquely named navigation surface
//! 2. Clone the form, target the surface, mark the action `agent=true`
//! 3. Write each argument into the clone's control (through the codec)
//! 4. Submit the clone and wait for the surface to load
//! 5. Read the payload from the loaded document (`{success: true}` when
//!    absent or unparseable)
//!
//! The surface is closed on every path. Concurrent invocations each get
//! their own surface and clone.

use std::sync::Arc;

use toolbridge_domain::config::BridgeSettings;
use toolbridge_domain::page::{AgentPayload, FormElement, mark_agent_request};
use toolbridge_domain::tool::codec;
use toolbridge_domain::tool::entities::ToolCall;
use toolbridge_domain::tool::naming::sanitize_identifier;
use toolbridge_domain::tool::value_objects::{InvocationResult, ToolError};
use tracing::{debug, warn};

use crate::ports::document_parser::DocumentParserPort;
use crate::ports::frame_host::{FrameHostPort, SurfaceGuard, SurfaceId};
use crate::ports::host_error::HostError;
use crate::ports::navigator::NavigatorPort;
use crate::ports::tool_store::Execution;

pub struct FormExecutor {
    frames: Arc<dyn FrameHostPort>,
    navigator: Arc<dyn NavigatorPort>,
    parser: Arc<dyn DocumentParserPort>,
    settings: BridgeSettings,
}

impl FormExecutor {
    pub fn new(
        frames: Arc<dyn FrameHostPort>,
        navigator: Arc<dyn NavigatorPort>,
        parser: Arc<dyn DocumentParserPort>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            frames,
            navigator,
            parser,
            settings,
        }
    }

    /// Submit `form` with the call's arguments. Never fails: errors come
    /// back as error envelopes with no follow-up.
    pub async fn execute(&self, form: &FormElement, call: &ToolCall) -> Execution {
        match self.submit(form, call).await {
            Ok(payload) => Execution::new(
                InvocationResult::from_payload(&payload),
                Some(payload.follow_up()),
            ),
            Err(e) => {
                warn!("Form tool '{}' failed: {}", call.tool_name, e);
                Execution::only(InvocationResult::error(&e))
            }
        }
    }

    async fn submit(&self, form: &FormElement, call: &ToolCall) -> Result<AgentPayload, ToolError> {
        let surface = SurfaceId::next();
        self.frames
            .open_surface(&surface)
            .await
            .map_err(host_failure)?;
        let guard = SurfaceGuard::new(self.frames.clone(), surface);

        let clone = self.prepare_clone(form, call, guard.id())?;
        debug!(
            "Submitting '{}' to {} on {}",
            call.tool_name,
            clone.action.as_deref().unwrap_or_default(),
            guard.id()
        );

        let submission = self.frames.submit(guard.id(), &clone);
        let loaded = match self.settings.submit_timeout {
            Some(limit) => tokio::time::timeout(limit, submission)
                .await
                .map_err(|_| ToolError::timeout(format!("form submission on {}", guard.id())))?,
            None => submission.await,
        }
        .map_err(host_failure)?;

        let payload = match self
            .parser
            .extract_payload(&loaded.html, &self.settings.result_element_id)
        {
            Ok(Some(payload)) => payload,
            Ok(None) => AgentPayload::form_default(),
            Err(e) => {
                warn!("Ignoring unreadable payload for '{}': {}", call.tool_name, e);
                AgentPayload::form_default()
            }
        };
        Ok(payload)
    }

    /// Clone `form` for submission on `surface`. The original is untouched.
    fn prepare_clone(
        &self,
        form: &FormElement,
        call: &ToolCall,
        surface: &SurfaceId,
    ) -> Result<FormElement, ToolError> {
        let base = self.navigator.current_url();
        let mut action = form
            .submission_url(&base)
            .map_err(|e| ToolError::execution_failed(format!("Invalid form action: {}", e)))?;
        mark_agent_request(&mut action, &self.settings.agent_param);

        let mut clone = form.clone();
        clone.action = Some(action.to_string());
        clone.target = Some(surface.to_string());
        apply_arguments(form, &mut clone, call);
        Ok(clone)
    }
}

/// Write the call's arguments into `clone`.
///
/// Each parameter control of the original is addressed by re-sanitizing
/// its name, which recovers the sanitized → original mapping.
pub fn apply_arguments(original: &FormElement, clone: &mut FormElement, call: &ToolCall) {
    for control in original.parameter_controls() {
        let Some(source_name) = control.field_name() else {
            continue;
        };
        let Some(value) = call.arguments.get(&sanitize_identifier(source_name)) else {
            continue;
        };
        if let Some(target) = clone.control_named_mut(source_name) {
            codec::encode(target, value).apply(target);
        }
    }
}

fn host_failure(error: HostError) -> ToolError {
    match error {
        HostError::Timeout => ToolError::timeout("form submission"),
        other => ToolError::execution_failed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFrameHost, MockNavigator, MockParser, payload_html};
    use serde_json::json;
    use std::time::Duration;
    use toolbridge_domain::page::{FollowUp, FormControl, FormMethod};

    fn todo_form() -> FormElement {
        FormElement::new()
            .with_tool("add-todo", "Add a new todo item")
            .with_action("/todos")
            .with_method(FormMethod::Post)
            .with_control(FormControl::input("hidden").named("authenticity_token").with_value("t0k"))
            .with_control(FormControl::input("text").named("text").required())
            .with_control(FormControl::input("checkbox").named("todo[done]"))
            .with_control(FormControl::input("number").named("priority"))
    }

    fn executor(frames: Arc<MockFrameHost>) -> FormExecutor {
        FormExecutor::new(
            frames,
            Arc::new(MockNavigator::new()),
            Arc::new(MockParser::new()),
            BridgeSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_submits_clone_with_mapped_values() {
        let frames = Arc::new(MockFrameHost::returning("<html></html>"));
        let form = todo_form();
        let call = ToolCall::new("add-todo")
            .with_arg("text", "buy milk")
            .with_arg("todo_done_", true)
            .with_arg("priority", 2);

        let execution = executor(frames.clone()).execute(&form, &call).await;
        assert!(!execution.result.is_error());

        let submitted = frames.submitted_forms();
        assert_eq!(submitted.len(), 1);
        let clone = &submitted[0];
        assert_eq!(clone.control_named("text").unwrap().value, "buy milk");
        let done = clone.control_named("todo[done]").unwrap();
        assert!(done.checked);
        assert_eq!(done.value, "1");
        assert_eq!(clone.control_named("priority").unwrap().value, "2");
        assert_eq!(
            clone.action.as_deref(),
            Some("https://todo.example/todos?agent=true")
        );
        assert!(clone.target.as_deref().unwrap().starts_with("tool-frame-"));

        // The registered form is never mutated
        assert_eq!(form, todo_form());
    }

    #[tokio::test]
    async fn test_string_values_are_not_trimmed() {
        let frames = Arc::new(MockFrameHost::returning("<html></html>"));
        let call = ToolCall::new("add-todo").with_arg("text", "  buy milk ");

        executor(frames.clone()).execute(&todo_form(), &call).await;
        let clone = &frames.submitted_forms()[0];
        assert_eq!(clone.control_named("text").unwrap().value, "  buy milk ");
    }

    #[tokio::test]
    async fn test_missing_payload_defaults_to_success() {
        let frames = Arc::new(MockFrameHost::returning("<html><body>ok</body></html>"));
        let execution = executor(frames)
            .execute(&todo_form(), &ToolCall::new("add-todo").with_arg("text", "x"))
            .await;

        assert_eq!(execution.result.json(), Some(json!({"success": true})));
        assert_eq!(execution.follow_up, Some(FollowUp::Reload));
    }

    #[tokio::test]
    async fn test_unparseable_payload_defaults_to_success() {
        let frames = Arc::new(MockFrameHost::returning(payload_html("{oops")));
        let execution = executor(frames)
            .execute(&todo_form(), &ToolCall::new("add-todo"))
            .await;

        assert!(!execution.result.is_error());
        assert_eq!(execution.result.json(), Some(json!({"success": true})));
    }

    #[tokio::test]
    async fn test_payload_redirect_becomes_follow_up() {
        let frames = Arc::new(MockFrameHost::returning(payload_html(
            r#"{"success": true, "todo": {"id": 7}, "redirect_url": "/todos/7"}"#,
        )));
        let execution = executor(frames)
            .execute(&todo_form(), &ToolCall::new("add-todo").with_arg("text", "x"))
            .await;

        let payload = execution.result.json().unwrap();
        assert_eq!(payload["todo"]["id"], 7);
        assert_eq!(
            execution.follow_up,
            Some(FollowUp::Navigate("/todos/7".to_string()))
        );
    }

    #[tokio::test]
    async fn test_surface_closed_on_success_and_failure() {
        let ok = Arc::new(MockFrameHost::returning("<html></html>"));
        executor(ok.clone()).execute(&todo_form(), &ToolCall::new("t")).await;
        assert_eq!(ok.open_surfaces(), 0);
        assert_eq!(ok.opened.lock().unwrap().len(), 1);

        let failing = Arc::new(MockFrameHost::new(|_| {
            Err(HostError::Network("connection refused".to_string()))
        }));
        let execution = executor(failing.clone())
            .execute(&todo_form(), &ToolCall::new("t"))
            .await;
        assert!(execution.result.is_error());
        assert_eq!(
            execution.result.first_text(),
            Some("Error: Network error: connection refused")
        );
        assert!(execution.follow_up.is_none());
        assert_eq!(failing.open_surfaces(), 0);
    }

    #[tokio::test]
    async fn test_submission_timeout_releases_surface() {
        let frames = Arc::new(
            MockFrameHost::returning("<html></html>").with_delay(Duration::from_secs(5)),
        );
        let settings = BridgeSettings {
            submit_timeout: Some(Duration::from_millis(20)),
            ..BridgeSettings::default()
        };
        let executor = FormExecutor::new(
            frames.clone(),
            Arc::new(MockNavigator::new()),
            Arc::new(MockParser::new()),
            settings,
        );

        let execution = executor.execute(&todo_form(), &ToolCall::new("t")).await;
        assert!(execution.result.is_error());
        assert!(execution.result.first_text().unwrap().contains("timed out"));
        assert_eq!(frames.open_surfaces(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_invocations_use_distinct_surfaces() {
        let frames = Arc::new(
            MockFrameHost::new(|form| {
                let text = form.control_named("text").map(|c| c.value.clone()).unwrap_or_default();
                Ok(payload_html(&json!({ "success": true, "text": text }).to_string()))
            })
            .with_delay(Duration::from_millis(20)),
        );
        let executor = executor(frames.clone());
        let form = todo_form();
        let first = ToolCall::new("add-todo").with_arg("text", "first");
        let second = ToolCall::new("add-todo").with_arg("text", "second");

        let (a, b) = tokio::join!(executor.execute(&form, &first), executor.execute(&form, &second));

        assert_eq!(a.result.json().unwrap()["text"], "first");
        assert_eq!(b.result.json().unwrap()["text"], "second");

        let submissions = frames.submissions.lock().unwrap().clone();
        assert_eq!(submissions.len(), 2);
        assert_ne!(submissions[0].0, submissions[1].0);
        for (surface, clone) in &submissions {
            assert_eq!(clone.target.as_deref(), Some(surface.as_str()));
        }
        assert_eq!(frames.open_surfaces(), 0);
    }
}
