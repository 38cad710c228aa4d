//! Link tool execution
//!
//! Two sub-protocols, chosen by the link's raw tool name:
//!
//! - **navigation** (name contains the navigation marker): no request is
//!   made; the envelope reports `navigating` and the page moves to the
//!   link target afterwards
//! - **action** (everything else): a same-origin credentialed fetch with
//!   `agent=true`, `Accept: text/html` and the tool header. The payload
//!   defaults to `{}`; a payload that is present but not JSON is an error.

use std::sync::Arc;

use serde_json::json;
use toolbridge_domain::config::BridgeSettings;
use toolbridge_domain::page::{AgentPayload, FollowUp, LinkElement, mark_agent_request};
use toolbridge_domain::tool::entities::ToolCall;
use toolbridge_domain::tool::value_objects::{InvocationResult, ToolError};
use tracing::{debug, warn};

use crate::ports::document_parser::DocumentParserPort;
use crate::ports::fetch::{FetchPort, FetchRequest};
use crate::ports::navigator::NavigatorPort;
use crate::ports::tool_store::Execution;

pub struct LinkExecutor {
    fetch: Arc<dyn FetchPort>,
    navigator: Arc<dyn NavigatorPort>,
    parser: Arc<dyn DocumentParserPort>,
    settings: BridgeSettings,
}

impl LinkExecutor {
    pub fn new(
        fetch: Arc<dyn FetchPort>,
        navigator: Arc<dyn NavigatorPort>,
        parser: Arc<dyn DocumentParserPort>,
        settings: BridgeSettings,
    ) -> Self {
        Self {
            fetch,
            navigator,
            parser,
            settings,
        }
    }

    /// Activate `link`, registered under the raw tool name `raw_name`.
    pub async fn execute(&self, raw_name: &str, link: &LinkElement, call: &ToolCall) -> Execution {
        let outcome = if self.settings.is_navigation(raw_name) {
            self.navigate(link)
        } else {
            self.activate(link, call).await
        };
        outcome.unwrap_or_else(|e| {
            warn!("Link tool '{}' failed: {}", call.tool_name, e);
            Execution::only(InvocationResult::error(&e))
        })
    }

    fn navigate(&self, link: &LinkElement) -> Result<Execution, ToolError> {
        let target = link
            .target_url(&self.navigator.current_url())
            .map_err(|e| ToolError::execution_failed(format!("Invalid link target: {}", e)))?;
        debug!("Navigation link to {}", target);
        let result = InvocationResult::from_json(json!({
            "success": true,
            "action": "navigating",
            "url": target.as_str(),
        }));
        Ok(Execution::new(result, Some(FollowUp::Navigate(target.to_string()))))
    }

    async fn activate(&self, link: &LinkElement, call: &ToolCall) -> Result<Execution, ToolError> {
        let mut url = link
            .target_url(&self.navigator.current_url())
            .map_err(|e| ToolError::execution_failed(format!("Invalid link target: {}", e)))?;
        mark_agent_request(&mut url, &self.settings.agent_param);
        debug!("Fetching {} for '{}'", url, call.tool_name);

        let request = FetchRequest::get(url)
            .with_header("Accept", "text/html")
            .with_header(self.settings.tool_header.as_str(), "true");
        let response = self
            .fetch
            .fetch(request)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let payload = self
            .parser
            .extract_payload(&response.body, &self.settings.result_element_id)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?
            .unwrap_or_else(AgentPayload::link_default);

        Ok(Execution::new(
            InvocationResult::from_payload(&payload),
            Some(payload.follow_up()),
        ))
    }
}
