//! Button tool execution
//!
//! A button inside a form submits that form by direct fetch, carrying the
//! form's current data set, `agent=true`, the tool header and same-origin
//! credentials. Only a `redirect_url` in the payload moves the page.
//! A button outside any form is clicked.

use std::sync::Arc;

use serde_json::json;
use toolbridge_domain::config::BridgeSettings;
use toolbridge_domain::page::{
    AgentPayload, ButtonElement, FollowUp, FormElement, FormMethod, mark_agent_request,
};
use toolbridge_domain::tool::entities::ToolCall;
use toolbridge_domain::tool::value_objects::{InvocationResult, ToolError};
use tracing::{debug, warn};

use crate::ports::document_parser::DocumentParserPort;
use crate::ports::fetch::{FetchPort, FetchRequest};
use crate::ports::navigator::NavigatorPort;
use crate::ports::tool_store::Execution;

pub struct ButtonExecutor {
    fetch: Arc<dyn FetchPort>,
    navigator: Arc<dyn NavigatorPort>,
    parser: Arc<dyn DocumentParserPort>,
    settings: BridgeSettings,
}

impl ButtonExecutor {
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

    pub async fn execute(&self, button: &ButtonElement, call: &ToolCall) -> Execution {
        let outcome = match &button.form {
            Some(form) => self.submit(form, call).await,
            None => self.click(button).await,
        };
        outcome.unwrap_or_else(|e| {
            warn!("Button tool '{}' failed: {}", call.tool_name, e);
            Execution::only(InvocationResult::error(&e))
        })
    }

    async fn submit(&self, form: &FormElement, call: &ToolCall) -> Result<Execution, ToolError> {
        let mut url = form
            .submission_url(&self.navigator.current_url())
            .map_err(|e| ToolError::execution_failed(format!("Invalid form action: {}", e)))?;
        let data = form.form_data();

        let request = match form.method {
            FormMethod::Post => {
                mark_agent_request(&mut url, &self.settings.agent_param);
                FetchRequest::post_form(url, data)
            }
            FormMethod::Get => {
                // GET carries the data set in the query, like a browser submission
                url.query_pairs_mut().clear().extend_pairs(&data);
                mark_agent_request(&mut url, &self.settings.agent_param);
                FetchRequest::get(url)
            }
        }
        .with_header(self.settings.tool_header.as_str(), "true");

        debug!("Button '{}' submitting {} {}", call.tool_name, request.method.as_str(), request.url);
        let response = self
            .fetch
            .fetch(request)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let payload = self
            .parser
            .extract_payload(&response.body, &self.settings.result_element_id)
            .map_err(|e| ToolError::execution_failed(e.to_string()))?
            .unwrap_or_else(AgentPayload::form_default);

        let follow_up = payload
            .redirect_url()
            .map(|target| FollowUp::Navigate(target.to_string()));
        Ok(Execution::new(InvocationResult::from_payload(&payload), follow_up))
    }

    async fn click(&self, button: &ButtonElement) -> Result<Execution, ToolError> {
        self.navigator
            .click(button)
            .await
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;
        Ok(Execution::only(InvocationResult::from_json(json!({
            "success": true,
            "action": "button clicked",
        }))))
    }
}
