//! Hand-written port doubles shared by the use case tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use toolbridge_domain::page::{
    AgentPayload, AnnotatedElement, ButtonElement, FormElement, PageDocument, PayloadError,
};
use url::Url;

use crate::ports::document_parser::DocumentParserPort;
use crate::ports::fetch::{FetchPort, FetchRequest, FetchResponse};
use crate::ports::frame_host::{FrameHostPort, LoadedDocument, SurfaceId};
use crate::ports::host_error::HostError;
use crate::ports::navigator::NavigatorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::tool_store::{RegisteredTool, ToolStorePort};
use toolbridge_domain::tool::entities::ToolDefinition;
use toolbridge_domain::tool::schema::ParamSchema;

pub const PAGE_URL: &str = "https://todo.example/todos";

pub fn page_url() -> Url {
    Url::parse(PAGE_URL).unwrap()
}

/// Response document carrying `json` in the payload element.
pub fn payload_html(json: &str) -> String {
    format!(
        r#"<html><body><script type="application/json" id="agent-response">{}</script></body></html>"#,
        json
    )
}

type FormResponder = dyn Fn(&FormElement) -> Result<String, HostError> + Send + Sync;

pub struct MockFrameHost {
    responder: Box<FormResponder>,
    delay: Option<Duration>,
    open: Mutex<HashSet<SurfaceId>>,
    pub opened: Mutex<Vec<SurfaceId>>,
    pub submissions: Mutex<Vec<(SurfaceId, FormElement)>>,
}

impl MockFrameHost {
    pub fn new(responder: impl Fn(&FormElement) -> Result<String, HostError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            delay: None,
            open: Mutex::new(HashSet::new()),
            opened: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
        }
    }

    /// Every submission loads `html`.
    pub fn returning(html: impl Into<String>) -> Self {
        let html = html.into();
        Self::new(move |_| Ok(html.clone()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn submitted_forms(&self) -> Vec<FormElement> {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .map(|(_, f)| f.clone())
            .collect()
    }
}

#[async_trait]
impl FrameHostPort for MockFrameHost {
    async fn open_surface(&self, id: &SurfaceId) -> Result<(), HostError> {
        if !self.open.lock().unwrap().insert(id.clone()) {
            return Err(HostError::SurfaceExists(id.to_string()));
        }
        self.opened.lock().unwrap().push(id.clone());
        Ok(())
    }

    async fn submit(
        &self,
        id: &SurfaceId,
        form: &FormElement,
    ) -> Result<LoadedDocument, HostError> {
        if !self.open.lock().unwrap().contains(id) {
            return Err(HostError::SurfaceNotFound(id.to_string()));
        }
        self.submissions
            .lock()
            .unwrap()
            .push((id.clone(), form.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let html = (self.responder)(form)?;
        let url = Url::parse(form.action.as_deref().unwrap_or(PAGE_URL))
            .map_err(|e| HostError::InvalidUrl(e.to_string()))?;
        Ok(LoadedDocument { url, html })
    }

    fn close_surface(&self, id: &SurfaceId) {
        self.open.lock().unwrap().remove(id);
    }

    fn open_surfaces(&self) -> usize {
        self.open.lock().unwrap().len()
    }
}

type FetchResponder = dyn Fn(&FetchRequest) -> Result<String, HostError> + Send + Sync;

pub struct MockFetch {
    responder: Box<FetchResponder>,
    pub requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetch {
    pub fn new(responder: impl Fn(&FetchRequest) -> Result<String, HostError> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(html: impl Into<String>) -> Self {
        let html = html.into();
        Self::new(move |_| Ok(html.clone()))
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl FetchPort for MockFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, HostError> {
        self.requests.lock().unwrap().push(request.clone());
        let body = (self.responder)(&request)?;
        Ok(FetchResponse {
            url: request.url,
            status: 200,
            body,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Navigate(String),
    Reload,
    Click(String),
}

pub struct MockNavigator {
    url: Url,
    html: String,
    pub events: Mutex<Vec<NavEvent>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::with_document("<html></html>")
    }

    pub fn with_document(html: impl Into<String>) -> Self {
        Self {
            url: page_url(),
            html: html.into(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<NavEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NavigatorPort for MockNavigator {
    fn current_url(&self) -> Url {
        self.url.clone()
    }

    async fn document(&self) -> Result<LoadedDocument, HostError> {
        Ok(LoadedDocument {
            url: self.url.clone(),
            html: self.html.clone(),
        })
    }

    async fn navigate(&self, target: &str) -> Result<(), HostError> {
        self.events
            .lock()
            .unwrap()
            .push(NavEvent::Navigate(target.to_string()));
        Ok(())
    }

    async fn reload(&self) -> Result<(), HostError> {
        self.events.lock().unwrap().push(NavEvent::Reload);
        Ok(())
    }

    async fn click(&self, button: &ButtonElement) -> Result<(), HostError> {
        self.events
            .lock()
            .unwrap()
            .push(NavEvent::Click(button.text.clone()));
        Ok(())
    }
}

/// Parser double: payloads are found by substring, documents and
/// fragments come from a prepared table keyed by their HTML.
#[derive(Default)]
pub struct MockParser {
    documents: Mutex<HashMap<String, Vec<AnnotatedElement>>>,
}

impl MockParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markup(self, html: impl Into<String>, elements: Vec<AnnotatedElement>) -> Self {
        self.documents.lock().unwrap().insert(html.into(), elements);
        self
    }
}

impl DocumentParserPort for MockParser {
    fn parse_document(&self, url: &Url, html: &str) -> PageDocument {
        let elements = self.parse_fragment(html);
        elements
            .into_iter()
            .fold(PageDocument::new(url.clone()), PageDocument::with_element)
    }

    fn parse_fragment(&self, html: &str) -> Vec<AnnotatedElement> {
        self.documents
            .lock()
            .unwrap()
            .get(html)
            .cloned()
            .unwrap_or_default()
    }

    fn extract_payload(
        &self,
        html: &str,
        element_id: &str,
    ) -> Result<Option<AgentPayload>, PayloadError> {
        let marker = format!(r#"id="{}">"#, element_id);
        let Some(start) = html.find(&marker).map(|i| i + marker.len()) else {
            return Ok(None);
        };
        let end = html[start..].find("</script>").map_or(html.len(), |i| start + i);
        AgentPayload::parse(&html[start..end]).map(Some)
    }
}

#[derive(Default)]
pub struct MockStore {
    tools: Mutex<BTreeMap<String, RegisteredTool>>,
}

impl ToolStorePort for MockStore {
    fn register(&self, tool: RegisteredTool) -> Option<RegisteredTool> {
        self.tools
            .lock()
            .unwrap()
            .insert(tool.name().to_string(), tool)
    }

    fn get(&self, name: &str) -> Option<RegisteredTool> {
        self.tools.lock().unwrap().get(name).cloned()
    }

    fn list(&self) -> Vec<RegisteredTool> {
        self.tools.lock().unwrap().values().cloned().collect()
    }
}

/// Minimal ToolSchemaPort reproducing the JSON Schema conversion for tests.
pub struct MockSchema;

impl ToolSchemaPort for MockSchema {
    fn input_schema(&self, schema: &ParamSchema) -> serde_json::Value {
        let properties: serde_json::Map<_, _> = schema
            .iter()
            .map(|f| (f.name.clone(), serde_json::json!({ "type": f.kind.as_str() })))
            .collect();
        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": schema.required_names().collect::<Vec<_>>(),
        })
    }

    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value {
        serde_json::json!({
            "name": tool.name,
            "description": tool.description,
            "inputSchema": self.input_schema(&tool.input_schema),
        })
    }
}
