//! Tool registration
//!
//! Computes the registration arguments (name, title, description, input
//! schema) of each annotated element and binds the element to the
//! executor of its kind. Elements whose name sanitizes to nothing are
//! skipped. Re-registering a name replaces the earlier entry.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use toolbridge_domain::config::BridgeSettings;
use toolbridge_domain::page::{AnnotatedElement, ButtonElement, FormElement, LinkElement, PageDocument};
use toolbridge_domain::tool::entities::{ToolCall, ToolDefinition, ToolKind};
use toolbridge_domain::tool::naming::ToolName;
use toolbridge_domain::tool::schema::build_param_schema;
use tracing::{debug, warn};

use super::execute_button::ButtonExecutor;
use super::execute_form::FormExecutor;
use super::execute_link::LinkExecutor;
use crate::ports::document_parser::DocumentParserPort;
use crate::ports::fetch::FetchPort;
use crate::ports::frame_host::FrameHostPort;
use crate::ports::navigator::NavigatorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::ports::tool_store::{Execution, RegisteredTool, ToolInvoker, ToolStorePort};

/// Errors building a [`ToolRegistrar`].
///
/// Fatal: without these collaborators no tool can be registered at all.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("No schema provider configured; tool discovery cannot start")]
    MissingSchemaProvider,

    #[error("Missing required port: {0}")]
    MissingPort(&'static str),
}

/// Registers annotated elements as tools.
pub struct ToolRegistrar {
    store: Arc<dyn ToolStorePort>,
    schema: Arc<dyn ToolSchemaPort>,
    forms: Arc<FormExecutor>,
    links: Arc<LinkExecutor>,
    buttons: Arc<ButtonExecutor>,
}

impl ToolRegistrar {
    pub fn builder() -> ToolRegistrarBuilder {
        ToolRegistrarBuilder::default()
    }

    pub fn store(&self) -> &Arc<dyn ToolStorePort> {
        &self.store
    }

    /// Register every annotated element of `document`, in order.
    pub fn register_document(&self, document: &PageDocument) -> Vec<ToolDefinition> {
        let registered: Vec<_> = document
            .elements
            .iter()
            .filter_map(|element| self.register_element(element))
            .collect();
        debug!(
            "Registered {} of {} annotated elements from {}",
            registered.len(),
            document.elements.len(),
            document.url
        );
        registered
    }

    /// Register one element. Returns `None` when the element is skipped.
    pub fn register_element(&self, element: &AnnotatedElement) -> Option<ToolDefinition> {
        let raw_name = element.tool_name().unwrap_or_default();
        let Some(name) = ToolName::parse(raw_name) else {
            debug!("Skipping <{}> with empty tool-name", element.tag_name());
            return None;
        };
        let description = element.tool_description().to_string();

        let (definition, invoker): (ToolDefinition, Arc<dyn ToolInvoker>) = match element {
            AnnotatedElement::Form(form) => {
                let (schema, issues) = build_param_schema(form);
                for issue in issues {
                    warn!("Tool '{}', field '{}': {}", name, issue.field, issue.message);
                }
                let definition = ToolDefinition::new(name, description, ToolKind::Form).with_schema(schema);
                let invoker: Arc<dyn ToolInvoker> = Arc::new(FormTool {
                    form: form.clone(),
                    executor: self.forms.clone(),
                });
                (definition, invoker)
            }
            AnnotatedElement::Link(link) => {
                let definition = ToolDefinition::new(name, description, ToolKind::Link);
                let invoker: Arc<dyn ToolInvoker> = Arc::new(LinkTool {
                    raw_name: raw_name.to_string(),
                    link: link.clone(),
                    executor: self.links.clone(),
                });
                (definition, invoker)
            }
            AnnotatedElement::Button(button) => {
                let definition = ToolDefinition::new(name, description, ToolKind::Button);
                let invoker: Arc<dyn ToolInvoker> = Arc::new(ButtonTool {
                    button: button.clone(),
                    executor: self.buttons.clone(),
                });
                (definition, invoker)
            }
        };

        let input_schema = self.schema.input_schema(&definition.input_schema);
        let tool = RegisteredTool {
            definition: definition.clone(),
            input_schema,
            invoker,
        };
        if self.store.register(tool).is_some() {
            debug!("Tool '{}' re-registered, replacing earlier entry", definition.name);
        } else {
            debug!("Registered {} tool '{}'", definition.kind, definition.name);
        }
        Some(definition)
    }
}

/// Collects the registrar's collaborators.
#[derive(Default)]
pub struct ToolRegistrarBuilder {
    store: Option<Arc<dyn ToolStorePort>>,
    schema: Option<Arc<dyn ToolSchemaPort>>,
    frames: Option<Arc<dyn FrameHostPort>>,
    fetch: Option<Arc<dyn FetchPort>>,
    navigator: Option<Arc<dyn NavigatorPort>>,
    parser: Option<Arc<dyn DocumentParserPort>>,
    settings: BridgeSettings,
}

impl ToolRegistrarBuilder {
    pub fn store(mut self, store: Arc<dyn ToolStorePort>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn schema(mut self, schema: Arc<dyn ToolSchemaPort>) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn frames(mut self, frames: Arc<dyn FrameHostPort>) -> Self {
        self.frames = Some(frames);
        self
    }

    pub fn fetch(mut self, fetch: Arc<dyn FetchPort>) -> Self {
        self.fetch = Some(fetch);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn NavigatorPort>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn parser(mut self, parser: Arc<dyn DocumentParserPort>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn settings(mut self, settings: BridgeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<ToolRegistrar, RegistrationError> {
        let schema = self.schema.ok_or(RegistrationError::MissingSchemaProvider)?;
        let store = self.store.ok_or(RegistrationError::MissingPort("tool store"))?;
        let frames = self.frames.ok_or(RegistrationError::MissingPort("frame host"))?;
        let fetch = self.fetch.ok_or(RegistrationError::MissingPort("fetch"))?;
        let navigator = self.navigator.ok_or(RegistrationError::MissingPort("navigator"))?;
        let parser = self.parser.ok_or(RegistrationError::MissingPort("document parser"))?;

        Ok(ToolRegistrar {
            store,
            schema,
            forms: Arc::new(FormExecutor::new(
                frames,
                navigator.clone(),
                parser.clone(),
                self.settings.clone(),
            )),
            links: Arc::new(LinkExecutor::new(
                fetch.clone(),
                navigator.clone(),
                parser.clone(),
                self.settings.clone(),
            )),
            buttons: Arc::new(ButtonExecutor::new(fetch, navigator, parser, self.settings)),
        })
    }
}

struct FormTool {
    form: FormElement,
    executor: Arc<FormExecutor>,
}

#[async_trait]
impl ToolInvoker for FormTool {
    async fn invoke(&self, call: &ToolCall) -> Execution {
        self.executor.execute(&self.form, call).await
    }
}

struct LinkTool {
    raw_name: String,
    link: LinkElement,
    executor: Arc<LinkExecutor>,
}

#[async_trait]
impl ToolInvoker for LinkTool {
    async fn invoke(&self, call: &ToolCall) -> Execution {
        self.executor.execute(&self.raw_name, &self.link, call).await
    }
}

struct ButtonTool {
    button: ButtonElement,
    executor: Arc<ButtonExecutor>,
}

#[async_trait]
impl ToolInvoker for ButtonTool {
    async fn invoke(&self, call: &ToolCall) -> Execution {
        self.executor.execute(&self.button, call).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        MockFetch, MockFrameHost, MockNavigator, MockParser, MockSchema, MockStore, page_url,
    };
    use toolbridge_domain::page::FormControl;
    use toolbridge_domain::tool::schema::PARAM_DESCRIPTION_ATTR;

    fn registrar(store: Arc<MockStore>) -> ToolRegistrar {
        ToolRegistrar::builder()
            .store(store)
            .schema(Arc::new(MockSchema))
            .frames(Arc::new(MockFrameHost::returning("")))
            .fetch(Arc::new(MockFetch::returning("")))
            .navigator(Arc::new(MockNavigator::new()))
            .parser(Arc::new(MockParser::new()))
            .build()
            .unwrap()
    }

    fn add_todo_form() -> AnnotatedElement {
        AnnotatedElement::Form(
            FormElement::new()
                .with_tool("add-todo", "Add a new todo item")
                .with_action("/todos")
                .with_control(
                    FormControl::input("text")
                        .named("text")
                        .required()
                        .with_attr(PARAM_DESCRIPTION_ATTR, "The todo text"),
                ),
        )
    }

    #[test]
    fn test_missing_schema_provider_is_fatal() {
        let result = ToolRegistrar::builder()
            .store(Arc::new(MockStore::default()))
            .build();
        assert_eq!(result.err(), Some(RegistrationError::MissingSchemaProvider));
    }

    #[test]
    fn test_missing_port() {
        let result = ToolRegistrar::builder()
            .schema(Arc::new(MockSchema))
            .store(Arc::new(MockStore::default()))
            .build();
        assert_eq!(result.err(), Some(RegistrationError::MissingPort("frame host")));
    }

    #[test]
    fn test_register_form() {
        let store = Arc::new(MockStore::default());
        let definition = registrar(store.clone())
            .register_element(&add_todo_form())
            .unwrap();

        assert_eq!(definition.name(), "add-todo");
        assert_eq!(definition.title, "Add Todo");
        assert_eq!(definition.description, "Add a new todo item");
        assert_eq!(definition.kind, ToolKind::Form);
        let field = definition.input_schema.get("text").unwrap();
        assert!(field.required);
        assert_eq!(field.description, "The todo text [required]");

        let stored = store.get("add-todo").unwrap();
        assert_eq!(stored.input_schema["required"][0], "text");
    }

    #[test]
    fn test_register_document_order_and_skips() {
        let store = Arc::new(MockStore::default());
        let document = PageDocument::new(page_url())
            .with_element(add_todo_form())
            .with_element(AnnotatedElement::Link(
                LinkElement::new("/todos/1/delete").with_tool("delete todo #1", ""),
            ))
            .with_element(AnnotatedElement::Link(LinkElement::new("/").with_tool("", "")))
            .with_element(AnnotatedElement::Button(
                ButtonElement::new("Clear").with_tool("clear-completed", "Clear done"),
            ));

        let registered = registrar(store.clone()).register_document(&document);
        let names: Vec<_> = registered.iter().map(|d| d.name().to_string()).collect();
        assert_eq!(names, vec!["add-todo", "delete_todo__1", "clear-completed"]);
        assert_eq!(store.len(), 3);
        assert!(registered[1].input_schema.is_empty());
    }

    #[test]
    fn test_colliding_names_later_wins() {
        let store = Arc::new(MockStore::default());
        let registrar = registrar(store.clone());
        registrar.register_element(&AnnotatedElement::Link(
            LinkElement::new("/a").with_tool("go home", "first"),
        ));
        registrar.register_element(&AnnotatedElement::Link(
            LinkElement::new("/b").with_tool("go?home", "second"),
        ));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("go_home").unwrap().definition.description, "second");
    }
}
