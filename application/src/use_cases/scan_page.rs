//! Scan Page use case.
//!
//! Initial discovery: read the current document, parse its annotated
//! elements and register each of them once.

use std::sync::Arc;

use thiserror::Error;
use toolbridge_domain::tool::entities::ToolDefinition;
use tracing::info;

use super::register_tools::ToolRegistrar;
use crate::ports::document_parser::DocumentParserPort;
use crate::ports::host_error::HostError;
use crate::ports::navigator::NavigatorPort;

#[derive(Error, Debug)]
pub enum ScanPageError {
    #[error("Failed to load page: {0}")]
    Load(#[from] HostError),
}

pub struct ScanPageUseCase {
    navigator: Arc<dyn NavigatorPort>,
    parser: Arc<dyn DocumentParserPort>,
    registrar: Arc<ToolRegistrar>,
}

impl ScanPageUseCase {
    pub fn new(
        navigator: Arc<dyn NavigatorPort>,
        parser: Arc<dyn DocumentParserPort>,
        registrar: Arc<ToolRegistrar>,
    ) -> Self {
        Self {
            navigator,
            parser,
            registrar,
        }
    }

    pub async fn execute(&self) -> Result<Vec<ToolDefinition>, ScanPageError> {
        let loaded = self.navigator.document().await?;
        let document = self.parser.parse_document(&loaded.url, &loaded.html);
        let registered = self.registrar.register_document(&document);
        info!("Registered {} tools from {}", registered.len(), loaded.url);
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetch, MockFrameHost, MockNavigator, MockParser, MockSchema, MockStore};
    use toolbridge_domain::page::{AnnotatedElement, ButtonElement, LinkElement};

    #[tokio::test]
    async fn test_scan_registers_every_annotated_element() {
        let html = "<html>page</html>";
        let navigator = Arc::new(MockNavigator::with_document(html));
        let parser = Arc::new(MockParser::new().with_markup(
            html,
            vec![
                AnnotatedElement::Link(LinkElement::new("/a").with_tool("delete-a", "")),
                AnnotatedElement::Button(ButtonElement::new("Go").with_tool("go", "")),
            ],
        ));
        let registrar = ToolRegistrar::builder()
            .store(Arc::new(MockStore::default()))
            .schema(Arc::new(MockSchema))
            .frames(Arc::new(MockFrameHost::returning("")))
            .fetch(Arc::new(MockFetch::returning("")))
            .navigator(navigator.clone())
            .parser(parser.clone())
            .build()
            .unwrap();

        let scan = ScanPageUseCase::new(navigator, parser, Arc::new(registrar));
        let registered = scan.execute().await.unwrap();

        let names: Vec<_> = registered.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["delete-a", "go"]);
    }
}
