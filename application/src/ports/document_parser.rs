//! Document parser port
//!
//! Turns HTML into the owned page model and pulls the agent payload out
//! of response documents.

use toolbridge_domain::page::{AgentPayload, AnnotatedElement, PageDocument, PayloadError};
use url::Url;

pub trait DocumentParserPort: Send + Sync {
    /// Parse a full document into its annotated elements
    /// (forms, then links, then buttons).
    fn parse_document(&self, url: &Url, html: &str) -> PageDocument;

    /// Parse an inserted fragment: the root element itself and every
    /// annotated descendant, in document order.
    fn parse_fragment(&self, html: &str) -> Vec<AnnotatedElement>;

    /// Read the payload from the element with id `element_id`.
    ///
    /// `Ok(None)` when the element is absent; an error when it is present
    /// but does not hold JSON.
    fn extract_payload(
        &self,
        html: &str,
        element_id: &str,
    ) -> Result<Option<AgentPayload>, PayloadError>;
}
