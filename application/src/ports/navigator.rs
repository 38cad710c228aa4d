//! Navigator port
//!
//! The top-level page: where it is, what it holds, and how to move it.

use async_trait::async_trait;
use toolbridge_domain::page::ButtonElement;
use url::Url;

use super::frame_host::LoadedDocument;
use super::host_error::HostError;

#[async_trait]
pub trait NavigatorPort: Send + Sync {
    /// URL of the current top-level document.
    fn current_url(&self) -> Url;

    /// The current top-level document, loading it first if needed.
    async fn document(&self) -> Result<LoadedDocument, HostError>;

    /// Navigate the top-level page. Relative targets resolve against
    /// [`current_url`](Self::current_url).
    async fn navigate(&self, target: &str) -> Result<(), HostError>;

    /// Reload the current page.
    async fn reload(&self) -> Result<(), HostError>;

    /// Activate a button that belongs to no form.
    async fn click(&self, button: &ButtonElement) -> Result<(), HostError>;
}
