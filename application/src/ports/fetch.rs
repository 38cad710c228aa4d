//! Fetch port
//!
//! Direct network requests made on behalf of link and button tools.

use async_trait::async_trait;
use toolbridge_domain::page::FormMethod;
use url::Url;

use super::host_error::HostError;

/// Which requests carry the page's credentials (cookies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Only requests to the page's own origin
    #[default]
    SameOrigin,
    /// Never
    Omit,
}

/// A request issued through [`FetchPort`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: Url,
    pub method: FormMethod,
    pub headers: Vec<(String, String)>,
    /// URL-encoded form body
    pub form: Option<Vec<(String, String)>>,
    pub credentials: CredentialsMode,
}

impl FetchRequest {
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: FormMethod::Get,
            headers: Vec::new(),
            form: None,
            credentials: CredentialsMode::SameOrigin,
        }
    }

    pub fn post_form(url: Url, form: Vec<(String, String)>) -> Self {
        Self {
            method: FormMethod::Post,
            form: Some(form),
            ..Self::get(url)
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response to a [`FetchRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub url: Url,
    pub status: u16,
    pub body: String,
}

/// Port for direct fetches.
#[async_trait]
pub trait FetchPort: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, HostError>;
}
