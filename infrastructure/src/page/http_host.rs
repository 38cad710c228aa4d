//! HTTP page host
//!
//! Headless stand-in for the browser tab the bridge runs in. One
//! [`HttpPageHost`] implements every page-facing port:
//!
//! - [`NavigatorPort`]: the top-level document, loaded with `reqwest`
//! - [`FrameHostPort`]: navigation surfaces; submitting into a surface
//!   performs the form submission and hands back the response document
//! - [`FetchPort`]: direct fetches, credentialed only for the page's origin
//!
//! A cookie jar shared by the page, its surfaces and same-origin fetches
//! plays the part of the browser's credentials.

use std::collections::HashSet;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use tokio::sync::watch;
use toolbridge_application::ports::fetch::{CredentialsMode, FetchPort, FetchRequest, FetchResponse};
use toolbridge_application::ports::frame_host::{FrameHostPort, LoadedDocument, SurfaceId};
use toolbridge_application::ports::host_error::HostError;
use toolbridge_application::ports::navigator::NavigatorPort;
use toolbridge_domain::page::{ButtonElement, FormElement, FormMethod, same_origin};
use tracing::{debug, trace};
use url::Url;

use crate::config::FileHttpConfig;

struct PageState {
    url: Url,
    html: Option<String>,
}

pub struct HttpPageHost {
    /// Carries the cookie jar
    client: Client,
    /// Never sends cookies
    anonymous: Client,
    page: RwLock<PageState>,
    surfaces: Mutex<HashSet<SurfaceId>>,
    navigations: watch::Sender<u64>,
}

impl HttpPageHost {
    /// A host whose page starts at `start`. Nothing is loaded until the
    /// document is first requested.
    pub fn new(start: Url, config: &FileHttpConfig) -> Result<Self, HostError> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()
            .map_err(|e| HostError::Other(format!("Failed to build HTTP client: {}", e)))?;
        let anonymous = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()
            .map_err(|e| HostError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            anonymous,
            page: RwLock::new(PageState {
                url: start,
                html: None,
            }),
            surfaces: Mutex::new(HashSet::new()),
            navigations: watch::channel(0).0,
        })
    }

    /// Notified with a running count after every top-level load.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.navigations.subscribe()
    }

    /// Load `url` as the new top-level document.
    async fn load(&self, url: Url) -> Result<LoadedDocument, HostError> {
        debug!("Loading page {}", url);
        let response = self.client.get(url).send().await.map_err(request_failure)?;
        let loaded = read_document(response).await?;

        {
            let mut page = self.page.write().unwrap_or_else(|p| p.into_inner());
            page.url = loaded.url.clone();
            page.html = Some(loaded.html.clone());
        }
        self.navigations.send_modify(|n| *n += 1);
        Ok(loaded)
    }

    fn has_surface(&self, id: &SurfaceId) -> bool {
        self.surfaces
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .contains(id)
    }
}

#[async_trait]
impl NavigatorPort for HttpPageHost {
    fn current_url(&self) -> Url {
        self.page.read().unwrap_or_else(|p| p.into_inner()).url.clone()
    }

    async fn document(&self) -> Result<LoadedDocument, HostError> {
        let cached = {
            let page = self.page.read().unwrap_or_else(|p| p.into_inner());
            page.html.clone().map(|html| LoadedDocument {
                url: page.url.clone(),
                html,
            })
        };
        match cached {
            Some(document) => Ok(document),
            None => self.load(self.current_url()).await,
        }
    }

    async fn navigate(&self, target: &str) -> Result<(), HostError> {
        let url = self
            .current_url()
            .join(target)
            .map_err(|e| HostError::InvalidUrl(format!("{}: {}", target, e)))?;
        self.load(url).await.map(|_| ())
    }

    async fn reload(&self) -> Result<(), HostError> {
        self.load(self.current_url()).await.map(|_| ())
    }

    async fn click(&self, button: &ButtonElement) -> Result<(), HostError> {
        // Without a form and without script there is no default action
        debug!("Clicked button '{}' (no default action)", button.text);
        Ok(())
    }
}

#[async_trait]
impl FrameHostPort for HttpPageHost {
    async fn open_surface(&self, id: &SurfaceId) -> Result<(), HostError> {
        let mut surfaces = self.surfaces.lock().unwrap_or_else(|p| p.into_inner());
        if !surfaces.insert(id.clone()) {
            return Err(HostError::SurfaceExists(id.to_string()));
        }
        trace!("Opened surface {}", id);
        Ok(())
    }

    async fn submit(&self, id: &SurfaceId, form: &FormElement) -> Result<LoadedDocument, HostError> {
        if !self.has_surface(id) {
            return Err(HostError::SurfaceNotFound(id.to_string()));
        }
        let mut url = form
            .submission_url(&self.current_url())
            .map_err(|e| HostError::InvalidUrl(e.to_string()))?;
        let data = form.form_data();

        let request = match form.method {
            FormMethod::Post => self.client.post(url).form(&data),
            FormMethod::Get => {
                // The action's own query (agent=true) survives
                url.query_pairs_mut().extend_pairs(&data);
                self.client.get(url)
            }
        };
        debug!("Submitting form into {}", id);
        let response = request.send().await.map_err(request_failure)?;
        read_document(response).await
    }

    fn close_surface(&self, id: &SurfaceId) {
        if self
            .surfaces
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(id)
        {
            trace!("Closed surface {}", id);
        }
    }

    fn open_surfaces(&self) -> usize {
        self.surfaces.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

#[async_trait]
impl FetchPort for HttpPageHost {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, HostError> {
        let credentialed = request.credentials == CredentialsMode::SameOrigin
            && same_origin(&request.url, &self.current_url());
        let client = if credentialed { &self.client } else { &self.anonymous };

        let method = match request.method {
            FormMethod::Get => Method::GET,
            FormMethod::Post => Method::POST,
        };
        let mut builder = client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        debug!(
            "Fetching {} {} (credentials: {})",
            request.method.as_str(),
            request.url,
            credentialed
        );
        let response = builder.send().await.map_err(request_failure)?;
        let status = response.status().as_u16();
        let document = read_document(response).await?;
        Ok(FetchResponse {
            url: document.url,
            status,
            body: document.html,
        })
    }
}

/// Error statuses still carry a document, as in a browser frame.
async fn read_document(response: Response) -> Result<LoadedDocument, HostError> {
    let url = response.url().clone();
    let html = response.text().await.map_err(request_failure)?;
    Ok(LoadedDocument { url, html })
}

fn request_failure(error: reqwest::Error) -> HostError {
    if error.is_timeout() {
        HostError::Timeout
    } else {
        HostError::Network(error.to_string())
    }
}
