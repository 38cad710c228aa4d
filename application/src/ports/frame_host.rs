//! Frame host port
//!
//! A navigation surface is an off-screen target a form can be submitted
//! into without navigating the visible page. Each form invocation opens
//! its own surface, submits a cloned form into it and reads the loaded
//! document back.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use toolbridge_domain::page::FormElement;
use url::Url;

use super::host_error::HostError;

static SURFACE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique name of a navigation surface: `tool-frame-<millis>-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// A fresh name, unique within the process.
    ///
    /// The millisecond timestamp alone collides when two invocations start
    /// in the same millisecond, so a process-wide counter is appended.
    pub fn next() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let n = SURFACE_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("tool-frame-{}-{}", millis, n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document loaded into a surface or the top-level page.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// Final URL after redirects
    pub url: Url,
    pub html: String,
}

/// Port for out-of-band form submission.
#[async_trait]
pub trait FrameHostPort: Send + Sync {
    /// Attach a new surface under `id`.
    async fn open_surface(&self, id: &SurfaceId) -> Result<(), HostError>;

    /// Submit `form` into the surface and wait for it to finish loading.
    ///
    /// The form's `action` is already absolute and its `target` names the
    /// surface.
    async fn submit(&self, id: &SurfaceId, form: &FormElement)
    -> Result<LoadedDocument, HostError>;

    /// Detach the surface and the form attached to it. Closing an unknown
    /// or already closed surface is a no-op.
    fn close_surface(&self, id: &SurfaceId);

    /// Number of surfaces currently attached.
    fn open_surfaces(&self) -> usize;
}

/// Closes its surface when dropped, whichever way the invocation ends.
pub struct SurfaceGuard {
    host: Arc<dyn FrameHostPort>,
    id: SurfaceId,
}

impl SurfaceGuard {
    pub fn new(host: Arc<dyn FrameHostPort>, id: SurfaceId) -> Self {
        Self { host, id }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }
}

impl Drop for SurfaceGuard {
    fn drop(&mut self) {
        self.host.close_surface(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_surface_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| SurfaceId::next()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_surface_id_format() {
        let id = SurfaceId::next();
        assert!(id.as_str().starts_with("tool-frame-"));
        assert_eq!(id.as_str().split('-').count(), 4);
    }
}
