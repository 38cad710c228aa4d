//! Document watcher
//!
//! Turns a page that can only be polled into a stream of "element
//! inserted" notifications for the mutation observer. Each poll diffs the
//! annotated elements (`[tool-name]`) against the previous poll by outer
//! HTML; every new one is reported once.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use scraper::{ElementRef, Html, Selector};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use toolbridge_application::ports::host_error::HostError;
use toolbridge_application::ports::navigator::NavigatorPort;
use toolbridge_application::use_cases::observe_mutations::DomMutation;
use tracing::{debug, warn};

static ANNOTATED: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("form[tool-name], a[tool-name], button[tool-name]").expect("static selector")
});

/// Annotated elements seen on the last poll, keyed by outer HTML.
#[derive(Debug, Default)]
pub struct DocumentDiff {
    seen: HashSet<String>,
}

impl DocumentDiff {
    /// A diff primed with `html`, whose elements count as already seen.
    pub fn new(html: &str) -> Self {
        let mut diff = Self::default();
        diff.update(html);
        diff
    }

    /// Record the annotated elements of `html` and return the outer HTML of
    /// each inserted subtree.
    ///
    /// A new button is reported through its enclosing form so the
    /// fragment keeps the form it submits. Subtrees nested in another
    /// reported subtree are folded into it.
    pub fn update(&mut self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let annotated: Vec<ElementRef<'_>> = document.select(&ANNOTATED).collect();
        let current: HashSet<String> = annotated.iter().map(|e| e.html()).collect();

        let mut roots: Vec<ElementRef<'_>> = Vec::new();
        for element in annotated.iter().filter(|e| !self.seen.contains(&e.html())) {
            let root = match element.value().name() {
                "button" => enclosing_form(*element).unwrap_or(*element),
                _ => *element,
            };
            if !roots.iter().any(|r| r.id() == root.id()) {
                roots.push(root);
            }
        }
        let ids: HashSet<_> = roots.iter().map(|r| r.id()).collect();
        let inserted = roots
            .iter()
            .filter(|root| !root.ancestors().any(|a| ids.contains(&a.id())))
            .map(|root| root.html())
            .collect();

        self.seen = current;
        inserted
    }
}

fn enclosing_form(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form")
}

/// Polls the page and reports inserted annotated elements.
pub struct DocumentWatcher {
    navigator: Arc<dyn NavigatorPort>,
    interval: Duration,
}

impl DocumentWatcher {
    pub fn new(navigator: Arc<dyn NavigatorPort>, interval: Duration) -> Self {
        Self { navigator, interval }
    }

    /// Poll every `interval`, and after each navigation announced on
    /// `navigations`, until `cancel` fires or the receiver goes away.
    ///
    /// The current document is the baseline: its elements are assumed to
    /// be registered already.
    pub async fn run(
        &self,
        mut navigations: watch::Receiver<u64>,
        mutations: mpsc::Sender<DomMutation>,
        cancel: CancellationToken,
    ) -> Result<(), HostError> {
        let baseline = self.navigator.document().await?;
        let mut diff = DocumentDiff::new(&baseline.html);
        navigations.borrow_and_update();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.navigator.reload().await {
                        warn!("Polling {} failed: {}", self.navigator.current_url(), e);
                        continue;
                    }
                    // Our own reload is not a navigation worth a second pass
                    navigations.borrow_and_update();
                }
                changed = navigations.changed() => {
                    if changed.is_err() {
                        debug!("Navigation notifications ended");
                        break;
                    }
                    navigations.borrow_and_update();
                }
            }

            let document = match self.navigator.document().await {
                Ok(document) => document,
                Err(e) => {
                    warn!("Reading {} failed: {}", self.navigator.current_url(), e);
                    continue;
                }
            };
            for html in diff.update(&document.html) {
                debug!("Annotated subtree inserted on {}", document.url);
                if mutations.send(DomMutation::Inserted { html }).await.is_err() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }
}
