//! Dynamic registration observer
//!
//! Consumes a stream of "element inserted" notifications and runs the
//! registration pipeline on every annotated element in each inserted
//! subtree. No reconciliation is attempted: re-inserting an element
//! registers it again, replacing the earlier entry of the same name.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::register_tools::ToolRegistrar;
use crate::ports::document_parser::DocumentParserPort;

/// A change to the live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomMutation {
    /// An element node was inserted; `html` is its outer HTML.
    Inserted { html: String },
}

pub struct MutationObserver {
    parser: Arc<dyn DocumentParserPort>,
    registrar: Arc<ToolRegistrar>,
}

impl MutationObserver {
    pub fn new(parser: Arc<dyn DocumentParserPort>, registrar: Arc<ToolRegistrar>) -> Self {
        Self { parser, registrar }
    }

    /// Register the annotated elements of one mutation. Returns how many
    /// tools were registered.
    pub fn handle(&self, mutation: &DomMutation) -> usize {
        match mutation {
            DomMutation::Inserted { html } => self
                .parser
                .parse_fragment(html)
                .iter()
                .filter_map(|element| self.registrar.register_element(element))
                .inspect(|definition| info!("Registered inserted tool '{}'", definition.name))
                .count(),
        }
    }

    /// Process mutations until the channel closes or `cancel` fires.
    /// Returns the total number of registrations.
    pub async fn run(
        &self,
        mut mutations: mpsc::Receiver<DomMutation>,
        cancel: CancellationToken,
    ) -> usize {
        let mut total = 0;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Mutation observer cancelled");
                    break;
                }
                next = mutations.recv() => match next {
                    Some(mutation) => total += self.handle(&mutation),
                    None => {
                        debug!("Mutation stream closed");
                        break;
                    }
                },
            }
        }
        total
    }
}
