//! Configuration value objects for the domain layer
//!
//! [`BridgeSettings`] carries the wire conventions shared by the
//! registrar, the executors and the page host. [`ConfigIssue`] is the
//! structured shape every configuration check reports in.

mod settings;
mod validation;

pub use settings::BridgeSettings;
pub use validation::{ConfigIssue, ConfigIssueCode, Severity};
