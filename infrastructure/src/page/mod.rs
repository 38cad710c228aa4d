//! Page adapters: HTML parsing, the HTTP page host and the document watcher

mod http_host;
mod parser;
mod watcher;

pub use http_host::HttpPageHost;
pub use parser::ScraperDocumentParser;
pub use watcher::{DocumentDiff, DocumentWatcher};
