//! Tool registry and schema adapters

mod registry;
mod schema;

pub use registry::InMemoryToolStore;
pub use schema::JsonSchemaToolConverter;
