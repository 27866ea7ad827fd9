mod confluence;
mod error;
mod health;
mod index;
mod ingest;
mod knowledge_base;
mod query;

pub use confluence::confluence_ingest_handler;
pub use error::ErrorResponse;
pub use health::health_handler;
pub use index::index_handler;
pub use ingest::ingest_handler;
pub use knowledge_base::{clear_knowledge_base_handler, knowledge_base_handler};
pub use query::{EMPTY_QUESTION_MESSAGE, query_handler};
