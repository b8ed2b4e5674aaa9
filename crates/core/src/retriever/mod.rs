//! Retriever module for fetching a collection's source content.
//!
//! Retrieval itself is delegated to an external program; this module only
//! owns the invocation contract: the command is given the collection id and
//! the target directory, populates the target directory, and signals success
//! through its exit status.

mod command;
mod config;
mod error;
mod traits;
mod types;

pub use command::CommandRetriever;
pub use config::RetrieverConfig;
pub use error::RetrieverError;
pub use traits::Retriever;
pub use types::{RetrievalJob, RetrievalResult};
