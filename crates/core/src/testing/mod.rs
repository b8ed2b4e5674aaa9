//! Testing utilities and mock implementations for lifecycle tests.
//!
//! The mocks stand in for the two external programs, while still writing
//! real files so staging and promotion run against an actual filesystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use aggregator_core::testing::{MockAggregator, MockRetriever};
//!
//! let retriever = MockRetriever::new();
//! retriever.set_files(vec![("a.txt".to_string(), b"content".to_vec())]).await;
//!
//! let aggregator = MockAggregator::new();
//! // Default behavior copies the input directory into staging unchanged.
//! ```

mod mock_aggregator;
mod mock_retriever;

pub use mock_aggregator::{MockAggregator, MockAggregatorBehavior, RecordedAggregation};
pub use mock_retriever::{MockRetriever, RecordedRetrieval};
