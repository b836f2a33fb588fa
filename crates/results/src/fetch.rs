//! Result fetching contracts.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a fetcher or a result stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The backend could not produce the requested data.
	#[error("fetch failed: {0}")]
	Failed(String),
	/// An index outside `0..count` was requested.
	#[error("index {index} out of range for {count} results")]
	OutOfRange {
		/// Requested index.
		index: usize,
		/// Number of results in the stream.
		count: usize,
	},
}

/// Results of one fetch: a fixed count and an indexed async accessor.
///
/// `get` may be called in any order and repeatedly for the same index.
#[async_trait]
pub trait ResultStream: Send + Sync + 'static {
	/// Result record type.
	type Item: Send + 'static;

	/// Total number of results.
	fn count(&self) -> usize;

	/// Loads the result at `index`.
	async fn get(&self, index: usize) -> Result<Self::Item, FetchError>;
}

/// Produces a result stream for a non-empty query text.
#[async_trait]
pub trait ResultFetcher: Send + Sync + 'static {
	/// Stream type produced by this fetcher.
	type Stream: ResultStream;

	/// Runs the query. Never called with empty text.
	async fn fetch(&self, text: &str) -> Result<Arc<Self::Stream>, FetchError>;
}
