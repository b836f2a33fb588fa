//! In-memory fetcher over a fixed document set.
//!
//! Matches are case-insensitive substring hits on title or text, kept in
//! corpus order. Optional latencies simulate a slow backend.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::fetch::{FetchError, ResultFetcher, ResultStream};

/// One searchable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	/// Where the document lives, e.g. a URL or path.
	pub location: String,
	/// Document title.
	pub title: String,
	/// Body text.
	pub text: String,
}

impl Document {
	/// Creates a document.
	pub fn new(location: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
		Self {
			location: location.into(),
			title: title.into(),
			text: text.into(),
		}
	}

	fn matches(&self, needle: &str) -> bool {
		self.title.to_lowercase().contains(needle) || self.text.to_lowercase().contains(needle)
	}
}

/// Fetcher backed by a document slice.
#[derive(Debug, Clone)]
pub struct MemoryFetcher {
	documents: Arc<[Document]>,
	fetch_latency: Duration,
	item_latency: Duration,
}

impl MemoryFetcher {
	/// Creates a fetcher over `documents` with no artificial latency.
	pub fn new(documents: impl Into<Arc<[Document]>>) -> Self {
		Self {
			documents: documents.into(),
			fetch_latency: Duration::ZERO,
			item_latency: Duration::ZERO,
		}
	}

	/// Delays every fetch by `latency`.
	pub fn with_fetch_latency(mut self, latency: Duration) -> Self {
		self.fetch_latency = latency;
		self
	}

	/// Delays every item lookup by `latency`.
	pub fn with_item_latency(mut self, latency: Duration) -> Self {
		self.item_latency = latency;
		self
	}
}

/// Matches of one [`MemoryFetcher`] query.
#[derive(Debug)]
pub struct MemoryStream {
	matches: Arc<[Document]>,
	item_latency: Duration,
}

#[async_trait]
impl ResultStream for MemoryStream {
	type Item = Document;

	fn count(&self) -> usize {
		self.matches.len()
	}

	async fn get(&self, index: usize) -> Result<Document, FetchError> {
		debug_assert!(index < self.matches.len(), "result index derived from count");
		if !self.item_latency.is_zero() {
			tokio::time::sleep(self.item_latency).await;
		}
		self.matches.get(index).cloned().ok_or(FetchError::OutOfRange {
			index,
			count: self.matches.len(),
		})
	}
}

#[async_trait]
impl ResultFetcher for MemoryFetcher {
	type Stream = MemoryStream;

	async fn fetch(&self, text: &str) -> Result<Arc<MemoryStream>, FetchError> {
		if !self.fetch_latency.is_zero() {
			tokio::time::sleep(self.fetch_latency).await;
		}
		let needle = text.to_lowercase();
		let matches: Vec<Document> = self.documents.iter().filter(|doc| doc.matches(&needle)).cloned().collect();
		tracing::trace!(query = text, count = matches.len(), corpus = self.documents.len(), "memory fetch");
		Ok(Arc::new(MemoryStream {
			matches: matches.into(),
			item_latency: self.item_latency,
		}))
	}
}
