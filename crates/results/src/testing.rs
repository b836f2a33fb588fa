//! Test doubles for the host collaborators.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::fetch::{FetchError, ResultFetcher, ResultStream};
use crate::status::{StatusKey, Translate};
use crate::types::{ListRole, ScrollMetrics};
use crate::view::{ItemRenderer, ResultView, Viewport};

#[derive(Debug, Default)]
pub(crate) struct ViewLog {
	pub status: String,
	pub items: Vec<String>,
	pub role: Option<ListRole>,
	pub clears: usize,
}

/// View that records every mutation; clones share one log.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingView {
	log: Arc<Mutex<ViewLog>>,
}

impl RecordingView {
	pub fn items(&self) -> Vec<String> {
		self.log.lock().items.clone()
	}

	pub fn status(&self) -> String {
		self.log.lock().status.clone()
	}

	pub fn role(&self) -> Option<ListRole> {
		self.log.lock().role
	}

	pub fn clears(&self) -> usize {
		self.log.lock().clears
	}

	/// Number of live clones sharing this view's log.
	pub fn handles(&self) -> usize {
		Arc::strong_count(&self.log)
	}
}

impl ResultView for RecordingView {
	type Node = String;

	fn set_status(&mut self, text: &str) {
		self.log.lock().status = text.to_string();
	}

	fn clear_list(&mut self) {
		let mut log = self.log.lock();
		log.items.clear();
		log.clears += 1;
	}

	fn append_item(&mut self, node: String) {
		self.log.lock().items.push(node);
	}

	fn set_list_role(&mut self, role: ListRole) {
		self.log.lock().role = Some(role);
	}
}

/// Renders string results verbatim.
#[derive(Debug, Default)]
pub(crate) struct Labels;

impl ItemRenderer<String> for Labels {
	type Node = String;

	fn render_item(&self, result: &String) -> String {
		result.clone()
	}
}

/// Viewport with geometry set directly by the test.
#[derive(Debug)]
pub(crate) struct StaticViewport {
	metrics: Mutex<ScrollMetrics>,
}

impl StaticViewport {
	pub fn new(metrics: ScrollMetrics) -> Arc<Self> {
		Arc::new(Self {
			metrics: Mutex::new(metrics),
		})
	}

	pub fn set(&self, metrics: ScrollMetrics) {
		*self.metrics.lock() = metrics;
	}
}

impl Viewport for StaticViewport {
	fn metrics(&self) -> ScrollMetrics {
		*self.metrics.lock()
	}
}

/// Viewport whose extent grows with the rows appended to a [`RecordingView`].
#[derive(Debug)]
pub(crate) struct ListViewport {
	view: RecordingView,
	row_height: u32,
	height: u32,
	offset: Mutex<u32>,
}

impl ListViewport {
	/// Two rows visible, ten units per row.
	pub fn new(view: &RecordingView) -> Arc<Self> {
		Arc::new(Self {
			view: view.clone(),
			row_height: 10,
			height: 20,
			offset: Mutex::new(0),
		})
	}

	pub fn scroll_to(&self, offset: u32) {
		*self.offset.lock() = offset;
	}
}

impl Viewport for ListViewport {
	fn metrics(&self) -> ScrollMetrics {
		let rows = u32::try_from(self.view.log.lock().items.len()).unwrap_or(u32::MAX);
		ScrollMetrics {
			offset: *self.offset.lock(),
			viewport: self.height,
			extent: rows.saturating_mul(self.row_height),
		}
	}
}

/// Stream of `"{prefix}-{index}"` labels.
#[derive(Debug)]
pub(crate) struct StubStream {
	prefix: String,
	count: usize,
	delay: Duration,
	fail_at: Option<usize>,
	gets: Mutex<Vec<usize>>,
}

impl StubStream {
	pub fn new(prefix: &str, count: usize) -> Self {
		Self {
			prefix: prefix.to_string(),
			count,
			delay: Duration::ZERO,
			fail_at: None,
			gets: Mutex::new(Vec::new()),
		}
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = delay;
		self
	}

	pub fn failing_at(mut self, index: usize) -> Self {
		self.fail_at = Some(index);
		self
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn gets(&self) -> Vec<usize> {
		self.gets.lock().clone()
	}

	pub fn labels(prefix: &str, range: std::ops::Range<usize>) -> Vec<String> {
		range.map(|index| format!("{prefix}-{index}")).collect()
	}
}

#[async_trait]
impl ResultStream for StubStream {
	type Item = String;

	fn count(&self) -> usize {
		self.count
	}

	async fn get(&self, index: usize) -> Result<String, FetchError> {
		assert!(index < self.count, "index {index} out of range for {}", self.count);
		self.gets.lock().push(index);
		if !self.delay.is_zero() {
			tokio::time::sleep(self.delay).await;
		}
		if self.fail_at == Some(index) {
			return Err(FetchError::Failed(format!("{}-{index} unavailable", self.prefix)));
		}
		Ok(format!("{}-{index}", self.prefix))
	}
}

/// Fetcher answering from a fixed table of result counts.
#[derive(Debug, Default)]
pub(crate) struct StubFetcher {
	counts: HashMap<String, usize>,
	latency: HashMap<String, Duration>,
	item_delay: HashMap<String, Duration>,
	failing: HashSet<String>,
	calls: Mutex<Vec<String>>,
}

impl StubFetcher {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, text: &str, count: usize) -> Self {
		self.counts.insert(text.to_string(), count);
		self
	}

	pub fn with_latency(mut self, text: &str, latency: Duration) -> Self {
		self.latency.insert(text.to_string(), latency);
		self
	}

	pub fn with_item_delay(mut self, text: &str, delay: Duration) -> Self {
		self.item_delay.insert(text.to_string(), delay);
		self
	}

	pub fn failing(mut self, text: &str) -> Self {
		self.failing.insert(text.to_string());
		self
	}

	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().clone()
	}
}

#[async_trait]
impl ResultFetcher for StubFetcher {
	type Stream = StubStream;

	async fn fetch(&self, text: &str) -> Result<Arc<StubStream>, FetchError> {
		assert!(!text.is_empty(), "fetcher must not see empty queries");
		self.calls.lock().push(text.to_string());
		if let Some(latency) = self.latency.get(text) {
			tokio::time::sleep(*latency).await;
		}
		if self.failing.contains(text) {
			return Err(FetchError::Failed(format!("{text} failed")));
		}
		let count = self.counts.get(text).copied().unwrap_or(0);
		let delay = self.item_delay.get(text).copied().unwrap_or_default();
		Ok(Arc::new(StubStream::new(text, count).with_delay(delay)))
	}
}

/// Translations that echo the key, making assertions independent of wording.
#[derive(Debug, Default)]
pub(crate) struct KeyEcho;

impl Translate for KeyEcho {
	fn translate(&self, key: StatusKey, count: Option<&str>) -> String {
		match count {
			Some(count) => format!("{}({count})", key.as_str()),
			None => key.as_str().to_string(),
		}
	}
}

pub(crate) async fn settle() {
	tokio::time::sleep(Duration::from_millis(1)).await;
}
