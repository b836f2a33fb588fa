//! Terminal stand-ins for the host view and scroll container.
//!
//! Rows are printed as they are appended. The viewport counts rendered rows
//! and measures everything in [`ROW_HEIGHT`] units so the scroll threshold
//! keeps its usual meaning.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use sift_results::{Document, ItemRenderer, ListRole, ResultView, ScrollMetrics, Viewport};

/// Height of one printed row in viewport units.
pub const ROW_HEIGHT: u32 = 20;

/// Writes status and result rows to `out`.
#[derive(Debug)]
pub struct TerminalView<W> {
	out: W,
	rows: Arc<AtomicU32>,
}

impl<W: Write> TerminalView<W> {
	/// Creates a view sharing its row count with a [`LineViewport`].
	pub fn new(out: W, viewport: &LineViewport) -> Self {
		Self {
			out,
			rows: Arc::clone(&viewport.rows),
		}
	}

	#[cfg(test)]
	pub fn into_inner(self) -> W {
		self.out
	}

	fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
		if let Err(error) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
			tracing::warn!(%error, "terminal write failed");
		}
	}
}

impl<W: Write + Send + 'static> ResultView for TerminalView<W> {
	type Node = String;

	fn set_status(&mut self, text: &str) {
		self.write_line(format_args!("== {text}"));
	}

	fn clear_list(&mut self) {
		self.rows.store(0, Ordering::Release);
	}

	fn append_item(&mut self, node: String) {
		let row = self.rows.fetch_add(1, Ordering::AcqRel) + 1;
		self.write_line(format_args!("{row:>4}  {node}"));
	}

	fn set_list_role(&mut self, role: ListRole) {
		tracing::debug!(role = role.as_str(), "list role changed");
	}
}

/// Scroll container whose extent follows the rows printed so far.
#[derive(Debug)]
pub struct LineViewport {
	rows: Arc<AtomicU32>,
	offset_rows: AtomicU32,
	height_rows: AtomicU32,
}

impl LineViewport {
	/// Creates a viewport showing `height_rows` rows at once.
	pub fn new(height_rows: u32) -> Arc<Self> {
		Arc::new(Self {
			rows: Arc::new(AtomicU32::new(0)),
			offset_rows: AtomicU32::new(0),
			height_rows: AtomicU32::new(height_rows.max(1)),
		})
	}

	/// Scrolls so that `row` is the first visible row.
	pub fn scroll_to(&self, row: u32) {
		self.offset_rows.store(row, Ordering::Release);
	}

	/// Changes the number of visible rows.
	pub fn resize(&self, height_rows: u32) {
		self.height_rows.store(height_rows.max(1), Ordering::Release);
	}

	/// Rows rendered so far.
	pub fn rows(&self) -> u32 {
		self.rows.load(Ordering::Acquire)
	}
}

impl Viewport for LineViewport {
	fn metrics(&self) -> ScrollMetrics {
		ScrollMetrics {
			offset: self.offset_rows.load(Ordering::Acquire).saturating_mul(ROW_HEIGHT),
			viewport: self.height_rows.load(Ordering::Acquire).saturating_mul(ROW_HEIGHT),
			extent: self.rows().saturating_mul(ROW_HEIGHT),
		}
	}
}

/// Formats a document as `title (location)`.
#[derive(Debug, Default)]
pub struct DocumentRow;

impl ItemRenderer<Document> for DocumentRow {
	type Node = String;

	fn render_item(&self, result: &Document) -> String {
		format!("{} ({})", result.title, result.location)
	}
}
