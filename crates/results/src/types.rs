/// One value emitted by the query source.
///
/// Only `value` takes part in de-duplication; other fields ride along.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
	/// Free-text search input.
	pub value: String,
	/// Whether the search input currently has focus.
	pub focus: bool,
}

impl Query {
	/// Creates an unfocused query with the given text.
	pub fn new(value: impl Into<String>) -> Self {
		Self {
			value: value.into(),
			focus: false,
		}
	}

	/// Returns the same query with focus set.
	pub fn focused(mut self, focus: bool) -> Self {
		self.focus = focus;
		self
	}
}

/// Accessibility role of the list region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
	/// Search is active; the list is exposed to assistive technology.
	List,
	/// Search is inactive; the list is presentational only.
	Presentation,
}

impl ListRole {
	/// Role for the given search-active state.
	pub const fn for_active(active: bool) -> Self {
		if active { Self::List } else { Self::Presentation }
	}

	/// Attribute value for the role.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::List => "list",
			Self::Presentation => "presentation",
		}
	}
}

/// Snapshot of the scroll container geometry, in scroll units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollMetrics {
	/// Current scroll offset from the top.
	pub offset: u32,
	/// Visible height of the container.
	pub viewport: u32,
	/// Total scrollable height of the content.
	pub extent: u32,
}

impl ScrollMetrics {
	/// True when the visible window plus `threshold` reaches the end of the content.
	pub fn is_near_bottom(&self, threshold: u32) -> bool {
		self.offset.saturating_add(self.viewport).saturating_add(threshold) >= self.extent
	}
}

/// Events that can move the visible window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
	/// The container scrolled.
	Scroll,
	/// The window or container was resized.
	Resize,
}
