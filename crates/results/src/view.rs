//! Host-side collaborators: the mount point, item rendering and scroll geometry.

use crate::types::{ListRole, ScrollMetrics};

/// Live geometry of the scroll container that hosts the result list.
pub trait Viewport: Send + Sync + 'static {
	/// Reads the current geometry.
	fn metrics(&self) -> ScrollMetrics;
}

/// Mount point with a status region and a list region.
pub trait ResultView: Send + 'static {
	/// Displayable unit appended to the list region.
	type Node: Send + 'static;

	/// Replaces the text of the status region.
	fn set_status(&mut self, text: &str);

	/// Removes every item from the list region.
	fn clear_list(&mut self);

	/// Appends one item to the end of the list region.
	fn append_item(&mut self, node: Self::Node);

	/// Sets the accessibility role of the list region.
	fn set_list_role(&mut self, role: ListRole);
}

/// Pure mapping from one result record to a displayable unit.
pub trait ItemRenderer<R>: Send + Sync + 'static {
	/// Output node type.
	type Node;

	/// Builds the node for `result`.
	fn render_item(&self, result: &R) -> Self::Node;
}
