/// Execution classes attached to spawned tasks for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Latency-sensitive work that directly affects what the user sees.
	Interactive,
	/// Work that can lag behind input, such as fetches and paced rendering.
	Background,
}

impl TaskClass {
	/// Stable label used in tracing fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
		}
	}
}
