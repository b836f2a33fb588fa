//! Incremental rendering of search results into a scrollable list.
//!
//! The crate turns a reactive query source into a paced, cancellable render:
//!
//! * [`QueryPipeline`]: de-duplicates and debounces queries, fetches with
//!   switch-latest semantics and delivers on frame boundaries.
//! * [`StatusPresenter`]: maps a result count to status text.
//! * [`IncrementalRenderer`]: appends results in index order, one batch ahead of
//!   the scroll position, and stops as soon as a newer stream takes over.
//! * [`ScrollGate`]: near-bottom detection with a single parked waiter.
//! * [`mount_search_result`]: wires the above to a host [`ResultView`].
//!
//! Fetching, item rendering, translations and the scroll container are host
//! collaborators described by the traits in [`fetch`], [`view`] and [`status`].

pub mod fetch;
pub mod frame;
pub mod gate;
pub mod memory;
pub mod mount;
pub mod pipeline;
pub mod render;
pub mod status;
pub mod types;
pub mod view;

#[cfg(test)]
mod testing;

pub use fetch::{FetchError, ResultFetcher, ResultStream};
pub use frame::FrameClock;
pub use gate::{GateWake, ScrollGate};
pub use memory::{Document, MemoryFetcher, MemoryStream};
pub use mount::{MountInputs, MountedSearchResult, SearchResultMount, mount_search_result};
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use render::{IncrementalRenderer, RenderOutcome};
pub use status::{Catalog, StatusKey, StatusPresenter, Translate, round_count};
pub use types::{ListRole, Query, ScrollMetrics, ViewportEvent};
pub use view::{ItemRenderer, ResultView, Viewport};
