//! Incremental, scroll-paced rendering of one result stream.
//!
//! # Mental model
//!
//! * The list region and the identity of the active render session live behind
//!   one lock ([`ListState`]). Starting a session swaps in a fresh
//!   [`GenerationToken`] and cancels the previous one.
//! * A session appends items in index order. Every `batch_size` items it parks
//!   on the [`ScrollGate`] until the viewer scrolls near the bottom.
//! * After every suspension point (gate wait, item fetch) the session compares
//!   its generation with the active one. On mismatch it returns without
//!   touching the view. The final comparison happens under the same lock as the
//!   append, so a superseded session can never interleave with its successor.
//!
//! # Failure modes
//!
//! * Superseded session: normal outcome, reported as [`RenderOutcome::Superseded`].
//! * `get(i)` failure: the session is abandoned, the rendered prefix stays, a
//!   warning is logged and [`RenderOutcome::Failed`] is returned.

use std::future::Future;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use sift_worker::{GenerationClock, GenerationToken};

use crate::fetch::{FetchError, ResultStream};
use crate::gate::{GateWake, ScrollGate};
use crate::view::{ItemRenderer, ResultView};

/// View plus the token of the session allowed to append to it.
pub(crate) struct ListState<V> {
	pub(crate) view: V,
	session: Option<GenerationToken>,
}

impl<V> ListState<V> {
	fn is_current(&self, generation: u64) -> bool {
		self.session.as_ref().is_some_and(|token| token.generation() == generation)
	}
}

/// How a render session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
	/// Every item of the stream was appended.
	Completed {
		/// Items appended by this session.
		rendered: usize,
	},
	/// A newer session took over; nothing further was appended.
	Superseded {
		/// Items appended before the takeover.
		rendered: usize,
	},
	/// An item fetch failed; the prefix stays in place.
	Failed {
		/// Items appended before the failure.
		rendered: usize,
		/// The fetch error.
		error: FetchError,
	},
}

struct RendererInner<V, I> {
	list: Mutex<ListState<V>>,
	items: Arc<I>,
	gate: Arc<ScrollGate>,
	clock: GenerationClock,
	batch_size: usize,
}

/// Renders result streams into a [`ResultView`] one batch at a time.
pub struct IncrementalRenderer<V, I> {
	inner: Arc<RendererInner<V, I>>,
}

impl<V, I> Clone for IncrementalRenderer<V, I> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<V, I> IncrementalRenderer<V, I>
where
	V: ResultView,
	I: Send + Sync + 'static,
{
	/// Creates a renderer owning `view`. A `batch_size` of zero is treated as one.
	pub fn new(view: V, items: Arc<I>, gate: Arc<ScrollGate>, batch_size: usize) -> Self {
		Self {
			inner: Arc::new(RendererInner {
				list: Mutex::new(ListState { view, session: None }),
				items,
				gate,
				clock: GenerationClock::new(),
				batch_size: batch_size.max(1),
			}),
		}
	}

	/// Runs `f` against the view.
	pub fn with_view<T>(&self, f: impl FnOnce(&V) -> T) -> T {
		f(&self.inner.list.lock().view)
	}

	/// Returns the generation of the active session, if any.
	pub fn current_generation(&self) -> Option<u64> {
		self.inner.list.lock().session.as_ref().map(GenerationToken::generation)
	}

	/// Invalidates the active session without starting a new one.
	pub fn supersede(&self) {
		let mut state = self.inner.list.lock();
		self.supersede_locked(&mut state);
	}

	/// Starts a session for `stream` and returns the future that renders it.
	///
	/// The new session becomes current when this is called, not when the
	/// future is first polled. Any earlier session stops at its next check.
	pub fn render<S>(&self, stream: Arc<S>) -> impl Future<Output = RenderOutcome> + Send + use<V, I, S>
	where
		S: ResultStream,
		I: ItemRenderer<S::Item, Node = V::Node>,
	{
		let session = {
			let mut state = self.inner.list.lock();
			self.begin_locked(&mut state)
		};
		self.clone().run(session, stream)
	}

	pub(crate) fn lock(&self) -> MutexGuard<'_, ListState<V>> {
		self.inner.list.lock()
	}

	pub(crate) fn begin_locked(&self, state: &mut ListState<V>) -> GenerationToken {
		self.supersede_locked(state);
		let token = self.inner.clock.token();
		tracing::debug!(generation = token.generation(), "render session started");
		state.session = Some(token.clone());
		token
	}

	pub(crate) fn supersede_locked(&self, state: &mut ListState<V>) {
		if let Some(previous) = state.session.take() {
			tracing::trace!(generation = previous.generation(), "render session superseded");
			previous.cancel();
		}
		self.inner.gate.release();
	}

	pub(crate) async fn run<S>(self, session: GenerationToken, stream: Arc<S>) -> RenderOutcome
	where
		S: ResultStream,
		I: ItemRenderer<S::Item, Node = V::Node>,
	{
		let generation = session.generation();
		let count = stream.count();
		let batch_size = self.inner.batch_size;
		let mut limit = batch_size;

		for index in 0..count {
			if index == limit {
				if !self.wait_for_viewer(&session).await {
					return superseded(generation, index);
				}
				limit += batch_size;
			}

			if !self.is_current(generation) {
				return superseded(generation, index);
			}

			let fetched = tokio::select! {
				biased;
				() = session.cancelled() => return superseded(generation, index),
				fetched = stream.get(index) => fetched,
			};

			let result = match fetched {
				Ok(result) => result,
				Err(error) => {
					tracing::warn!(generation, index, count, %error, "result fetch failed; abandoning render session");
					return RenderOutcome::Failed { rendered: index, error };
				}
			};

			let node = self.inner.items.render_item(&result);
			{
				let mut state = self.inner.list.lock();
				if !state.is_current(generation) {
					return superseded(generation, index);
				}
				state.view.append_item(node);
			}
		}

		tracing::debug!(generation, count, "render session complete");
		RenderOutcome::Completed { rendered: count }
	}

	fn is_current(&self, generation: u64) -> bool {
		self.inner.list.lock().is_current(generation)
	}

	/// Parks until the viewer is near the bottom. Returns false when the
	/// session was superseded meanwhile.
	async fn wait_for_viewer(&self, session: &GenerationToken) -> bool {
		loop {
			let wake = tokio::select! {
				biased;
				() = session.cancelled() => return false,
				wake = self.inner.gate.wait_near_bottom() => wake,
			};
			let current = self.is_current(session.generation());
			if wake == GateWake::NearBottom || !current {
				return current;
			}
		}
	}
}

fn superseded(generation: u64, rendered: usize) -> RenderOutcome {
	tracing::trace!(generation, rendered, "stale render session stopped");
	RenderOutcome::Superseded { rendered }
}

#[cfg(test)]
mod tests;
