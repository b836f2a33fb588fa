//! Scroll pacing gate.
//!
//! The gate answers "is the viewer close to the end of the list?" and lets one
//! waiter suspend until the answer becomes yes. Scroll and resize events are
//! pushed in through [`ScrollGate::handle_event`].
//!
//! # Invariants
//!
//! * At most one waiter slot exists. Registering a new waiter displaces the old
//!   one, which wakes with [`GateWake::Released`].
//! * A satisfying event fires and clears the slot exactly once.
//! * Geometry is never read while the waiter slot is locked. A waiter re-checks
//!   the geometry after registering, so an event racing the registration is not
//!   lost.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::types::ViewportEvent;
use crate::view::Viewport;

/// Why a gate wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateWake {
	/// The surface is scrolled near its bottom edge.
	NearBottom,
	/// The waiter slot was taken over or released before the condition held.
	Released,
}

/// Tracks proximity to the bottom edge and parks a single waiter.
pub struct ScrollGate {
	viewport: Arc<dyn Viewport>,
	threshold: u32,
	waiter: Mutex<Option<oneshot::Sender<()>>>,
}

impl std::fmt::Debug for ScrollGate {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ScrollGate")
			.field("threshold", &self.threshold)
			.field("waiting", &self.has_waiter())
			.finish()
	}
}

impl ScrollGate {
	/// Creates a gate over `viewport` with the given slack.
	pub fn new(viewport: Arc<dyn Viewport>, threshold: u32) -> Self {
		Self {
			viewport,
			threshold,
			waiter: Mutex::new(None),
		}
	}

	/// True when offset plus visible height plus slack reaches the content extent.
	pub fn is_near_bottom(&self) -> bool {
		self.viewport.metrics().is_near_bottom(self.threshold)
	}

	/// Returns true while a waiter is parked.
	pub fn has_waiter(&self) -> bool {
		self.waiter.lock().is_some()
	}

	/// Resolves immediately when near the bottom; otherwise parks until a
	/// scroll or resize event satisfies the condition.
	pub async fn wait_near_bottom(&self) -> GateWake {
		if self.is_near_bottom() {
			return GateWake::NearBottom;
		}

		let (tx, rx) = oneshot::channel();
		if self.waiter.lock().replace(tx).is_some() {
			tracing::trace!("scroll gate waiter displaced");
		}
		self.wake_if_near_bottom();

		match rx.await {
			Ok(()) => GateWake::NearBottom,
			Err(_) => GateWake::Released,
		}
	}

	/// Handles a scroll or resize event, waking the parked waiter when the
	/// surface is now near its bottom edge.
	pub fn handle_event(&self, event: ViewportEvent) {
		if self.wake_if_near_bottom() {
			tracing::trace!(?event, "scroll gate unblocked");
		}
	}

	fn wake_if_near_bottom(&self) -> bool {
		if !self.has_waiter() || !self.is_near_bottom() {
			return false;
		}
		match self.waiter.lock().take() {
			Some(tx) => tx.send(()).is_ok(),
			None => false,
		}
	}

	/// Drops the parked waiter, if any. It wakes with [`GateWake::Released`].
	pub fn release(&self) {
		if self.waiter.lock().take().is_some() {
			tracing::trace!("scroll gate released");
		}
	}
}
