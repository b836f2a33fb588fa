//! Frame boundaries for aligning deliveries with the host's paint cycle.

use std::time::Duration;

use tokio::time::Instant;

/// Fixed-rate frame boundaries used to align deliveries with paint cycles.
///
/// Boundaries are multiples of the interval since the clock was created. A
/// zero interval degrades to yielding once to the scheduler.
#[derive(Debug, Clone)]
pub struct FrameClock {
	origin: Instant,
	interval: Duration,
}

impl FrameClock {
	/// Starts a clock at the current instant.
	pub fn new(interval: Duration) -> Self {
		Self {
			origin: Instant::now(),
			interval,
		}
	}

	/// Frame interval.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// First boundary strictly after `now`.
	pub fn next_boundary(&self, now: Instant) -> Instant {
		let interval_ns = self.interval.as_nanos().max(1);
		let elapsed_ns = now.saturating_duration_since(self.origin).as_nanos();
		let next_ns = (elapsed_ns / interval_ns + 1).saturating_mul(interval_ns);
		let offset = Duration::from_nanos(u64::try_from(next_ns).unwrap_or(u64::MAX));
		self.origin.checked_add(offset).unwrap_or(now + self.interval)
	}

	/// Waits for the next frame boundary.
	pub async fn next_frame(&self) {
		if self.interval.is_zero() {
			tokio::task::yield_now().await;
			return;
		}
		tokio::time::sleep_until(self.next_boundary(Instant::now())).await;
	}
}
