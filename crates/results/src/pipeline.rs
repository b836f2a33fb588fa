//! Debounced, de-duplicated, switch-latest query pipeline.
//!
//! # Data flow
//!
//! 1. A query whose `value` equals the previous one is ignored.
//! 2. Accepted queries restart the debounce timer; only the last one standing
//!    when the timer fires is dispatched.
//!    An accepted query also cancels the in-flight fetch, whose result can no
//!    longer be delivered.
//! 3. Dispatch spawns a fetch tagged with a fresh generation. Empty text
//!    resolves to [`QueryOutcome::NoQuery`] without calling the fetcher.
//! 4. The fetch task waits for the next frame boundary, then reports back.
//! 5. Reports whose generation is not the latest dispatched one are dropped;
//!    the rest are handed to the delivery callback in settle order.
//!
//! # Lifecycle
//!
//! `run` returns when `shutdown` fires, or once the query source has closed
//! and any pending or in-flight work has been delivered.

use std::sync::Arc;
use std::time::Duration;

use sift_config::ResultsConfig;
use sift_worker::{GenerationClock, GenerationToken, TaskClass};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchError, ResultFetcher, ResultStream};
use crate::frame::FrameClock;
use crate::types::Query;

/// What the pipeline delivers downstream for one settled query.
#[derive(Debug)]
pub enum QueryOutcome<S> {
	/// The query text was empty; no fetch was made.
	NoQuery,
	/// The fetch produced a result stream.
	Results(Arc<S>),
	/// The fetch failed.
	Failed(FetchError),
}

impl<S: ResultStream> QueryOutcome<S> {
	/// Count shown in the status region; `None` when no query was issued.
	/// Failed fetches count as zero matches.
	pub fn count(&self) -> Option<usize> {
		match self {
			Self::NoQuery => None,
			Self::Results(stream) => Some(stream.count()),
			Self::Failed(_) => Some(0),
		}
	}
}

struct Settled<S> {
	generation: u64,
	outcome: QueryOutcome<S>,
}

/// Turns a stream of queries into a stream of fetch outcomes.
pub struct QueryPipeline<F> {
	fetcher: Arc<F>,
	debounce: Duration,
	frames: FrameClock,
	clock: GenerationClock,
}

impl<F: ResultFetcher> QueryPipeline<F> {
	/// Creates a pipeline with an explicit debounce window and frame clock.
	pub fn new(fetcher: Arc<F>, debounce: Duration, frames: FrameClock) -> Self {
		Self {
			fetcher,
			debounce,
			frames,
			clock: GenerationClock::new(),
		}
	}

	/// Creates a pipeline from configuration.
	pub fn from_config(fetcher: Arc<F>, config: &ResultsConfig) -> Self {
		Self::new(fetcher, config.debounce(), FrameClock::new(config.frame_interval()))
	}

	/// Processes `queries` until shutdown, calling `deliver` for each surviving outcome.
	pub async fn run<D>(self, mut queries: mpsc::UnboundedReceiver<Query>, shutdown: CancellationToken, mut deliver: D)
	where
		D: FnMut(QueryOutcome<F::Stream>) + Send,
	{
		let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled<F::Stream>>();
		let mut last_value: Option<String> = None;
		let mut pending: Option<Query> = None;
		let mut in_flight: Option<GenerationToken> = None;
		let mut input_open = true;

		let debounce = tokio::time::sleep(self.debounce);
		tokio::pin!(debounce);

		loop {
			if !input_open && pending.is_none() && in_flight.is_none() {
				tracing::debug!("query source drained");
				break;
			}

			tokio::select! {
				biased;
				() = shutdown.cancelled() => break,
				query = queries.recv(), if input_open => match query {
					Some(query) => {
						if last_value.as_deref() == Some(query.value.as_str()) {
							tracing::trace!(query = %query.value, "duplicate query ignored");
							continue;
						}
						last_value = Some(query.value.clone());
						if let Some(previous) = in_flight.take() {
							tracing::trace!(generation = previous.generation(), "in-flight query superseded by new input");
							previous.cancel();
						}
						pending = Some(query);
						debounce.as_mut().reset(Instant::now() + self.debounce);
					}
					None => {
						tracing::debug!("query source closed");
						input_open = false;
					}
				},
				() = &mut debounce, if pending.is_some() => {
					if let Some(query) = pending.take() {
						in_flight = Some(self.dispatch(query, settled_tx.clone()));
					}
				},
				Some(settled) = settled_rx.recv() => {
					if in_flight.as_ref().map(GenerationToken::generation) != Some(settled.generation) {
						tracing::trace!(generation = settled.generation, "stale query outcome dropped");
						continue;
					}
					in_flight = None;
					tracing::debug!(generation = settled.generation, count = ?settled.outcome.count(), "query outcome delivered");
					deliver(settled.outcome);
				},
			}
		}

		if let Some(token) = in_flight {
			token.cancel();
		}
	}

	fn dispatch(&self, query: Query, settled: mpsc::UnboundedSender<Settled<F::Stream>>) -> GenerationToken {
		let token = self.clock.token();
		let generation = token.generation();
		let cancel = token.clone();
		let fetcher = Arc::clone(&self.fetcher);
		let frames = self.frames.clone();
		tracing::debug!(generation, query = %query.value, "query dispatched");

		sift_worker::spawn(TaskClass::Background, async move {
			let outcome = tokio::select! {
				biased;
				() = cancel.cancelled() => return,
				outcome = resolve(fetcher.as_ref(), &query.value) => outcome,
			};
			tokio::select! {
				biased;
				() = cancel.cancelled() => return,
				() = frames.next_frame() => {}
			}
			let _ = settled.send(Settled { generation, outcome });
		});

		token
	}
}

async fn resolve<F: ResultFetcher>(fetcher: &F, text: &str) -> QueryOutcome<F::Stream> {
	if text.is_empty() {
		return QueryOutcome::NoQuery;
	}
	match fetcher.fetch(text).await {
		Ok(stream) => QueryOutcome::Results(stream),
		Err(error) => {
			tracing::warn!(query = text, %error, "query fetch failed");
			QueryOutcome::Failed(error)
		}
	}
}
