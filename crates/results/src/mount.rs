//! Mounting the result list: wiring the pipeline, presenter, renderer and gate.
//!
//! # Lifecycle
//!
//! * [`mount_search_result`] creates the gate and renderer, applies the initial
//!   list role, and spawns four tasks: the query pipeline, the render driver,
//!   the viewport event listener and the list-role listener.
//! * [`MountedSearchResult::unmount`] cancels the tasks, supersedes any render
//!   session, releases the gate and waits for the tasks to exit. No render
//!   session outlives it.
//!
//! # Presentation
//!
//! Each delivered outcome is applied under the list lock: the active session is
//! superseded, the list is cleared, the status text is replaced and, for a
//! result stream, a new session is started. The session itself runs on the
//! render driver task so query processing never waits on rendering. The driver
//! holds at most one session; a newer one replaces it.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sift_config::ResultsConfig;
use sift_worker::{GenerationToken, TaskClass, WorkerJoinSet};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::fetch::{ResultFetcher, ResultStream};
use crate::gate::ScrollGate;
use crate::pipeline::{QueryOutcome, QueryPipeline};
use crate::render::{IncrementalRenderer, RenderOutcome};
use crate::status::{StatusPresenter, Translate};
use crate::types::{ListRole, Query, ViewportEvent};
use crate::view::{ItemRenderer, ResultView, Viewport};

/// Host collaborators for one mounted result list.
pub struct SearchResultMount<V, F, I, T> {
	/// Mount point with status and list regions.
	pub view: V,
	/// Scroll container geometry.
	pub viewport: Arc<dyn Viewport>,
	/// Query backend.
	pub fetcher: Arc<F>,
	/// Result-to-node mapping.
	pub items: Arc<I>,
	/// Status strings.
	pub translations: Arc<T>,
}

/// Event sources the mounted list listens to.
pub struct MountInputs {
	/// Query source.
	pub queries: mpsc::UnboundedReceiver<Query>,
	/// Scroll and resize events of the scroll container.
	pub viewport_events: mpsc::UnboundedReceiver<ViewportEvent>,
	/// Whether search is active; drives the list role.
	pub active: watch::Receiver<bool>,
}

/// A mounted result list. Dropping it without [`Self::unmount`] leaves its
/// tasks running until their inputs close.
pub struct MountedSearchResult<V, I> {
	renderer: IncrementalRenderer<V, I>,
	gate: Arc<ScrollGate>,
	shutdown: CancellationToken,
	tasks: WorkerJoinSet<()>,
}

/// Mounts a result list and starts its listeners.
///
/// Must be called from within a tokio runtime.
pub fn mount_search_result<V, F, I, T>(mount: SearchResultMount<V, F, I, T>, inputs: MountInputs, config: &ResultsConfig) -> MountedSearchResult<V, I>
where
	V: ResultView,
	F: ResultFetcher,
	I: ItemRenderer<<F::Stream as ResultStream>::Item, Node = V::Node>,
	T: Translate,
{
	let SearchResultMount {
		view,
		viewport,
		fetcher,
		items,
		translations,
	} = mount;
	let MountInputs {
		queries,
		viewport_events,
		mut active,
	} = inputs;

	let gate = Arc::new(ScrollGate::new(viewport, config.scroll_threshold));
	let renderer = IncrementalRenderer::new(view, items, Arc::clone(&gate), config.batch_size);
	let presenter = StatusPresenter::new(translations);
	let shutdown = CancellationToken::new();
	let mut tasks = WorkerJoinSet::new(TaskClass::Interactive);

	let role = ListRole::for_active(*active.borrow_and_update());
	renderer.lock().view.set_list_role(role);

	tasks.spawn(forward_viewport_events(Arc::clone(&gate), viewport_events, shutdown.clone()));
	tasks.spawn(forward_list_role(renderer.clone(), active, shutdown.clone()));

	let (render_tx, render_rx) = mpsc::unbounded_channel();
	tasks.spawn(drive_renders(renderer.clone(), render_rx, shutdown.clone()));

	let pipeline = QueryPipeline::from_config(fetcher, config);
	let target = renderer.clone();
	tasks.spawn(pipeline.run(queries, shutdown.clone(), move |outcome| present(&target, &presenter, &render_tx, outcome)));

	tracing::debug!(batch_size = config.batch_size, debounce_ms = config.debounce_ms, "search result mounted");
	MountedSearchResult {
		renderer,
		gate,
		shutdown,
		tasks,
	}
}

impl<V, I> MountedSearchResult<V, I>
where
	V: ResultView,
	I: Send + Sync + 'static,
{
	/// Runs `f` against the view.
	pub fn with_view<R>(&self, f: impl FnOnce(&V) -> R) -> R {
		self.renderer.with_view(f)
	}

	/// The scroll gate pacing this list.
	pub fn gate(&self) -> &Arc<ScrollGate> {
		&self.gate
	}

	/// Generation of the active render session, if any.
	pub fn current_generation(&self) -> Option<u64> {
		self.renderer.current_generation()
	}

	/// Stops listening, abandons rendering and waits for every task to exit.
	pub async fn unmount(mut self) {
		self.shutdown.cancel();
		self.renderer.supersede();
		self.tasks.join_all().await;
		self.gate.release();
		tracing::debug!("search result unmounted");
	}
}

/// A started session and the stream it renders.
type RenderRequest<S> = (GenerationToken, Arc<S>);

type RenderTask = Pin<Box<dyn Future<Output = RenderOutcome> + Send>>;

fn present<V, I, T, S>(renderer: &IncrementalRenderer<V, I>, presenter: &StatusPresenter<T>, sessions: &mpsc::UnboundedSender<RenderRequest<S>>, outcome: QueryOutcome<S>)
where
	V: ResultView,
	I: ItemRenderer<S::Item, Node = V::Node>,
	T: Translate,
	S: ResultStream,
{
	let status = presenter.status_text(outcome.count());
	let session = {
		let mut state = renderer.lock();
		state.view.clear_list();
		state.view.set_status(&status);
		match &outcome {
			QueryOutcome::Results(_) => Some(renderer.begin_locked(&mut state)),
			QueryOutcome::NoQuery | QueryOutcome::Failed(_) => {
				renderer.supersede_locked(&mut state);
				None
			}
		}
	};

	if let (Some(session), QueryOutcome::Results(stream)) = (session, outcome)
		&& sessions.send((session, stream)).is_err()
	{
		tracing::debug!("render driver stopped; session dropped");
		renderer.supersede();
	}
}

/// Runs the latest render session until it ends, a newer one arrives or the
/// list is unmounted.
async fn drive_renders<V, I, S>(renderer: IncrementalRenderer<V, I>, mut sessions: mpsc::UnboundedReceiver<RenderRequest<S>>, shutdown: CancellationToken)
where
	V: ResultView,
	I: ItemRenderer<S::Item, Node = V::Node>,
	S: ResultStream,
{
	let mut active: Option<RenderTask> = None;
	loop {
		tokio::select! {
			biased;
			() = shutdown.cancelled() => break,
			request = sessions.recv() => match request {
				Some((session, stream)) => active = Some(Box::pin(renderer.clone().run(session, stream))),
				None => break,
			},
			outcome = async {
				match active.as_mut() {
					Some(task) => task.await,
					None => std::future::pending().await,
				}
			} => {
				active = None;
				tracing::debug!(?outcome, "render session ended");
			},
		}
	}
}

async fn forward_viewport_events(gate: Arc<ScrollGate>, mut events: mpsc::UnboundedReceiver<ViewportEvent>, shutdown: CancellationToken) {
	loop {
		tokio::select! {
			biased;
			() = shutdown.cancelled() => break,
			event = events.recv() => match event {
				Some(event) => gate.handle_event(event),
				None => break,
			},
		}
	}
}

async fn forward_list_role<V, I>(renderer: IncrementalRenderer<V, I>, mut active: watch::Receiver<bool>, shutdown: CancellationToken)
where
	V: ResultView,
	I: Send + Sync + 'static,
{
	loop {
		tokio::select! {
			biased;
			() = shutdown.cancelled() => break,
			changed = active.changed() => {
				if changed.is_err() {
					break;
				}
			},
		}
		let role = ListRole::for_active(*active.borrow_and_update());
		renderer.lock().view.set_list_role(role);
	}
}
