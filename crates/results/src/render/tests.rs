use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::{IncrementalRenderer, RenderOutcome};
use crate::fetch::FetchError;
use crate::gate::ScrollGate;
use crate::testing::{Labels, ListViewport, RecordingView, StubStream, settle};
use crate::types::ViewportEvent;

struct Fixture {
	view: RecordingView,
	viewport: Arc<ListViewport>,
	gate: Arc<ScrollGate>,
	renderer: IncrementalRenderer<RecordingView, Labels>,
}

impl Fixture {
	fn new() -> Self {
		let view = RecordingView::default();
		let viewport = ListViewport::new(&view);
		let gate = Arc::new(ScrollGate::new(viewport.clone(), 16));
		let renderer = IncrementalRenderer::new(view.clone(), Arc::new(Labels), gate.clone(), 4);
		Self {
			view,
			viewport,
			gate,
			renderer,
		}
	}

	fn scroll_to(&self, offset: u32) {
		self.viewport.scroll_to(offset);
		self.gate.handle_event(ViewportEvent::Scroll);
	}
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn renders_one_batch_ahead_of_scroll_position() {
	let fx = Fixture::new();
	let stream = Arc::new(StubStream::new("r", 50));
	let task = tokio::spawn(fx.renderer.render(stream.clone()));

	settle().await;
	assert_eq!(fx.view.items(), StubStream::labels("r", 0..4));
	assert!(fx.gate.has_waiter());

	fx.scroll_to(20);
	settle().await;
	assert_eq!(fx.view.items(), StubStream::labels("r", 0..8));
	assert!(fx.gate.has_waiter());

	fx.scroll_to(10_000);
	assert_eq!(task.await.expect("render task"), RenderOutcome::Completed { rendered: 50 });
	assert_eq!(fx.view.items(), StubStream::labels("r", 0..50));
	assert_eq!(stream.gets(), (0..50).collect::<Vec<_>>());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn scroll_short_of_bottom_keeps_waiting() {
	let fx = Fixture::new();
	let task = tokio::spawn(fx.renderer.render(Arc::new(StubStream::new("r", 10))));

	settle().await;
	fx.scroll_to(1);
	settle().await;
	assert_eq!(fx.view.items().len(), 4);
	assert!(!task.is_finished());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn superseded_session_stops_without_interleaving() {
	let fx = Fixture::new();
	let first = tokio::spawn(fx.renderer.render(Arc::new(StubStream::new("a", 50))));
	settle().await;
	assert_eq!(fx.view.items().len(), 4);

	let second = tokio::spawn(fx.renderer.render(Arc::new(StubStream::new("b", 3))));
	assert_eq!(first.await.expect("first render"), RenderOutcome::Superseded { rendered: 4 });
	assert_eq!(second.await.expect("second render"), RenderOutcome::Completed { rendered: 3 });

	fx.scroll_to(10_000);
	settle().await;

	let mut expected = StubStream::labels("a", 0..4);
	expected.extend(StubStream::labels("b", 0..3));
	assert_eq!(fx.view.items(), expected);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn supersession_during_item_fetch_discards_the_result() {
	let fx = Fixture::new();
	fx.viewport.scroll_to(10_000);
	let slow = Arc::new(StubStream::new("slow", 5).with_delay(Duration::from_millis(100)));
	let first = tokio::spawn(fx.renderer.render(slow.clone()));
	settle().await;
	assert_eq!(slow.gets(), vec![0]);

	let second = tokio::spawn(fx.renderer.render(Arc::new(StubStream::new("fast", 2))));
	assert_eq!(first.await.expect("first render"), RenderOutcome::Superseded { rendered: 0 });
	assert_eq!(second.await.expect("second render"), RenderOutcome::Completed { rendered: 2 });

	tokio::time::sleep(Duration::from_millis(200)).await;
	assert_eq!(fx.view.items(), StubStream::labels("fast", 0..2));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn fetch_failure_keeps_rendered_prefix() {
	let fx = Fixture::new();
	fx.viewport.scroll_to(10_000);
	let stream = Arc::new(StubStream::new("s", 6).failing_at(2));

	let outcome = fx.renderer.render(stream.clone()).await;
	assert_eq!(
		outcome,
		RenderOutcome::Failed {
			rendered: 2,
			error: FetchError::Failed("s-2 unavailable".to_string()),
		}
	);
	assert_eq!(fx.view.items(), StubStream::labels("s", 0..2));
	assert_eq!(stream.gets(), vec![0, 1, 2]);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn slow_items_still_append_in_index_order() {
	let fx = Fixture::new();
	fx.viewport.scroll_to(10_000);
	let stream = Arc::new(StubStream::new("o", 9).with_delay(Duration::from_millis(7)));

	assert_eq!(fx.renderer.render(stream).await, RenderOutcome::Completed { rendered: 9 });
	assert_eq!(fx.view.items(), StubStream::labels("o", 0..9));
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn explicit_supersede_releases_parked_session() {
	let fx = Fixture::new();
	let task = tokio::spawn(fx.renderer.render(Arc::new(StubStream::new("p", 20))));
	settle().await;
	assert!(fx.renderer.current_generation().is_some());

	fx.renderer.supersede();
	assert_eq!(task.await.expect("render task"), RenderOutcome::Superseded { rendered: 4 });
	assert!(fx.renderer.current_generation().is_none());
	assert!(!fx.gate.has_waiter());
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn empty_stream_completes_immediately() {
	let fx = Fixture::new();
	assert_eq!(fx.renderer.render(Arc::new(StubStream::new("e", 0))).await, RenderOutcome::Completed { rendered: 0 });
	assert!(fx.view.items().is_empty());
}
