use std::future::Future;

use tokio::task::JoinSet;

use crate::TaskClass;

/// Tokio [`JoinSet`] tagged with a task class.
///
/// Owns the long-lived tasks of one mounted component so they can be torn
/// down together.
#[derive(Debug)]
pub struct WorkerJoinSet<T> {
	class: TaskClass,
	inner: JoinSet<T>,
}

impl<T> WorkerJoinSet<T>
where
	T: Send + 'static,
{
	/// Creates an empty worker join set for the given task class.
	pub fn new(class: TaskClass) -> Self {
		Self { class, inner: JoinSet::new() }
	}

	/// Spawns a future into the set on the current runtime.
	pub fn spawn<F>(&mut self, fut: F)
	where
		F: Future<Output = T> + Send + 'static,
	{
		tracing::trace!(worker_class = self.class.as_str(), pending = self.inner.len(), "worker.join_set.spawn");
		self.inner.spawn(fut);
	}

	/// Waits for every task to finish on its own, logging panics.
	pub async fn join_all(&mut self) {
		while let Some(result) = self.inner.join_next().await {
			if let Err(err) = result
				&& err.is_panic()
			{
				tracing::warn!(worker_class = self.class.as_str(), error = %err, "worker task panicked");
			}
		}
	}
}
