//! Worker primitives shared by sift crates.
//!
//! * [`spawn`]: classified task spawning with trace metadata.
//! * [`GenerationClock`] / [`GenerationToken`]: monotonic session identity plus
//!   cooperative cancellation, used to supersede stale work.
//! * [`WorkerJoinSet`]: owns the tasks of one mounted component.

mod class;
mod join_set;
mod spawn;
mod token;

pub use class::TaskClass;
pub use join_set::WorkerJoinSet;
pub use spawn::spawn;
pub use token::{GenerationClock, GenerationToken};
