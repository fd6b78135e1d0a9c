//! Observes a host build engine's task execution graph and emits a fixed notice at build-finish
//! when the verification task (canonically `test`) did not run during the build. A lightweight,
//! zero-configuration nudge: if you built without running tests, be told about it.
//!
//! The host engine drives execution; this crate only listens. A host adapter implements
//! [`BuildLifecycle`](observer::BuildLifecycle) and calls [`install`](observer::install) (or
//! registers a configured [`VerificationObserver`](observer::VerificationObserver) itself), then
//! delivers the lifecycle callbacks of [`BuildListener`](listener::BuildListener):
//!
//! - [`graph_ready`](listener::BuildListener::graph_ready) with the invocation's [task
//!   plan](listener::TaskPlan), once, before any task finishes;
//! - [`task_finished`](listener::BuildListener::task_finished) per finished task, possibly from
//!   multiple worker threads;
//! - [`build_finished`](listener::BuildListener::build_finished) once, after all task callbacks.
//!
//! At build-finish the observer consults the [notice policy](notice::NoticePolicy): the notice is
//! emitted iff no verification task has outcome
//! [`Executed`](observation::TaskOutcome::Executed). Skipped, excluded, and absent verification
//! tasks all count as "did not run", and so does a build with no verification tasks at all. A
//! verification task that ran and failed counts as ran.
//!
//! All state is scoped to one build invocation and never persisted.

pub mod task;
pub mod listener;
pub mod observation;
pub mod notice;
pub mod observer;

pub use observer::{install, BuildLifecycle, VerificationObserver};
pub use task::{TaskPath, TaskRef, TaskState, VerificationMatcher};
