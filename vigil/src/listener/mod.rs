use std::error::Error;
use std::sync::Arc;

use crate::task::{TaskRef, TaskState};

pub mod event;
pub mod writing;

/// Outcome of a listener callback. Errors propagate to the host build engine instead of being
/// swallowed.
pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// The tasks the host build engine plans to run in one build invocation, along with the tasks
/// removed from the plan by an invocation-time exclusion flag. An excluded task never appears in
/// the finished-task stream, so the plan is the only place it can be observed.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TaskPlan<T> {
  planned: Vec<T>,
  excluded: Vec<T>,
}

impl<T: TaskRef> TaskPlan<T> {
  #[inline]
  pub fn new(planned: Vec<T>, excluded: Vec<T>) -> Self { Self { planned, excluded } }

  /// Tasks that are part of the execution plan.
  #[inline]
  pub fn planned(&self) -> &[T] { &self.planned }
  /// Tasks excluded from the plan at invocation time.
  #[inline]
  pub fn excluded(&self) -> &[T] { &self.excluded }
}

/// Build lifecycle listener capability: the dynamically-dispatched interface a host build engine
/// drives through one build invocation. Can be used to implement logging, outcome tracking,
/// progress reporting, etc.
///
/// Object-safe trait. Callbacks take `&self`: the host may deliver
/// [`task_finished`](BuildListener::task_finished) from multiple worker threads, so
/// implementations use interior mutability where they keep state.
#[allow(unused_variables)]
pub trait BuildListener<T: TaskRef>: Send + Sync {
  /// The host assembled the task graph for this build invocation. Invoked exactly once, before
  /// any task finishes.
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult { Ok(()) }
  /// `task` reached terminal `state`. Invoked at most once per task, possibly from a worker
  /// thread.
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult { Ok(()) }
  /// The build invocation completed. Invoked exactly once, strictly after every
  /// [`task_finished`](BuildListener::task_finished) for this invocation.
  #[inline]
  fn build_finished(&self) -> ListenerResult { Ok(()) }
}

/// Implement [`BuildListener`] for `()` that does nothing.
impl<T: TaskRef> BuildListener<T> for () {}

/// Forward [`BuildListener`] through an [`Arc`], so the registrar can keep a handle to a listener
/// for inspection after handing it to the host.
impl<T: TaskRef, L: BuildListener<T> + ?Sized> BuildListener<T> for Arc<L> {
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult { self.as_ref().graph_ready(plan) }
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult {
    self.as_ref().task_finished(task, state)
  }
  #[inline]
  fn build_finished(&self) -> ListenerResult { self.as_ref().build_finished() }
}

/// A [`BuildListener`] that forwards callbacks to two [`BuildListener`]s.
#[derive(Default, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug)]
pub struct CompositeListener<A1, A2>(pub A1, pub A2);

impl<A1, A2> CompositeListener<A1, A2> {
  #[inline]
  pub fn new(listener_1: A1, listener_2: A2) -> Self { Self(listener_1, listener_2) }
}

impl<T: TaskRef, A1: BuildListener<T>, A2: BuildListener<T>> BuildListener<T> for CompositeListener<A1, A2> {
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult {
    self.0.graph_ready(plan)?;
    self.1.graph_ready(plan)
  }
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult {
    self.0.task_finished(task, state)?;
    self.1.task_finished(task, state)
  }
  #[inline]
  fn build_finished(&self) -> ListenerResult {
    self.0.build_finished()?;
    self.1.build_finished()
  }
}
