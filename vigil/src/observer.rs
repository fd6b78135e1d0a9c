use std::io;
use std::io::Stdout;
use std::sync::Arc;

use thiserror::Error;

use crate::listener::{BuildListener, ListenerResult, TaskPlan};
use crate::notice::NoticePolicy;
use crate::observation::{ObservationError, ObservationTracker, TaskOutcome};
use crate::task::{TaskRef, TaskState, VerificationMatcher};

/// Error raised while concluding an observation at build-finish.
#[derive(Debug, Error)]
pub enum ObserverError {
  /// The host engine violated its lifecycle contract.
  #[error(transparent)]
  Observation(#[from] ObservationError),
  /// Writing the notice to the build's output failed.
  #[error("failed to write the notice to the build output: {0}")]
  Emit(#[from] io::Error),
}

/// Observes one build invocation and emits the notice at build-finish when no verification task
/// ran.
///
/// Filters the host's task stream through a [`VerificationMatcher`], records outcomes in an
/// [`ObservationTracker`], and applies a [`NoticePolicy`] exactly once when the build finishes.
/// All state is scoped to one invocation: construct a fresh observer per build.
pub struct VerificationObserver<T: TaskRef, W = Stdout> {
  matcher: VerificationMatcher,
  tracker: ObservationTracker<T>,
  policy: NoticePolicy<W>,
}

impl<T: TaskRef> Default for VerificationObserver<T, Stdout> {
  #[inline]
  fn default() -> Self { Self::new() }
}

impl<T: TaskRef> VerificationObserver<T, Stdout> {
  /// Observer with the canonical `test` matcher, writing the notice to standard output.
  #[inline]
  pub fn new() -> Self { Self::with_policy(NoticePolicy::new_stdout_writer()) }
}

impl<T: TaskRef, W> VerificationObserver<T, W> {
  /// Observer writing the notice through `policy`.
  #[inline]
  pub fn with_policy(policy: NoticePolicy<W>) -> Self {
    Self { matcher: VerificationMatcher::default(), tracker: ObservationTracker::new(), policy }
  }
  /// Replaces the verification task matcher.
  #[inline]
  pub fn with_matcher(mut self, matcher: VerificationMatcher) -> Self {
    self.matcher = matcher;
    self
  }

  /// The tracker owning this invocation's observation.
  #[inline]
  pub fn tracker(&self) -> &ObservationTracker<T> { &self.tracker }

  fn record_plan(&self, plan: &TaskPlan<T>) -> Result<(), ObservationError> {
    self
      .tracker
      .record_planned(plan.planned().iter().filter(|t| self.matcher.matches(*t)).cloned());
    for task in plan.excluded().iter().filter(|t| self.matcher.matches(*t)) {
      self.tracker.record_outcome(task, TaskOutcome::Excluded)?;
    }
    Ok(())
  }
}

impl<T: TaskRef, W: io::Write + Send> VerificationObserver<T, W> {
  fn conclude(&self) -> Result<(), ObserverError> {
    self.tracker.finish()?;
    let observation = self.tracker.final_state()?;
    self.policy.apply(&observation)?;
    Ok(())
  }
}

impl<T: TaskRef, W: io::Write + Send> BuildListener<T> for VerificationObserver<T, W> {
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult {
    Ok(self.record_plan(plan)?)
  }
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult {
    if self.matcher.matches(task) {
      self.tracker.record_outcome(task, TaskOutcome::from(state))?;
    }
    Ok(())
  }
  #[inline]
  fn build_finished(&self) -> ListenerResult {
    Ok(self.conclude()?)
  }
}

/// Host-side capability for registering build listeners: the build's task-graph/lifecycle object
/// implements this, whatever the host's own vocabulary for it is.
pub trait BuildLifecycle<T: TaskRef> {
  /// Registers `listener` to receive this build invocation's lifecycle callbacks.
  fn add_listener(&mut self, listener: Arc<dyn BuildListener<T>>);
}

/// Zero-configuration plugin entry point: installs a [`VerificationObserver`] that watches the
/// canonical `test` task and writes the notice to standard output.
pub fn install<T: TaskRef>(lifecycle: &mut impl BuildLifecycle<T>) {
  lifecycle.add_listener(Arc::new(VerificationObserver::<T>::new()));
}
