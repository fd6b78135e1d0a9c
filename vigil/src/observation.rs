use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::task::{TaskRef, TaskState};

/// Terminal classification of a verification task within one build invocation. Assigned at most
/// once per task per invocation.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskOutcome {
  /// The task ran, successfully or not. A verification task that ran and failed still ran.
  Executed,
  /// The task was part of the plan but the host skipped it, for example because it had no
  /// sources to verify.
  Skipped,
  /// The task was removed from the plan by an invocation-time exclusion flag.
  Excluded,
  /// The task was part of the plan but never reached a terminal state.
  Absent,
}

impl TaskOutcome {
  /// Returns `true` iff the task actually ran.
  #[inline]
  pub fn ran(self) -> bool { matches!(self, TaskOutcome::Executed) }
}

impl From<TaskState> for TaskOutcome {
  #[inline]
  fn from(state: TaskState) -> Self {
    match state {
      TaskState::Success | TaskState::Failure | TaskState::UpToDate => TaskOutcome::Executed,
      TaskState::Skipped => TaskOutcome::Skipped,
    }
  }
}

/// Violation of the host engine's lifecycle contract, or of this crate's own calling contract.
/// These are programming errors and are surfaced fail-fast, never retried.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ObservationError {
  /// The host reported a terminal state twice for the same task in one invocation.
  #[error("task `{0}` already has outcome {1:?} recorded for this build invocation")]
  DuplicateOutcome(String, TaskOutcome),
  /// Final state was queried before the build finished.
  #[error("build observation queried before the build finished")]
  Incomplete,
  /// The build-finished notification fired twice in one invocation.
  #[error("build observation was already finished")]
  AlreadyFinished,
}

/// Record of verification task outcomes for one build invocation. Mutated only while the build
/// runs; a read-only snapshot after it finishes. Never persisted across invocations.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildObservation<T: TaskRef> {
  outcomes: HashMap<T, TaskOutcome>,
}

impl<T: TaskRef> Default for BuildObservation<T> {
  #[inline]
  fn default() -> Self { Self { outcomes: HashMap::new() } }
}

impl<T: TaskRef> BuildObservation<T> {
  /// Returns the outcome recorded for `task`, or `None` if `task` was never part of this
  /// observation.
  #[inline]
  pub fn outcome_of(&self, task: &T) -> Option<TaskOutcome> {
    self.outcomes.get(task).copied()
  }
  /// Returns `true` if any observed verification task ran.
  #[inline]
  pub fn any_executed(&self) -> bool { self.outcomes.values().any(|o| o.ran()) }
  /// Returns `true` if no verification task was observed at all.
  #[inline]
  pub fn is_empty(&self) -> bool { self.outcomes.is_empty() }
  /// Number of observed verification tasks.
  #[inline]
  pub fn len(&self) -> usize { self.outcomes.len() }
  /// Iterates over observed tasks and their outcomes, in no particular order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = (&T, TaskOutcome)> {
    self.outcomes.iter().map(|(t, o)| (t, *o))
  }
}

/// Build a synthetic observation, mainly for testing the decision policy in isolation.
impl<T: TaskRef> FromIterator<(T, TaskOutcome)> for BuildObservation<T> {
  fn from_iter<I: IntoIterator<Item = (T, TaskOutcome)>>(iter: I) -> Self {
    Self { outcomes: iter.into_iter().collect() }
  }
}

/// Owns the [`BuildObservation`] for the current build invocation.
///
/// The map is mutex-guarded: the host may report task completions from multiple worker threads.
/// Each completion targets a distinct key, so writers never contend on the same entry, but
/// concurrent inserts must not corrupt the map.
#[derive(Debug)]
pub struct ObservationTracker<T: TaskRef> {
  state: Mutex<State<T>>,
}

#[derive(Debug)]
struct State<T: TaskRef> {
  observation: BuildObservation<T>,
  finished: bool,
}

impl<T: TaskRef> Default for ObservationTracker<T> {
  #[inline]
  fn default() -> Self {
    Self { state: Mutex::new(State { observation: BuildObservation::default(), finished: false }) }
  }
}

impl<T: TaskRef> ObservationTracker<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  #[inline]
  fn lock(&self) -> MutexGuard<State<T>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Seeds [`TaskOutcome::Absent`] for every task in `tasks` not yet otherwise classified. A
  /// planned task that never reaches a terminal state keeps this placeholder.
  pub fn record_planned(&self, tasks: impl IntoIterator<Item = T>) {
    let mut state = self.lock();
    for task in tasks {
      state.observation.outcomes.entry(task).or_insert(TaskOutcome::Absent);
    }
  }

  /// Records the terminal `outcome` for `task`, overwriting its [`TaskOutcome::Absent`]
  /// placeholder. A second assignment for a task that already has a real outcome is a contract
  /// violation of the host and fails with [`ObservationError::DuplicateOutcome`]; it is never
  /// silently overwritten.
  pub fn record_outcome(&self, task: &T, outcome: TaskOutcome) -> Result<(), ObservationError> {
    let mut state = self.lock();
    match state.observation.outcomes.entry(task.clone()) {
      Entry::Occupied(mut entry) => {
        let existing = *entry.get();
        if existing != TaskOutcome::Absent {
          return Err(ObservationError::DuplicateOutcome(task.path().to_string(), existing));
        }
        entry.insert(outcome);
      }
      Entry::Vacant(entry) => {
        entry.insert(outcome);
      }
    }
    Ok(())
  }

  /// Marks the observation complete. Fails with [`ObservationError::AlreadyFinished`] on a second
  /// call: the build-finished notification fires exactly once per invocation.
  pub fn finish(&self) -> Result<(), ObservationError> {
    let mut state = self.lock();
    if state.finished {
      return Err(ObservationError::AlreadyFinished);
    }
    state.finished = true;
    Ok(())
  }

  /// Returns the completed observation. Callable only after [`finish`](Self::finish); fails with
  /// [`ObservationError::Incomplete`] before that.
  pub fn final_state(&self) -> Result<BuildObservation<T>, ObservationError> {
    let state = self.lock();
    if !state.finished {
      return Err(ObservationError::Incomplete);
    }
    Ok(state.observation.clone())
  }
}
