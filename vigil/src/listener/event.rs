use std::sync::{Mutex, PoisonError};

use crate::listener::{BuildListener, ListenerResult, TaskPlan};
use crate::task::{TaskRef, TaskState};

/// A [`BuildListener`] that stores [`Event`]s in a [`Vec`], useful in testing to assert which
/// lifecycle callbacks fired, in which order, and for which tasks.
#[derive(Debug)]
pub struct EventListener<T> {
  events: Mutex<Vec<Event<T>>>,
}

impl<T> Default for EventListener<T> {
  #[inline]
  fn default() -> Self { Self { events: Mutex::new(Vec::new()) } }
}

/// Enumeration of build lifecycle events.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Event<T> {
  GraphReady { planned: Vec<T>, excluded: Vec<T> },
  TaskFinished { task: T, state: TaskState },
  BuildFinished,
}

impl<T: TaskRef> Event<T> {
  /// Returns `true` if this is a [graph ready event](Event::GraphReady).
  #[inline]
  pub fn is_graph_ready(&self) -> bool { matches!(self, Event::GraphReady { .. }) }
  /// Returns `true` if this is a [build finished event](Event::BuildFinished).
  #[inline]
  pub fn is_build_finished(&self) -> bool { matches!(self, Event::BuildFinished) }
  /// Returns `Some(state)` if this is a [task finished event](Event::TaskFinished) for `task`, or
  /// `None` otherwise.
  #[inline]
  pub fn match_task_finished(&self, task: &T) -> Option<TaskState> {
    match self {
      Event::TaskFinished { task: t, state } if t == task => Some(*state),
      _ => None,
    }
  }
}

impl<T: TaskRef> BuildListener<T> for EventListener<T> {
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult {
    self.push(Event::GraphReady {
      planned: plan.planned().to_vec(),
      excluded: plan.excluded().to_vec(),
    });
    Ok(())
  }
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult {
    self.push(Event::TaskFinished { task: task.clone(), state });
    Ok(())
  }
  #[inline]
  fn build_finished(&self) -> ListenerResult {
    self.push(Event::BuildFinished);
    Ok(())
  }
}

impl<T: TaskRef> EventListener<T> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  #[inline]
  fn push(&self, event: Event<T>) {
    self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event);
  }

  /// Returns a snapshot of all events observed so far, in order.
  pub fn events(&self) -> Vec<Event<T>> {
    self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }

  /// Returns `true` if `predicate` returns `true` for any event.
  pub fn any(&self, predicate: impl FnMut(&Event<T>) -> bool) -> bool {
    self.events().iter().any(predicate)
  }
  /// Returns `true` if `predicate` returns `true` for exactly one event.
  pub fn one(&self, mut predicate: impl FnMut(&Event<T>) -> bool) -> bool {
    self.events().iter().filter(|e| predicate(*e)).count() == 1
  }

  /// Finds the first [task finished event](Event::TaskFinished) for `task` and returns
  /// `Some(index)`, or `None` otherwise.
  pub fn index_task_finished(&self, task: &T) -> Option<usize> {
    self.events().iter().position(|e| e.match_task_finished(task).is_some())
  }
  /// Finds the [build finished event](Event::BuildFinished) and returns `Some(index)`, or `None`
  /// otherwise.
  pub fn index_build_finished(&self) -> Option<usize> {
    self.events().iter().position(|e| e.is_build_finished())
  }
  /// Returns the terminal state reported for `task`, or `None` if it never finished.
  pub fn finished_state_of(&self, task: &T) -> Option<TaskState> {
    self.events().iter().find_map(|e| e.match_task_finished(task))
  }
}
