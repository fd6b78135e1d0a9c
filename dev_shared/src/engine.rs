//! Scripted stand-in for a host build engine. It drives registered listeners through one build
//! invocation's lifecycle, but executes nothing: each task's terminal state is scripted by the
//! test. Task completions can be reported serially or from one thread per task, to exercise
//! listeners under the host's parallel-execution mode.

use std::error::Error;
use std::sync::Arc;
use std::thread;

use log::debug;

use vigil::listener::{BuildListener, TaskPlan};
use vigil::observer::BuildLifecycle;
use vigil::{TaskPath, TaskRef, TaskState};

/// A task in a scripted build: its path and the terminal state the engine will report for it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TaskSpec {
  pub path: TaskPath,
  pub state: TaskState,
}

impl TaskSpec {
  #[inline]
  pub fn new(path: impl Into<TaskPath>, state: TaskState) -> Self {
    Self { path: path.into(), state }
  }
}

/// Scripted host build engine. Listeners are registered through [`BuildLifecycle`]; one call to
/// [`run`](Self::run) is one build invocation.
#[derive(Default)]
pub struct BuildEngine {
  listeners: Vec<Arc<dyn BuildListener<TaskPath>>>,
  parallel: bool,
}

pub type EngineResult = Result<(), Box<dyn Error + Send + Sync>>;

impl BuildEngine {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Report task completions from one thread per task instead of serially.
  #[inline]
  pub fn parallel(mut self) -> Self {
    self.parallel = true;
    self
  }

  /// Runs one scripted build invocation: removes the tasks whose name appears in `excluded` from
  /// the plan (the engine's `-x`-style invocation flag), announces the plan, reports each
  /// remaining task's terminal state, then announces build-finished. The first listener error
  /// aborts the invocation and is returned.
  pub fn run(&self, tasks: &[TaskSpec], excluded: &[&str]) -> EngineResult {
    let (planned, excluded_tasks): (Vec<TaskSpec>, Vec<TaskSpec>) =
      tasks.iter().cloned().partition(|t| !excluded.contains(&t.path.name()));

    let plan = TaskPlan::new(
      planned.iter().map(|t| t.path.clone()).collect(),
      excluded_tasks.iter().map(|t| t.path.clone()).collect(),
    );
    debug!("graph ready: {:?}", plan);
    for listener in &self.listeners {
      listener.graph_ready(&plan)?;
    }

    if self.parallel {
      self.finish_tasks_parallel(&planned)?;
    } else {
      for task in &planned {
        self.finish_task(task)?;
      }
    }

    debug!("build finished");
    for listener in &self.listeners {
      listener.build_finished()?;
    }
    Ok(())
  }

  fn finish_task(&self, task: &TaskSpec) -> EngineResult {
    debug!("task {} finished: {:?}", task.path, task.state);
    for listener in &self.listeners {
      listener.task_finished(&task.path, task.state)?;
    }
    Ok(())
  }

  fn finish_tasks_parallel(&self, tasks: &[TaskSpec]) -> EngineResult {
    thread::scope(|scope| {
      let handles: Vec<_> = tasks
        .iter()
        .map(|task| scope.spawn(move || self.finish_task(task)))
        .collect();
      for handle in handles {
        handle.join().expect("task thread panicked")?;
      }
      Ok(())
    })
  }
}

impl BuildLifecycle<TaskPath> for BuildEngine {
  fn add_listener(&mut self, listener: Arc<dyn BuildListener<TaskPath>>) {
    self.listeners.push(listener);
  }
}
