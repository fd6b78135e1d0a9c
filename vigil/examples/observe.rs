use std::error::Error;
use std::sync::Arc;

use vigil::listener::{BuildListener, TaskPlan};
use vigil::observer::{install, BuildLifecycle};
use vigil::{TaskPath, TaskState};

/// Minimal in-process host: a fixed task list driven through one build invocation's lifecycle.
struct DemoBuild {
  listeners: Vec<Arc<dyn BuildListener<TaskPath>>>,
}

impl DemoBuild {
  fn new() -> Self { Self { listeners: Vec::new() } }

  fn run(&self, tasks: &[(&str, TaskState)]) -> Result<(), Box<dyn Error + Send + Sync>> {
    let plan = TaskPlan::new(tasks.iter().map(|(p, _)| TaskPath::from(*p)).collect(), Vec::new());
    for listener in &self.listeners {
      listener.graph_ready(&plan)?;
    }
    for (path, state) in tasks {
      let task = TaskPath::from(*path);
      for listener in &self.listeners {
        listener.task_finished(&task, *state)?;
      }
    }
    for listener in &self.listeners {
      listener.build_finished()?;
    }
    Ok(())
  }
}

impl BuildLifecycle<TaskPath> for DemoBuild {
  fn add_listener(&mut self, listener: Arc<dyn BuildListener<TaskPath>>) {
    self.listeners.push(listener);
  }
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
  // A build that runs its tests: nothing extra is printed.
  let mut build = DemoBuild::new();
  install(&mut build);
  println!("build with tests:");
  build.run(&[(":compile", TaskState::Success), (":test", TaskState::Success)])?;

  // A build whose test task was skipped: the notice is printed to stdout.
  let mut build = DemoBuild::new();
  install(&mut build);
  println!("build that skipped tests:");
  build.run(&[(":compile", TaskState::Success), (":test", TaskState::Skipped)])?;
  Ok(())
}
