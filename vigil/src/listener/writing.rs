use std::io;
use std::io::{Stderr, Stdout};
use std::sync::{Mutex, PoisonError};

use crate::listener::{BuildListener, ListenerResult, TaskPlan};
use crate::task::{TaskRef, TaskState};

/// A [`BuildListener`] that writes one line per lifecycle event to a [`std::io::Write`] instance,
/// for example [`std::io::Stdout`], for observing a build as it runs. Writes are best-effort: a
/// failing writer silences the log but never fails the build.
#[derive(Debug)]
pub struct WritingListener<W> {
  writer: Mutex<W>,
}

impl Default for WritingListener<Stdout> {
  #[inline]
  fn default() -> Self { Self::new_stdout_writer() }
}

impl Default for WritingListener<Stderr> {
  #[inline]
  fn default() -> Self { Self::new_stderr_writer() }
}

impl<W: io::Write> WritingListener<W> {
  #[inline]
  pub fn new(writer: W) -> Self { Self { writer: Mutex::new(writer) } }
}

impl WritingListener<Stdout> {
  #[inline]
  pub fn new_stdout_writer() -> Self { Self::new(io::stdout()) }
}

impl WritingListener<Stderr> {
  #[inline]
  pub fn new_stderr_writer() -> Self { Self::new(io::stderr()) }
}

impl<T: TaskRef, W: io::Write + Send> BuildListener<T> for WritingListener<W> {
  #[inline]
  fn graph_ready(&self, plan: &TaskPlan<T>) -> ListenerResult {
    self.writeln(format_args!("Build graph ready: {}", comma_separated(plan.planned())));
    if !plan.excluded().is_empty() {
      self.writeln(format_args!("  excluded: {}", comma_separated(plan.excluded())));
    }
    Ok(())
  }
  #[inline]
  fn task_finished(&self, task: &T, state: TaskState) -> ListenerResult {
    self.writeln(format_args!("{} {}", symbol(state), task.path()));
    Ok(())
  }
  #[inline]
  fn build_finished(&self) -> ListenerResult {
    self.writeln(format_args!("Build finished"));
    Ok(())
  }
}

impl<W: io::Write> WritingListener<W> {
  #[inline]
  fn writeln(&self, args: std::fmt::Arguments) {
    let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(writer, "{}", args).ok();
  }
}

#[inline]
fn symbol(state: TaskState) -> &'static str {
  match state {
    TaskState::Success => "✓",
    TaskState::Failure => "✗",
    TaskState::Skipped => "⊘",
    TaskState::UpToDate => "≡",
  }
}

fn comma_separated<T: TaskRef>(tasks: &[T]) -> String {
  tasks.iter().map(|t| t.path()).collect::<Vec<_>>().join(", ")
}
