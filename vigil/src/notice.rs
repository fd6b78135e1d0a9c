use std::io;
use std::io::{Stderr, Stdout, Write};
use std::sync::{Mutex, PoisonError};

use crate::observation::BuildObservation;
use crate::task::TaskRef;

/// The fixed notice text, written to the build's output when no verification task ran.
pub const NOTICE: &str = include_str!("notice.txt");

/// Returns `true` iff the notice must be emitted for `observation`: no verification task ran.
///
/// A skipped, excluded, or absent verification task counts as not run, and so does an observation
/// containing no verification tasks at all. A verification task that ran and failed counts as
/// run: the decision is about whether tests ran, not whether they passed.
#[inline]
pub fn should_emit<T: TaskRef>(observation: &BuildObservation<T>) -> bool {
  !observation.any_executed()
}

/// The single authoritative decision of whether to emit the notice, and its emission: writes
/// [`NOTICE`] to a [`std::io::Write`] instance, for example the build's standard output.
#[derive(Debug)]
pub struct NoticePolicy<W> {
  writer: Mutex<W>,
}

impl Default for NoticePolicy<Stdout> {
  #[inline]
  fn default() -> Self { Self::new_stdout_writer() }
}

impl Default for NoticePolicy<Stderr> {
  #[inline]
  fn default() -> Self { Self::new_stderr_writer() }
}

impl<W: Write> NoticePolicy<W> {
  #[inline]
  pub fn new(writer: W) -> Self { Self { writer: Mutex::new(writer) } }

  /// Evaluates the decision rule against `observation` and writes [`NOTICE`] when it holds.
  /// Returns whether the notice was written. A write failure propagates: silently failing to
  /// emit would be indistinguishable from "no notice needed".
  pub fn apply<T: TaskRef>(&self, observation: &BuildObservation<T>) -> io::Result<bool> {
    if !should_emit(observation) {
      return Ok(false);
    }
    let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
    writer.write_all(NOTICE.as_bytes())?;
    writer.flush()?;
    Ok(true)
  }
}

impl NoticePolicy<Stdout> {
  #[inline]
  pub fn new_stdout_writer() -> Self { Self::new(io::stdout()) }
}

impl NoticePolicy<Stderr> {
  #[inline]
  pub fn new_stderr_writer() -> Self { Self::new(io::stderr()) }
}
