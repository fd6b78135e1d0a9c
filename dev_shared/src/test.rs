use std::sync::Arc;

use rstest::fixture;
use tempfile::TempDir;

use vigil::listener::writing::WritingListener;
use vigil::listener::CompositeListener;
use vigil::notice::NoticePolicy;
use vigil::observer::BuildLifecycle;
use vigil::{TaskPath, VerificationObserver};

use crate::engine::BuildEngine;
use crate::output::OutputBuffer;

/// Testing listener composed of a [`WritingListener`] logging lifecycle events to the build
/// output and the [`VerificationObserver`] under test, sharing one output stream. The notice
/// thus appears interleaved with normal build logging, as it would in a real build.
pub type TestListener =
  CompositeListener<WritingListener<OutputBuffer>, VerificationObserver<TaskPath, OutputBuffer>>;

pub fn create_test_listener(output: &OutputBuffer) -> TestListener {
  CompositeListener(
    WritingListener::new(output.clone()),
    VerificationObserver::with_policy(NoticePolicy::new(output.clone())),
  )
}

/// A fresh engine with a [`TestListener`] installed, and the output stream it writes to. One
/// build invocation per engine: call again for a second invocation.
pub fn observed_build() -> (BuildEngine, OutputBuffer) {
  init_logging();
  let output = OutputBuffer::new();
  let mut engine = BuildEngine::new();
  engine.add_listener(Arc::new(create_test_listener(&output)));
  (engine, output)
}

pub fn init_logging() {
  let _ = pretty_env_logger::try_init();
}

// Fixtures

#[fixture]
#[inline]
pub fn temp_dir() -> TempDir {
  crate::create_temp_dir()
}

#[fixture]
#[inline]
pub fn observed() -> (BuildEngine, OutputBuffer) {
  observed_build()
}
