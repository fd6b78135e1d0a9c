use std::io;
use std::path::Path;
use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;
use testresult::TestResult;

use dev_shared::engine::{BuildEngine, TaskSpec};
use dev_shared::output::OutputBuffer;
use dev_shared::project::FixtureProject;
use dev_shared::test::{create_test_listener, observed, observed_build, temp_dir};
use vigil::notice::{NoticePolicy, NOTICE};
use vigil::observer::BuildLifecycle;
use vigil::{TaskState, VerificationObserver};

// Black-box scenarios: build a fixture project, run a scripted build invocation with the observer
// installed, and assert on the build's output text.

#[rstest]
fn notice_when_project_has_no_tests(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  let project = project_without_tests(temp_dir.path())?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &[])?;
  assert!(output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn no_notice_when_tests_run(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  let project = project_with_passing_test(temp_dir.path())?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &[])?;
  assert!(!output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn notice_when_test_task_is_excluded(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  let project = project_with_passing_test(temp_dir.path())?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &["test"])?;
  assert!(output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn no_notice_when_tests_run_and_fail(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  // Tests ran, they just did not pass. That is a different, harsher problem than not running
  // them, and not one the notice addresses.
  let mut project = FixtureProject::new(temp_dir.path());
  project.source("app.rs", "pub fn answer() -> u32 { 42 }\n")?;
  project.failing_test("app_test.rs", "#[test]\nfn answer() { assert_eq!(43, 42); }\n")?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &[])?;
  assert!(!output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn notice_when_build_defines_no_test_task(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  let mut project = FixtureProject::without_test_support(temp_dir.path());
  project.source("app.rs", "pub fn answer() -> u32 { 42 }\n")?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &[])?;
  assert!(output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn no_notice_when_test_task_is_up_to_date(observed: (BuildEngine, OutputBuffer)) -> TestResult {
  // An up-to-date verification task still counts as ran: its verification holds.
  let tasks = vec![
    TaskSpec::new(":compile", TaskState::UpToDate),
    TaskSpec::new(":test", TaskState::UpToDate),
  ];
  let (engine, output) = observed;
  engine.run(&tasks, &[])?;
  assert!(!output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn notice_appears_exactly_once(
  observed: (BuildEngine, OutputBuffer),
  temp_dir: TempDir,
) -> TestResult {
  let project = project_without_tests(temp_dir.path())?;
  let (engine, output) = observed;
  engine.run(&project.build_plan(), &[])?;
  assert_eq!(output.contents().matches(NOTICE).count(), 1);
  Ok(())
}

#[rstest]
fn same_configuration_yields_same_decision(temp_dir: TempDir) -> TestResult {
  // Each invocation is independently evaluated; with unchanged inputs the decision is stable.
  let with_tests = project_with_passing_test(&temp_dir.path().join("with_tests"))?;
  for _ in 0..2 {
    let (engine, output) = observed_build();
    engine.run(&with_tests.build_plan(), &[])?;
    assert!(!output.contents().contains(NOTICE));
  }
  let without_tests = project_without_tests(&temp_dir.path().join("without_tests"))?;
  for _ in 0..2 {
    let (engine, output) = observed_build();
    engine.run(&without_tests.build_plan(), &[])?;
    assert!(output.contents().contains(NOTICE));
  }
  Ok(())
}

#[rstest]
fn notice_decision_is_stable_under_parallel_task_execution(temp_dir: TempDir) -> TestResult {
  let project = project_with_passing_test(temp_dir.path())?;
  let output = OutputBuffer::new();
  let mut engine = BuildEngine::new().parallel();
  engine.add_listener(Arc::new(create_test_listener(&output)));
  engine.run(&project.build_plan(), &[])?;
  assert!(!output.contents().contains(NOTICE));
  Ok(())
}

#[rstest]
fn emission_failure_propagates_to_the_engine(temp_dir: TempDir) -> TestResult {
  // Silently failing to emit would be indistinguishable from "no notice needed".
  let project = project_without_tests(temp_dir.path())?;
  let mut engine = BuildEngine::new();
  engine.add_listener(Arc::new(VerificationObserver::with_policy(NoticePolicy::new(BrokenPipe))));
  let result = engine.run(&project.build_plan(), &[]);
  assert!(result.is_err());
  Ok(())
}

struct BrokenPipe;

impl io::Write for BrokenPipe {
  fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
    Err(io::Error::new(io::ErrorKind::BrokenPipe, "build output stream unavailable"))
  }
  fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

// Fixture project helpers

fn project_without_tests(root: &Path) -> io::Result<FixtureProject> {
  let mut project = FixtureProject::new(root);
  project.source("app.rs", "pub fn message() -> &'static str { \"hello\" }\n")?;
  Ok(project)
}

fn project_with_passing_test(root: &Path) -> io::Result<FixtureProject> {
  let mut project = FixtureProject::new(root);
  project.source("app.rs", "pub fn message() -> &'static str { \"hello\" }\n")?;
  project.test(
    "app_test.rs",
    "#[test]\nfn message_says_hello() { assert!(app::message().contains(\"hello\")); }\n",
  )?;
  Ok(project)
}
