//! Fixture project scaffolding: writes a project layout into a (temporary) directory and derives
//! the build plan a host engine would assemble for it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use vigil::TaskState;

use crate::engine::TaskSpec;

/// A fixture project: source files under `src/`, test sources under `tests/`.
///
/// The derived [build plan](Self::build_plan) mirrors a host engine's: `:compile` and `:assemble`
/// always run; the `:test` task is planned whenever the project has test support, and reports
/// [`TaskState::Skipped`] when there are no test sources to run. A project
/// [without test support](Self::without_test_support) plans no `:test` task at all.
pub struct FixtureProject {
  root: PathBuf,
  test_support: bool,
  failing_tests: bool,
}

impl FixtureProject {
  /// Project with test support and no files yet.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into(), test_support: true, failing_tests: false }
  }

  /// Project whose build defines no verification task at all.
  pub fn without_test_support(root: impl Into<PathBuf>) -> Self {
    Self { test_support: false, ..Self::new(root) }
  }

  #[inline]
  pub fn root(&self) -> &Path { &self.root }

  /// Writes a source file under `src/`.
  pub fn source(&mut self, name: &str, contents: &str) -> io::Result<&mut Self> {
    self.write("src", name, contents)?;
    Ok(self)
  }

  /// Writes a test source under `tests/`. The `:test` task will report success.
  pub fn test(&mut self, name: &str, contents: &str) -> io::Result<&mut Self> {
    self.write("tests", name, contents)?;
    Ok(self)
  }

  /// Writes a test source under `tests/` whose assertions fail. The `:test` task will report
  /// failure.
  pub fn failing_test(&mut self, name: &str, contents: &str) -> io::Result<&mut Self> {
    self.write("tests", name, contents)?;
    self.failing_tests = true;
    Ok(self)
  }

  fn write(&self, dir: &str, name: &str, contents: &str) -> io::Result<()> {
    let path = self.root.join(dir).join(name);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
  }

  fn has_test_sources(&self) -> bool {
    fs::read_dir(self.root.join("tests")).map(|mut dir| dir.next().is_some()).unwrap_or(false)
  }

  /// The build plan a host engine would assemble for this project.
  pub fn build_plan(&self) -> Vec<TaskSpec> {
    let mut plan = vec![TaskSpec::new(":compile", TaskState::Success)];
    if self.test_support {
      let state = if !self.has_test_sources() {
        TaskState::Skipped
      } else if self.failing_tests {
        TaskState::Failure
      } else {
        TaskState::Success
      };
      plan.push(TaskSpec::new(":test", state));
    }
    plan.push(TaskSpec::new(":assemble", TaskState::Success));
    plan
  }
}
