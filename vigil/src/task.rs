use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a task in the host build engine's execution graph. The host owns task identities;
/// this crate only reads them.
///
/// `Send + Sync` because the host may hand out task references from its worker threads.
pub trait TaskRef: Clone + Eq + Hash + Debug + Send + Sync + 'static {
  /// The stable path of this task within the build, for example `:app:test`.
  fn path(&self) -> &str;

  /// The final segment of [`path`](Self::path): the task's name without its project prefix.
  #[inline]
  fn name(&self) -> &str {
    match self.path().rfind(':') {
      Some(index) => &self.path()[index + 1..],
      None => self.path(),
    }
  }
}

/// Canonical owned [`TaskRef`]: a `:`-separated task path such as `:test` or `:app:test`.
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskPath(String);

impl TaskPath {
  #[inline]
  pub fn new(path: impl Into<String>) -> Self { Self(path.into()) }
}

impl TaskRef for TaskPath {
  #[inline]
  fn path(&self) -> &str { &self.0 }
}

impl From<&str> for TaskPath {
  #[inline]
  fn from(path: &str) -> Self { Self::new(path) }
}

impl From<String> for TaskPath {
  #[inline]
  fn from(path: String) -> Self { Self::new(path) }
}

impl fmt::Display for TaskPath {
  #[inline]
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(&self.0) }
}

/// Terminal state the host engine reports for a finished task.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskState {
  /// The task executed and succeeded.
  Success,
  /// The task executed and failed.
  Failure,
  /// The host decided not to execute the task, for example because it had no work to do.
  Skipped,
  /// The task's outputs were already up-to-date, so the host elided its actions.
  UpToDate,
}

/// Identifies verification tasks by name. The canonical verification task is `test`.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct VerificationMatcher {
  name: String,
}

impl Default for VerificationMatcher {
  #[inline]
  fn default() -> Self { Self::for_name("test") }
}

impl VerificationMatcher {
  /// Matcher for verification tasks named `name`, for hosts whose verification task is not the
  /// canonical `test`.
  #[inline]
  pub fn for_name(name: impl Into<String>) -> Self { Self { name: name.into() } }

  /// Returns `true` if `task` is a verification task.
  #[inline]
  pub fn matches(&self, task: &impl TaskRef) -> bool { task.name() == self.name }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_is_final_path_segment() {
    assert_eq!(TaskPath::from(":app:test").name(), "test");
    assert_eq!(TaskPath::from(":test").name(), "test");
    assert_eq!(TaskPath::from("test").name(), "test");
  }

  #[test]
  fn default_matcher_matches_canonical_test_task() {
    let matcher = VerificationMatcher::default();
    assert!(matcher.matches(&TaskPath::from(":test")));
    assert!(matcher.matches(&TaskPath::from(":app:test")));
    assert!(!matcher.matches(&TaskPath::from(":compile")));
    assert!(!matcher.matches(&TaskPath::from(":integrationTest")));
  }
}
