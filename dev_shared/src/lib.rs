//! Development-only support for testing the build observer: a scripted stand-in for a host build
//! engine, fixture project scaffolding, an in-memory output stream, and rstest fixtures.

use tempfile::TempDir;

pub mod engine;
pub mod output;
pub mod project;
pub mod test;

pub fn create_temp_dir() -> TempDir {
  tempfile::tempdir().expect("failed to create temporary directory")
}
