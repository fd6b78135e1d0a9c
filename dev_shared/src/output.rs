use std::io;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable in-memory writer standing in for a build's standard output stream. All clones write
/// to the same buffer, so the notice policy and a logging listener can share one "stream" while
/// the test keeps a handle for assertions.
#[derive(Clone, Debug, Default)]
pub struct OutputBuffer {
  buffer: Arc<Mutex<Vec<u8>>>,
}

impl OutputBuffer {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Everything written so far, lossily decoded as UTF-8.
  pub fn contents(&self) -> String {
    let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
    String::from_utf8_lossy(&buffer).into_owned()
  }
}

impl Write for OutputBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
    buffer.extend_from_slice(buf);
    Ok(buf.len())
  }
  fn flush(&mut self) -> io::Result<()> { Ok(()) }
}
