use thiserror::Error;

/// Errors raised by the engine itself, as opposed to the application errors
/// that travel through a stream's `Err` channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RxError {
  /// The subject was forcibly disposed and holds no state any more.
  #[error("the subject has been disposed")]
  Disposed,
  /// The subject terminated with an error, so it has no current value.
  #[error("the subject terminated with an error")]
  Terminated,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_messages() {
    assert_eq!(RxError::Disposed.to_string(), "the subject has been disposed");
    assert_eq!(RxError::Terminated.to_string(), "the subject terminated with an error");
  }
}
