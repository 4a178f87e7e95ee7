use std::{
  backtrace::{Backtrace, BacktraceStatus},
  fmt::{Debug, Display},
};

pub struct AppError {
  err: anyhow::Error,
}

impl AppError {
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self { err: err.into() }
  }

  /// Get backtrace from anyhow (requires `RUST_BACKTRACE=1` to capture)
  pub fn backtrace(&self) -> &Backtrace {
    self.err.backtrace()
  }

  /// Iterate the error and its causes, outermost first
  pub fn chain(&self) -> anyhow::Chain<'_> {
    self.err.chain()
  }

  #[must_use]
  pub fn into_inner(self) -> anyhow::Error {
    self.err
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if f.alternate() {
      write!(f, "{:#}", self.err)
    } else {
      write!(f, "{}", self.err)
    }
  }
}

// `main` returns `Result<(), AppError>`, so this is what the user sees on failure.
impl Debug for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{:#}", self.err)?;
    let bt = self.err.backtrace();
    if bt.status() == BacktraceStatus::Captured {
      write!(f, "\nBacktrace:\n{bt}")?;
    }
    Ok(())
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}
