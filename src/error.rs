//! Error types.
//!
//! Almost nothing in the input layer can fail: rejected keystrokes ring the
//! bell and cancellation is an ordinary return value. Errors only show up at
//! the edges, where text from disk is parsed or the terminal is set up.

use std::fmt;
use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for fallible input-layer operations.
pub type Result<T> = StdResult<T, Error>;

/// A parse failure, optionally tagged with the line it occurred on.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
#[error("{message}")]
pub struct ParseError {
  message: String,
}

impl ParseError {
  /// Creates a parse error from a message.
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }

  /// Creates a parse error that points at a (1-based) line.
  pub fn at_line(message: impl Into<String>, line: usize) -> Self {
    Self {
      message: format!("{} (line {})", message.into(), line),
    }
  }
}

/// The crate's error type.
#[derive(Error, Debug)]
pub enum Error {
  /// The terminal backend failed.
  #[error("terminal: {0}")]
  Terminal(String),

  /// A preference or config file could not be read.
  #[error("io: {0}")]
  Io(#[from] io::Error),

  /// Keypress text or a pref line was malformed.
  #[error("parse error: {0}")]
  Parse(#[from] ParseError),

  /// The options file was not valid TOML for [`crate::config::Options`].
  #[error("config: {0}")]
  Config(#[from] toml::de::Error),
}

impl Error {
  /// Wraps a backend error.
  ///
  /// The terminal library has its own error type; only its message is kept.
  pub fn terminal(e: impl fmt::Display) -> Self {
    Self::Terminal(e.to_string())
  }
}
