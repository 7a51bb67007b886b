//! Player options that influence input handling.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Options consulted by the input layer.
///
/// These mirror the handful of birth/interface options the rest of the game
/// lets the player toggle. Every field has a default, so a config file only
/// needs to mention what it changes:
///
/// ```toml
/// lazy_move_delay = 5
/// rogue_like = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
  /// How many scan periods to wait for a second, disambiguating direction
  /// key. Zero turns lazy movement off.
  pub lazy_move_delay: u32,

  /// Never stop for "-more-" prompts.
  pub auto_more: bool,

  /// Aim at the current target without asking, when it is still valid.
  pub use_old_target: bool,

  /// Use the roguelike control scheme (and its keymaps).
  pub rogue_like: bool,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      lazy_move_delay: 0,
      auto_more: false,
      use_old_target: false,
      rogue_like: false,
    }
  }
}

impl Options {
  /// Parses options from TOML text.
  pub fn from_toml(text: &str) -> Result<Self> {
    Ok(toml::from_str(text)?)
  }

  /// Loads options from a TOML file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let opts = Self::from_toml(&text)?;
    tracing::debug!(path = %path.display(), ?opts, "loaded options");
    Ok(opts)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_file_keeps_defaults() {
    let opts = Options::from_toml("lazy_move_delay = 5\n").unwrap();
    assert_eq!(opts.lazy_move_delay, 5);
    assert!(!opts.auto_more);
    assert!(!opts.rogue_like);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    assert!(Options::from_toml("lazy_mvoe_delay = 5\n").is_err());
  }
}
