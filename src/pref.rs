//! Keymap pref files.
//!
//! The format is line-based, and is what [`Keymaps::dump()`] writes out:
//!
//! ```text
//! # Comments and blank lines are ignored.
//! keymap-act:<action keys>
//! keymap-input:<mode>:<trigger key>
//! ```
//!
//! A `keymap-act` line sets the action for every `keymap-input` line after it,
//! up to the next `keymap-act`. Other directives belong to other parts of the
//! game and are skipped.

use std::fs;
use std::path::Path;

use crate::error::ParseError;
use crate::error::Result;
use crate::input::keymap::KEYMAP_ACTION_MAX;
use crate::input::text::keypress_from_text;
use crate::input::text::single_keypress_from_text;
use crate::input::KeymapMode;
use crate::input::Keymaps;
use crate::input::Keypress;

/// Loads every keymap in `text` into `keymaps`.
///
/// `user` is passed on to [`Keymaps::add()`]. Returns the number of keymaps
/// added; on error, keymaps from lines before the bad one stay added.
pub fn load_keymaps(
  text: &str,
  keymaps: &mut Keymaps,
  user: bool,
) -> std::result::Result<usize, ParseError> {
  let mut action: Option<Vec<Keypress>> = None;
  let mut added = 0;

  for (i, line) in text.lines().enumerate() {
    let line_no = i + 1;
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let (directive, rest) = match line.split_once(':') {
      Some(split) => split,
      None => {
        return Err(ParseError::at_line(
          format!("expected `directive:value`, got {:?}", line),
          line_no,
        ))
      }
    };

    match directive {
      "keymap-act" => {
        let keys = keypress_from_text(rest)
          .map_err(|e| ParseError::at_line(e.to_string(), line_no))?;
        if keys.len() > KEYMAP_ACTION_MAX {
          return Err(ParseError::at_line(
            format!(
              "keymap action is {} keys long; the limit is {}",
              keys.len(),
              KEYMAP_ACTION_MAX
            ),
            line_no,
          ));
        }
        action = Some(keys);
      }
      "keymap-input" => {
        let (mode, trigger) = rest.split_once(':').ok_or_else(|| {
          ParseError::at_line("expected `keymap-input:mode:key`", line_no)
        })?;
        let mode = mode
          .parse::<usize>()
          .ok()
          .and_then(KeymapMode::from_index)
          .ok_or_else(|| {
            ParseError::at_line(format!("bad keymap mode {:?}", mode), line_no)
          })?;
        let trigger = single_keypress_from_text(trigger)
          .map_err(|e| ParseError::at_line(e.to_string(), line_no))?;
        let action = action.as_deref().ok_or_else(|| {
          ParseError::at_line("keymap-input before any keymap-act", line_no)
        })?;

        keymaps.add(mode, trigger, action, user);
        added += 1;
      }
      other => {
        tracing::debug!(
          directive = other,
          line = line_no,
          "skipping pref line"
        );
      }
    }
  }

  tracing::debug!(added, user, "keymaps loaded");
  Ok(added)
}

/// Loads the keymaps in the pref file at `path`.
pub fn load_keymap_file(
  path: impl AsRef<Path>,
  keymaps: &mut Keymaps,
  user: bool,
) -> Result<usize> {
  let path = path.as_ref();
  let text = fs::read_to_string(path)?;
  let added = load_keymaps(&text, keymaps, user)?;
  tracing::info!(path = %path.display(), added, "read keymap file");
  Ok(added)
}
