//! Keymaps.
//!
//! A keymap replaces a single trigger key with a sequence of keys (the
//! "action"), which the [`Inkey`](crate::input::Inkey) engine then plays back
//! as if the player had typed it. Keymaps are kept separately for each control
//! scheme, so the same trigger can mean different things in the original and
//! roguelike key sets.

use std::collections::HashMap;
use std::io;

use crate::input::text::keypress_to_text;
use crate::input::Keypress;

/// The longest action a keymap may hold.
///
/// This is also the capacity of the engine's playback buffer.
pub const KEYMAP_ACTION_MAX: usize = 20;

/// A control scheme, each of which has its own set of keymaps.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum KeymapMode {
  /// The original (numpad-centric) key set.
  Original = 0,
  /// The roguelike (`hjkl`) key set.
  Roguelike = 1,
}

impl KeymapMode {
  /// Every mode, in index order.
  pub const ALL: [KeymapMode; 2] =
    [KeymapMode::Original, KeymapMode::Roguelike];

  /// Returns the index used for this mode in pref files.
  pub fn index(self) -> usize {
    self as usize
  }

  /// Looks up a mode by its pref-file index.
  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }
}

#[derive(Clone, Debug)]
struct Entry {
  action: Box<[Keypress]>,
  user: bool,
}

/// The keymap table, for every mode.
#[derive(Clone, Debug, Default)]
pub struct Keymaps {
  modes: [HashMap<Keypress, Entry>; 2],
}

impl Keymaps {
  /// Creates an empty table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Finds the action bound to `trigger` in `mode`.
  pub fn find(
    &self,
    mode: KeymapMode,
    trigger: Keypress,
  ) -> Option<&[Keypress]> {
    self.modes[mode.index()]
      .get(&trigger)
      .map(|e| &*e.action)
  }

  /// Binds `trigger` to a copy of `action` in `mode`, replacing any previous
  /// binding.
  ///
  /// `user` marks keymaps the player made themselves; only those are written
  /// out by [`Keymaps::dump()`].
  ///
  /// # Panics
  ///
  /// Panics if `action` is longer than [`KEYMAP_ACTION_MAX`].
  pub fn add(
    &mut self,
    mode: KeymapMode,
    trigger: Keypress,
    action: &[Keypress],
    user: bool,
  ) {
    assert!(
      action.len() <= KEYMAP_ACTION_MAX,
      "keymap action for {} is {} keys long; the limit is {}",
      trigger,
      action.len(),
      KEYMAP_ACTION_MAX,
    );

    self.remove(mode, trigger);
    self.modes[mode.index()].insert(
      trigger,
      Entry {
        action: action.into(),
        user,
      },
    );
    tracing::trace!(
      ?mode,
      %trigger,
      action = %keypress_to_text(action),
      user,
      "keymap added"
    );
  }

  /// Removes the binding for `trigger` in `mode`.
  ///
  /// Returns whether there was one.
  pub fn remove(&mut self, mode: KeymapMode, trigger: Keypress) -> bool {
    self.modes[mode.index()].remove(&trigger).is_some()
  }

  /// Drops every keymap in every mode.
  pub fn free_all(&mut self) {
    for mode in &mut self.modes {
      mode.clear();
    }
  }

  /// Returns the number of keymaps bound in `mode`.
  pub fn len(&self, mode: KeymapMode) -> usize {
    self.modes[mode.index()].len()
  }

  /// Returns whether no keymaps are bound in any mode.
  pub fn is_empty(&self) -> bool {
    self.modes.iter().all(HashMap::is_empty)
  }

  /// Writes the user keymaps of `mode` to `w` in pref-file form.
  ///
  /// Each keymap becomes a `keymap-act` line, a `keymap-input` line and a
  /// blank line. Built-in keymaps are skipped, so that a user pref file does
  /// not end up duplicating the game's own.
  pub fn dump(
    &self,
    w: &mut impl io::Write,
    mode: KeymapMode,
  ) -> io::Result<()> {
    let mut lines = self.modes[mode.index()]
      .iter()
      .filter(|(_, e)| e.user)
      .map(|(trigger, e)| {
        (keypress_to_text(&[*trigger]), keypress_to_text(&e.action))
      })
      .collect::<Vec<_>>();
    lines.sort();

    for (trigger, action) in lines {
      writeln!(w, "keymap-act:{}", action)?;
      writeln!(w, "keymap-input:{}:{}", mode.index(), trigger)?;
      writeln!(w)?;
    }
    Ok(())
  }
}
