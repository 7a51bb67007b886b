//! Input processing.
//!
//! Everything the game reads from the player goes through an [`Inkey`]
//! engine, which hands out one [`Event`] per request. Events come either from
//! the terminal or from a keymap that is currently being played back; callers
//! never need to know which.
//!
//! On top of the engine sit the consumers: the direction prompts in
//! [`direction`], the line editor in [`askfor`], and the small question
//! helpers in [`prompt`].

use std::fmt;

pub use crossterm::event::KeyCode;
pub use crossterm::event::MouseButton;

pub mod askfor;
pub mod direction;
pub mod keymap;
pub mod names;
pub mod prompt;
pub mod text;

mod inkey;

pub use inkey::Inkey;
pub use inkey::Request;
pub use inkey::INKEY_SCAN_PERIOD;
pub use keymap::KeymapMode;
pub use keymap::Keymaps;

bitflags::bitflags! {
  /// Modifier keys held while a key was pressed.
  pub struct Mods: u8 {
    const CONTROL = 1 << 0;
    const SHIFT = 1 << 1;
    const ALT = 1 << 2;
    const META = 1 << 3;
    /// The key came from the numeric keypad.
    const KEYPAD = 1 << 4;
  }
}

impl From<crossterm::event::KeyModifiers> for Mods {
  fn from(m: crossterm::event::KeyModifiers) -> Self {
    use crossterm::event::KeyModifiers;

    let mut mods = Mods::empty();
    if m.contains(KeyModifiers::CONTROL) {
      mods |= Mods::CONTROL;
    }
    if m.contains(KeyModifiers::SHIFT) {
      mods |= Mods::SHIFT;
    }
    if m.contains(KeyModifiers::ALT) {
      mods |= Mods::ALT;
    }
    mods
  }
}

/// A single key press: a key code plus whatever modifiers were held.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Keypress {
  /// The key itself.
  pub code: KeyCode,
  /// Modifiers held at the time.
  pub mods: Mods,
}

impl Keypress {
  /// The escape key.
  pub const ESCAPE: Keypress = Keypress::code(KeyCode::Esc);

  /// The enter/return key.
  pub const ENTER: Keypress = Keypress::code(KeyCode::Enter);

  /// Creates a new `Keypress`.
  pub const fn new(code: KeyCode, mods: Mods) -> Self {
    Self { code, mods }
  }

  /// Creates an unmodified `Keypress` for `code`.
  pub const fn code(code: KeyCode) -> Self {
    Self::new(code, Mods::empty())
  }

  /// Creates an unmodified `Keypress` for the character `c`.
  pub const fn char(c: char) -> Self {
    Self::code(KeyCode::Char(c))
  }

  /// Returns the character this key types, if it is a plain character key.
  ///
  /// Keys held with control, alt or meta do not count as plain.
  pub fn as_char(self) -> Option<char> {
    match self.code {
      KeyCode::Char(c)
        if !self
          .mods
          .intersects(Mods::CONTROL | Mods::ALT | Mods::META) =>
      {
        Some(c)
      }
      _ => None,
    }
  }

  /// Returns whether this key inserts a printable character.
  pub fn is_printable(self) -> bool {
    self.as_char().map(|c| !c.is_control()).unwrap_or(false)
  }

  /// Returns whether this is the escape key, regardless of modifiers.
  pub fn is_escape(self) -> bool {
    self.code == KeyCode::Esc
  }
}

impl From<char> for Keypress {
  fn from(c: char) -> Self {
    Self::char(c)
  }
}

impl From<crossterm::event::KeyEvent> for Keypress {
  fn from(e: crossterm::event::KeyEvent) -> Self {
    let mut mods = Mods::from(e.modifiers);
    // The terminal already folds shift into the character it reports, so
    // keeping the flag would make `A` and `Shift-A` two different keys.
    if let KeyCode::Char(_) = e.code {
      mods.remove(Mods::SHIFT);
    }
    Self::new(e.code, mods)
  }
}

impl fmt::Display for Keypress {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&text::keypress_to_text(&[*self]))
  }
}

/// A mouse click.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Click {
  /// The button that was pressed.
  pub button: MouseButton,
  /// The screen column.
  pub x: u16,
  /// The screen row.
  pub y: u16,
  /// Modifiers held at the time.
  pub mods: Mods,
}

/// A single input event.
///
/// Every event handed out by an [`Inkey`] is consumed exactly once.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Event {
  /// Nothing happened (an instant or scanning request came up empty).
  None,
  /// A key was pressed.
  Key(Keypress),
  /// A mouse button was pressed.
  Mouse(Click),
  /// The terminal asked for the current interaction to be abandoned.
  Escape,
  /// An on-screen button was activated; it stands for the given key.
  Button(Keypress),
}

impl Event {
  /// Returns the keypress carried by this event, if any.
  pub fn key(self) -> Option<Keypress> {
    match self {
      Self::Key(k) | Self::Button(k) => Some(k),
      _ => None,
    }
  }

  /// Returns whether this is [`Event::None`].
  pub fn is_none(self) -> bool {
    self == Self::None
  }
}

impl From<Keypress> for Event {
  fn from(k: Keypress) -> Self {
    Self::Key(k)
  }
}
