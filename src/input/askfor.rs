//! Single-line text entry.
//!
//! [`Inkey::ask_for()`] runs an edit loop over an [`EditBuffer`], feeding one
//! keypress at a time to an [`EditHandler`] until the handler says it is done.
//! The handler sees whether each key is the first of the session: a freshly
//! shown default value is highlighted, and typing over it replaces it
//! outright.

use std::fmt;

use crate::input::names::NameSource;
use crate::input::Inkey;
use crate::input::KeyCode;
use crate::input::Keypress;
use crate::term::Style;
use crate::term::Terminal;

/// A line of text being edited, with a cursor.
///
/// The buffer holds at most `capacity - 1` characters, and the cursor is never
/// past the end of the text.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EditBuffer {
  chars: Vec<char>,
  cursor: usize,
  capacity: usize,
}

impl EditBuffer {
  /// Creates a buffer holding `initial`, cut to fit, with the cursor at the
  /// end.
  ///
  /// # Panics
  ///
  /// Panics if `capacity` is zero.
  pub fn new(initial: &str, capacity: usize) -> Self {
    assert!(capacity > 0, "edit buffer with no capacity");
    let mut buf = Self {
      chars: Vec::with_capacity(capacity),
      cursor: 0,
      capacity,
    };
    buf.set(initial);
    buf
  }

  /// Returns the capacity this buffer was created with.
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// Returns the length of the text, in characters.
  pub fn len(&self) -> usize {
    self.chars.len()
  }

  /// Returns whether the buffer holds no text.
  pub fn is_empty(&self) -> bool {
    self.chars.is_empty()
  }

  /// Returns whether another character would not fit.
  pub fn is_full(&self) -> bool {
    self.len() + 1 >= self.capacity
  }

  /// Returns the cursor position, in characters.
  pub fn cursor(&self) -> usize {
    self.cursor
  }

  /// Replaces the text, cutting it to fit, and moves the cursor to its end.
  pub fn set(&mut self, text: &str) {
    self.chars.clear();
    self.chars.extend(text.chars().take(self.capacity - 1));
    self.cursor = self.len();
  }

  /// Empties the buffer.
  pub fn clear(&mut self) {
    self.chars.clear();
    self.cursor = 0;
  }

  /// Inserts `c` at the cursor. Returns `false`, changing nothing, if the
  /// buffer is full.
  pub fn insert(&mut self, c: char) -> bool {
    if self.is_full() {
      return false;
    }
    self.chars.insert(self.cursor, c);
    self.cursor += 1;
    true
  }

  /// Deletes the character before the cursor, if there is one.
  pub fn backspace(&mut self) {
    if self.cursor > 0 {
      self.cursor -= 1;
      self.chars.remove(self.cursor);
    }
  }

  /// Deletes the character under the cursor, if there is one.
  pub fn delete(&mut self) {
    if self.cursor < self.len() {
      self.chars.remove(self.cursor);
    }
  }

  /// Moves the cursor, clamping it to the text.
  pub fn move_to(&mut self, cursor: usize) {
    self.cursor = cursor.min(self.len());
  }
}

impl fmt::Display for EditBuffer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.chars.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
  }
}

/// What an edit handler made of a keypress.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Edit {
  /// Keep editing.
  Pending,
  /// Editing is over.
  Done,
  /// The key was rejected; the bell rings and editing goes on.
  Refused,
}

/// Decides what each keypress does to an [`EditBuffer`].
pub trait EditHandler {
  /// Applies `key` to `buf`. `first` is set for the first key of the session.
  fn handle(
    &mut self,
    buf: &mut EditBuffer,
    key: Keypress,
    first: bool,
  ) -> Edit;
}

impl<F> EditHandler for F
where
  F: FnMut(&mut EditBuffer, Keypress, bool) -> Edit,
{
  fn handle(
    &mut self,
    buf: &mut EditBuffer,
    key: Keypress,
    first: bool,
  ) -> Edit {
    self(buf, key, first)
  }
}

/// The standard line-editing keys.
///
/// - Escape leaves the text alone and puts the cursor at the start; Enter puts
///   it at the end. Both end editing.
/// - Left and Right move the cursor. As the first key, they jump to the start
///   or end instead.
/// - Backspace and Delete erase a character. As the first key, they erase the
///   whole default.
/// - Printable characters are inserted at the cursor. As the first key, they
///   replace the default. Characters that don't fit are refused.
///
/// Everything else is refused.
pub fn default_edit(buf: &mut EditBuffer, key: Keypress, first: bool) -> Edit {
  match key.code {
    KeyCode::Esc => {
      buf.move_to(0);
      return Edit::Done;
    }
    KeyCode::Enter => {
      buf.move_to(buf.len());
      return Edit::Done;
    }
    KeyCode::Left if first => buf.move_to(0),
    KeyCode::Left => buf.move_to(buf.cursor().saturating_sub(1)),
    KeyCode::Right if first => buf.move_to(buf.len()),
    KeyCode::Right => buf.move_to(buf.cursor() + 1),
    KeyCode::Backspace | KeyCode::Delete if first => buf.clear(),
    KeyCode::Backspace => buf.backspace(),
    KeyCode::Delete => buf.delete(),
    _ => {
      let c = match key.as_char() {
        Some(c) if key.is_printable() => c,
        _ => return Edit::Refused,
      };
      if first {
        buf.clear();
      }
      if !buf.insert(c) {
        return Edit::Refused;
      }
    }
  }
  Edit::Pending
}

/// [`default_edit()`] as an [`EditHandler`].
#[derive(Copy, Clone, Default, Debug)]
pub struct DefaultEdit;

impl EditHandler for DefaultEdit {
  fn handle(
    &mut self,
    buf: &mut EditBuffer,
    key: Keypress,
    first: bool,
  ) -> Edit {
    default_edit(buf, key, first)
  }
}

/// Accepts only digits, plus the keys needed to finish or fix the input.
/// Anything else is ignored without complaint.
#[derive(Copy, Clone, Default, Debug)]
pub struct NumericEdit;

impl EditHandler for NumericEdit {
  fn handle(
    &mut self,
    buf: &mut EditBuffer,
    key: Keypress,
    first: bool,
  ) -> Edit {
    let allowed = match key.code {
      KeyCode::Esc
      | KeyCode::Enter
      | KeyCode::Left
      | KeyCode::Right
      | KeyCode::Backspace
      | KeyCode::Delete => true,
      _ => key.as_char().map(|c| c.is_ascii_digit()).unwrap_or(false),
    };
    if allowed {
      default_edit(buf, key, first)
    } else {
      Edit::Pending
    }
  }
}

/// The standard editing keys, plus `*` for a random name.
pub struct NameEdit<'a> {
  names: &'a mut dyn NameSource,
}

impl<'a> NameEdit<'a> {
  /// Creates a handler that draws random names from `names`.
  pub fn new(names: &'a mut dyn NameSource) -> Self {
    Self { names }
  }
}

impl EditHandler for NameEdit<'_> {
  fn handle(
    &mut self,
    buf: &mut EditBuffer,
    key: Keypress,
    first: bool,
  ) -> Edit {
    if key.as_char() == Some('*') {
      let name = self.names.random_name(buf.capacity() - 1);
      buf.set(&name);
      return Edit::Pending;
    }
    default_edit(buf, key, first)
  }
}

impl<T: Terminal> Inkey<T> {
  /// Lets the player edit `buf` at the given screen position.
  ///
  /// Returns `false` if editing ended with Escape, and `true` otherwise. The
  /// buffer is left as the handler made it either way; callers that want to
  /// throw edits away on Escape must keep their own copy.
  pub fn ask_for(
    &mut self,
    row: u16,
    col: u16,
    buf: &mut EditBuffer,
    handler: &mut dyn EditHandler,
  ) -> bool {
    self.term_mut().push_context();

    let mut first = true;
    let accepted = loop {
      let style = if first { Style::Highlight } else { Style::Normal };
      let text = buf.to_string();
      let term = self.term_mut();
      term.clear_line(row, col);
      term.print(row, col, &text, style);
      term.set_cursor(Some((row, col.saturating_add(buf.cursor() as u16))));

      let key = self.only_keypress();
      match handler.handle(buf, key, first) {
        Edit::Pending => {}
        Edit::Done => break !key.is_escape(),
        Edit::Refused => self.bell("illegal edit key"),
      }
      first = false;
    };

    let term = self.term_mut();
    term.set_cursor(None);
    term.pop_context();
    accepted
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use proptest::prelude::*;

  use crate::config::Options;
  use crate::input::text::keypress_from_text;
  use crate::input::Mods;
  use crate::term::ScriptTerminal;

  fn buf(text: &str, cap: usize) -> EditBuffer {
    EditBuffer::new(text, cap)
  }

  fn edit(b: &mut EditBuffer, keys: &str) -> Vec<Edit> {
    keypress_from_text(keys)
      .unwrap()
      .into_iter()
      .enumerate()
      .map(|(i, k)| default_edit(b, k, i == 0))
      .collect()
  }

  struct FixedName(&'static str);
  impl NameSource for FixedName {
    fn random_name(&mut self, max_len: usize) -> String {
      self.0.chars().take(max_len).collect()
    }
  }

  #[test]
  fn initial_text_is_cut_to_fit() {
    let b = buf("abcdef", 4);
    assert_eq!(b.to_string(), "abc");
    assert_eq!(b.cursor(), 3);
    assert!(b.is_full());
  }

  #[test]
  fn typing_replaces_default() {
    let mut b = buf("Default", 16);
    edit(&mut b, "xy");
    assert_eq!(b.to_string(), "xy");
  }

  #[test]
  fn backspace_first_clears_default() {
    let mut b = buf("Default", 16);
    edit(&mut b, "[Backspace]");
    assert_eq!(b.to_string(), "");

    let mut b = buf("abc", 16);
    edit(&mut b, "x[Backspace][Backspace][Backspace]");
    assert_eq!(b.to_string(), "");
    assert_eq!(b.cursor(), 0);
  }

  #[test]
  fn arrows_keep_default() {
    let mut b = buf("abc", 16);
    edit(&mut b, "[Left]x");
    assert_eq!(b.to_string(), "xabc");

    let mut b = buf("abc", 16);
    edit(&mut b, "[Right][Left]x[Delete]");
    assert_eq!(b.to_string(), "abx");
  }

  #[test]
  fn arrows_are_clamped() {
    let mut b = buf("ab", 16);
    edit(&mut b, "[Right][Right][Right]");
    assert_eq!(b.cursor(), 2);
    edit(&mut b, "[Left][Left][Left][Left]");
    assert_eq!(b.cursor(), 0);
  }

  #[test]
  fn erasing_at_the_edges_does_nothing() {
    let mut b = buf("ab", 16);
    let results = edit(&mut b, "[Left][Backspace]");
    assert_eq!(results, vec![Edit::Pending, Edit::Pending]);
    assert_eq!(b.to_string(), "ab");

    let results = edit(&mut b, "[Right][Delete]");
    assert_eq!(results, vec![Edit::Pending, Edit::Pending]);
    assert_eq!(b.to_string(), "ab");
  }

  #[test]
  fn full_buffer_refuses() {
    let mut b = buf("", 4);
    let results = edit(&mut b, "abcd");
    assert_eq!(results[3], Edit::Refused);
    assert_eq!(b.to_string(), "abc");
  }

  #[test]
  fn escape_keeps_text() {
    let mut b = buf("abc", 16);
    let results = edit(&mut b, "[Right]d[Escape]");
    assert_eq!(results[2], Edit::Done);
    assert_eq!(b.to_string(), "abcd");
    assert_eq!(b.cursor(), 0);
  }

  #[test]
  fn odd_keys_are_refused() {
    let mut b = buf("abc", 16);
    let tab = Keypress::code(KeyCode::Tab);
    assert_eq!(default_edit(&mut b, tab, false), Edit::Refused);
    let ctrl_a = Keypress::new(KeyCode::Char('a'), Mods::CONTROL);
    assert_eq!(default_edit(&mut b, ctrl_a, false), Edit::Refused);
    assert_eq!(b, buf("abc", 16));
  }

  #[test]
  fn numeric_ignores_letters() {
    let mut b = buf("1", 8);
    let mut h = NumericEdit;
    assert_eq!(h.handle(&mut b, 'x'.into(), true), Edit::Pending);
    assert_eq!(b.to_string(), "1");
    assert_eq!(h.handle(&mut b, '4'.into(), true), Edit::Pending);
    assert_eq!(h.handle(&mut b, '2'.into(), false), Edit::Pending);
    let tab = Keypress::code(KeyCode::Tab);
    assert_eq!(h.handle(&mut b, tab, false), Edit::Pending);
    assert_eq!(b.to_string(), "42");
    assert_eq!(h.handle(&mut b, Keypress::ENTER, false), Edit::Done);
  }

  #[test]
  fn star_picks_a_name() {
    let mut names = FixedName("Gandalf the Grey");
    let mut h = NameEdit::new(&mut names);
    let mut b = buf("Bob", 8);
    assert_eq!(h.handle(&mut b, '*'.into(), true), Edit::Pending);
    assert_eq!(b.to_string(), "Gandalf");
    assert_eq!(b.cursor(), 7);
    let bs = Keypress::code(KeyCode::Backspace);
    assert_eq!(h.handle(&mut b, bs, false), Edit::Pending);
    assert_eq!(b.to_string(), "Gandal");
  }

  fn ask(
    keys: &str,
    initial: &str,
    h: &mut dyn EditHandler,
  ) -> (bool, String, ScriptTerminal) {
    let term = ScriptTerminal::with_keys(keypress_from_text(keys).unwrap());
    let mut ik = Inkey::new(term, Options::default());
    let mut b = buf(initial, 16);
    let ok = ik.ask_for(2, 5, &mut b, h);
    (ok, b.to_string(), ik.into_term())
  }

  #[test]
  fn ask_for_accepts_on_enter() {
    let (ok, text, term) = ask("hi[Enter]", "old", &mut DefaultEdit);
    assert!(ok);
    assert_eq!(text, "hi");
    assert_eq!(term.depth(), 0);
    assert_eq!(term.max_depth, 1);
    assert_eq!(term.cursor(), None);
    assert_eq!(term.row(2), "     hi");
  }

  #[test]
  fn ask_for_rejects_on_escape_for_every_handler() {
    let mut names = FixedName("Zed");
    let handlers: Vec<Box<dyn EditHandler + '_>> = vec![
      Box::new(DefaultEdit),
      Box::new(NumericEdit),
      Box::new(NameEdit::new(&mut names)),
    ];
    for mut h in handlers {
      let (ok, text, term) = ask("1*[Escape]", "9", &mut *h);
      assert!(!ok);
      assert!(!text.is_empty());
      assert_eq!(term.depth(), 0);
    }
  }

  #[test]
  fn ask_for_rings_on_refusal() {
    let (ok, text, term) = ask("[Tab]a[Enter]", "", &mut DefaultEdit);
    assert!(ok);
    assert_eq!(text, "a");
    assert_eq!(term.bells, 1);
  }

  #[test]
  fn ask_for_takes_closures() {
    let mut upper = |b: &mut EditBuffer, k: Keypress, first: bool| {
      let k = match k.as_char() {
        Some(c) => Keypress::char(c.to_ascii_uppercase()),
        None => k,
      };
      default_edit(b, k, first)
    };
    let (ok, text, _) = ask("abc[Enter]", "", &mut upper);
    assert!(ok);
    assert_eq!(text, "ABC");
  }

  #[test]
  fn click_confirms() {
    use crate::input::Click;
    use crate::input::Event;
    use crate::input::MouseButton;

    let mut term = ScriptTerminal::with_keys(vec![Keypress::char('x')]);
    term.push(Event::Mouse(Click {
      button: MouseButton::Left,
      x: 0,
      y: 0,
      mods: Mods::empty(),
    }));
    let mut ik = Inkey::new(term, Options::default());
    let mut b = buf("", 8);
    assert!(ik.ask_for(0, 0, &mut b, &mut DefaultEdit));
    assert_eq!(b.to_string(), "x");
  }

  fn key() -> impl Strategy<Value = Keypress> {
    prop_oneof![
      (b' '..=b'~').prop_map(|b| Keypress::char(b as char)),
      prop::sample::select(vec![
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Backspace,
        KeyCode::Delete,
        KeyCode::Tab,
        KeyCode::Home,
      ])
      .prop_map(Keypress::code),
    ]
  }

  proptest! {
    #[test]
    fn cursor_stays_in_bounds(
      cap in 1usize..10,
      initial in "[a-z]{0,12}",
      keys in prop::collection::vec(key(), 0..40),
    ) {
      let mut b = EditBuffer::new(&initial, cap);
      for (i, k) in keys.into_iter().enumerate() {
        default_edit(&mut b, k, i == 0);
        prop_assert!(b.cursor() <= b.len());
        prop_assert!(b.len() < b.capacity());
      }
    }
  }
}
