//! Questions asked on the prompt line.
//!
//! All of these draw on the top row of the screen and clean up after
//! themselves. Whenever the player can back out with Escape, the answer comes
//! back as an `Option`, and `None` means they did.

use crate::input::askfor::DefaultEdit;
use crate::input::askfor::EditBuffer;
use crate::input::askfor::EditHandler;
use crate::input::askfor::NameEdit;
use crate::input::askfor::NumericEdit;
use crate::input::names::NameSource;
use crate::input::Event;
use crate::input::Inkey;
use crate::input::Keypress;
use crate::term::Style;
use crate::term::Terminal;

/// The screen row prompts are shown on.
pub const PROMPT_ROW: u16 = 0;

/// Room for a character name, including the slot the editor keeps free.
pub const NAME_CAPACITY: usize = 32;

/// Room for a quantity: every digit of a `u32`, plus one.
const QUANTITY_CAPACITY: usize = 11;

impl<T: Terminal> Inkey<T> {
  /// Shows `text` on the prompt line, replacing whatever was there.
  pub fn prompt(&mut self, text: &str) {
    let term = self.term_mut();
    term.clear_line(PROMPT_ROW, 0);
    term.print(PROMPT_ROW, 0, text, Style::Normal);
  }

  /// Clears the prompt line.
  pub fn clear_prompt(&mut self) {
    self.term_mut().clear_line(PROMPT_ROW, 0);
  }

  /// Asks for a single command key. Returns `None` on Escape.
  pub fn get_com(&mut self, prompt: &str) -> Option<Keypress> {
    self.prompt(prompt);
    let key = self.only_keypress();
    self.clear_prompt();
    (!key.is_escape()).then(|| key)
  }

  /// Asks for a single command key or mouse click. Returns `None` on Escape.
  pub fn get_com_ex(&mut self, prompt: &str) -> Option<Event> {
    self.prompt(prompt);
    let event = self.mouse_or_keypress();
    self.clear_prompt();
    match event {
      Event::Key(k) if k.is_escape() => None,
      e => Some(e),
    }
  }

  /// Asks a yes/no question. Anything but `y` counts as no.
  pub fn get_check(&mut self, prompt: &str) -> bool {
    self.prompt(&format!("{}[y/n] ", prompt));
    let key = self.only_keypress();
    self.clear_prompt();
    matches!(key.as_char(), Some('y' | 'Y'))
  }

  /// Edits a line of text on the prompt line, starting out with `initial`.
  fn get_line(
    &mut self,
    prompt: &str,
    initial: &str,
    capacity: usize,
    handler: &mut dyn EditHandler,
  ) -> Option<String> {
    self.prompt(prompt);
    let col = prompt.chars().count().min(u16::MAX as usize) as u16;
    let mut buf = EditBuffer::new(initial, capacity);
    let accepted = self.ask_for(PROMPT_ROW, col, &mut buf, handler);
    self.clear_prompt();
    accepted.then(|| buf.to_string())
  }

  /// Asks for a string of at most `capacity - 1` characters.
  pub fn get_string(
    &mut self,
    prompt: &str,
    initial: &str,
    capacity: usize,
  ) -> Option<String> {
    self.get_line(prompt, initial, capacity, &mut DefaultEdit)
  }

  /// Asks how many of something, out of `max`.
  ///
  /// The answer defaults to one and is clamped to `max`; an empty answer is
  /// zero. When there is at most one to choose, nobody is asked.
  pub fn get_quantity(&mut self, prompt: &str, max: u32) -> Option<u32> {
    if max <= 1 {
      return Some(max);
    }

    let prompt = format!("{} (0-{}): ", prompt, max);
    let text =
      self.get_line(&prompt, "1", QUANTITY_CAPACITY, &mut NumericEdit)?;
    let amount = match text.parse::<u64>() {
      Ok(n) => n.min(max as u64) as u32,
      Err(_) => 0,
    };
    tracing::trace!(amount, max, "quantity chosen");
    Some(amount)
  }

  /// Asks for a name; `*` rolls a random one from `names`.
  pub fn get_name(
    &mut self,
    prompt: &str,
    initial: &str,
    names: &mut dyn NameSource,
  ) -> Option<String> {
    let mut handler = NameEdit::new(names);
    self.get_line(prompt, initial, NAME_CAPACITY, &mut handler)
  }

  /// Waits for the player to acknowledge a message, unless auto-more is on.
  pub fn more(&mut self) {
    if self.is_auto_more_active() {
      return;
    }
    self.prompt("-more-");
    self.any();
    self.clear_prompt();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::config::Options;
  use crate::input::text::keypress_from_text;
  use crate::term::ScriptTerminal;

  fn inkey(keys: &str) -> Inkey<ScriptTerminal> {
    let term = ScriptTerminal::with_keys(keypress_from_text(keys).unwrap());
    Inkey::new(term, Options::default())
  }

  struct FixedName;
  impl NameSource for FixedName {
    fn random_name(&mut self, _: usize) -> String {
      "Mim".to_string()
    }
  }

  #[test]
  fn com() {
    let mut ik = inkey("x[Escape]");
    assert_eq!(ik.get_com("Command: "), Some('x'.into()));
    assert_eq!(ik.get_com("Command: "), None);
    assert_eq!(ik.term().row(PROMPT_ROW), "");
    assert!(ik.term().printed.iter().any(|s| s == "Command: "));
  }

  #[test]
  fn check() {
    let mut ik = inkey("yYnq");
    assert!(ik.get_check("Really? "));
    assert!(ik.get_check("Really? "));
    assert!(!ik.get_check("Really? "));
    assert!(!ik.get_check("Really? "));
    assert!(ik.term().printed.iter().any(|s| s == "Really? [y/n] "));
  }

  #[test]
  fn string() {
    let mut ik = inkey("[Right]!![Enter]");
    assert_eq!(
      ik.get_string("Inscribe: ", "hi", 8),
      Some("hi!!".to_string())
    );

    let mut ik = inkey("abc[Escape]");
    assert_eq!(ik.get_string("Inscribe: ", "hi", 8), None);
  }

  #[test]
  fn quantity() {
    let mut ik = inkey("[Enter]");
    assert_eq!(ik.get_quantity("Drop", 5), Some(1));

    let mut ik = inkey("99[Enter]");
    assert_eq!(ik.get_quantity("Drop", 5), Some(5));

    let mut ik = inkey("[Backspace][Enter]");
    assert_eq!(ik.get_quantity("Drop", 5), Some(0));

    let mut ik = inkey("3[Escape]");
    assert_eq!(ik.get_quantity("Drop", 5), None);

    let mut ik = inkey("");
    assert_eq!(ik.get_quantity("Drop", 1), Some(1));
    assert!(ik.term().printed.is_empty());
  }

  #[test]
  fn quantity_handles_huge_input() {
    let mut ik = inkey("99999999999999[Enter]");
    assert_eq!(ik.get_quantity("Drop", u32::MAX), Some(u32::MAX));
  }

  #[test]
  fn name() {
    let mut ik = inkey("*[Enter]");
    assert_eq!(
      ik.get_name("Name: ", "Bob", &mut FixedName),
      Some("Mim".to_string())
    );
  }

  #[test]
  fn more_waits_unless_auto() {
    let mut ik = inkey("ab");
    ik.more();
    assert_eq!(ik.term().remaining(), 1);

    ik.options_mut().auto_more = true;
    ik.more();
    assert_eq!(ik.term().remaining(), 1);
  }

  #[test]
  fn more_is_skipped_inside_keymap_auto_more() {
    let mut ik = inkey("z");
    ik.add_pending(&keypress_from_text("(ab").unwrap());
    assert_eq!(ik.simple(), Event::Key('a'.into()));
    ik.more();
    assert_eq!(ik.simple(), Event::Key('b'.into()));
  }
}
