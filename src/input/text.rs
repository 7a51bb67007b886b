//! Conversion between keypresses and their text form.
//!
//! This is the format pref files use for keymaps:
//! - Printable characters stand for themselves; the characters `{`, `}`,
//!   `[`, `]`, `^` and `\` must be escaped with a backslash.
//! - Special keys are written by name in brackets, such as `[Escape]` or
//!   `[F3]`.
//! - A leading `^` means "with control", e.g. `^x`. Any other modifier set is
//!   written as a brace group of modifier letters before the key, e.g.
//!   `{^S}[Tab]` is control-shift-tab.

use crate::error::ParseError;
use crate::input::KeyCode;
use crate::input::Keypress;
use crate::input::Mods;

/// Letters used for each modifier inside a `{...}` group.
const MOD_LETTERS: &[(Mods, char)] = &[
  (Mods::CONTROL, '^'),
  (Mods::SHIFT, 'S'),
  (Mods::ALT, 'A'),
  (Mods::META, 'M'),
  (Mods::KEYPAD, 'K'),
];

/// Names for the non-character keys.
const KEY_NAMES: &[(KeyCode, &str)] = &[
  (KeyCode::Esc, "Escape"),
  (KeyCode::Enter, "Enter"),
  (KeyCode::Tab, "Tab"),
  (KeyCode::BackTab, "BackTab"),
  (KeyCode::Backspace, "Backspace"),
  (KeyCode::Delete, "Delete"),
  (KeyCode::Insert, "Insert"),
  (KeyCode::Up, "Up"),
  (KeyCode::Down, "Down"),
  (KeyCode::Left, "Left"),
  (KeyCode::Right, "Right"),
  (KeyCode::Home, "Home"),
  (KeyCode::End, "End"),
  (KeyCode::PageUp, "PageUp"),
  (KeyCode::PageDown, "PageDown"),
  (KeyCode::Null, "Null"),
];

fn key_name(code: KeyCode) -> Option<String> {
  if let KeyCode::F(n) = code {
    return Some(format!("F{}", n));
  }
  KEY_NAMES
    .iter()
    .find(|(c, _)| *c == code)
    .map(|(_, name)| name.to_string())
}

fn key_from_name(name: &str) -> Option<KeyCode> {
  if let Some(n) = name.strip_prefix('F') {
    if let Ok(n) = n.parse::<u8>() {
      return Some(KeyCode::F(n));
    }
  }
  KEY_NAMES
    .iter()
    .find(|(_, n)| *n == name)
    .map(|(c, _)| *c)
}

/// Encodes a sequence of keypresses as text.
pub fn keypress_to_text(keys: &[Keypress]) -> String {
  let mut out = String::new();
  for key in keys {
    let is_caret = key.code == KeyCode::Char('^');
    if key.mods == Mods::CONTROL && !is_caret {
      out.push('^');
    } else if !key.mods.is_empty() {
      out.push('{');
      for &(m, letter) in MOD_LETTERS {
        if key.mods.contains(m) {
          out.push(letter);
        }
      }
      out.push('}');
    }

    match key.code {
      KeyCode::Char(c @ ('{' | '}' | '[' | ']' | '^' | '\\')) => {
        out.push('\\');
        out.push(c);
      }
      KeyCode::Char(c) => out.push(c),
      code => match key_name(code) {
        Some(name) => {
          out.push('[');
          out.push_str(&name);
          out.push(']');
        }
        None => out.push_str("[Null]"),
      },
    }
  }
  out
}

/// Decodes the text form of a keypress sequence.
pub fn keypress_from_text(text: &str) -> Result<Vec<Keypress>, ParseError> {
  let mut keys = Vec::new();
  let mut mods = Mods::empty();
  let mut chars = text.chars();

  while let Some(c) = chars.next() {
    let code = match c {
      '\\' => match chars.next() {
        Some(c) => KeyCode::Char(c),
        None => return Err(ParseError::new("dangling `\\`")),
      },
      '^' => {
        mods |= Mods::CONTROL;
        continue;
      }
      '{' => {
        loop {
          match chars.next() {
            Some('}') => break,
            Some(l) => match MOD_LETTERS.iter().find(|(_, x)| *x == l) {
              Some(&(m, _)) => mods |= m,
              None => {
                return Err(ParseError::new(format!(
                  "unknown modifier `{}`",
                  l
                )))
              }
            },
            None => return Err(ParseError::new("unterminated `{`")),
          }
        }
        continue;
      }
      '[' => {
        let mut name = String::new();
        loop {
          match chars.next() {
            Some(']') => break,
            Some(c) => name.push(c),
            None => return Err(ParseError::new("unterminated `[`")),
          }
        }
        match key_from_name(&name) {
          Some(code) => code,
          None => {
            return Err(ParseError::new(format!("unknown key `[{}]`", name)))
          }
        }
      }
      '}' | ']' => {
        return Err(ParseError::new(format!("unmatched `{}`", c)));
      }
      c => KeyCode::Char(c),
    };

    keys.push(Keypress::new(code, mods));
    mods = Mods::empty();
  }

  if !mods.is_empty() {
    return Err(ParseError::new("modifiers without a key"));
  }
  Ok(keys)
}

/// Decodes text that must describe exactly one keypress.
pub fn single_keypress_from_text(text: &str) -> Result<Keypress, ParseError> {
  match keypress_from_text(text)?.as_slice() {
    [key] => Ok(*key),
    [] => Err(ParseError::new("expected a key, found nothing")),
    _ => Err(ParseError::new(format!("expected a single key in `{}`", text))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_and_escaped() {
    let keys = keypress_from_text("ab\\[\\^").unwrap();
    assert_eq!(
      keys,
      vec![
        Keypress::char('a'),
        Keypress::char('b'),
        Keypress::char('['),
        Keypress::char('^'),
      ]
    );
    assert_eq!(keypress_to_text(&keys), "ab\\[\\^");
  }

  #[test]
  fn named_keys_and_mods() {
    let keys = keypress_from_text("^x{^S}[Tab][Escape][F3]").unwrap();
    assert_eq!(
      keys,
      vec![
        Keypress::new(KeyCode::Char('x'), Mods::CONTROL),
        Keypress::new(KeyCode::Tab, Mods::CONTROL | Mods::SHIFT),
        Keypress::ESCAPE,
        Keypress::code(KeyCode::F(3)),
      ]
    );
    assert_eq!(keypress_to_text(&keys), "^x{^S}[Tab][Escape][F3]");
  }

  #[test]
  fn control_caret_uses_brace_form() {
    let key = Keypress::new(KeyCode::Char('^'), Mods::CONTROL);
    let text = keypress_to_text(&[key]);
    assert_eq!(text, "{^}\\^");
    assert_eq!(single_keypress_from_text(&text).unwrap(), key);
  }

  #[test]
  fn malformed() {
    assert!(keypress_from_text("[Bogus]").is_err());
    assert!(keypress_from_text("[Tab").is_err());
    assert!(keypress_from_text("{Q}a").is_err());
    assert!(keypress_from_text("a^").is_err());
    assert!(keypress_from_text("a]").is_err());
    assert!(keypress_from_text("\\").is_err());
    assert!(single_keypress_from_text("ab").is_err());
    assert!(single_keypress_from_text("").is_err());
  }
}
