//! Direction prompts.
//!
//! Directions are entered on the numeric keypad layout:
//!
//! ```text
//!  7 8 9
//!  4 5 6
//!  1 2 3
//! ```
//!
//! Players without a keypad often build diagonals out of two orthogonal keys
//! (down, then left, for south-west). With a lazy move delay configured, an
//! orthogonal key is held back for a moment in case a second key turns it into
//! a diagonal; [`DIR_TRANSITIONS`] says how the two combine.

use crate::geo::Dir;
use crate::geo::Point;
use crate::input::Event;
use crate::input::Inkey;
use crate::input::KeyCode;
use crate::input::KeymapMode;
use crate::input::Keypress;
use crate::input::MouseButton;
use crate::input::Request;
use crate::term::Terminal;

/// How a pending direction changes when another direction key is pressed.
///
/// Indexed by `[current][pressed]`, where `0` means "no direction yet" and
/// a result of `0` means the combination makes no sense. Orthogonal
/// directions combine with a perpendicular key into a diagonal and stay put
/// when repeated; diagonals (and 5) only accept themselves.
#[rustfmt::skip]
pub const DIR_TRANSITIONS: [[u8; 10]; 10] = [
  /* 0 -> */ [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
  /* 1 -> */ [0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
  /* 2 -> */ [0, 0, 2, 0, 1, 0, 3, 0, 0, 0],
  /* 3 -> */ [0, 0, 0, 3, 0, 0, 0, 0, 0, 0],
  /* 4 -> */ [0, 0, 1, 0, 4, 0, 0, 0, 7, 0],
  /* 5 -> */ [0, 0, 0, 0, 0, 5, 0, 0, 0, 0],
  /* 6 -> */ [0, 0, 3, 0, 0, 0, 6, 0, 9, 0],
  /* 7 -> */ [0, 0, 0, 0, 0, 0, 0, 7, 0, 0],
  /* 8 -> */ [0, 0, 0, 0, 7, 0, 9, 0, 8, 0],
  /* 9 -> */ [0, 0, 0, 0, 0, 0, 0, 0, 0, 9],
];

const REP_PROMPT: &str = "Direction or <click> (Escape to cancel)? ";
const AIM_PROMPT: &str =
  "Direction ('*' or <click> to target, \"'\" for closest, Escape to cancel)? ";
const RETARGET_PROMPT: &str =
  "Direction ('5' for target, '*' or <click> to re-target, Escape to cancel)? ";

/// Feeds the keypad digit `pressed` to the pending direction `state`.
pub fn transition(state: u8, pressed: u8) -> u8 {
  DIR_TRANSITIONS[state as usize][pressed as usize]
}

/// Returns the keypad digit that `key` stands for, or `0` if it is not a
/// direction key.
///
/// Digits and the arrow/navigation keys work in every control scheme; the
/// roguelike scheme adds `hjklyubn`. `5` only counts when `allow_5` is set.
pub fn direction_digit(key: Keypress, mode: KeymapMode, allow_5: bool) -> u8 {
  let digit = match key.code {
    KeyCode::Up => 8,
    KeyCode::Down => 2,
    KeyCode::Left => 4,
    KeyCode::Right => 6,
    KeyCode::Home => 7,
    KeyCode::PageUp => 9,
    KeyCode::End => 1,
    KeyCode::PageDown => 3,
    _ => match (key.as_char(), mode) {
      (Some(c @ '1'..='9'), _) => c as u8 - b'0',
      (Some(c), KeymapMode::Roguelike) => match c {
        'b' => 1,
        'j' => 2,
        'n' => 3,
        'h' => 4,
        'l' => 6,
        'y' => 7,
        'k' => 8,
        'u' => 9,
        _ => 0,
      },
      _ => 0,
    },
  };

  if digit == 5 && !allow_5 {
    0
  } else {
    digit
  }
}

/// Finds paths for mouse-driven movement.
pub trait Pathfind {
  /// Returns where the player stands.
  fn player_grid(&self) -> Point;

  /// Returns the grid shown at a screen cell.
  fn grid_at(&self, col: u16, row: u16) -> Point;

  /// Returns the first step to take from `from` to get to `to`, if any.
  fn direction_to(&self, from: Point, to: Point) -> Option<Dir>;
}

/// What a target is being picked for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TargetMode {
  /// Something to attack.
  Kill,
  /// Something to look at.
  Look,
}

/// The targeting system, as far as aiming needs it.
pub trait Targeting {
  /// Lets the player pick a target interactively, starting at `at` if given.
  ///
  /// Returns whether a target was set.
  fn set_interactive(&mut self, mode: TargetMode, at: Option<Point>) -> bool;

  /// Targets whatever is closest. Returns whether anything was.
  fn set_closest(&mut self, mode: TargetMode) -> bool;

  /// Returns whether there is a target that can still be used.
  fn is_valid(&self) -> bool;
}

/// The result of a repeatable-direction prompt.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Step {
  /// Move (or act) in a direction.
  Toward(Dir),
  /// Stay in place; only possible when the caller allowed `5`.
  Stay,
}

/// The result of an aiming prompt.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Aim {
  /// Fire in a direction.
  Dir(Dir),
  /// Fire at the current target.
  Target,
}

impl<T: Terminal> Inkey<T> {
  /// Walks the direction keys starting with `first`, using the lazy move
  /// delay to wait for a disambiguating second key.
  ///
  /// Returns the resulting keypad digit (`0` if the keys made no sense), or
  /// `None` if the player hit escape or a `5` that is not allowed.
  fn walk_directions(
    &mut self,
    first: Keypress,
    mode: KeymapMode,
    allow_5: bool,
  ) -> Option<u8> {
    let lazy = self.options().lazy_move_delay;
    let mut dir = 0;
    let mut key = first;
    let mut handled = 0;
    loop {
      if key.is_escape() {
        return None;
      }

      let pressed = direction_digit(key, mode, true);
      if pressed == 5 && !allow_5 {
        return None;
      }
      if pressed == 0 {
        break;
      }
      dir = transition(dir, pressed);

      handled += 1;
      if lazy == 0 || handled > 1 {
        break;
      }
      // A click ends the wait and is dropped; the keys so far stand.
      match self.request(Request::Scan(lazy)) {
        Event::Escape => return None,
        e => match e.key() {
          Some(k) => key = k,
          None => break,
        },
      }
    }
    Some(dir)
  }

  /// Asks for a direction to move or act in.
  ///
  /// Keys may already be queued (say, by a keymap), in which case no prompt is
  /// shown at all. A left click picks the first step towards the clicked
  /// grid; a right click or escape cancels, returning `None`. Unless
  /// `allow_5` is set, `5` cancels too. Nonsense rings the bell and asks
  /// again.
  pub fn get_rep_dir(
    &mut self,
    map: &dyn Pathfind,
    allow_5: bool,
  ) -> Option<Step> {
    let mode = self.keymap_mode();
    loop {
      let mut event = self.request(Request::Instant);
      let needs_prompt = match event {
        Event::None => true,
        Event::Key(k) | Event::Button(k) => {
          !k.is_escape() && direction_digit(k, mode, true) == 0
        }
        _ => false,
      };
      if needs_prompt {
        self.prompt(REP_PROMPT);
        event = self.simple();
      }

      let dir = match event {
        Event::Mouse(m) if m.button == MouseButton::Left => {
          let to = map.grid_at(m.x, m.y);
          map
            .direction_to(map.player_grid(), to)
            .map(Dir::keypad)
            .unwrap_or(0)
        }
        Event::Mouse(m) if m.button == MouseButton::Right => {
          self.clear_prompt();
          return None;
        }
        Event::Escape => {
          self.clear_prompt();
          return None;
        }
        Event::Key(k) | Event::Button(k) => {
          match self.walk_directions(k, mode, allow_5) {
            Some(dir) => dir,
            None => {
              self.clear_prompt();
              return None;
            }
          }
        }
        Event::Mouse(_) | Event::None => 0,
      };

      if dir != 0 {
        self.clear_prompt();
        return Some(match Dir::from_keypad(dir) {
          Some(d) => Step::Toward(d),
          None => Step::Stay,
        });
      }
      self.bell("illegal direction");
    }
  }

  /// Asks for a direction to aim in, or for a target.
  ///
  /// If the player asked to reuse targets and the current one is still good,
  /// this returns [`Aim::Target`] without asking. Otherwise, besides direction
  /// keys, `*` picks a target interactively, `'` picks the closest one, and
  /// `t`, `5`, `0` or `.` accept the current one. Escape or a right click
  /// cancel.
  pub fn get_aim_dir(
    &mut self,
    map: &dyn Pathfind,
    target: &mut dyn Targeting,
  ) -> Option<Aim> {
    if self.options().use_old_target && target.is_valid() {
      return Some(Aim::Target);
    }

    let mode = self.keymap_mode();
    loop {
      let prompt = if target.is_valid() {
        RETARGET_PROMPT
      } else {
        AIM_PROMPT
      };
      let event = self.get_com_ex(prompt)?;

      let aim = match event {
        Event::Mouse(m) if m.button == MouseButton::Left => {
          let at = map.grid_at(m.x, m.y);
          target
            .set_interactive(TargetMode::Kill, Some(at))
            .then(|| Aim::Target)
        }
        Event::Mouse(m) if m.button == MouseButton::Right => {
          self.clear_prompt();
          return None;
        }
        Event::Key(k) => match k.as_char() {
          Some('*') => target
            .set_interactive(TargetMode::Kill, None)
            .then(|| Aim::Target),
          Some('\'') => {
            target.set_closest(TargetMode::Kill).then(|| Aim::Target)
          }
          Some('t' | '5' | '0' | '.') => target.is_valid().then(|| Aim::Target),
          _ => match self.walk_directions(k, mode, false) {
            Some(dir) => Dir::from_keypad(dir).map(Aim::Dir),
            None => {
              self.clear_prompt();
              return None;
            }
          },
        },
        _ => None,
      };

      match aim {
        Some(aim) => {
          self.clear_prompt();
          return Some(aim);
        }
        None => self.bell("no direction or target"),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use crate::config::Options;
  use crate::geo::graph::GridPathfinder;
  use crate::input::Click;
  use crate::input::Mods;
  use crate::term::ScriptTerminal;

  fn inkey(keys: &str, opts: Options) -> Inkey<ScriptTerminal> {
    let term = ScriptTerminal::with_keys(keys.chars().map(Keypress::char));
    Inkey::new(term, opts)
  }

  fn rep(ik: &mut Inkey<ScriptTerminal>) -> Option<Step> {
    ik.get_rep_dir(&open_ground(), false)
  }

  fn toward(d: Dir) -> Option<Step> {
    Some(Step::Toward(d))
  }

  fn lazy(delay: u32) -> Options {
    Options {
      lazy_move_delay: delay,
      ..Options::default()
    }
  }

  fn open_ground() -> GridPathfinder<impl Fn(Point) -> bool> {
    GridPathfinder::new(Point::new(5, 5), Point::zero(), |_: Point| true)
  }

  fn click(button: MouseButton, x: u16, y: u16) -> Event {
    Event::Mouse(Click {
      button,
      x,
      y,
      mods: Mods::empty(),
    })
  }

  #[derive(Default)]
  struct FakeTarget {
    valid: bool,
    closest: bool,
    interactive: Vec<Option<Point>>,
  }

  impl Targeting for FakeTarget {
    fn set_interactive(&mut self, _: TargetMode, at: Option<Point>) -> bool {
      self.interactive.push(at);
      self.valid = true;
      true
    }

    fn set_closest(&mut self, _: TargetMode) -> bool {
      self.valid |= self.closest;
      self.closest
    }

    fn is_valid(&self) -> bool {
      self.valid
    }
  }

  #[test]
  fn two_key_diagonals() {
    assert_eq!(transition(transition(0, 2), 6), 3);
    assert_eq!(transition(transition(0, 8), 4), 7);
    assert_eq!(transition(transition(0, 2), 4), 1);
    assert_eq!(transition(transition(0, 6), 8), 9);
    assert_eq!(transition(transition(0, 4), 4), 4);
  }

  #[test]
  fn nonsense_pairs_cancel() {
    assert_eq!(transition(transition(0, 2), 8), 0);
    assert_eq!(transition(transition(0, 4), 6), 0);
    for d in 2..=9 {
      assert_eq!(transition(transition(0, 1), d), 0);
    }
    assert_eq!(transition(transition(0, 1), 1), 1);
  }

  #[test]
  fn direction_keys() {
    let orig = KeymapMode::Original;
    let rogue = KeymapMode::Roguelike;
    assert_eq!(direction_digit('7'.into(), orig, false), 7);
    assert_eq!(direction_digit('5'.into(), orig, false), 0);
    assert_eq!(direction_digit('5'.into(), orig, true), 5);
    assert_eq!(direction_digit(Keypress::code(KeyCode::Up), orig, false), 8);
    assert_eq!(direction_digit('h'.into(), orig, false), 0);
    assert_eq!(direction_digit('h'.into(), rogue, false), 4);
    assert_eq!(direction_digit('0'.into(), rogue, false), 0);
    let ctrl_h = Keypress::new(KeyCode::Char('h'), Mods::CONTROL);
    assert_eq!(direction_digit(ctrl_h, rogue, false), 0);
  }

  #[test]
  fn queued_key_skips_prompt() {
    let mut ik = inkey("6", Options::default());
    assert_eq!(rep(&mut ik), toward(Dir::E));
    assert!(ik.term().printed.iter().all(|s| !s.contains("Direction")));
  }

  #[test]
  fn prompt_shown_when_idle() {
    let mut ik = inkey("", Options::default());
    ik.term_mut().push_after(1, Keypress::char('8'));
    assert_eq!(rep(&mut ik), toward(Dir::N));
    assert!(ik.term().printed.iter().any(|s| s.contains("Direction")));
    assert_eq!(ik.term().row(0), "");
  }

  #[test]
  fn without_lazy_delay_first_key_wins() {
    let mut ik = inkey("24", Options::default());
    assert_eq!(rep(&mut ik), toward(Dir::S));
    assert_eq!(ik.term().remaining(), 1);
  }

  #[test]
  fn lazy_delay_combines_keys() {
    let mut ik = inkey("24", lazy(3));
    assert_eq!(rep(&mut ik), toward(Dir::Sw));
    assert_eq!(ik.term().remaining(), 0);
  }

  #[test]
  fn lazy_delay_catches_slightly_late_key() {
    let mut ik = inkey("8", lazy(4));
    ik.term_mut().push_after(2, Keypress::char('6'));
    assert_eq!(rep(&mut ik), toward(Dir::Ne));
  }

  #[test]
  fn lazy_delay_expires() {
    let mut ik = inkey("8", lazy(2));
    ik.term_mut().push_after(5, Keypress::char('6'));
    assert_eq!(rep(&mut ik), toward(Dir::N));
    assert_eq!(ik.term().remaining(), 1);
  }

  #[test]
  fn nonsense_rings_and_reprompts() {
    let mut ik = inkey("28", lazy(3));
    ik.term_mut().push_after(1, Keypress::char('6'));
    assert_eq!(rep(&mut ik), toward(Dir::E));
    assert_eq!(ik.term().bells, 1);
  }

  #[test]
  fn five_cancels_unless_allowed() {
    let mut ik = inkey("56", Options::default());
    assert_eq!(rep(&mut ik), None);
    assert_eq!(ik.term().bells, 0);
    assert_eq!(ik.term().remaining(), 1);
    assert!(ik.term().printed.iter().all(|s| !s.contains("Direction")));

    let mut ik = inkey("", Options::default());
    ik.term_mut().push_after(1, Keypress::char('5'));
    assert_eq!(rep(&mut ik), None);
    assert_eq!(ik.term().row(0), "");

    let mut ik = inkey("25", lazy(3));
    assert_eq!(rep(&mut ik), None);

    let mut ik = inkey("5", Options::default());
    assert_eq!(ik.get_rep_dir(&open_ground(), true), Some(Step::Stay));
  }

  #[test]
  fn click_during_lazy_wait_is_dropped() {
    let mut ik = inkey("2", lazy(3));
    ik.term_mut().push(click(MouseButton::Left, 9, 5));
    ik.term_mut().push(Keypress::char('4'));
    assert_eq!(rep(&mut ik), toward(Dir::S));
    assert_eq!(ik.term().remaining(), 1);
  }

  #[test]
  fn escape_cancels() {
    let mut ik = inkey("", Options::default());
    ik.term_mut().push(Keypress::ESCAPE);
    assert_eq!(ik.get_rep_dir(&open_ground(), false), None);

    let mut ik = inkey("", lazy(3));
    ik.term_mut().push(Keypress::char('2'));
    ik.term_mut().push(Keypress::ESCAPE);
    assert_eq!(ik.get_rep_dir(&open_ground(), false), None);
  }

  #[test]
  fn clicks() {
    let mut ik = inkey("", Options::default());
    ik.term_mut().push(click(MouseButton::Left, 9, 5));
    assert_eq!(rep(&mut ik), toward(Dir::E));

    ik.term_mut().push(click(MouseButton::Right, 9, 5));
    assert_eq!(ik.get_rep_dir(&open_ground(), false), None);
  }

  #[test]
  fn roguelike_keys() {
    let mut ik = inkey(
      "y",
      Options {
        rogue_like: true,
        ..Options::default()
      },
    );
    assert_eq!(rep(&mut ik), toward(Dir::Nw));
  }

  #[test]
  fn keymap_feeds_direction() {
    let mut ik = inkey("", Options::default());
    ik.add_pending(&[Keypress::char('3')]);
    assert_eq!(rep(&mut ik), toward(Dir::Se));
    assert_eq!(ik.term().redraws, 0);
  }

  #[test]
  fn aim_reuses_old_target() {
    let mut ik = inkey(
      "",
      Options {
        use_old_target: true,
        ..Options::default()
      },
    );
    let mut target = FakeTarget {
      valid: true,
      ..FakeTarget::default()
    };
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), Some(Aim::Target));
    assert!(ik.term().printed.is_empty());
  }

  #[test]
  fn aim_keys() {
    let mut target = FakeTarget::default();

    let mut ik = inkey("*", Options::default());
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), Some(Aim::Target));
    assert_eq!(target.interactive, vec![None]);

    let mut ik = inkey("t", Options::default());
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), Some(Aim::Target));

    let mut target = FakeTarget::default();
    let mut ik = inkey("'t4", Options::default());
    assert_eq!(
      ik.get_aim_dir(&open_ground(), &mut target),
      Some(Aim::Dir(Dir::W))
    );
    assert_eq!(ik.term().bells, 2);
  }

  #[test]
  fn aim_click_targets_grid() {
    let mut target = FakeTarget::default();
    let mut ik = inkey("", Options::default());
    ik.term_mut().push(click(MouseButton::Left, 2, 3));
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), Some(Aim::Target));
    assert_eq!(target.interactive, vec![Some(Point::new(2, 3))]);
  }

  #[test]
  fn aim_cancels() {
    let mut target = FakeTarget::default();
    let mut ik = inkey("", Options::default());
    ik.term_mut().push(Keypress::ESCAPE);
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), None);

    ik.term_mut().push(click(MouseButton::Right, 0, 0));
    assert_eq!(ik.get_aim_dir(&open_ground(), &mut target), None);
    assert_eq!(ik.term().row(0), "");
  }
}
