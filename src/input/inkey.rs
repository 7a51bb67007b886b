//! The inkey engine.
//!
//! Every request for input goes through [`Inkey::request()`], which decides
//! where the next event comes from:
//!
//! 1. A pending flush is carried out first, dropping both whatever the
//!    terminal has queued and any keymap that is still playing.
//! 2. If a keymap is playing, its next key is returned without touching the
//!    terminal. The `(` and `)` markers inside an action switch auto-more on
//!    and off and are never returned.
//! 3. Otherwise the terminal is asked, either instantly, by blocking, or by
//!    scanning a bounded number of times.
//!
//! Only one keymap plays at a time: its keys drain completely before the
//! terminal is consulted again, so events stay in FIFO order.

use std::time::Duration;

use crate::config::Options;
use crate::input::keymap::KEYMAP_ACTION_MAX;
use crate::input::text::keypress_to_text;
use crate::input::Event;
use crate::input::KeyCode;
use crate::input::KeymapMode;
use crate::input::Keymaps;
use crate::input::Keypress;
use crate::input::MouseButton;
use crate::term::Terminal;

/// Time between two polls of a scanning request.
pub const INKEY_SCAN_PERIOD: Duration = Duration::from_millis(10);

/// Marker that turns auto-more on while a keymap plays.
const AUTO_MORE_ON: Keypress = Keypress::char('(');
/// Marker that turns auto-more back off.
const AUTO_MORE_OFF: Keypress = Keypress::char(')');

/// How a request should wait for the terminal.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Request {
  /// Take a queued event if there is one, otherwise return [`Event::None`].
  Instant,
  /// Block until an event arrives.
  Wait,
  /// Poll up to `n` times, [`INKEY_SCAN_PERIOD`] apart, and give up with
  /// [`Event::None`] after that. `n` must be positive.
  Scan(u32),
}

/// The keymap playback buffer.
///
/// Holds at most one action at a time, with a read position into it.
// Invariant: head + len <= KEYMAP_ACTION_MAX.
struct Pending {
  keys: [Keypress; KEYMAP_ACTION_MAX],
  head: usize,
  len: usize,
}

impl Pending {
  fn new() -> Self {
    Self {
      keys: [Keypress::code(KeyCode::Null); KEYMAP_ACTION_MAX],
      head: 0,
      len: 0,
    }
  }

  fn is_empty(&self) -> bool {
    self.len == 0
  }

  fn clear(&mut self) {
    self.head = 0;
    self.len = 0;
  }

  /// Loads `seq`, which must fit. The buffer must be empty.
  fn load(&mut self, seq: &[Keypress]) {
    debug_assert!(self.is_empty());
    debug_assert!(seq.len() <= KEYMAP_ACTION_MAX);
    self.keys[..seq.len()].copy_from_slice(seq);
    self.head = 0;
    self.len = seq.len();
  }

  fn pop(&mut self) -> Option<Keypress> {
    if self.len == 0 {
      return None;
    }
    let key = self.keys[self.head];
    self.head += 1;
    self.len -= 1;
    if self.len == 0 {
      self.head = 0;
    }
    Some(key)
  }
}

/// The input engine.
///
/// An `Inkey` owns the terminal it reads from, along with the keymap playback
/// state. The UI layer keeps one of these and passes it by `&mut` to anything
/// that needs input.
pub struct Inkey<T> {
  term: T,
  opts: Options,
  pending: Pending,
  auto_more: bool,
  flush_requested: bool,
  from_keymap: bool,
}

impl<T: Terminal> Inkey<T> {
  /// Creates a new engine reading from `term`.
  pub fn new(term: T, opts: Options) -> Self {
    Self {
      term,
      opts,
      pending: Pending::new(),
      auto_more: false,
      flush_requested: false,
      from_keymap: false,
    }
  }

  /// Returns the underlying terminal.
  pub fn term(&self) -> &T {
    &self.term
  }

  /// Returns the underlying terminal.
  pub fn term_mut(&mut self) -> &mut T {
    &mut self.term
  }

  /// Consumes the engine, returning the terminal.
  pub fn into_term(self) -> T {
    self.term
  }

  /// Returns the current options.
  pub fn options(&self) -> &Options {
    &self.opts
  }

  /// Returns the current options, for changing them.
  pub fn options_mut(&mut self) -> &mut Options {
    &mut self.opts
  }

  /// Returns the keymap set that matches the current control scheme.
  pub fn keymap_mode(&self) -> KeymapMode {
    if self.opts.rogue_like {
      KeymapMode::Roguelike
    } else {
      KeymapMode::Original
    }
  }

  /// Asks for all pending input to be discarded before the next request.
  ///
  /// Any number of calls before the next request result in a single flush.
  pub fn request_flush(&mut self) {
    self.flush_requested = true;
  }

  /// Discards all pending input right away.
  pub fn flush_now(&mut self) {
    tracing::debug!(
      dropped_keymap_keys = self.pending.len,
      "flushing input"
    );
    self.term.flush_events();
    self.pending.clear();
    self.auto_more = false;
    self.flush_requested = false;
  }

  /// Returns whether a keymap is currently being played back.
  pub fn is_playing_keymap(&self) -> bool {
    !self.pending.is_empty()
  }

  /// Returns whether the last event handed out came from keymap playback.
  pub fn last_from_keymap(&self) -> bool {
    self.from_keymap
  }

  /// Starts playing back `seq` as if the player had typed it.
  ///
  /// Only one keymap plays at a time: if one is already playing, `seq` is
  /// rejected and `false` is returned. Sequences longer than
  /// [`KEYMAP_ACTION_MAX`] are cut short.
  pub fn add_pending(&mut self, seq: &[Keypress]) -> bool {
    if self.is_playing_keymap() {
      tracing::warn!(
        rejected = %keypress_to_text(seq),
        "a keymap is already playing"
      );
      return false;
    }

    let seq = if seq.len() > KEYMAP_ACTION_MAX {
      tracing::warn!(
        len = seq.len(),
        max = KEYMAP_ACTION_MAX,
        "keymap action truncated"
      );
      &seq[..KEYMAP_ACTION_MAX]
    } else {
      seq
    };
    tracing::debug!(action = %keypress_to_text(seq), "keymap playback");
    self.pending.load(seq);
    true
  }

  /// Returns whether "-more-" prompts should be skipped right now.
  ///
  /// That's the case if the player turned auto-more on, or if a keymap asked
  /// for it with a `(` marker.
  pub fn is_auto_more_active(&self) -> bool {
    self.opts.auto_more || self.auto_more
  }

  /// Takes the next key from the playing keymap, handling auto-more markers.
  fn next_pending(&mut self) -> Option<Keypress> {
    // A malformed action may hold nothing but markers; the buffer is bounded,
    // so so is this loop.
    for _ in 0..KEYMAP_ACTION_MAX {
      let key = self.pending.pop()?;
      if key == AUTO_MORE_ON {
        self.auto_more = true;
      } else if key == AUTO_MORE_OFF {
        self.auto_more = false;
      } else {
        return Some(key);
      }
    }
    None
  }

  /// Gets the next input event.
  ///
  /// # Panics
  ///
  /// Panics on `Request::Scan(0)`.
  pub fn request(&mut self, req: Request) -> Event {
    if let Request::Scan(n) = req {
      assert!(n > 0, "scanning request with no attempts");
    }

    if self.flush_requested {
      self.flush_now();
    }

    if let Some(key) = self.next_pending() {
      self.from_keymap = true;
      return Event::Key(key);
    }
    self.from_keymap = false;
    self.auto_more = false;

    match req {
      Request::Instant => self.term.take_event().unwrap_or(Event::None),
      Request::Wait => {
        if !self.term.check_event() {
          self.term.redraw();
        }
        self.term.wait_event()
      }
      Request::Scan(n) => {
        if !self.term.check_event() {
          self.term.redraw();
        }
        for i in 0..n {
          if let Some(e) = self.term.take_event() {
            return e;
          }
          if i + 1 < n {
            self.term.delay(INKEY_SCAN_PERIOD);
          }
        }
        Event::None
      }
    }
  }

  /// Blocks for the next event.
  pub fn simple(&mut self) -> Event {
    self.request(Request::Wait)
  }

  /// Waits for the next event: for `scans` scan periods if `scans` is
  /// positive, or indefinitely if it is zero.
  pub fn wait(&mut self, scans: u32) -> Event {
    if scans > 0 {
      self.request(Request::Scan(scans))
    } else {
      self.request(Request::Wait)
    }
  }

  /// Blocks for the next keypress.
  ///
  /// Mouse clicks are turned into keys: a left click is `Enter`, anything
  /// else is `Escape`.
  pub fn only_keypress(&mut self) -> Keypress {
    loop {
      match self.simple() {
        Event::Key(k) | Event::Button(k) => return k,
        Event::Escape => return Keypress::ESCAPE,
        Event::Mouse(m) if m.button == MouseButton::Left => {
          return Keypress::ENTER
        }
        Event::Mouse(_) => return Keypress::ESCAPE,
        Event::None => {}
      }
    }
  }

  /// Blocks for the next keypress or mouse click.
  ///
  /// Unlike [`Inkey::only_keypress()`], clicks come back as they are, so the
  /// caller can see where they landed.
  pub fn mouse_or_keypress(&mut self) -> Event {
    loop {
      match self.simple() {
        e @ (Event::Key(_) | Event::Mouse(_)) => return e,
        Event::Button(k) => return Event::Key(k),
        Event::Escape => return Event::Key(Keypress::ESCAPE),
        Event::None => {}
      }
    }
  }

  /// Blocks until the player presses a key or clicks.
  ///
  /// A button counts as the key it stands for. [`Event::Escape`] also ends
  /// the wait: the backend reports a failed read that way, and waiting past
  /// it would never return.
  pub fn any(&mut self) {
    loop {
      match self.simple() {
        Event::Key(_) | Event::Mouse(_) | Event::Button(_) => return,
        Event::Escape => return,
        Event::None => {}
      }
    }
  }

  /// Gets the next command key, expanding keymaps.
  ///
  /// If the key the player pressed is bound in the current control scheme's
  /// keymaps, its action is started and the first key of the action is
  /// returned instead. Keys that come out of a playing keymap are never looked
  /// up again, so keymaps do not nest.
  pub fn next_command(&mut self, keymaps: &Keymaps) -> Event {
    loop {
      let event = self.mouse_or_keypress();
      let key = match event {
        Event::Key(k) if !self.from_keymap => k,
        _ => return event,
      };

      match keymaps.find(self.keymap_mode(), key) {
        Some(action) => {
          tracing::debug!(trigger = %key, "keymap triggered");
          self.add_pending(action);
        }
        None => return event,
      }
    }
  }

  /// Rings the bell, for rejected input.
  pub fn bell(&mut self, reason: &str) {
    tracing::debug!(reason, "bell");
    self.term.bell();
  }
}
