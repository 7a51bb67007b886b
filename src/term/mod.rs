//! Terminal capabilities.
//!
//! The input layer does not talk to a terminal directly; it goes through the
//! [`Terminal`] trait, which covers the few things it needs: taking events,
//! flushing them, waiting, and drawing the odd prompt line. [`curses`] is the
//! real backend; [`script`] is an in-memory one that plays back a scripted
//! list of events, for tests.

use std::time::Duration;

use crate::input::Event;

pub mod curses;
pub mod script;

pub use curses::Curses;
pub use script::ScriptTerminal;

/// How a piece of prompt text should be drawn.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Style {
  /// Ordinary text.
  Normal,
  /// Text the player has not touched yet, such as a default answer.
  Highlight,
}

/// A source of input events, plus the minimal output the prompts need.
///
/// The engine is single-threaded: [`Terminal::wait_event()`] is the only place
/// where control is handed away while waiting for the player.
pub trait Terminal {
  /// Enters a modal input context (a prompt or menu).
  fn push_context(&mut self);

  /// Leaves the innermost modal input context.
  fn pop_context(&mut self);

  /// Returns whether an event is already queued, without consuming it.
  fn check_event(&mut self) -> bool;

  /// Takes the next queued event, if there is one; never blocks.
  fn take_event(&mut self) -> Option<Event>;

  /// Blocks until the next event arrives.
  fn wait_event(&mut self) -> Event;

  /// Throws away every queued event.
  fn flush_events(&mut self);

  /// Brings the screen fully up to date.
  fn redraw(&mut self);

  /// Sleeps for `d`.
  fn delay(&mut self, d: Duration);

  /// Draws `text` at the given position.
  fn print(&mut self, row: u16, col: u16, text: &str, style: Style);

  /// Erases from the given position to the end of the row.
  fn clear_line(&mut self, row: u16, col: u16);

  /// Shows the cursor at `at`, or hides it.
  fn set_cursor(&mut self, at: Option<(u16, u16)>);

  /// Alerts the player that their input was rejected.
  fn bell(&mut self);
}
