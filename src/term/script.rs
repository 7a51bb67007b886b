//! A scripted, in-memory terminal.
//!
//! [`ScriptTerminal`] replays a list of events and records everything the
//! input layer does to it: flushes, redraws, delays, bells, the text it draws
//! and where it leaves the cursor. Events can be scheduled to show up only
//! after some number of [`Terminal::delay()`] calls, which is how tests model
//! "the player pressed the second key a little later".

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::time::Duration;

use crate::input::Event;
use crate::input::Keypress;
use crate::term::Style;
use crate::term::Terminal;

/// A terminal that plays back scripted events.
#[derive(Default, Debug)]
pub struct ScriptTerminal {
  queue: VecDeque<Event>,
  // Events that arrive once `ticks` reaches the key.
  later: BTreeMap<usize, Vec<Event>>,
  ticks: usize,

  rows: BTreeMap<u16, String>,
  cursor: Option<(u16, u16)>,
  depth: usize,

  /// Number of times the event queue was flushed.
  pub flushes: usize,
  /// Number of forced redraws.
  pub redraws: usize,
  /// Number of bells rung.
  pub bells: usize,
  /// Every delay requested, in order.
  pub delays: Vec<Duration>,
  /// Deepest modal context nesting seen.
  pub max_depth: usize,
  /// Number of blocking waits that found the script exhausted.
  pub exhausted: usize,
  /// Every string printed, in order.
  pub printed: Vec<String>,
}

impl ScriptTerminal {
  /// Creates a terminal with nothing queued.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a terminal with `events` already queued.
  pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
    let mut term = Self::new();
    term.queue.extend(events);
    term
  }

  /// Creates a terminal with the given keys already queued.
  pub fn with_keys(keys: impl IntoIterator<Item = Keypress>) -> Self {
    Self::with_events(keys.into_iter().map(Event::Key))
  }

  /// Queues `event` right away.
  pub fn push(&mut self, event: impl Into<Event>) {
    self.queue.push_back(event.into());
  }

  /// Queues `event` once `delays` more delays have elapsed.
  pub fn push_after(&mut self, delays: usize, event: impl Into<Event>) {
    if delays == 0 {
      self.push(event);
      return;
    }
    self
      .later
      .entry(self.ticks + delays)
      .or_default()
      .push(event.into());
  }

  /// Returns how many events are queued or scheduled.
  pub fn remaining(&self) -> usize {
    self.queue.len() + self.later.values().map(Vec::len).sum::<usize>()
  }

  /// Returns the current contents of `row`.
  pub fn row(&self, row: u16) -> &str {
    self.rows.get(&row).map(String::as_str).unwrap_or("")
  }

  /// Returns where the cursor is shown, if anywhere.
  pub fn cursor(&self) -> Option<(u16, u16)> {
    self.cursor
  }

  /// Returns the current modal context nesting.
  pub fn depth(&self) -> usize {
    self.depth
  }

  fn tick(&mut self) {
    self.ticks += 1;
    if let Some(events) = self.later.remove(&self.ticks) {
      self.queue.extend(events);
    }
  }
}

impl Terminal for ScriptTerminal {
  fn push_context(&mut self) {
    self.depth += 1;
    self.max_depth = self.max_depth.max(self.depth);
  }

  fn pop_context(&mut self) {
    assert!(self.depth > 0, "popped an input context that was never pushed");
    self.depth -= 1;
  }

  fn check_event(&mut self) -> bool {
    !self.queue.is_empty()
  }

  fn take_event(&mut self) -> Option<Event> {
    self.queue.pop_front()
  }

  fn wait_event(&mut self) -> Event {
    // Waiting lets time pass, so anything scheduled for later shows up.
    while self.queue.is_empty() && !self.later.is_empty() {
      self.tick();
    }
    match self.queue.pop_front() {
      Some(e) => e,
      None => {
        self.exhausted += 1;
        Event::Escape
      }
    }
  }

  fn flush_events(&mut self) {
    self.flushes += 1;
    self.queue.clear();
  }

  fn redraw(&mut self) {
    self.redraws += 1;
  }

  fn delay(&mut self, d: Duration) {
    self.delays.push(d);
    self.tick();
  }

  fn print(&mut self, row: u16, col: u16, text: &str, _: Style) {
    self.printed.push(text.to_string());
    let line = self.rows.entry(row).or_default();
    let mut chars = line.chars().collect::<Vec<_>>();
    let col = col as usize;
    if chars.len() < col {
      chars.resize(col, ' ');
    }
    for (i, c) in text.chars().enumerate() {
      match chars.get_mut(col + i) {
        Some(slot) => *slot = c,
        None => chars.push(c),
      }
    }
    *line = chars.into_iter().collect();
  }

  fn clear_line(&mut self, row: u16, col: u16) {
    if let Some(line) = self.rows.get_mut(&row) {
      *line = line.chars().take(col as usize).collect();
    }
  }

  fn set_cursor(&mut self, at: Option<(u16, u16)>) {
    self.cursor = at;
  }

  fn bell(&mut self) {
    self.bells += 1;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scheduled_events_arrive_after_delays() {
    let mut term = ScriptTerminal::new();
    term.push_after(2, Keypress::char('a'));
    assert!(term.take_event().is_none());
    term.delay(Duration::from_millis(1));
    assert!(term.take_event().is_none());
    term.delay(Duration::from_millis(1));
    assert_eq!(term.take_event(), Some(Event::Key(Keypress::char('a'))));
  }

  #[test]
  fn print_overwrites_in_place() {
    let mut term = ScriptTerminal::new();
    term.print(0, 0, "hello", Style::Normal);
    term.print(0, 1, "EY", Style::Normal);
    assert_eq!(term.row(0), "hEYlo");
    term.clear_line(0, 2);
    assert_eq!(term.row(0), "hE");
  }
}
