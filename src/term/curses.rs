//! `curses`-style terminal backend.
//!
//! Note that this module doesn't *actually* use `libcurses`, and merely
//! emulates its behavior at a high level in terms of `crossterm`.
//!
//! Setting the terminal up can fail and is reported as an error. Once it is
//! running, the input layer has no way to recover from a broken terminal, so
//! failures are logged and the call degrades: draws are dropped, and a failed
//! blocking read turns into [`Event::Escape`] so that whatever prompt was
//! waiting gets cancelled.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;

use palette::named as colors;

use crate::error::Error;
use crate::error::Result;
use crate::input::Click;
use crate::input::Event;
use crate::input::Keypress;
use crate::input::Mods;
use crate::term::Style;
use crate::term::Terminal;

/// Returns the current dimensions of the terminal window, as `(rows, cols)`.
pub fn dims() -> Result<(u16, u16)> {
  let (cols, rows) = crossterm::terminal::size().map_err(Error::terminal)?;
  Ok((rows, cols))
}

/// Logs a backend failure that the caller cannot do anything about.
fn log_err<E: fmt::Display>(what: &str, r: std::result::Result<(), E>) {
  if let Err(e) = r {
    tracing::error!(error = %e, "terminal {} failed", what);
  }
}

/// Converts a raw `crossterm` event into an input [`Event`].
///
/// Returns `None` for events the input layer does not care about, such as
/// resizes, mouse movement and button releases.
fn translate(e: crossterm::event::Event) -> Option<Event> {
  use crossterm::event::Event as Raw;
  use crossterm::event::MouseEventKind;

  match e {
    Raw::Key(k) => Some(Event::Key(Keypress::from(k))),
    Raw::Mouse(m) => match m.kind {
      MouseEventKind::Down(button) => Some(Event::Mouse(Click {
        button,
        x: m.column,
        y: m.row,
        mods: Mods::from(m.modifiers),
      })),
      _ => None,
    },
    _ => None,
  }
}

/// A `crossterm`-backed [`Terminal`].
pub struct Curses<W: io::Write = io::Stdout> {
  w: W,
  queue: VecDeque<Event>,
  depth: usize,
}

impl Curses {
  /// Initializes the `curses` environment on standard output.
  pub fn init() -> Result<Curses> {
    Curses::with(io::stdout())
  }
}

impl<W: io::Write> Curses<W> {
  /// Initializes the `curses` environment for `w`.
  pub fn with(mut w: W) -> Result<Curses<W>> {
    crossterm::execute!(
      w,
      crossterm::terminal::EnterAlternateScreen,
      crossterm::terminal::Clear(crossterm::terminal::ClearType::All),
      crossterm::cursor::Hide,
      crossterm::event::EnableMouseCapture,
    )
    .map_err(Error::terminal)?;
    crossterm::terminal::enable_raw_mode().map_err(Error::terminal)?;

    tracing::debug!("terminal initialized");
    Ok(Curses {
      w,
      queue: VecDeque::new(),
      depth: 0,
    })
  }

  /// Moves every event the terminal has ready into our own queue.
  fn fill(&mut self) {
    use crossterm::event;

    loop {
      match event::poll(Duration::default()) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
          tracing::error!(error = %e, "terminal poll failed");
          return;
        }
      }
      match event::read() {
        Ok(raw) => self.queue.extend(translate(raw)),
        Err(e) => {
          tracing::error!(error = %e, "terminal read failed");
          return;
        }
      }
    }
  }

  /// Clean up whatever mess the terminal made.
  fn cleanup(&mut self) {
    log_err(
      "cleanup",
      crossterm::execute!(
        self.w,
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show,
      ),
    );
    log_err("cleanup", crossterm::terminal::disable_raw_mode());
    log_err("cleanup", self.w.flush());
  }
}

impl<W: io::Write> Terminal for Curses<W> {
  fn push_context(&mut self) {
    self.depth += 1;
    tracing::trace!(depth = self.depth, "input context pushed");
  }

  fn pop_context(&mut self) {
    self.depth = self.depth.saturating_sub(1);
    tracing::trace!(depth = self.depth, "input context popped");
  }

  fn check_event(&mut self) -> bool {
    self.fill();
    !self.queue.is_empty()
  }

  fn take_event(&mut self) -> Option<Event> {
    self.fill();
    self.queue.pop_front()
  }

  fn wait_event(&mut self) -> Event {
    loop {
      if let Some(e) = self.queue.pop_front() {
        return e;
      }
      match crossterm::event::read() {
        Ok(raw) => self.queue.extend(translate(raw)),
        Err(e) => {
          tracing::error!(error = %e, "terminal read failed");
          return Event::Escape;
        }
      }
    }
  }

  fn flush_events(&mut self) {
    self.fill();
    self.queue.clear();
  }

  fn redraw(&mut self) {
    log_err("flush", self.w.flush());
  }

  fn delay(&mut self, d: Duration) {
    log_err("flush", self.w.flush());
    thread::sleep(d);
  }

  fn print(&mut self, row: u16, col: u16, text: &str, style: Style) {
    use crossterm::style::Color;

    let rgb = match style {
      Style::Normal => colors::WHITE,
      Style::Highlight => colors::YELLOW,
    };
    let fg = Color::Rgb {
      r: rgb.red,
      g: rgb.green,
      b: rgb.blue,
    };

    log_err(
      "print",
      crossterm::queue!(
        self.w,
        crossterm::cursor::MoveTo(col, row),
        crossterm::style::SetForegroundColor(fg),
        crossterm::style::Print(text),
        crossterm::style::ResetColor,
      ),
    );
  }

  fn clear_line(&mut self, row: u16, col: u16) {
    log_err(
      "clear",
      crossterm::queue!(
        self.w,
        crossterm::cursor::MoveTo(col, row),
        crossterm::terminal::Clear(
          crossterm::terminal::ClearType::UntilNewLine
        ),
      ),
    );
  }

  fn set_cursor(&mut self, at: Option<(u16, u16)>) {
    let r = match at {
      Some((row, col)) => crossterm::queue!(
        self.w,
        crossterm::cursor::MoveTo(col, row),
        crossterm::cursor::Show,
      ),
      None => crossterm::queue!(self.w, crossterm::cursor::Hide),
    };
    log_err("cursor", r);
  }

  fn bell(&mut self) {
    log_err(
      "bell",
      crossterm::queue!(self.w, crossterm::style::Print('\u{7}')),
    );
  }
}

impl<W: io::Write> Drop for Curses<W> {
  fn drop(&mut self) {
    self.cleanup();
  }
}
