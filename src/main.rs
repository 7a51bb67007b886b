//! A small interactive demo of the input layer.
//!
//! Walk around a room with the usual direction keys (which go through
//! keymaps, like in the real game), fire at the kobold, and try out the
//! prompts. Logs go to a file, since the terminal is in raw mode.

#![deny(unused)]
#![deny(warnings)]

use std::fs::File;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crawl_input::config::Options;
use crawl_input::error::Result;
use crawl_input::geo::graph::GridPathfinder;
use crawl_input::geo::Point;
use crawl_input::input::direction::Aim;
use crawl_input::input::direction::Pathfind;
use crawl_input::input::direction::Step;
use crawl_input::input::direction::TargetMode;
use crawl_input::input::direction::Targeting;
use crawl_input::input::keymap::KEYMAP_ACTION_MAX;
use crawl_input::input::names::RandomNames;
use crawl_input::input::text::keypress_from_text;
use crawl_input::input::Event;
use crawl_input::input::Inkey;
use crawl_input::input::KeyCode;
use crawl_input::input::KeymapMode;
use crawl_input::input::Keymaps;
use crawl_input::input::Keypress;
use crawl_input::pref;
use crawl_input::term::Curses;
use crawl_input::term::Style;
use crawl_input::term::Terminal;

#[derive(Parser, Debug)]
#[command(version, about = "Walks a kobold-infested room, one key at a time")]
struct Args {
  /// Options file, in TOML.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Pref file with user keymaps to load at startup.
  #[arg(long)]
  keymaps: Option<PathBuf>,

  /// Where to write the log; filter it with `RUST_LOG`.
  #[arg(long, default_value = "crawl-input.log")]
  log: PathBuf,

  /// Pref file to write the user keymaps to on exit.
  #[arg(long)]
  dump: Option<PathBuf>,
}

const ROOM_W: i64 = 40;
const ROOM_H: i64 = 12;
const MESSAGE_ROW: u16 = 1;
const MAP_ROW: u16 = 2;

const HELP: &str = "Move: direction keys or click. f: fire. d: drop. \
  C: rename. @: new keymap. =: control scheme. q: quit.";

fn in_room(p: Point) -> bool {
  (1..ROOM_W - 1).contains(&p.x()) && (1..ROOM_H - 1).contains(&p.y())
}

/// The game's own keymaps: every direction key walks.
fn builtin_keymaps() -> Keymaps {
  let mut keymaps = Keymaps::new();
  for d in "12346789".chars() {
    let walk = [Keypress::char(';'), Keypress::char(d)];
    keymaps.add(KeymapMode::Original, d.into(), &walk, false);
  }
  for d in "hjklyubn".chars() {
    let walk = [Keypress::char(';'), Keypress::char(d)];
    keymaps.add(KeymapMode::Roguelike, d.into(), &walk, false);
  }
  for code in [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right] {
    let walk = [Keypress::char(';'), Keypress::code(code)];
    for mode in KeymapMode::ALL {
      keymaps.add(mode, Keypress::code(code), &walk, false);
    }
  }
  keymaps
}

/// A single kobold to shoot at, or any grid the player clicks.
struct Targets {
  kobold: Point,
  target: Option<Point>,
}

impl Targeting for Targets {
  fn set_interactive(&mut self, _: TargetMode, at: Option<Point>) -> bool {
    self.target = Some(at.unwrap_or(self.kobold));
    true
  }

  fn set_closest(&mut self, _: TargetMode) -> bool {
    self.target = Some(self.kobold);
    true
  }

  fn is_valid(&self) -> bool {
    self.target.is_some()
  }
}

fn say<T: Terminal>(ik: &mut Inkey<T>, msg: &str) {
  if !msg.is_empty() {
    tracing::info!(msg, "message");
  }
  let term = ik.term_mut();
  term.clear_line(MESSAGE_ROW, 0);
  term.print(MESSAGE_ROW, 0, msg, Style::Normal);
}

fn walk<T: Terminal, F: Fn(Point) -> bool>(
  ik: &mut Inkey<T>,
  map: &mut GridPathfinder<F>,
  player: &mut Point,
  kobold: Point,
  step: Step,
) {
  let d = match step {
    Step::Toward(d) => d,
    Step::Stay => {
      say(ik, "You stay put.");
      return;
    }
  };
  let next = *player + d.to_point();
  if in_room(next) && next != kobold {
    *player = next;
    map.set_player(next);
  } else {
    ik.bell("blocked");
    say(ik, "There is something in the way.");
  }
}

fn draw<T: Terminal>(ik: &mut Inkey<T>, player: Point, kobold: Point) {
  let term = ik.term_mut();
  for y in 0..ROOM_H {
    let line = (0..ROOM_W)
      .map(|x| {
        let p = Point::new(x, y);
        if p == player {
          '@'
        } else if p == kobold {
          'k'
        } else if in_room(p) {
          '.'
        } else {
          '#'
        }
      })
      .collect::<String>();
    term.print(MAP_ROW + y as u16, 0, &line, Style::Normal);
  }
  term.redraw();
}

fn run(args: Args) -> Result<()> {
  let log = File::create(&args.log)?;
  tracing_subscriber::fmt()
    .with_writer(Mutex::new(log))
    .with_ansi(false)
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let opts = match &args.config {
    Some(path) => Options::load(path)?,
    None => Options::default(),
  };
  let mut keymaps = builtin_keymaps();
  if let Some(path) = &args.keymaps {
    pref::load_keymap_file(path, &mut keymaps, true)?;
  }

  let mut names = RandomNames::new();
  let mut name = String::from("Adventurer");
  let mut player = Point::new(5, 5);
  let mut targets = Targets {
    kobold: Point::new(30, 8),
    target: None,
  };
  let mut map =
    GridPathfinder::new(player, Point::new(0, -(MAP_ROW as i64)), in_room);

  let mut ik = Inkey::new(Curses::init()?, opts);
  say(&mut ik, "Welcome! Press ? for help.");
  loop {
    draw(&mut ik, player, targets.kobold);

    let key = match ik.next_command(&keymaps) {
      Event::Key(k) => k,
      Event::Mouse(click) => {
        let to = map.grid_at(click.x, click.y);
        if let Some(d) = map.direction_to(player, to) {
          let step = Step::Toward(d);
          walk(&mut ik, &mut map, &mut player, targets.kobold, step);
        }
        continue;
      }
      _ => continue,
    };
    say(&mut ik, "");

    match key.as_char() {
      Some(';') => {
        if let Some(step) = ik.get_rep_dir(&map, true) {
          walk(&mut ik, &mut map, &mut player, targets.kobold, step);
        }
      }
      Some('f') => match ik.get_aim_dir(&map, &mut targets) {
        Some(Aim::Dir(d)) => {
          say(&mut ik, &format!("You fire {:?}.", d));
          ik.more();
        }
        Some(Aim::Target) => {
          let at = targets.target.unwrap_or(targets.kobold);
          say(&mut ik, &format!("You fire at ({}, {}).", at.x(), at.y()));
          ik.more();
        }
        None => {}
      },
      Some('d') => {
        if let Some(n) = ik.get_quantity("Drop how many arrows?", 40) {
          say(&mut ik, &format!("You drop {} arrows.", n));
        }
      }
      Some('C') => {
        if let Some(new) = ik.get_name("Your name: ", &name, &mut names) {
          name = new;
          say(&mut ik, &format!("You are now {}.", name));
        }
      }
      Some('@') => {
        let action = ik.get_com("Keymap trigger: ").and_then(|trigger| {
          let text =
            ik.get_string("Keymap action: ", "", KEYMAP_ACTION_MAX + 1)?;
          Some((trigger, text))
        });
        if let Some((trigger, text)) = action {
          match keypress_from_text(&text) {
            Ok(keys) => {
              keymaps.add(ik.keymap_mode(), trigger, &keys, true);
              say(&mut ik, &format!("Keymap {} added.", trigger));
            }
            Err(e) => say(&mut ik, &format!("Bad keymap: {}", e)),
          }
        }
      }
      Some('=') => {
        let rogue = ik.get_check("Use the roguelike keys? ");
        ik.options_mut().rogue_like = rogue;
      }
      Some('?') => say(&mut ik, HELP),
      Some('q') => {
        if ik.get_check("Really quit? ") {
          break;
        }
      }
      _ => ik.bell("unknown command"),
    }
  }

  if let Some(path) = &args.dump {
    let mut file = File::create(path)?;
    keymaps.dump(&mut file, ik.keymap_mode())?;
  }
  tracing::info!(name = %name, "bye");
  Ok(())
}

fn main() {
  let args = Args::parse();
  if let Err(e) = run(args) {
    eprintln!("error: {}", e);
    process::exit(1);
  }
}
