//! The input layer of a roguelike's text UI.
//!
//! The pieces, from the bottom up:
//! - [`term`]: the terminal abstraction, with a `crossterm` backend and a
//!   scripted one for tests.
//! - [`input`]: keypresses and events, the keymap table, the [`Inkey`] engine
//!   that hands out events (playing keymaps back as it goes), and everything
//!   that asks the player something: directions, targets, lines of text.
//! - [`pref`]: loading keymaps from pref files.
//! - [`config`]: the player options the input layer looks at.
//!
//! [`Inkey`]: input::Inkey

#![deny(unused)]
#![deny(warnings)]

pub mod config;
pub mod error;
pub mod geo;
pub mod input;
pub mod pref;
pub mod term;
