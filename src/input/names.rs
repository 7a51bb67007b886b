//! Random name generation.

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Something that can make up names, such as for a new character.
pub trait NameSource {
  /// Returns a fresh name of at most `max_len` characters.
  fn random_name(&mut self, max_len: usize) -> String;
}

const BEGINNINGS: &[&str] = &[
  "Al", "Bar", "Cal", "Dur", "El", "Fen", "Gor", "Hal", "Ith", "Kel", "Lor",
  "Mor", "Nar", "Or", "Per", "Quel", "Ral", "Sil", "Thal", "Ul", "Var", "Wyn",
];
const MIDDLES: &[&str] = &[
  "a", "e", "i", "o", "u", "ae", "ia", "an", "en", "or", "ur", "il",
];
const ENDINGS: &[&str] = &[
  "dor", "wen", "mir", "las", "ric", "thas", "gar", "nor", "is", "ion", "eth",
  "mund", "rik", "wyn",
];

/// Builds names out of random syllables.
pub struct RandomNames<R> {
  rng: R,
}

impl RandomNames<ThreadRng> {
  /// Creates a name source backed by the thread-local RNG.
  pub fn new() -> Self {
    Self::with_rng(rand::thread_rng())
  }
}

impl Default for RandomNames<ThreadRng> {
  fn default() -> Self {
    Self::new()
  }
}

impl<R: Rng> RandomNames<R> {
  /// Creates a name source backed by `rng`.
  pub fn with_rng(rng: R) -> Self {
    Self { rng }
  }
}

impl<R: Rng> NameSource for RandomNames<R> {
  fn random_name(&mut self, max_len: usize) -> String {
    let pick = |rng: &mut R, table: &[&'static str]| {
      table.choose(rng).copied().unwrap_or_default()
    };

    let mut name = pick(&mut self.rng, BEGINNINGS).to_string();
    if self.rng.gen_bool(0.5) {
      name.push_str(pick(&mut self.rng, MIDDLES));
    }
    name.push_str(pick(&mut self.rng, ENDINGS));

    name.chars().take(max_len).collect()
  }
}
