//! Grid geometry.
//!
//! Just enough of it for the input layer: points on the dungeon grid, the
//! eight compass directions, and a pathfinder for turning mouse clicks into
//! steps.

use std::ops::Add;
use std::ops::AddAssign;
use std::ops::Sub;

pub mod graph;

/// A point on the grid.
///
/// We use the following convention for coordinates: x increases to the right,
/// and y in the downwards direction.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Point([i64; 2]);

impl Point {
  /// Creates a new `Point` with the given coordinates.
  #[inline]
  pub const fn new(x: i64, y: i64) -> Self {
    Self([x, y])
  }

  /// Creates a new `Point` representing the origin.
  #[inline]
  pub const fn zero() -> Self {
    Self([0, 0])
  }

  /// Returns the `x` coordinate.
  #[inline]
  pub fn x(self) -> i64 {
    self.0[0]
  }

  /// Returns the `y` coordinate.
  #[inline]
  pub fn y(self) -> i64 {
    self.0[1]
  }

  /// Computes the Chebyshev norm of `self`, i.e. the number of king moves it
  /// takes to cross it.
  pub fn chebyshev(self) -> i64 {
    self.x().abs().max(self.y().abs())
  }
}

impl Add for Point {
  type Output = Point;
  #[inline]
  fn add(self, other: Point) -> Point {
    Point::new(self.x() + other.x(), self.y() + other.y())
  }
}

impl AddAssign for Point {
  #[inline]
  fn add_assign(&mut self, other: Point) {
    *self = *self + other;
  }
}

impl Sub for Point {
  type Output = Point;
  #[inline]
  fn sub(self, other: Point) -> Point {
    Point::new(self.x() - other.x(), self.y() - other.y())
  }
}

/// One of the eight compass directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
#[rustfmt::skip]
pub enum Dir {
  N, S, E, W, Ne, Nw, Se, Sw,
}

impl Dir {
  /// Returns every direction.
  pub fn all() -> [Dir; 8] {
    use Dir::*;
    [N, Ne, E, Se, S, Sw, W, Nw]
  }

  /// Returns the unit step in this direction.
  pub fn to_point(self) -> Point {
    let (x, y) = match self {
      Dir::N => (0, -1),
      Dir::S => (0, 1),
      Dir::E => (1, 0),
      Dir::W => (-1, 0),
      Dir::Ne => (1, -1),
      Dir::Nw => (-1, -1),
      Dir::Se => (1, 1),
      Dir::Sw => (-1, 1),
    };
    Point::new(x, y)
  }

  /// Returns the numeric keypad digit for this direction.
  //
  //  7 8 9
  //  4 5 6
  //  1 2 3
  pub fn keypad(self) -> u8 {
    match self {
      Dir::Sw => 1,
      Dir::S => 2,
      Dir::Se => 3,
      Dir::W => 4,
      Dir::E => 6,
      Dir::Nw => 7,
      Dir::N => 8,
      Dir::Ne => 9,
    }
  }

  /// Looks a direction up by its numeric keypad digit.
  ///
  /// `5` and `0` are not directions.
  pub fn from_keypad(digit: u8) -> Option<Dir> {
    Dir::all().iter().copied().find(|d| d.keypad() == digit)
  }

  /// Returns the direction of a unit step, or `None` for anything else.
  pub fn from_offset(step: Point) -> Option<Dir> {
    Dir::all().iter().copied().find(|d| d.to_point() == step)
  }

  /// Returns the direction that best points from `from` towards `to`,
  /// ignoring whatever is in the way.
  ///
  /// Targets within roughly 30 degrees of an axis get the orthogonal
  /// direction; everything else gets a diagonal.
  pub fn toward(from: Point, to: Point) -> Option<Dir> {
    let d = to - from;
    let (adx, ady) = (d.x().abs(), d.y().abs());
    if adx == 0 && ady == 0 {
      return None;
    }

    let (x, y) = if 2 * adx < ady {
      (0, d.y().signum())
    } else if 2 * ady < adx {
      (d.x().signum(), 0)
    } else {
      (d.x().signum(), d.y().signum())
    };
    Dir::from_offset(Point::new(x, y))
  }
}
