//! Graph algorithms, primarially for turning clicks into steps.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::HashMap;

use crate::geo::Dir;
use crate::geo::Point;
use crate::input::direction::Pathfind;

/// How many nodes a search may expand before giving up.
///
/// The grid is unbounded, so a search for an unreachable goal would otherwise
/// never end.
pub const MAX_EXPANSIONS: usize = 4096;

/// Implements the A* pathfinding algorithm with king-move distance and
/// heuristic functions.
///
/// Diagonal steps cost a hair more than orthogonal ones, so that among equally
/// short paths the straightest one wins.
///
/// See [`a_star()`].
pub fn chebyshev_a_star(
  start: Point,
  goal: Point,
  can_walk: impl FnMut(Point) -> bool,
) -> Option<Vec<Point>> {
  a_star(
    start,
    goal,
    can_walk,
    |a, b| {
      let d = a - b;
      let diagonal = d.x() != 0 && d.y() != 0;
      d.chebyshev() as f64 + if diagonal { 0.001 } else { 0.0 }
    },
    move |n| (n - goal).chebyshev() as f64,
  )
}

/// Implements the A* pathfinding algorithm.
///
/// This function will attempt to find a path from `start` to `goal`; if no path
/// could be found within [`MAX_EXPANSIONS`] steps, `None` is returned.
///
/// The provided functions serve the following purposes:
/// - `can_walk` returns true if a particular point is accessible for the
///   purposes of this search.
/// - `distance` measures the distance between two neighboring points.
/// - `heuristic` is the A* heuristic function, which roughly describes the
///   cost to reach the goal from a particular node.
///
/// The path returned is in *reverse order*; that is, the goal will be the first
/// element of the path.
pub fn a_star(
  start: Point,
  goal: Point,
  mut can_walk: impl FnMut(Point) -> bool,
  mut distance: impl FnMut(Point, Point) -> f64,
  mut heuristic: impl FnMut(Point) -> f64,
) -> Option<Vec<Point>> {
  #[derive(Copy, Clone)]
  struct Node(f64, Point);
  impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
      self.0 == other.0
    }
  }
  impl Eq for Node {}
  impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
      self.0.partial_cmp(&other.0).map(Ordering::reverse)
    }
  }
  impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
      self.partial_cmp(other).unwrap_or(Ordering::Less)
    }
  }
  let mut open_nodes = BinaryHeap::<Node>::new();

  let mut came_from = HashMap::new();
  let mut g_scores = HashMap::new();

  g_scores.insert(start, 0.0);
  open_nodes.push(Node(heuristic(start), start));

  let mut expanded = 0;
  while let Some(Node(_, mut current)) = open_nodes.pop() {
    if current == goal {
      let mut path = vec![current];
      while let Some(&next) = came_from.get(&current) {
        current = next;
        path.push(current);
      }
      return Some(path);
    }

    expanded += 1;
    if expanded > MAX_EXPANSIONS {
      tracing::debug!(?start, ?goal, "pathfinding gave up");
      return None;
    }

    for &d in &Dir::all() {
      let neighbor = current + d.to_point();
      if !can_walk(neighbor) {
        continue;
      }

      let tentative_g =
        g_scores.get(&current).cloned().unwrap_or(f64::INFINITY)
          + distance(current, neighbor);
      if tentative_g < g_scores.get(&neighbor).cloned().unwrap_or(f64::INFINITY)
      {
        came_from.insert(neighbor, current);
        g_scores.insert(neighbor, tentative_g);
        open_nodes.push(Node(tentative_g + heuristic(neighbor), neighbor));
      }
    }
  }

  None
}

/// A [`Pathfind`] over a grid described by a walkability predicate.
///
/// Screen cells map onto grids by adding a fixed `offset` (the grid shown in
/// the top-left corner of the map view).
pub struct GridPathfinder<F> {
  player: Point,
  offset: Point,
  can_walk: F,
}

impl<F: Fn(Point) -> bool> GridPathfinder<F> {
  /// Creates a pathfinder for a player standing at `player`.
  pub fn new(player: Point, offset: Point, can_walk: F) -> Self {
    Self {
      player,
      offset,
      can_walk,
    }
  }

  /// Moves the player.
  pub fn set_player(&mut self, player: Point) {
    self.player = player;
  }
}

impl<F: Fn(Point) -> bool> Pathfind for GridPathfinder<F> {
  fn player_grid(&self) -> Point {
    self.player
  }

  fn grid_at(&self, col: u16, row: u16) -> Point {
    self.offset + Point::new(col as i64, row as i64)
  }

  /// Returns the first step of a path from `from` to `to`.
  ///
  /// The destination itself need not be walkable (clicking on a wall walks up
  /// to it). If there is no path, the straight-line direction is used.
  fn direction_to(&self, from: Point, to: Point) -> Option<Dir> {
    if from == to {
      return None;
    }
    let path =
      chebyshev_a_star(from, to, |p| p == to || (self.can_walk)(p));
    match path {
      Some(path) if path.len() >= 2 => {
        Dir::from_offset(path[path.len() - 2] - from)
      }
      _ => Dir::toward(from, to),
    }
  }
}
