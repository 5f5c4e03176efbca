#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the micromouse workspace.
//!
//! This crate defines the narrow surface that connects the simulated maze,
//! the navigator, and the adapters. The simulation loop samples the walls
//! around the mouse into [`WallReadings`], hands them to a [`Pilot`] together
//! with the occupied [`CellCoord`], and applies the returned [`Movement`] to
//! the mouse pose. Nothing else crosses the boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest maze side length accepted by [`MazeSize::new`].
pub const MIN_SIDE: u32 = 3;

/// Largest maze side length accepted by [`MazeSize::new`].
pub const MAX_SIDE: u32 = 256;

/// Cardinal headings of the mouse.
///
/// The maze uses a bottom-left origin: `North` increases `y` and `East`
/// increases `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Facing toward increasing `y`.
    North,
    /// Facing toward increasing `x`.
    East,
    /// Facing toward decreasing `y`.
    South,
    /// Facing toward decreasing `x`.
    West,
}

impl Heading {
    /// Every heading in clockwise order starting at north.
    pub const ALL: [Heading; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Heading reached after a quarter turn clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Heading reached after a quarter turn counter-clockwise.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }

    /// Heading pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Heading held after the mouse executes `movement`.
    ///
    /// Only the in-place turns change the heading; moving forward, waiting and
    /// finishing keep it.
    #[must_use]
    pub const fn apply(self, movement: Movement) -> Self {
        match movement {
            Movement::TurnClockwise => self.clockwise(),
            Movement::TurnCounterClockwise => self.counter_clockwise(),
            Movement::TurnAround => self.opposite(),
            Movement::MoveForward | Movement::Wait | Movement::Finish => self,
        }
    }

    /// Single in-place turn that makes the mouse face `target`.
    ///
    /// Returns `None` when the mouse already faces `target`.
    #[must_use]
    pub fn rotation_to(self, target: Heading) -> Option<Movement> {
        if self == target {
            None
        } else if self.clockwise() == target {
            Some(Movement::TurnClockwise)
        } else if self.counter_clockwise() == target {
            Some(Movement::TurnCounterClockwise)
        } else {
            Some(Movement::TurnAround)
        }
    }

    /// Stable index of the heading, matching the order of [`Heading::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// Movement commands a pilot may issue for a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Advance one cell in the current heading.
    MoveForward,
    /// Rotate a quarter turn clockwise without leaving the cell.
    TurnClockwise,
    /// Rotate a quarter turn counter-clockwise without leaving the cell.
    TurnCounterClockwise,
    /// Rotate half a turn without leaving the cell.
    TurnAround,
    /// Hold position for one step.
    Wait,
    /// Terminal command; the pilot must not be invoked again.
    Finish,
}

impl Movement {
    /// Mirror image of the command, used when a recorded path is driven in
    /// the opposite direction.
    ///
    /// Quarter turns swap; every other command passes through unchanged.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        match self {
            Self::TurnClockwise => Self::TurnCounterClockwise,
            Self::TurnCounterClockwise => Self::TurnClockwise,
            other => other,
        }
    }

    /// Reports whether the command ends the run.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finish)
    }
}

/// Location of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: u32,
    y: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell, growing eastward.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the cell, growing northward.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Adjacent cell in `heading`, if it lies inside a maze of `size`.
    #[must_use]
    pub fn neighbor(self, heading: Heading, size: MazeSize) -> Option<CellCoord> {
        let side = size.side();
        let (x, y) = match heading {
            Heading::North => (Some(self.x), self.y.checked_add(1)),
            Heading::East => (self.x.checked_add(1), Some(self.y)),
            Heading::South => (Some(self.x), self.y.checked_sub(1)),
            Heading::West => (self.x.checked_sub(1), Some(self.y)),
        };
        let (x, y) = (x?, y?);
        (x < side && y < side).then_some(CellCoord::new(x, y))
    }

    /// Reports whether the coordinate lies inside a maze of `size`.
    #[must_use]
    pub const fn is_within(self, size: MazeSize) -> bool {
        self.x < size.side() && self.y < size.side()
    }
}

/// Side length of a square maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MazeSize(u32);

impl MazeSize {
    /// Validates and wraps a maze side length.
    pub fn new(side: u32) -> Result<Self, MazeSizeError> {
        if side < MIN_SIDE {
            return Err(MazeSizeError::TooSmall { side });
        }
        if side > MAX_SIDE {
            return Err(MazeSizeError::TooLarge { side });
        }
        Ok(Self(side))
    }

    /// Number of cells along each edge.
    #[must_use]
    pub const fn side(&self) -> u32 {
        self.0
    }

    /// Total number of cells in the maze.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    /// Iterator over every cell, row by row from the bottom-left corner.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        let side = self.0;
        (0..side).flat_map(move |y| (0..side).map(move |x| CellCoord::new(x, y)))
    }
}

/// Reasons a maze side length is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MazeSizeError {
    /// The maze must be at least [`MIN_SIDE`] cells wide.
    #[error("maze side {side} is below the minimum of {MIN_SIDE}")]
    TooSmall {
        /// Requested side length.
        side: u32,
    },
    /// The maze must be at most [`MAX_SIDE`] cells wide.
    #[error("maze side {side} exceeds the maximum of {MAX_SIDE}")]
    TooLarge {
        /// Requested side length.
        side: u32,
    },
}

/// Walls sensed around the mouse relative to its heading.
///
/// The wall behind the mouse is never reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WallReadings {
    /// A wall blocks the cell directly ahead.
    pub front: bool,
    /// A wall blocks the cell to the left.
    pub left: bool,
    /// A wall blocks the cell to the right.
    pub right: bool,
}

impl WallReadings {
    /// Creates a new reading from the three sensed sides.
    #[must_use]
    pub const fn new(front: bool, left: bool, right: bool) -> Self {
        Self { front, left, right }
    }

    /// Sensed wall on the side the mouse would face after `movement`.
    ///
    /// Returns `None` for commands that do not look at a sensed side.
    #[must_use]
    pub const fn toward(&self, movement: Movement) -> Option<bool> {
        match movement {
            Movement::MoveForward => Some(self.front),
            Movement::TurnCounterClockwise => Some(self.left),
            Movement::TurnClockwise => Some(self.right),
            Movement::TurnAround | Movement::Wait | Movement::Finish => None,
        }
    }
}

/// Decision maker invoked once per step by the simulation loop.
pub trait Pilot {
    /// Chooses the next command for the mouse occupying `cell`.
    fn next_movement(&mut self, cell: CellCoord, readings: WallReadings) -> Movement;
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Heading, MazeSize, MazeSizeError, Movement, WallReadings};
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn heading_apply_follows_turns() {
        assert_eq!(
            Heading::North.apply(Movement::TurnClockwise),
            Heading::East
        );
        assert_eq!(
            Heading::North.apply(Movement::TurnCounterClockwise),
            Heading::West
        );
        assert_eq!(Heading::East.apply(Movement::TurnAround), Heading::West);
        assert_eq!(Heading::South.apply(Movement::MoveForward), Heading::South);
        assert_eq!(Heading::West.apply(Movement::Wait), Heading::West);
    }

    #[test]
    fn rotation_to_reaches_target() {
        for from in Heading::ALL {
            for to in Heading::ALL {
                let reached = from
                    .rotation_to(to)
                    .map_or(from, |movement| from.apply(movement));
                assert_eq!(reached, to, "{from:?} -> {to:?}");
            }
        }
        assert_eq!(Heading::North.rotation_to(Heading::North), None);
    }

    #[test]
    fn mirrored_swaps_quarter_turns_only() {
        assert_eq!(
            Movement::TurnClockwise.mirrored(),
            Movement::TurnCounterClockwise
        );
        assert_eq!(
            Movement::TurnCounterClockwise.mirrored(),
            Movement::TurnClockwise
        );
        assert_eq!(Movement::MoveForward.mirrored(), Movement::MoveForward);
        assert_eq!(Movement::TurnAround.mirrored(), Movement::TurnAround);
    }

    #[test]
    fn neighbor_respects_bounds() {
        let size = MazeSize::new(4).expect("valid size");
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Heading::South, size), None);
        assert_eq!(corner.neighbor(Heading::West, size), None);
        assert_eq!(
            corner.neighbor(Heading::North, size),
            Some(CellCoord::new(0, 1))
        );
        let far = CellCoord::new(3, 3);
        assert_eq!(far.neighbor(Heading::East, size), None);
        assert_eq!(far.neighbor(Heading::North, size), None);
    }

    #[test]
    fn maze_size_rejects_degenerate_sides() {
        assert_eq!(MazeSize::new(1), Err(MazeSizeError::TooSmall { side: 1 }));
        assert_eq!(
            MazeSize::new(1000),
            Err(MazeSizeError::TooLarge { side: 1000 })
        );
        let size = MazeSize::new(3).expect("valid size");
        assert_eq!(size.cells().count(), 9);
        assert_eq!(size.cell_count(), 9);
    }

    #[test]
    fn wall_readings_map_turns_to_sides() {
        let readings = WallReadings::new(true, false, true);
        assert_eq!(readings.toward(Movement::MoveForward), Some(true));
        assert_eq!(readings.toward(Movement::TurnCounterClockwise), Some(false));
        assert_eq!(readings.toward(Movement::TurnClockwise), Some(true));
        assert_eq!(readings.toward(Movement::TurnAround), None);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn trace_step_types_round_trip_through_bincode() {
        assert_round_trip(&(
            CellCoord::new(7, 8),
            Heading::West,
            Movement::TurnCounterClockwise,
        ));
    }
}
