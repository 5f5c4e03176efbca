//! Recorded shortest route between the start cell and the goal.

use micromouse_core::{CellCoord, Heading, Movement};
use thiserror::Error;

use crate::{
    distance_map::DistanceMap,
    lookahead::{best_move, LOOKOUTS},
};

/// Direction in which a [`Route`] is being driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Leg {
    /// From the start cell toward the goal; commands replay unchanged.
    Outbound,
    /// From the goal back to the start cell; commands replay mirrored and in
    /// reverse order.
    Homeward,
}

/// Ordered command sequence from the start cell to the goal.
///
/// A single cursor marks how much of the route lies behind the mouse.
/// Outbound replay advances it, homeward replay walks it back, so both legs
/// share one recording and never need recomputing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    moves: Vec<Movement>,
    headings: Vec<Heading>,
    cells: Vec<CellCoord>,
    cursor: usize,
}

impl Route {
    /// Descends the distance map from `start` until a zero-distance cell.
    ///
    /// Only cells marked visited are considered. At every cell the same
    /// greedy choice as the search step is applied to the left, right and
    /// front neighbors; if none of them is closer the lower neighbor must lie
    /// behind and the route records a reversal.
    pub fn build(map: &DistanceMap, start: CellCoord, heading: Heading) -> Result<Self, RouteError> {
        if !map.is_visited(start) {
            return Err(RouteError::StartUnreached { start });
        }

        let limit = map.size().cell_count().saturating_mul(3);
        let mut cell = start;
        let mut heading = heading;
        let mut moves = Vec::new();
        let mut headings = vec![heading];
        let mut cells = vec![start];

        while map.distance(cell) != 0 {
            if moves.len() >= limit {
                return Err(RouteError::Stalled { cell });
            }

            let current = map.distance(cell);
            let candidates = LOOKOUTS.into_iter().filter_map(|movement| {
                let neighbor = map.open_neighbor(cell, heading.apply(movement))?;
                map.is_visited(neighbor)
                    .then(|| (movement, map.distance(neighbor)))
            });

            let movement = match best_move(current, candidates) {
                Some(movement) => movement,
                None => {
                    let behind = map
                        .open_neighbor(cell, heading.opposite())
                        .filter(|neighbor| {
                            map.is_visited(*neighbor) && map.distance(*neighbor) < current
                        });
                    if behind.is_none() {
                        return Err(RouteError::Stalled { cell });
                    }
                    Movement::TurnAround
                }
            };

            if movement == Movement::MoveForward {
                cell = map
                    .open_neighbor(cell, heading)
                    .ok_or(RouteError::Stalled { cell })?;
                cells.push(cell);
            } else {
                heading = heading.apply(movement);
            }
            moves.push(movement);
            headings.push(heading);
        }

        Ok(Self {
            moves,
            headings,
            cells,
            cursor: 0,
        })
    }

    /// Recorded commands in outbound order.
    #[must_use]
    pub fn moves(&self) -> &[Movement] {
        &self.moves
    }

    /// Cells occupied along the route, from the start cell to the goal.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of commands recorded along the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Reports whether the route holds no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Number of outbound commands currently behind the mouse.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Heading the mouse must hold before the next command of `leg`.
    ///
    /// Returns `None` once the leg is exhausted.
    #[must_use]
    pub fn expected_heading(&self, leg: Leg) -> Option<Heading> {
        match leg {
            Leg::Outbound if self.cursor < self.moves.len() => {
                self.headings.get(self.cursor).copied()
            }
            Leg::Homeward if self.cursor > 0 => self
                .headings
                .get(self.cursor)
                .map(|heading| heading.opposite()),
            Leg::Outbound | Leg::Homeward => None,
        }
    }

    /// Takes the next command of `leg`, moving the cursor accordingly.
    ///
    /// Homeward commands come back mirrored. Returns `None` once the leg is
    /// exhausted.
    pub fn next_movement(&mut self, leg: Leg) -> Option<Movement> {
        match leg {
            Leg::Outbound => {
                let movement = self.moves.get(self.cursor).copied()?;
                self.cursor += 1;
                Some(movement)
            }
            Leg::Homeward => {
                let index = self.cursor.checked_sub(1)?;
                let movement = self.moves.get(index).copied()?;
                self.cursor = index;
                Some(movement.mirrored())
            }
        }
    }

    /// Moves the cursor to the goal end, as after a completed outbound leg.
    pub fn rewind_to_goal(&mut self) {
        self.cursor = self.moves.len();
    }
}

/// Reasons a route cannot be derived from the distance map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The start cell is not connected to the goal through known walls.
    #[error("start cell {start:?} is not connected to the goal")]
    StartUnreached {
        /// Cell the route was requested from.
        start: CellCoord,
    },
    /// No neighbor of a cell on the route is closer to the goal.
    #[error("route construction stalled at {cell:?}")]
    Stalled {
        /// Cell at which the descent stopped.
        cell: CellCoord,
    },
}
