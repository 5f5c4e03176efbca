//! Cell grid holding discovered walls and distance-to-goal estimates.

use log::error;
use micromouse_core::{CellCoord, Heading, MazeSize};

/// Distance marker for cells that cannot reach the goal through known walls.
pub const UNREACHABLE: u32 = u32::MAX;

/// Navigation state recorded for a single maze cell.
///
/// Walls start out present and are only ever cleared once the mouse senses
/// an opening, so an unvisited cell reads as closed on every side it has not
/// been observed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    walls: [bool; 4],
    visited: bool,
    distance: u32,
}

impl Cell {
    fn new(distance: u32) -> Self {
        Self {
            walls: [true; 4],
            visited: false,
            distance,
        }
    }

    /// Reports whether a wall is recorded on the `heading` side of the cell.
    #[must_use]
    pub const fn has_wall(&self, heading: Heading) -> bool {
        self.walls[heading.index()]
    }

    /// Reports whether the cell has been visited.
    #[must_use]
    pub const fn is_visited(&self) -> bool {
        self.visited
    }

    /// Current distance-to-goal estimate.
    #[must_use]
    pub const fn distance(&self) -> u32 {
        self.distance
    }
}

/// Fixed-size grid of [`Cell`] values owned by the navigator.
///
/// Neighbors are resolved through coordinate arithmetic, so the map never
/// hands out references between cells.
#[derive(Clone, Debug)]
pub struct DistanceMap {
    size: MazeSize,
    cells: Vec<Cell>,
}

impl DistanceMap {
    /// Creates a map with every wall present, no cell visited and each
    /// distance seeded with [`goal_distance`].
    #[must_use]
    pub fn new(size: MazeSize) -> Self {
        let cells = size
            .cells()
            .map(|cell| Cell::new(goal_distance(size, cell.x(), cell.y())))
            .collect();
        Self { size, cells }
    }

    /// Side length of the mapped maze.
    #[must_use]
    pub const fn size(&self) -> MazeSize {
        self.size
    }

    /// Cell stored at `coord`, if it lies inside the maze.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Distance recorded for `coord`, or [`UNREACHABLE`] outside the maze.
    #[must_use]
    pub fn distance(&self, coord: CellCoord) -> u32 {
        self.cell(coord).map_or(UNREACHABLE, Cell::distance)
    }

    /// Reports whether `coord` has been visited.
    #[must_use]
    pub fn is_visited(&self, coord: CellCoord) -> bool {
        self.cell(coord).is_some_and(Cell::is_visited)
    }

    /// Reports whether the wall on the `heading` side of `coord` is known to
    /// be open.
    #[must_use]
    pub fn is_open(&self, coord: CellCoord, heading: Heading) -> bool {
        self.cell(coord).is_some_and(|cell| !cell.has_wall(heading))
    }

    /// Neighbor reached by crossing the `heading` wall of `coord`, provided
    /// that wall is known to be open.
    #[must_use]
    pub fn open_neighbor(&self, coord: CellCoord, heading: Heading) -> Option<CellCoord> {
        if !self.is_open(coord, heading) {
            return None;
        }
        coord.neighbor(heading, self.size)
    }

    /// Records the wall between `coord` and its `heading` neighbor on both
    /// cells.
    ///
    /// Walls on the maze boundary have no neighbor and are left untouched.
    pub fn record_wall(&mut self, coord: CellCoord, heading: Heading, is_open: bool) {
        let Some(neighbor) = coord.neighbor(heading, self.size) else {
            return;
        };
        if let Some(cell) = self.cell_mut(coord) {
            cell.walls[heading.index()] = !is_open;
        }
        if let Some(cell) = self.cell_mut(neighbor) {
            cell.walls[heading.opposite().index()] = !is_open;
        }
    }

    /// Marks `coord` as visited.
    pub fn mark_visited(&mut self, coord: CellCoord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.visited = true;
        }
    }

    /// Resets every visited flag.
    pub fn clear_visited(&mut self) {
        for cell in &mut self.cells {
            cell.visited = false;
        }
    }

    /// Largest distance the local flood repair will assign.
    ///
    /// Real path lengths stay well below this value, so a cell that reaches
    /// it has no known route to the goal or to an unexplored cell.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        let side = self.size.side();
        side * side + 2 * side
    }

    pub(crate) fn set_distance(&mut self, coord: CellCoord, distance: u32) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.distance = distance;
        }
    }

    pub(crate) fn fill_distances(&mut self, distance: u32) {
        for cell in &mut self.cells {
            cell.distance = distance;
        }
    }

    fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).and_then(|index| self.cells.get_mut(index))
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !coord.is_within(self.size) {
            return None;
        }
        let side = usize::try_from(self.size.side()).ok()?;
        let x = usize::try_from(coord.x()).ok()?;
        let y = usize::try_from(coord.y()).ok()?;
        y.checked_mul(side)?.checked_add(x)
    }
}

/// Wall-free Manhattan distance from `(x, y)` to the nearest goal cell.
///
/// For an even side this is the quadrant formula around the midline
/// `mid = N / 2`: `2 * mid - x - y - 2` in the lower-left quadrant,
/// `y - x - 1` in the upper-left, `x - y - 1` in the lower-right and
/// `x + y - 2 * mid` in the upper-right. Measuring each axis against the
/// goal span `[(N - 1) / 2, N / 2]` yields exactly those values and stays
/// correct for the single-cell goal of an odd side.
///
/// Coordinates outside the maze are logged and answered with
/// [`UNREACHABLE`].
#[must_use]
pub fn goal_distance(size: MazeSize, x: u32, y: u32) -> u32 {
    if !CellCoord::new(x, y).is_within(size) {
        error!(
            "goal distance requested for ({x}, {y}) outside a {side}x{side} maze",
            side = size.side()
        );
        return UNREACHABLE;
    }
    let (low, high) = goal_span(size);
    let gap = |value: u32| low.saturating_sub(value) + value.saturating_sub(high);
    gap(x) + gap(y)
}

/// Reports whether `coord` lies in the goal region: the centre cell for an
/// odd side, or any of the four centre cells for an even side.
#[must_use]
pub fn is_goal(size: MazeSize, coord: CellCoord) -> bool {
    let (low, high) = goal_span(size);
    (low..=high).contains(&coord.x()) && (low..=high).contains(&coord.y())
}

fn goal_span(size: MazeSize) -> (u32, u32) {
    let side = size.side();
    ((side - 1) / 2, side / 2)
}
