//! Wall layout of a physical maze and its text representation.

use micromouse_core::{CellCoord, Heading, MazeSize, MazeSizeError, WallReadings};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

const ALL_WALLS: u8 = 0b1111;

/// Ground-truth walls of a square maze.
///
/// Each cell stores one bit per [`Heading`], set while a wall stands on that
/// side. Shared walls are always written on both cells and the outer boundary
/// is never opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeLayout {
    size: MazeSize,
    walls: Vec<u8>,
}

impl MazeLayout {
    /// Creates a layout in which every cell is walled on all four sides.
    #[must_use]
    pub fn enclosed(size: MazeSize) -> Self {
        Self {
            size,
            walls: vec![ALL_WALLS; size.cell_count()],
        }
    }

    /// Creates a layout with only the outer boundary standing.
    #[must_use]
    pub fn open_interior(size: MazeSize) -> Self {
        let mut layout = Self::enclosed(size);
        for cell in size.cells() {
            layout.set_open(cell, Heading::East, true);
            layout.set_open(cell, Heading::North, true);
        }
        layout
    }

    /// Carves a perfect maze with a seeded recursive backtracker.
    ///
    /// The same seed always produces the same maze. For an even side the four
    /// centre cells are additionally joined into one open goal room.
    #[must_use]
    pub fn generate(size: MazeSize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut layout = Self::enclosed(size);
        let mut carved = vec![false; size.cell_count()];

        let origin = CellCoord::new(0, 0);
        if let Some(index) = layout.index(origin) {
            carved[index] = true;
        }
        let mut stack = vec![origin];

        while let Some(&cell) = stack.last() {
            let fresh: Vec<(Heading, CellCoord)> = Heading::ALL
                .into_iter()
                .filter_map(|heading| {
                    let neighbor = cell.neighbor(heading, size)?;
                    let index = layout.index(neighbor)?;
                    (!carved[index]).then_some((heading, neighbor))
                })
                .collect();

            match fresh.choose(&mut rng) {
                Some(&(heading, neighbor)) => {
                    layout.set_open(cell, heading, true);
                    if let Some(index) = layout.index(neighbor) {
                        carved[index] = true;
                    }
                    stack.push(neighbor);
                }
                None => {
                    let _ = stack.pop();
                }
            }
        }

        let centre = (size.side() - 1) / 2..=size.side() / 2;
        for y in centre.clone() {
            for x in centre.clone() {
                let cell = CellCoord::new(x, y);
                if x < *centre.end() {
                    layout.set_open(cell, Heading::East, true);
                }
                if y < *centre.end() {
                    layout.set_open(cell, Heading::North, true);
                }
            }
        }

        layout
    }

    /// Reads a layout from the `+---+` text format.
    ///
    /// The first line is the northern boundary and fixes both the side length
    /// (one cell per `+---` segment) and the cell width. It is followed by a
    /// cell line and a separator line for every row, top row first. A `|` in a
    /// cell line marks a wall between horizontal neighbors, a `-` in a
    /// separator marks a wall between vertical neighbors. Text inside cells is
    /// ignored.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text.lines().map(str::trim_end).collect();
        let end = lines
            .iter()
            .rposition(|line| !line.is_empty())
            .ok_or(LayoutError::Empty)?;
        let start = lines
            .iter()
            .position(|line| !line.is_empty())
            .ok_or(LayoutError::Empty)?;
        let lines = &lines[start..=end];

        let header = lines.first().ok_or(LayoutError::Empty)?;
        let (side, width) = parse_header(header)?;
        let size = MazeSize::new(side)?;

        let side = usize::try_from(side).map_err(|_| LayoutError::MalformedHeader)?;
        let expected = 2 * side + 1;
        if lines.len() != expected {
            return Err(LayoutError::LineCount {
                expected,
                found: lines.len(),
            });
        }

        let mut layout = Self::enclosed(size);
        let stride = width + 1;
        for (row, y) in (0..size.side()).rev().enumerate() {
            let cells = lines[1 + 2 * row].as_bytes();
            let separator = lines[2 + 2 * row].as_bytes();

            for (column, x) in (0..size.side()).enumerate() {
                let cell = CellCoord::new(x, y);
                if column > 0 && cells.get(column * stride) == Some(&b' ') {
                    layout.set_open(cell, Heading::West, true);
                }
                if y > 0 && separator.get(column * stride + 1) == Some(&b' ') {
                    layout.set_open(cell, Heading::South, true);
                }
            }
        }

        Ok(layout)
    }

    /// Side length of the maze.
    #[must_use]
    pub const fn size(&self) -> MazeSize {
        self.size
    }

    /// Opens or closes the wall between `cell` and its `heading` neighbor.
    ///
    /// Walls on the outer boundary cannot be opened and are left untouched.
    pub fn set_open(&mut self, cell: CellCoord, heading: Heading, open: bool) {
        let Some(neighbor) = cell.neighbor(heading, self.size) else {
            return;
        };
        self.write_wall(cell, heading, !open);
        self.write_wall(neighbor, heading.opposite(), !open);
    }

    /// Reports whether the `heading` side of `cell` is open.
    ///
    /// Cells outside the maze read as closed on every side.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, heading: Heading) -> bool {
        self.index(cell)
            .and_then(|index| self.walls.get(index))
            .is_some_and(|mask| mask & bit(heading) == 0)
    }

    /// Walls a mouse in `cell` facing `heading` senses ahead, left and right.
    #[must_use]
    pub fn wall_readings(&self, cell: CellCoord, heading: Heading) -> WallReadings {
        WallReadings::new(
            !self.is_open(cell, heading),
            !self.is_open(cell, heading.counter_clockwise()),
            !self.is_open(cell, heading.clockwise()),
        )
    }

    fn write_wall(&mut self, cell: CellCoord, heading: Heading, present: bool) {
        let Some(mask) = self.index(cell).and_then(|index| self.walls.get_mut(index)) else {
            return;
        };
        if present {
            *mask |= bit(heading);
        } else {
            *mask &= !bit(heading);
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !cell.is_within(self.size) {
            return None;
        }
        let side = usize::try_from(self.size.side()).ok()?;
        let x = usize::try_from(cell.x()).ok()?;
        let y = usize::try_from(cell.y()).ok()?;
        y.checked_mul(side)?.checked_add(x)
    }
}

const fn bit(heading: Heading) -> u8 {
    1 << heading.index()
}

fn parse_header(header: &str) -> Result<(u32, usize), LayoutError> {
    let segments: Vec<&str> = header
        .strip_prefix('+')
        .and_then(|rest| rest.strip_suffix('+'))
        .ok_or(LayoutError::MalformedHeader)?
        .split('+')
        .collect();

    let width = segments.first().map_or(0, |segment| segment.len());
    let uniform = segments
        .iter()
        .all(|segment| segment.len() == width && segment.bytes().all(|byte| byte == b'-'));
    if width == 0 || !uniform {
        return Err(LayoutError::MalformedHeader);
    }

    let side = u32::try_from(segments.len()).map_err(|_| LayoutError::MalformedHeader)?;
    Ok((side, width))
}

/// Reasons a maze text cannot be read.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The text holds no lines.
    #[error("maze text is empty")]
    Empty,
    /// The first line is not a run of equally wide `+---` segments.
    #[error("maze header must look like `+---+---+`")]
    MalformedHeader,
    /// The header describes an unsupported side length.
    #[error(transparent)]
    Size(#[from] MazeSizeError),
    /// The number of lines does not match the side length.
    #[error("expected {expected} maze lines, found {found}")]
    LineCount {
        /// Lines required by the header.
        expected: usize,
        /// Lines present in the text.
        found: usize,
    },
}
