#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Text rendering of micromouse mazes.

use std::fmt::Write as _;

use micromouse_core::{CellCoord, Heading};
use micromouse_world::MazeLayout;

const MIN_CELL_WIDTH: usize = 3;

/// Draws a maze in the `+---+` text format.
///
/// Every cell can carry a short label, such as its distance to the goal. The
/// output can be read back with [`MazeLayout::parse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiRenderer {
    cell_width: usize,
}

impl AsciiRenderer {
    /// Creates a renderer whose cells fit labels of `info_width` characters.
    #[must_use]
    pub fn new(info_width: usize) -> Self {
        Self {
            cell_width: info_width.max(MIN_CELL_WIDTH),
        }
    }

    /// Characters between two wall posts.
    #[must_use]
    pub const fn cell_width(&self) -> usize {
        self.cell_width
    }

    /// Renders `layout`, the optional mouse pose and per-cell labels.
    ///
    /// The mouse is drawn as an arrow pointing along its heading and takes the
    /// place of the label of its cell. Labels are centred and cut to the cell
    /// width.
    #[must_use]
    pub fn render<F>(
        &self,
        layout: &MazeLayout,
        mouse: Option<(CellCoord, Heading)>,
        mut info: F,
    ) -> String
    where
        F: FnMut(CellCoord) -> Option<String>,
    {
        let side = layout.size().side();
        let width = self.cell_width;
        let solid = "-".repeat(width);
        let gap = " ".repeat(width);
        let mut out = String::new();

        out.push('+');
        for _ in 0..side {
            out.push_str(&solid);
            out.push('+');
        }
        out.push('\n');

        for y in (0..side).rev() {
            out.push('|');
            for x in 0..side {
                let cell = CellCoord::new(x, y);
                let label = match mouse {
                    Some((position, heading)) if position == cell => arrow(heading).to_string(),
                    _ => info(cell).unwrap_or_default(),
                };
                let _ = write!(out, "{label:^width$.width$}");
                out.push(if layout.is_open(cell, Heading::East) {
                    ' '
                } else {
                    '|'
                });
            }
            out.push('\n');

            out.push('+');
            for x in 0..side {
                let open = layout.is_open(CellCoord::new(x, y), Heading::South);
                out.push_str(if open { &gap } else { &solid });
                out.push('+');
            }
            out.push('\n');
        }

        out
    }
}

impl Default for AsciiRenderer {
    fn default() -> Self {
        Self::new(MIN_CELL_WIDTH)
    }
}

/// Glyph that marks a mouse facing `heading`.
#[must_use]
pub const fn arrow(heading: Heading) -> char {
    match heading {
        Heading::North => '^',
        Heading::East => '>',
        Heading::South => 'v',
        Heading::West => '<',
    }
}

#[cfg(test)]
mod tests {
    use micromouse_core::MazeSize;

    use super::*;

    fn size(side: u32) -> MazeSize {
        MazeSize::new(side).expect("valid maze size")
    }

    #[test]
    fn renders_open_maze_with_mouse() {
        let layout = MazeLayout::open_interior(size(3));

        let text = AsciiRenderer::default().render(
            &layout,
            Some((CellCoord::new(0, 0), Heading::North)),
            |_| None,
        );

        let expected = "\
+---+---+---+
|           |
+   +   +   +
|           |
+   +   +   +
| ^         |
+---+---+---+
";
        assert_eq!(text, expected);
    }

    #[test]
    fn labels_are_centred_and_truncated() {
        let mut layout = MazeLayout::enclosed(size(3));
        layout.set_open(CellCoord::new(0, 2), Heading::East, true);

        let text = AsciiRenderer::new(4).render(&layout, None, |cell| match (cell.x(), cell.y()) {
            (0, 2) => Some("7".to_owned()),
            (1, 2) => Some("123456".to_owned()),
            _ => None,
        });

        let top_row = text.lines().nth(1).expect("cell line");
        assert_eq!(top_row, "| 7   1234|    |");
    }

    #[test]
    fn rendered_text_parses_back() {
        for seed in [1, 2, 3] {
            let layout = MazeLayout::generate(size(8), seed);
            let text = AsciiRenderer::new(5).render(
                &layout,
                Some((CellCoord::new(3, 4), Heading::West)),
                |cell| Some(format!("{}", cell.x() + cell.y())),
            );

            assert_eq!(MazeLayout::parse(&text), Ok(layout));
        }
    }

    #[test]
    fn arrows_point_along_heading() {
        let glyphs: String = Heading::ALL.into_iter().map(arrow).collect();
        assert_eq!(glyphs, "^>v<");
    }
}
