//! Distance propagation over the discovered wall graph.

use std::collections::VecDeque;

use micromouse_core::{CellCoord, Heading};

use crate::distance_map::{DistanceMap, UNREACHABLE};

impl DistanceMap {
    /// Repairs distances around `start` after new walls invalidated them.
    ///
    /// Cells are processed depth-first from an explicit stack. Each popped
    /// cell takes one more than its smallest open neighbor; when that changes
    /// its distance, every open neighbor that has already been visited is
    /// pushed again. Unvisited neighbors keep their placeholder until the
    /// mouse reaches them. Goal cells and cells without a known opening are
    /// left alone, and assigned distances saturate at [`DistanceMap::ceiling`]
    /// so a closed-off region settles instead of counting upward forever.
    ///
    /// Returns the number of distance updates performed.
    pub fn flood_repair(&mut self, start: CellCoord) -> usize {
        let ceiling = self.ceiling();
        let mut stack = vec![start];
        let mut updates = 0;

        while let Some(cell) = stack.pop() {
            self.mark_visited(cell);
            let current = self.distance(cell);
            if current == 0 {
                continue;
            }

            let Some(nearest) = self
                .open_neighbors(cell)
                .map(|neighbor| self.distance(neighbor))
                .min()
            else {
                continue;
            };

            let relaxed = nearest.saturating_add(1).min(ceiling);
            if relaxed == current {
                continue;
            }

            self.set_distance(cell, relaxed);
            updates += 1;
            stack.extend(
                self.open_neighbors(cell)
                    .filter(|neighbor| self.is_visited(*neighbor)),
            );
        }

        updates
    }

    /// Recomputes every distance as the breadth-first hop count to `goal`
    /// through walls recorded as open.
    ///
    /// Visited flags are cleared first and then set again as cells are
    /// dequeued, so afterwards they mark exactly the cells connected to
    /// `goal`. Cells that cannot be reached are marked [`UNREACHABLE`].
    ///
    /// Returns the number of cells reached, `goal` included.
    pub fn rederive_from_goal(&mut self, goal: CellCoord) -> usize {
        self.clear_visited();
        self.fill_distances(UNREACHABLE);
        if self.cell(goal).is_none() {
            return 0;
        }

        self.set_distance(goal, 0);
        let mut queue = VecDeque::from([goal]);
        let mut reached = 0;

        while let Some(cell) = queue.pop_front() {
            self.mark_visited(cell);
            reached += 1;
            let next = self.distance(cell).saturating_add(1);

            for heading in Heading::ALL {
                let Some(neighbor) = self.open_neighbor(cell, heading) else {
                    continue;
                };
                if self.distance(neighbor) != UNREACHABLE {
                    continue;
                }
                self.set_distance(neighbor, next);
                queue.push_back(neighbor);
            }
        }

        reached
    }

    fn open_neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> + '_ {
        Heading::ALL
            .into_iter()
            .filter_map(move |heading| self.open_neighbor(cell, heading))
    }
}
