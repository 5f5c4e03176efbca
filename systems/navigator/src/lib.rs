#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Flood-fill navigator that explores an unknown maze and replays the
//! shortest route it discovered.
//!
//! The [`Navigator`] is driven once per step through the [`Pilot`] trait. It
//! owns a [`DistanceMap`] of discovered walls and distance estimates, keeps
//! its own belief of the mouse heading by applying every command it emits,
//! and walks through the phases described by [`Mode`].

mod distance_map;
mod flood;
mod lookahead;
mod route;

use log::{debug, error, info, warn};
use micromouse_core::{CellCoord, Heading, MazeSize, Movement, Pilot, WallReadings};
use serde::{Deserialize, Serialize};

pub use distance_map::{goal_distance, is_goal, Cell, DistanceMap, UNREACHABLE};
pub use route::{Leg, Route, RouteError};

use lookahead::{best_move, LOOKOUTS};

/// Cell the mouse starts every run from.
pub const START_CELL: CellCoord = CellCoord::new(0, 0);

/// Phases of a complete run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Exploring the maze toward the goal while discovering walls.
    Search,
    /// Driving the recorded route back to the start cell.
    ReturnHome,
    /// Replaying the recorded route to the goal without exploring.
    SpeedToGoal,
    /// Replaying the recorded route back to the start cell.
    SpeedReturnHome,
    /// The run is over; only [`Movement::Finish`] is emitted.
    Finished,
}

/// Reason the navigator entered [`Mode::Finished`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Search, return and speed run all completed.
    Completed,
    /// The goal cannot be reached through the walls discovered so far.
    GoalUnreachable,
    /// The goal was reached in demo configuration, which stops there.
    DemoGoalReached,
}

/// Static configuration of a [`Navigator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigatorConfig {
    /// Side length of the maze.
    pub size: MazeSize,
    /// Heading of the mouse when it is first invoked at [`START_CELL`].
    pub start_heading: Heading,
    /// Stop as soon as the goal is reached instead of returning home.
    pub demo: bool,
}

impl NavigatorConfig {
    /// Configuration for a mouse facing north in a maze of `size`.
    #[must_use]
    pub const fn new(size: MazeSize) -> Self {
        Self {
            size,
            start_heading: Heading::North,
            demo: false,
        }
    }

    /// Replaces the demo flag.
    #[must_use]
    pub const fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Replaces the starting heading.
    #[must_use]
    pub const fn with_start_heading(mut self, heading: Heading) -> Self {
        self.start_heading = heading;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Landmark {
    Start,
    Goal,
    Elsewhere,
}

/// Phased controller that turns wall readings into movement commands.
#[derive(Clone, Debug)]
pub struct Navigator {
    config: NavigatorConfig,
    map: DistanceMap,
    mode: Mode,
    outcome: Option<Outcome>,
    heading: Heading,
    route: Option<Route>,
    visited_start: bool,
    previous: Option<CellCoord>,
}

impl Navigator {
    /// Creates a navigator in [`Mode::Search`] with a fresh distance map.
    #[must_use]
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            map: DistanceMap::new(config.size),
            heading: config.start_heading,
            mode: Mode::Search,
            outcome: None,
            route: None,
            visited_start: false,
            previous: None,
            config,
        }
    }

    /// Configuration the navigator was created with.
    #[must_use]
    pub const fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Current phase of the run.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Reason the run finished, once it has.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Heading the navigator believes the mouse holds.
    #[must_use]
    pub const fn heading(&self) -> Heading {
        self.heading
    }

    /// Discovered walls and distance estimates.
    #[must_use]
    pub const fn distance_map(&self) -> &DistanceMap {
        &self.map
    }

    /// Route recorded after the goal was first reached.
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    fn decide(&mut self, cell: CellCoord, readings: WallReadings) -> Movement {
        if let Some(movement) = self.transition(cell) {
            return movement;
        }

        match self.mode {
            Mode::Search => self.search(cell, readings),
            Mode::ReturnHome | Mode::SpeedReturnHome => self.replay(Leg::Homeward),
            Mode::SpeedToGoal => self.replay(Leg::Outbound),
            Mode::Finished => Movement::Finish,
        }
    }

    fn transition(&mut self, cell: CellCoord) -> Option<Movement> {
        match (self.mode, self.landmark(cell)) {
            (Mode::Finished, _) => Some(Movement::Finish),
            (Mode::Search, Landmark::Goal) if self.config.demo => {
                info!("found the goal at {cell:?}; demo run stops here");
                Some(self.finish(Outcome::DemoGoalReached))
            }
            (Mode::Search, Landmark::Goal) => {
                self.complete_search(cell);
                self.enter(Mode::ReturnHome);
                Some(Movement::TurnAround)
            }
            (Mode::SpeedToGoal, Landmark::Goal) => {
                self.enter(Mode::SpeedReturnHome);
                Some(Movement::TurnAround)
            }
            (Mode::ReturnHome, Landmark::Start) => {
                self.enter(Mode::SpeedToGoal);
                None
            }
            (Mode::SpeedReturnHome, Landmark::Start) => Some(self.finish(Outcome::Completed)),
            (Mode::Search, Landmark::Start) => {
                let reentered = self.previous != Some(cell);
                if self.visited_start && reentered {
                    info!("back at the start without finding the goal; giving up");
                    return Some(self.finish(Outcome::GoalUnreachable));
                }
                self.visited_start = true;
                None
            }
            _ => None,
        }
    }

    fn landmark(&self, cell: CellCoord) -> Landmark {
        if is_goal(self.config.size, cell) {
            Landmark::Goal
        } else if cell == START_CELL {
            Landmark::Start
        } else {
            Landmark::Elsewhere
        }
    }

    fn search(&mut self, cell: CellCoord, readings: WallReadings) -> Movement {
        self.map.mark_visited(cell);
        let current = self.map.distance(cell);

        let mut candidates = Vec::with_capacity(LOOKOUTS.len());
        for movement in LOOKOUTS {
            if readings.toward(movement) != Some(false) {
                continue;
            }
            let direction = self.heading.apply(movement);
            let Some(neighbor) = cell.neighbor(direction, self.config.size) else {
                warn!("opening reported on the maze boundary at {cell:?} facing {direction:?}");
                continue;
            };
            self.map.record_wall(cell, direction, true);
            candidates.push((movement, self.map.distance(neighbor)));
        }

        if let Some(movement) = best_move(current, candidates) {
            return movement;
        }

        // A cell without any known opening has to be sensed from both
        // headings before it counts as sealed.
        if !Heading::ALL
            .into_iter()
            .any(|direction| self.map.is_open(cell, direction))
        {
            if self.previous == Some(cell) {
                info!("{cell:?} is walled in on every side; giving up");
                return self.finish(Outcome::GoalUnreachable);
            }
            return Movement::TurnAround;
        }

        let updates = self.map.flood_repair(cell);
        debug!(
            "flood repair at {cell:?} updated {updates} cells, distance {current} -> {}",
            self.map.distance(cell)
        );

        if self.map.distance(cell) >= self.map.ceiling() {
            info!("no known opening leads toward the goal from {cell:?}; giving up");
            return self.finish(Outcome::GoalUnreachable);
        }

        Movement::TurnAround
    }

    fn complete_search(&mut self, goal: CellCoord) {
        let reached = self.map.rederive_from_goal(goal);
        info!("found the goal at {goal:?}; {reached} cells connect to it");
        self.route = self.build_route();
        if let Some(route) = &self.route {
            info!("recorded a route of {} commands", route.len());
        }
    }

    fn build_route(&self) -> Option<Route> {
        match Route::build(&self.map, START_CELL, self.config.start_heading) {
            Ok(mut route) => {
                route.rewind_to_goal();
                Some(route)
            }
            Err(err) => {
                error!("cannot record a route: {err}");
                None
            }
        }
    }

    fn replay(&mut self, leg: Leg) -> Movement {
        if self.route.is_none() {
            self.route = self.build_route();
        }
        let heading = self.heading;
        let Some(route) = self.route.as_mut() else {
            warn!("no route to replay in {:?}", self.mode);
            return Movement::Wait;
        };

        let Some(expected) = route.expected_heading(leg) else {
            warn!("route exhausted in {:?} at cursor {}", self.mode, route.cursor());
            return Movement::Wait;
        };
        if let Some(turn) = heading.rotation_to(expected) {
            return turn;
        }

        route.next_movement(leg).unwrap_or(Movement::Wait)
    }

    fn enter(&mut self, mode: Mode) {
        info!("{:?} -> {:?}", self.mode, mode);
        self.mode = mode;
    }

    fn finish(&mut self, outcome: Outcome) -> Movement {
        self.enter(Mode::Finished);
        self.outcome = Some(outcome);
        Movement::Finish
    }
}

impl Pilot for Navigator {
    fn next_movement(&mut self, cell: CellCoord, readings: WallReadings) -> Movement {
        let movement = self.decide(cell, readings);
        self.heading = self.heading.apply(movement);
        self.previous = Some(cell);
        movement
    }
}
