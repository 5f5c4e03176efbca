#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for the micromouse maze.

mod layout;

pub use layout::{LayoutError, MazeLayout};

use log::{debug, trace};
use micromouse_core::{CellCoord, Heading, Movement, Pilot};
use thiserror::Error;

/// Physical maze together with the mouse that drives through it.
#[derive(Clone, Debug)]
pub struct World {
    layout: MazeLayout,
    mouse: CellCoord,
    heading: Heading,
    steps: usize,
    forward_moves: usize,
}

impl World {
    /// Places the mouse in the bottom-left start cell facing `heading`.
    #[must_use]
    pub fn new(layout: MazeLayout, heading: Heading) -> Self {
        Self {
            layout,
            mouse: CellCoord::new(0, 0),
            heading,
            steps: 0,
            forward_moves: 0,
        }
    }
}

/// Executes a single command on the world.
///
/// Turns rotate the mouse in place, `Wait` and `Finish` leave it untouched.
/// Driving forward into a wall is rejected and the world is not modified.
pub fn apply(world: &mut World, movement: Movement) -> Result<(), SimulationError> {
    match movement {
        Movement::MoveForward => {
            let next = world
                .layout
                .is_open(world.mouse, world.heading)
                .then(|| world.mouse.neighbor(world.heading, world.layout.size()))
                .flatten()
                .ok_or(SimulationError::Collision {
                    cell: world.mouse,
                    heading: world.heading,
                })?;
            world.mouse = next;
            world.forward_moves += 1;
        }
        Movement::TurnClockwise | Movement::TurnCounterClockwise | Movement::TurnAround => {
            world.heading = world.heading.apply(movement);
        }
        Movement::Wait | Movement::Finish => {}
    }
    world.steps += 1;
    trace!("{movement:?} -> {:?} facing {:?}", world.mouse, world.heading);
    Ok(())
}

/// Senses the walls around the mouse, asks `pilot` for a command and
/// executes it.
pub fn step<P: Pilot>(world: &mut World, pilot: &mut P) -> Result<Movement, SimulationError> {
    let readings = world.layout.wall_readings(world.mouse, world.heading);
    let movement = pilot.next_movement(world.mouse, readings);
    apply(world, movement)?;
    Ok(movement)
}

/// Steps the world until `pilot` answers with [`Movement::Finish`].
///
/// `observer` sees the world and the pilot after every executed command. The
/// run is aborted once `max_steps` commands have been executed without the
/// pilot finishing.
pub fn run<P, F>(
    world: &mut World,
    pilot: &mut P,
    max_steps: usize,
    mut observer: F,
) -> Result<RunSummary, SimulationError>
where
    P: Pilot,
    F: FnMut(&World, &P, Movement),
{
    let first_step = world.steps;
    let first_forward = world.forward_moves;

    for _ in 0..max_steps {
        let movement = step(world, pilot)?;
        observer(world, pilot, movement);
        if movement == Movement::Finish {
            let summary = RunSummary {
                steps: world.steps - first_step,
                forward_moves: world.forward_moves - first_forward,
            };
            debug!(
                "run finished after {} steps and {} cells",
                summary.steps, summary.forward_moves
            );
            return Ok(summary);
        }
    }

    Err(SimulationError::StepLimit { limit: max_steps })
}

/// Totals collected over one call to [`run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed, the final `Finish` included.
    pub steps: usize,
    /// Cells driven into.
    pub forward_moves: usize,
}

/// Failures raised while simulating the mouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// The mouse tried to drive through a wall.
    #[error("mouse at {cell:?} facing {heading:?} drove into a wall")]
    Collision {
        /// Cell the mouse occupied.
        cell: CellCoord,
        /// Direction it tried to drive in.
        heading: Heading,
    },
    /// The pilot did not finish within the allowed number of steps.
    #[error("pilot did not finish within {limit} steps")]
    StepLimit {
        /// Step budget that was exhausted.
        limit: usize,
    },
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use micromouse_core::{CellCoord, Heading, WallReadings};

    use super::{MazeLayout, World};

    /// Ground-truth walls of the maze.
    #[must_use]
    pub fn layout(world: &World) -> &MazeLayout {
        &world.layout
    }

    /// Cell currently occupied by the mouse.
    #[must_use]
    pub fn mouse_cell(world: &World) -> CellCoord {
        world.mouse
    }

    /// Direction the mouse currently faces.
    #[must_use]
    pub fn mouse_heading(world: &World) -> Heading {
        world.heading
    }

    /// Walls the mouse senses from where it stands.
    #[must_use]
    pub fn wall_readings(world: &World) -> WallReadings {
        world.layout.wall_readings(world.mouse, world.heading)
    }

    /// Commands executed since the world was created.
    #[must_use]
    pub fn steps(world: &World) -> usize {
        world.steps
    }

    /// Cells driven into since the world was created.
    #[must_use]
    pub fn forward_moves(world: &World) -> usize {
        world.forward_moves
    }
}
