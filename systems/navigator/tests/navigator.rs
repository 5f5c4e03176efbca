use micromouse_core::{CellCoord, Heading, MazeSize, Movement};
use micromouse_system_navigator::{Mode, Navigator, NavigatorConfig, Outcome};
use micromouse_world::{self as world, query, MazeLayout, RunSummary, World};

const CORRIDOR: &str = include_str!("../../../mazes/corridor4.txt");
const START_LOOP: &str = include_str!("../../../mazes/start_loop4.txt");
const SEALED_GOAL: &str = include_str!("../../../mazes/sealed_goal6.txt");

const STEP_BUDGET: usize = 1_000_000;

use Movement::{MoveForward as F, TurnAround as A, TurnClockwise as R, TurnCounterClockwise as L};

#[test]
fn open_maze_search_takes_the_direct_route() {
    let run = simulate(open_layout(16), false);

    assert_eq!(run.outcome, Some(Outcome::Completed));
    let search: Vec<_> = run.commands_in(Mode::Search);
    let mut expected = vec![F; 7];
    expected.push(R);
    expected.extend([F; 7]);
    assert_eq!(search, expected);
    assert_eq!(run.forward_moves_in(Mode::Search), 14);
    assert_eq!(run.route, expected);
}

#[test]
fn open_maze_runs_every_leg() {
    let run = simulate(open_layout(16), false);

    let modes: Vec<Mode> = run.steps.iter().fold(Vec::new(), |mut modes, step| {
        if modes.last() != Some(&step.mode) {
            modes.push(step.mode);
        }
        modes
    });
    assert_eq!(
        modes,
        vec![
            Mode::Search,
            Mode::ReturnHome,
            Mode::SpeedToGoal,
            Mode::SpeedReturnHome,
            Mode::Finished,
        ]
    );

    let speed = run.commands_in(Mode::SpeedToGoal);
    assert_eq!(speed.first(), Some(&A));
    assert_eq!(&speed[1..], run.route.as_slice());

    let homeward = run.commands_in(Mode::SpeedReturnHome);
    let mut mirrored = vec![F; 7];
    mirrored.push(L);
    mirrored.extend([F; 7]);
    assert_eq!(homeward.first(), Some(&A));
    assert_eq!(&homeward[1..], mirrored.as_slice());

    assert_eq!(
        run.summary,
        RunSummary {
            steps: 15 + 16 + 16 + 16 + 1,
            forward_moves: 14 * 4,
        }
    );
    assert_eq!(run.final_cell, CellCoord::new(0, 0));
}

#[test]
fn corridor_search_repairs_dead_ends() {
    let run = simulate(parse(CORRIDOR), false);

    assert_eq!(
        run.commands_in(Mode::Search),
        vec![F, A, A, F, A, A, F, R, F, A, A, F, R, F]
    );
    assert_eq!(run.route, vec![F, F, F, R, F, F, R, F]);
    assert_eq!(run.commands_in(Mode::ReturnHome), vec![A, F, L, F, F, L, F, F, F]);
    assert_eq!(run.outcome, Some(Outcome::Completed));
    assert_eq!(run.summary.steps, 42);
    assert_eq!(run.summary.forward_moves, 24);
}

#[test]
fn replayed_legs_retrace_the_route() {
    for layout in [open_layout(16), parse(CORRIDOR), open_layout(5)] {
        let run = simulate(layout, false);
        assert_eq!(run.outcome, Some(Outcome::Completed));

        let outbound = run.cells_in(Mode::SpeedToGoal);
        assert_eq!(outbound, run.route_cells);

        let mut reversed = run.route_cells.clone();
        reversed.reverse();
        assert_eq!(run.cells_in(Mode::ReturnHome), reversed);
        assert_eq!(run.cells_in(Mode::SpeedReturnHome), reversed);
    }
}

#[test]
fn returning_to_start_during_search_gives_up() {
    let run = simulate(parse(START_LOOP), false);

    assert_eq!(run.outcome, Some(Outcome::GoalUnreachable));
    assert_eq!(
        run.steps.iter().map(|step| step.movement).collect::<Vec<_>>(),
        vec![F, A, F, Movement::Finish]
    );
    assert_eq!(run.final_cell, CellCoord::new(0, 0));
}

#[test]
fn sealed_goal_is_reported_unreachable() {
    let run = simulate(parse(SEALED_GOAL), false);

    assert_eq!(run.outcome, Some(Outcome::GoalUnreachable));
    assert!(run.route.is_empty());
    assert!(run
        .steps
        .iter()
        .all(|step| matches!(step.mode, Mode::Search | Mode::Finished)));
}

#[test]
fn enclosed_centre_of_full_size_maze_is_reported_unreachable() {
    let mut layout = open_layout(16);
    for (cell, heading) in [
        (CellCoord::new(7, 7), Heading::South),
        (CellCoord::new(8, 7), Heading::South),
        (CellCoord::new(7, 8), Heading::North),
        (CellCoord::new(8, 8), Heading::North),
        (CellCoord::new(7, 7), Heading::West),
        (CellCoord::new(7, 8), Heading::West),
        (CellCoord::new(8, 7), Heading::East),
        (CellCoord::new(8, 8), Heading::East),
    ] {
        layout.set_open(cell, heading, false);
    }

    let run = simulate(layout, false);

    // Ends through the saturated-distance rule far from the start, not a revisit.
    assert_eq!(run.outcome, Some(Outcome::GoalUnreachable));
    assert_eq!(run.final_cell, CellCoord::new(0, 15));
    assert!(run.route.is_empty());
}

#[test]
fn walled_in_start_finishes_within_two_steps() {
    let layout = MazeLayout::enclosed(size(8));
    let config = NavigatorConfig::new(layout.size());

    let run = simulate_within(layout, config, 2);

    assert_eq!(run.outcome, Some(Outcome::GoalUnreachable));
    assert_eq!(
        run.steps.iter().map(|step| step.movement).collect::<Vec<_>>(),
        vec![A, Movement::Finish]
    );
    assert_eq!(run.final_cell, CellCoord::new(0, 0));
}

#[test]
fn cut_off_start_finishes_for_every_heading() {
    let mut cut_off = MazeLayout::generate(size(8), 5);
    for heading in Heading::ALL {
        cut_off.set_open(CellCoord::new(0, 1), heading, false);
        cut_off.set_open(CellCoord::new(1, 0), heading, false);
    }

    for layout in [MazeLayout::enclosed(size(3)), cut_off] {
        for heading in Heading::ALL {
            let config = NavigatorConfig::new(layout.size()).with_start_heading(heading);
            let run = simulate_within(layout.clone(), config, 2);

            assert_eq!(run.outcome, Some(Outcome::GoalUnreachable), "{heading:?}");
            assert_eq!(run.summary.forward_moves, 0);
        }
    }
}

#[test]
fn demo_run_stops_at_goal() {
    let run = simulate(open_layout(16), true);

    assert_eq!(run.outcome, Some(Outcome::DemoGoalReached));
    assert_eq!(run.final_cell, CellCoord::new(7, 7));
    assert_eq!(run.summary.steps, 16);
    assert_eq!(run.summary.forward_moves, 14);
}

#[test]
fn start_heading_shapes_the_route() {
    let layout = open_layout(16);
    let config = NavigatorConfig::new(layout.size()).with_start_heading(Heading::East);

    let run = simulate_with(layout, config);

    let mut expected = vec![F; 7];
    expected.push(L);
    expected.extend([F; 7]);
    assert_eq!(run.outcome, Some(Outcome::Completed));
    assert_eq!(run.route, expected);
    assert_eq!(run.route_cells.last(), Some(&CellCoord::new(7, 7)));
}

#[test]
fn generated_mazes_finish_with_consistent_routes() {
    for seed in 1..=8 {
        let layout = MazeLayout::generate(size(9), seed);
        let shortest = shortest_path_cells(&layout);
        let run = simulate(layout, false);

        assert_eq!(run.outcome, Some(Outcome::Completed), "seed {seed}");
        assert_eq!(run.route_cells.len(), shortest, "seed {seed}");
        assert_eq!(run.cells_in(Mode::SpeedToGoal), run.route_cells);
        assert_eq!(run.final_cell, CellCoord::new(0, 0));
    }
}

#[test]
fn simulation_is_deterministic() {
    let layout = MazeLayout::generate(size(16), 21);

    let first = simulate(layout.clone(), false);
    let second = simulate(layout, false);

    assert_eq!(first.steps, second.steps);
    assert_eq!(first.summary, second.summary);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Step {
    mode: Mode,
    movement: Movement,
    cell: CellCoord,
}

struct Run {
    steps: Vec<Step>,
    summary: RunSummary,
    outcome: Option<Outcome>,
    route: Vec<Movement>,
    route_cells: Vec<CellCoord>,
    final_cell: CellCoord,
}

impl Run {
    fn commands_in(&self, mode: Mode) -> Vec<Movement> {
        self.steps
            .iter()
            .filter(|step| step.mode == mode)
            .map(|step| step.movement)
            .collect()
    }

    fn forward_moves_in(&self, mode: Mode) -> usize {
        self.commands_in(mode)
            .into_iter()
            .filter(|movement| *movement == F)
            .count()
    }

    fn cells_in(&self, mode: Mode) -> Vec<CellCoord> {
        let mut cells: Vec<CellCoord> = Vec::new();
        for step in self.steps.iter().filter(|step| step.mode == mode) {
            if cells.last() != Some(&step.cell) {
                cells.push(step.cell);
            }
        }
        cells
    }
}

fn simulate(layout: MazeLayout, demo: bool) -> Run {
    let config = NavigatorConfig::new(layout.size()).with_demo(demo);
    simulate_with(layout, config)
}

fn simulate_with(layout: MazeLayout, config: NavigatorConfig) -> Run {
    simulate_within(layout, config, STEP_BUDGET)
}

fn simulate_within(layout: MazeLayout, config: NavigatorConfig, budget: usize) -> Run {
    let mut navigator = Navigator::new(config);
    let mut world = World::new(layout, config.start_heading);
    let mut steps = Vec::new();

    let summary = world::run(
        &mut world,
        &mut navigator,
        budget,
        |world, navigator: &Navigator, movement| {
            assert_eq!(navigator.heading(), query::mouse_heading(world));
            steps.push(Step {
                mode: navigator.mode(),
                movement,
                cell: query::mouse_cell(world),
            });
        },
    )
    .expect("navigator finishes without colliding");

    let (route, route_cells) = navigator.route().map_or_else(
        || (Vec::new(), Vec::new()),
        |route| (route.moves().to_vec(), route.cells().to_vec()),
    );

    Run {
        steps,
        summary,
        outcome: navigator.outcome(),
        route,
        route_cells,
        final_cell: query::mouse_cell(&world),
    }
}

fn size(side: u32) -> MazeSize {
    MazeSize::new(side).expect("valid maze size")
}

fn open_layout(side: u32) -> MazeLayout {
    MazeLayout::open_interior(size(side))
}

fn parse(text: &str) -> MazeLayout {
    MazeLayout::parse(text).expect("maze fixture parses")
}

/// Cells on the shortest true path from the start to the goal cell, both
/// ends included.
fn shortest_path_cells(layout: &MazeLayout) -> usize {
    let size = layout.size();
    let centre = (size.side() - 1) / 2..=size.side() / 2;
    let mut depth = vec![(CellCoord::new(0, 0), 1)];
    let mut frontier = 0;

    while let Some(&(cell, cells)) = depth.get(frontier) {
        frontier += 1;
        if centre.contains(&cell.x()) && centre.contains(&cell.y()) {
            return cells;
        }
        for heading in Heading::ALL {
            if !layout.is_open(cell, heading) {
                continue;
            }
            let neighbor = cell.neighbor(heading, size).expect("open wall has a neighbor");
            if depth.iter().all(|(seen, _)| *seen != neighbor) {
                depth.push((neighbor, cells + 1));
            }
        }
    }

    panic!("goal is not connected to the start cell");
}
