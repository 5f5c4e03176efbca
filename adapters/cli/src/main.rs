#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the flood-fill navigator through a
//! simulated maze.

mod trace;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{info, warn, LevelFilter};
use micromouse_core::{CellCoord, MazeSize, Movement};
use micromouse_rendering::AsciiRenderer;
use micromouse_system_navigator::{Navigator, NavigatorConfig, UNREACHABLE};
use micromouse_world::{query, MazeLayout, World};

use crate::trace::{RunTrace, TraceStep};

/// Runs a micromouse through a maze: explore to the centre, return home,
/// then race the shortest known route.
#[derive(Debug, Parser)]
#[command(name = "micromouse", version)]
struct Args {
    /// Maze text file in the `+---+` format
    #[arg(short, long, value_name = "FILE", conflicts_with = "seed")]
    maze: Option<PathBuf>,

    /// Generate a random maze from this seed instead of an open one
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of generated and open mazes
    #[arg(long, default_value_t = 16)]
    size: u32,

    /// Stop as soon as the goal is reached
    #[arg(long)]
    demo: bool,

    /// Wait for Enter after every cell
    #[arg(short, long)]
    pause: bool,

    /// Draw the maze and distance map after every cell
    #[arg(short, long)]
    draw: bool,

    /// Characters reserved for each cell label when drawing
    #[arg(long, default_value_t = 3)]
    info_width: usize,

    /// Abort when the navigator has not finished after this many commands
    #[arg(long, default_value_t = 1_000_000)]
    max_steps: usize,

    /// Write every issued command to this JSON file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Increase log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let layout = load_layout(&args)?;
    let config = NavigatorConfig::new(layout.size()).with_demo(args.demo);
    let mut navigator = Navigator::new(config);
    let mut world = World::new(layout, config.start_heading);
    let renderer = AsciiRenderer::new(args.info_width);
    let mut trace = RunTrace::default();
    info!("starting a {0}x{0} run", config.size.side());

    let summary = micromouse_world::run(
        &mut world,
        &mut navigator,
        args.max_steps,
        |world, navigator: &Navigator, movement| {
            trace.record(TraceStep {
                cell: query::mouse_cell(world),
                heading: query::mouse_heading(world),
                mode: navigator.mode(),
                movement,
            });

            let entered_cell = matches!(movement, Movement::MoveForward | Movement::Finish);
            if args.draw && entered_cell {
                println!("{}", draw(&renderer, world, navigator));
            }
            if args.pause && entered_cell {
                pause();
            }
        },
    )
    .context("simulation failed")?;

    let route = navigator.route().map_or(&[][..], |route| route.moves());
    trace.conclude(navigator.outcome(), summary, route);
    if let Some(path) = &args.trace {
        trace.write_to(path)?;
    }

    if !args.draw {
        println!("{}", draw(&renderer, &world, &navigator));
    }
    match navigator.outcome() {
        Some(outcome) => println!("{outcome:?}"),
        None => println!("stopped without an outcome"),
    }
    println!(
        "{} commands, {} cells driven, shortest route {} commands",
        summary.steps,
        summary.forward_moves,
        route.len()
    );

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_layout(args: &Args) -> Result<MazeLayout> {
    if let Some(path) = &args.maze {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read maze file {}", path.display()))?;
        return MazeLayout::parse(&text)
            .with_context(|| format!("failed to parse maze file {}", path.display()));
    }

    let size = MazeSize::new(args.size).context("invalid --size")?;
    Ok(match args.seed {
        Some(seed) => MazeLayout::generate(size, seed),
        None => MazeLayout::open_interior(size),
    })
}

fn draw(renderer: &AsciiRenderer, world: &World, navigator: &Navigator) -> String {
    let mouse = (query::mouse_cell(world), query::mouse_heading(world));
    let map = navigator.distance_map();
    let maze = renderer.render(query::layout(world), Some(mouse), |cell: CellCoord| {
        Some(match map.distance(cell) {
            UNREACHABLE => "-".to_owned(),
            distance => distance.to_string(),
        })
    });
    format!("{maze}{:?}", navigator.mode())
}

fn pause() {
    let mut line = String::new();
    if let Err(err) = io::stdin().read_line(&mut line) {
        warn!("cannot read from stdin: {err}");
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn argument_definitions_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_describe_an_open_sixteen_maze() {
        let args = Args::try_parse_from(["micromouse"]).expect("no arguments required");

        assert_eq!(args.size, 16);
        assert_eq!(args.seed, None);
        assert!(!args.demo);
        assert_eq!(args.verbose, 0);

        let layout = load_layout(&args).expect("open maze");
        assert_eq!(layout, MazeLayout::open_interior(MazeSize::new(16).expect("valid")));
    }

    #[test]
    fn maze_file_and_seed_are_exclusive() {
        let result = Args::try_parse_from(["micromouse", "--maze", "maze.txt", "--seed", "4"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_is_counted() {
        let args = Args::try_parse_from(["micromouse", "-vv", "--seed", "9", "--size", "8"])
            .expect("valid arguments");

        assert_eq!(args.verbose, 2);
        let layout = load_layout(&args).expect("generated maze");
        assert_eq!(layout, MazeLayout::generate(MazeSize::new(8).expect("valid"), 9));
    }

    #[test]
    fn undersized_maze_is_rejected() {
        let args = Args::try_parse_from(["micromouse", "--size", "1"]).expect("valid arguments");
        assert!(load_layout(&args).is_err());
    }

    #[test]
    fn drawing_overlays_distances() {
        let size = MazeSize::new(4).expect("valid");
        let world = World::new(MazeLayout::open_interior(size), micromouse_core::Heading::North);
        let navigator = Navigator::new(NavigatorConfig::new(size));

        let text = draw(&AsciiRenderer::default(), &world, &navigator);

        assert!(text.contains("| ^ "));
        assert!(text.contains(" 0 "));
        assert!(text.ends_with("Search"));
    }
}
