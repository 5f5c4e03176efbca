//! JSON record of a simulated run.

use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use micromouse_core::{CellCoord, Heading, Movement};
use micromouse_system_navigator::{Mode, Outcome};
use micromouse_world::RunSummary;
use serde::Serialize;

/// One command issued by the navigator, with the pose it left the mouse in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct TraceStep {
    pub(crate) cell: CellCoord,
    pub(crate) heading: Heading,
    pub(crate) mode: Mode,
    pub(crate) movement: Movement,
}

/// Every command of a run followed by its result.
#[derive(Debug, Default, Serialize)]
pub(crate) struct RunTrace {
    outcome: Option<Outcome>,
    steps: usize,
    forward_moves: usize,
    route: Vec<Movement>,
    commands: Vec<TraceStep>,
}

impl RunTrace {
    pub(crate) fn record(&mut self, step: TraceStep) {
        self.commands.push(step);
    }

    pub(crate) fn conclude(
        &mut self,
        outcome: Option<Outcome>,
        summary: RunSummary,
        route: &[Movement],
    ) {
        self.outcome = outcome;
        self.steps = summary.steps;
        self.forward_moves = summary.forward_moves;
        self.route = route.to_vec();
    }

    pub(crate) fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("failed to create trace file {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("failed to write trace file {}", path.display()))
    }
}
