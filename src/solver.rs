use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::actor::Actor;
use crate::analysis::PathAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::grid::{Grid, Symbol};
use crate::parse::parse_grid;
use crate::patrol::{PatrolEngine, PatrolOptions};
use crate::scenario::load_layout;

/// Which answer to compute for a grid
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Distinct cells the actor occupies before leaving
    VisitedCells,
    /// Single-obstacle placements that trap the actor in a loop
    LoopPlacements,
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1" | "visited" => Ok(Variant::VisitedCells),
            "2" | "loops" => Ok(Variant::LoopPlacements),
            other => Err(format!("unknown variant '{}', expected 1/visited or 2/loops", other)),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::VisitedCells => write!(f, "visited"),
            Variant::LoopPlacements => write!(f, "loops"),
        }
    }
}

/// Count distinct cells by tallying unvisited symbols as the walk reaches them
fn visited_cells(mut grid: Grid, actor: Actor, config: &Config) -> Result<usize> {
    let options = PatrolOptions::tracing().with_step_limit(config.patrol.step_limit);

    let mut fresh = 0;
    let report = PatrolEngine::new(actor, options).run_with(&mut grid, |symbol| {
        if symbol == Symbol::Empty {
            fresh += 1;
        }
    })?;

    debug_assert_eq!(fresh, grid.visited_count());
    info!(steps = report.steps, turns = report.turns, visited = fresh, "patrol finished");
    Ok(fresh)
}

fn loop_placements(grid: Grid, actor: Actor, config: &Config) -> Result<usize> {
    PathAnalyzer::new(grid, actor)
        .with_step_limit(config.patrol.step_limit)
        .count_loop_placements(config.analysis.parallel)
}

pub fn count_visited(text: &str, config: &Config) -> Result<usize> {
    let (grid, actor) = parse_grid(text)?;
    visited_cells(grid, actor, config)
}

pub fn count_loop_placements(text: &str, config: &Config) -> Result<usize> {
    let (grid, actor) = parse_grid(text)?;
    loop_placements(grid, actor, config)
}

/// Answer `variant` for an already parsed layout
pub fn solve_layout(grid: Grid, actor: Actor, variant: Variant, config: &Config) -> Result<usize> {
    match variant {
        Variant::VisitedCells => visited_cells(grid, actor, config),
        Variant::LoopPlacements => loop_placements(grid, actor, config),
    }
}

pub fn solve(text: &str, variant: Variant, config: &Config) -> Result<usize> {
    let (grid, actor) = parse_grid(text)?;
    solve_layout(grid, actor, variant, config)
}

/// Solve a `.txt` layout or `.json` scenario file
pub fn solve_file<P: AsRef<Path>>(path: P, variant: Variant, config: &Config) -> Result<usize> {
    let (grid, actor) = load_layout(path.as_ref())?;
    info!(path = %path.as_ref().display(), %variant, "solving");
    solve_layout(grid, actor, variant, config)
}
