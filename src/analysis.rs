//! Obstacle-placement search: which single new obstacle traps the actor in a loop.
//!
//! Only cells on the original path can change the walk, so the candidates are the marked
//! cells of one traced run, minus the starting cell. Every candidate is an independent trial
//! on its own copy of the pristine grid, which lets the trials run on rayon's pool.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::actor::Actor;
use crate::error::Result;
use crate::grid::{Grid, Symbol};
use crate::patrol::{PatrolEngine, PatrolOptions, PatrolState};

pub struct PathAnalyzer {
    grid: Grid,
    actor: Actor,
    step_limit: Option<usize>,
}

impl PathAnalyzer {
    /// `grid` should be unmarked; it is copied for every run and never mutated
    pub fn new(grid: Grid, actor: Actor) -> Self {
        PathAnalyzer {
            grid,
            actor,
            step_limit: None,
        }
    }

    pub fn with_step_limit(mut self, step_limit: Option<usize>) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cells worth blocking: every cell of the original path except the start
    pub fn candidates(&self) -> Result<Vec<usize>> {
        let mut traced = self.grid.clone();
        let options = PatrolOptions::tracing().with_step_limit(self.step_limit);
        PatrolEngine::new(self.actor, options).run(&mut traced)?;

        let start = self.actor.position();
        let candidates: Vec<usize> = traced
            .visited_ids()
            .into_iter()
            .filter(|&id| id != start)
            .collect();

        debug!(count = candidates.len(), "collected obstacle candidates");
        Ok(candidates)
    }

    /// Run one trial with an extra obstacle at `id`; true when the actor gets stuck in a loop
    fn creates_loop(&self, id: usize) -> Result<bool> {
        let mut trial = self.grid.clone();
        trial.set_cell(id, Symbol::Obstacle);

        let options = PatrolOptions::trial().with_step_limit(self.step_limit);
        let report = PatrolEngine::new(self.actor, options).run(&mut trial)?;

        Ok(report.outcome == PatrolState::CycleDetected)
    }

    /// Candidate cells whose obstacle produces a loop, ascending
    pub fn loop_placements(&self, parallel: bool) -> Result<Vec<usize>> {
        let candidates = self.candidates()?;

        let verdicts: Vec<(usize, bool)> = if parallel {
            candidates
                .par_iter()
                .map(|&id| self.creates_loop(id).map(|looped| (id, looped)))
                .collect::<Result<_>>()?
        } else {
            candidates
                .iter()
                .map(|&id| self.creates_loop(id).map(|looped| (id, looped)))
                .collect::<Result<_>>()?
        };

        let mut placements: Vec<usize> = verdicts
            .into_iter()
            .filter_map(|(id, looped)| looped.then_some(id))
            .collect();
        placements.sort_unstable();

        info!(
            candidates = candidates.len(),
            placements = placements.len(),
            parallel,
            "loop search finished"
        );
        Ok(placements)
    }

    pub fn count_loop_placements(&self, parallel: bool) -> Result<usize> {
        Ok(self.loop_placements(parallel)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_grid;

    const CANONICAL: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...
";

    #[test]
    fn test_canonical_loop_placements() {
        let (grid, actor) = parse_grid(CANONICAL).unwrap();
        let analyzer = PathAnalyzer::new(grid, actor);

        let placements = analyzer.loop_placements(false).unwrap();
        assert_eq!(placements, vec![63, 76, 77, 81, 83, 97]);
        assert_eq!(analyzer.count_loop_placements(true).unwrap(), 6);
    }

    #[test]
    fn test_candidates_exclude_start() {
        let (grid, actor) = parse_grid(CANONICAL).unwrap();
        let analyzer = PathAnalyzer::new(grid, actor);

        let candidates = analyzer.candidates().unwrap();
        assert_eq!(candidates.len(), 40);
        assert!(!candidates.contains(&actor.position()));
        // The analyzer keeps its own grid unmarked
        assert_eq!(analyzer.grid().visited_count(), 0);
    }

    #[test]
    fn test_straight_run_has_no_loops() {
        let (grid, actor) = parse_grid(".....\n.....\n..^..\n").unwrap();
        let analyzer = PathAnalyzer::new(grid, actor);
        assert_eq!(analyzer.candidates().unwrap(), vec![2, 7]);
        assert_eq!(analyzer.count_loop_placements(false).unwrap(), 0);
    }

    #[test]
    fn test_single_closing_obstacle() {
        let text = ".#...\n....#\n.^...\n.....\n...#.\n";
        let (grid, actor) = parse_grid(text).unwrap();
        let analyzer = PathAnalyzer::new(grid, actor);
        assert_eq!(analyzer.loop_placements(true).unwrap(), vec![15]);
        assert!(analyzer.creates_loop(15).unwrap());
    }

    #[test]
    fn test_boxed_start_propagates_no_exit() {
        let (grid, actor) = parse_grid(".#.\n#^#\n.#.\n").unwrap();
        let analyzer = PathAnalyzer::new(grid, actor);
        assert!(analyzer.candidates().is_err());
    }
}
