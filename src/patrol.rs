//! Patrol engine: walks the actor across the grid until it leaves the bounds.
//!
//! Each step follows a fixed protocol:
//! 1. Compute the flat-index jump for the facing direction (left -1, right +1, up -cols, down +cols).
//! 2. Hand the symbol under the actor to the observer.
//! 3. When marking is on, stamp the current cell with its axis mark (or upgrade to an
//!    intersection). This happens before the exit checks so the last cell is marked too.
//! 4. Exit if the destination index is outside the buffer, or the actor would wrap off the
//!    left edge of column 0 or the right edge of the last column.
//! 5. Turn right in place if the destination holds an obstacle, otherwise move there.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::actor::{Actor, Direction};
use crate::error::{PatrolError, Result};
use crate::grid::{Grid, Symbol};

/// Engine state. `ExitedBounds` and `CycleDetected` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatrolState {
    /// The actor advanced (or has not started yet)
    Moving,
    /// The actor faced an obstacle and turned right without moving
    Blocked,
    ExitedBounds,
    /// The actor re-entered a (position, direction) pair it already held
    CycleDetected,
}

impl PatrolState {
    pub fn is_terminal(self) -> bool {
        matches!(self, PatrolState::ExitedBounds | PatrolState::CycleDetected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatrolOptions {
    /// Stamp visitation marks into the grid
    pub mark_path: bool,
    /// Track (position, direction) pairs and stop on the first repeat
    pub detect_cycles: bool,
    /// Maximum number of steps before giving up; `None` uses `default_step_limit`
    pub step_limit: Option<usize>,
}

impl PatrolOptions {
    /// Options for the primary walk: marks on, no cycle tracking
    pub fn tracing() -> Self {
        PatrolOptions {
            mark_path: true,
            detect_cycles: false,
            step_limit: None,
        }
    }

    /// Options for a loop-search trial: grid left untouched, cycles tracked
    pub fn trial() -> Self {
        PatrolOptions {
            mark_path: false,
            detect_cycles: true,
            step_limit: None,
        }
    }

    pub fn with_step_limit(mut self, step_limit: Option<usize>) -> Self {
        self.step_limit = step_limit;
        self
    }
}

impl Default for PatrolOptions {
    fn default() -> Self {
        Self::tracing()
    }
}

/// Summary of a finished walk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatrolReport {
    pub outcome: PatrolState,
    pub steps: usize,
    pub turns: usize,
    /// Distinct cells occupied; only tracked when marking is on
    pub visited_cells: Option<usize>,
}

/// Step budget covering every (position, direction) state once plus one repeat.
/// A walk that runs longer without leaving the grid can never leave it.
pub fn default_step_limit(grid: &Grid) -> usize {
    4 * grid.cell_count() + 1
}

/// Flat-index delta for one step in `direction`
pub fn jump_delta(direction: Direction, cols: usize) -> isize {
    let cols = cols as isize;
    match direction {
        Direction::Left => -1,
        Direction::Right => 1,
        Direction::Up => -cols,
        Direction::Down => cols,
    }
}

/// Next mark for a cell crossed while facing `direction`. Marks never downgrade.
pub fn mark_for(current: Symbol, direction: Direction) -> Symbol {
    match (current, direction.is_vertical()) {
        (Symbol::Empty, true) => Symbol::VisitedVertical,
        (Symbol::Empty, false) => Symbol::VisitedHorizontal,
        (Symbol::VisitedHorizontal, true) | (Symbol::VisitedVertical, false) => {
            Symbol::VisitedIntersection
        }
        (other, _) => other,
    }
}

/// Exit checks, in order: outside the buffer, wrap past column 0, wrap past the last column
fn leaves_grid(grid: &Grid, position: usize, direction: Direction, destination: isize) -> bool {
    if destination < 0 || destination >= grid.cell_count() as isize {
        return true;
    }
    let col = position % grid.cols;
    match direction {
        Direction::Left => col == 0,
        Direction::Right => col + 1 == grid.cols,
        _ => false,
    }
}

/// Drives one actor over a grid. The grid is borrowed mutably per call, never stored.
#[derive(Clone, Debug)]
pub struct PatrolEngine {
    actor: Actor,
    options: PatrolOptions,
    state: PatrolState,
    steps: usize,
    turns: usize,
    fresh_cells: usize,
    history: HashSet<(usize, Direction)>,
}

impl PatrolEngine {
    pub fn new(actor: Actor, options: PatrolOptions) -> Self {
        PatrolEngine {
            actor,
            options,
            state: PatrolState::Moving,
            steps: 0,
            turns: 0,
            fresh_cells: 0,
            history: HashSet::new(),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn state(&self) -> PatrolState {
        self.state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Distinct cells the actor has stood on so far, including the start.
    /// `None` when marking is off, since unmarked cells cannot be told apart.
    pub fn visited_cell_count(&self) -> Option<usize> {
        self.options.mark_path.then_some(self.fresh_cells)
    }

    pub fn report(&self) -> PatrolReport {
        PatrolReport {
            outcome: self.state,
            steps: self.steps,
            turns: self.turns,
            visited_cells: self.visited_cell_count(),
        }
    }

    /// Perform one step without an observer
    pub fn step(&mut self, grid: &mut Grid) -> PatrolState {
        self.step_with(grid, |_| {})
    }

    /// Perform one step, handing the symbol under the actor to `observer` before it is marked.
    /// Once a terminal state is reached further calls do nothing. An actor standing outside
    /// the grid is already gone and ends in `ExitedBounds` without touching any cell.
    pub fn step_with<F: FnMut(Symbol)>(&mut self, grid: &mut Grid, mut observer: F) -> PatrolState {
        if self.state.is_terminal() {
            return self.state;
        }

        let position = self.actor.position();
        let direction = self.actor.direction();

        if position >= grid.cell_count() {
            self.state = PatrolState::ExitedBounds;
            return self.state;
        }

        if self.options.detect_cycles && !self.history.insert((position, direction)) {
            debug!(position, ?direction, steps = self.steps, "cycle detected");
            self.state = PatrolState::CycleDetected;
            return self.state;
        }

        self.steps += 1;
        let jump = jump_delta(direction, grid.cols);
        let destination = position as isize + jump;

        let current = grid.cell(position);
        observer(current);

        if self.options.mark_path {
            if current == Symbol::Empty {
                self.fresh_cells += 1;
            }
            grid.set_cell(position, mark_for(current, direction));
        }

        if leaves_grid(grid, position, direction, destination) {
            debug!(position, ?direction, steps = self.steps, "actor left the grid");
            self.state = PatrolState::ExitedBounds;
            return self.state;
        }

        if grid.cell(destination as usize) == Symbol::Obstacle {
            self.actor.turn_right();
            self.turns += 1;
            trace!(
                position,
                from = ?direction,
                to = ?self.actor.direction(),
                "obstacle ahead, turning right"
            );
            self.state = PatrolState::Blocked;
        } else {
            self.actor.advance(jump);
            self.state = PatrolState::Moving;
        }

        self.state
    }

    /// Walk until a terminal state
    pub fn run(&mut self, grid: &mut Grid) -> Result<PatrolReport> {
        self.run_with(grid, |_| {})
    }

    /// Walk until a terminal state, feeding every visited symbol to `observer` in order.
    /// Fails with `OutOfBounds` when the actor does not start on the grid, and with `NoExit`
    /// when the step limit runs out first.
    pub fn run_with<F: FnMut(Symbol)>(&mut self, grid: &mut Grid, mut observer: F) -> Result<PatrolReport> {
        let position = self.actor.position();
        if position >= grid.cell_count() {
            let (row, col) = grid.get_coords(position);
            return Err(PatrolError::OutOfBounds {
                row,
                col,
                rows: grid.rows,
                cols: grid.cols,
            });
        }

        let limit = self
            .options
            .step_limit
            .unwrap_or_else(|| default_step_limit(grid));

        while !self.state.is_terminal() {
            if self.steps >= limit {
                debug!(steps = self.steps, limit, "step limit reached");
                return Err(PatrolError::NoExit { steps: self.steps });
            }
            self.step_with(grid, &mut observer);
        }

        Ok(self.report())
    }
}
