use std::fmt;

use crate::error::{PatrolError, Result};

/// Cell contents. Visitation marks record which axes of travel crossed a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Empty,
    Obstacle,
    VisitedVertical,
    VisitedHorizontal,
    VisitedIntersection,
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Symbol::Empty),
            '#' => Some(Symbol::Obstacle),
            '|' => Some(Symbol::VisitedVertical),
            '-' => Some(Symbol::VisitedHorizontal),
            '+' => Some(Symbol::VisitedIntersection),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Symbol::Empty => '.',
            Symbol::Obstacle => '#',
            Symbol::VisitedVertical => '|',
            Symbol::VisitedHorizontal => '-',
            Symbol::VisitedIntersection => '+',
        }
    }

    /// True for any of the three visitation marks
    pub fn is_visited(self) -> bool {
        matches!(
            self,
            Symbol::VisitedVertical | Symbol::VisitedHorizontal | Symbol::VisitedIntersection
        )
    }
}

/// Rectangular grid stored row-major in a flat buffer.
/// Cell id = row * cols + col.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Symbol>,
}

impl Grid {
    /// Create a new grid with all cells empty
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::from_cells(vec![Symbol::Empty; rows * cols], cols)
    }

    /// Create a grid with specific obstacle cells; ids outside the grid are ignored
    pub fn with_obstacles(rows: usize, cols: usize, obstacles: &[usize]) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        for &id in obstacles {
            if id < grid.cells.len() {
                grid.cells[id] = Symbol::Obstacle;
            }
        }
        Ok(grid)
    }

    /// Build a grid from a flat row-major buffer
    pub fn from_cells(cells: Vec<Symbol>, cols: usize) -> Result<Self> {
        if cells.is_empty() || cols == 0 {
            return Err(PatrolError::MalformedGrid("grid has no cells".to_string()));
        }
        if cells.len() % cols != 0 {
            return Err(PatrolError::MalformedGrid(format!(
                "{} cells do not divide into rows of {}",
                cells.len(),
                cols
            )));
        }

        Ok(Grid {
            rows: cells.len() / cols,
            cols,
            cells,
        })
    }

    /// Build a grid from individual rows, which must all have the same length
    pub fn from_rows(rows: Vec<Vec<Symbol>>) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut cells = Vec::with_capacity(cols * rows.len());

        for (row, line) in rows.into_iter().enumerate() {
            if line.len() != cols {
                return Err(PatrolError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    line.len(),
                    cols
                )));
            }
            cells.extend(line);
        }

        Self::from_cells(cells, cols)
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Convert (row, col) coordinates to cell id
    pub fn get_id(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Convert cell id to (row, col) coordinates
    pub fn get_coords(&self, id: usize) -> (usize, usize) {
        (id / self.cols, id % self.cols)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<Symbol> {
        self.check_bounds(row, col)?;
        Ok(self.cells[self.get_id(row, col)])
    }

    pub fn set_cell_at(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<()> {
        self.check_bounds(row, col)?;
        let id = self.get_id(row, col);
        self.set_cell(id, symbol);
        Ok(())
    }

    pub fn is_obstacle(&self, row: usize, col: usize) -> bool {
        self.contains(row, col) && self.cells[self.get_id(row, col)] == Symbol::Obstacle
    }

    /// Flat read used by the patrol engine. Panics on an id outside the grid.
    pub(crate) fn cell(&self, id: usize) -> Symbol {
        self.cells[id]
    }

    /// Flat write used by the patrol engine. Panics on an id outside the grid.
    pub(crate) fn set_cell(&mut self, id: usize, symbol: Symbol) {
        self.cells[id] = symbol;
    }

    /// Number of cells carrying any visitation mark
    pub fn visited_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_visited()).count()
    }

    /// Ids of marked cells, ascending
    pub fn visited_ids(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_visited())
            .map(|(id, _)| id)
            .collect()
    }

    /// Reset every visitation mark back to empty; obstacles stay
    pub fn clear_marks(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_visited() {
                *cell = Symbol::Empty;
            }
        }
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if self.contains(row, col) {
            Ok(())
        } else {
            Err(PatrolError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String = row.iter().map(|s| s.to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
