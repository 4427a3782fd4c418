use crate::error::{PatrolError, Result};

/// Facing direction. Turning right cycles Up -> Right -> Down -> Left -> Up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];

    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '^' => Some(Direction::Up),
            '>' => Some(Direction::Right),
            'v' => Some(Direction::Down),
            '<' => Some(Direction::Left),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// The patrolling actor: a flat cell id plus a facing direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Actor {
    position: usize,
    direction: Direction,
}

impl Actor {
    pub fn new(position: usize, direction: Direction) -> Self {
        Actor {
            position,
            direction,
        }
    }

    /// Create an actor from the start glyph found at `position`
    pub fn from_glyph(position: usize, glyph: char) -> Result<Self> {
        let direction = Direction::from_glyph(glyph).ok_or(PatrolError::InvalidGlyph(glyph))?;
        Ok(Self::new(position, direction))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn turn_right(&mut self) {
        self.direction = self.direction.turn_right();
    }

    /// Move by a flat-index delta. The caller checks bounds first.
    pub fn advance(&mut self, delta: isize) {
        self.position = self.position.wrapping_add_signed(delta);
    }
}
