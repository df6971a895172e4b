use std::{fmt, str::FromStr};

use crate::error::MazeError;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one cell away in `direction`,
    /// or `None` when it would fall outside a `size`×`size` grid.
    pub fn step(&self, direction: Direction, size: usize) -> Option<Position> {
        let (dx, dy): (isize, isize) = match direction {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        };
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        if x >= size || y >= size {
            return None;
        }
        Some(Position::new(x, y))
    }

    /// Direction leading from `self` to `other` when both are grid-adjacent.
    pub fn direction_to(&self, other: &Position) -> Option<Direction> {
        match (
            other.x as isize - self.x as isize,
            other.y as isize - self.y as isize,
        ) {
            (0, 1) => Some(Direction::North),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Absolute direction reached by turning `relative` while facing `self`.
    pub fn resolve(&self, relative: RelativeDirection) -> Direction {
        const TURNS: [Direction; 4] = Direction::ALL;
        let turn = match relative {
            RelativeDirection::Forward => 0,
            RelativeDirection::Right => 1,
            RelativeDirection::Backward => 2,
            RelativeDirection::Left => 3,
        };
        TURNS[(*self as usize + turn) % TURNS.len()]
    }
}

impl FromStr for Direction {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Direction::North),
            "east" => Ok(Direction::East),
            "south" => Ok(Direction::South),
            "west" => Ok(Direction::West),
            _ => Err(MazeError::UnknownDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum RelativeDirection {
    Forward,
    Right,
    Backward,
    Left,
}

impl FromStr for RelativeDirection {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" => Ok(RelativeDirection::Forward),
            "right" => Ok(RelativeDirection::Right),
            "backward" => Ok(RelativeDirection::Backward),
            "left" => Ok(RelativeDirection::Left),
            _ => Err(MazeError::UnknownDirection(s.to_string())),
        }
    }
}

/// A movement token: either absolute or relative to the walker's facing.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Heading {
    Absolute(Direction),
    Relative(RelativeDirection),
}

impl Heading {
    pub fn resolve(&self, facing: Direction) -> Direction {
        match self {
            Heading::Absolute(direction) => *direction,
            Heading::Relative(relative) => facing.resolve(*relative),
        }
    }
}

impl From<Direction> for Heading {
    fn from(direction: Direction) -> Self {
        Heading::Absolute(direction)
    }
}

impl From<RelativeDirection> for Heading {
    fn from(relative: RelativeDirection) -> Self {
        Heading::Relative(relative)
    }
}

impl FromStr for Heading {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Direction>()
            .map(Heading::Absolute)
            .or_else(|_| s.parse::<RelativeDirection>().map(Heading::Relative))
    }
}
