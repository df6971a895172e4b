use thiserror::Error;

use crate::maze::{Direction, Position};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Maze size must be at least 1, got {0}")]
    InvalidSize(usize),
    #[error("Maze is in an invalid state: {0}")]
    InvalidGridState(String),
    #[error("Position {0} is outside the maze")]
    OutOfBounds(Position),
    #[error("Positions {0} and {1} are not adjacent")]
    NotAdjacent(Position, Position),
    #[error("Wall {1:?} of {0} is open and cannot be made toggleable")]
    InvalidToggle(Position, Direction),
    #[error("Walker is not powered on")]
    WalkerNotReady,
    #[error("Unknown direction {0:?}")]
    UnknownDirection(String),
    #[error("Bad command at position {position}")]
    BadCommand { position: usize },
    #[error("Too many instructions")]
    InstructionBudgetExceeded,
}
