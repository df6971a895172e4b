mod common;
mod generator;
mod grid;

pub use common::{Direction, Heading, Position, RelativeDirection};
pub use generator::{Algorithm, MazeGenerator};
pub use grid::{Cell, WallGrid};

#[cfg(test)]
pub(crate) use grid::tests::{assert_symmetric, open_grid};
