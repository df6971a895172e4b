use std::str::FromStr;

use tracing::debug;

use super::common::{Direction, Position};
use crate::error::MazeError;

// Low nibble: one wall bit per direction (N=1, E=2, S=4, W=8).
// High nibble: the same layout shifted by 4, marking a wall as toggleable.
const WALL_MASK: u8 = 0b0000_1111;
const TOGGLE_SHIFT: u8 = 4;

/// Packed wall state of a single maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell(u8);

impl Cell {
    pub const CLOSED: Cell = Cell(WALL_MASK);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.0 & wall_bit(direction) != 0
    }

    pub fn is_toggleable(&self, direction: Direction) -> bool {
        self.0 & toggle_bit(direction) != 0
    }

    /// Directions in which this cell is walled, in N, E, S, W order.
    pub fn walls(&self) -> impl Iterator<Item = Direction> {
        let cell = *self;
        Direction::ALL
            .into_iter()
            .filter(move |direction| cell.has_wall(*direction))
    }

    fn open(&mut self, direction: Direction) {
        self.0 &= !(wall_bit(direction) | toggle_bit(direction));
    }

    fn mark_toggleable(&mut self, direction: Direction) {
        self.0 |= toggle_bit(direction);
    }
}

fn wall_bit(direction: Direction) -> u8 {
    match direction {
        Direction::North => 1,
        Direction::East => 2,
        Direction::South => 4,
        Direction::West => 8,
    }
}

fn toggle_bit(direction: Direction) -> u8 {
    wall_bit(direction) << TOGGLE_SHIFT
}

/// Square grid of cells. The origin is `(0, 0)`, north is `y + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallGrid {
    size: usize,
    cells: Vec<Cell>,
}

impl WallGrid {
    pub fn new(size: usize) -> Result<Self, MazeError> {
        if size < 1 {
            return Err(MazeError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Cell::CLOSED; size * size],
        })
    }

    /// Builds a grid from packed cells indexed `[x][y]`.
    ///
    /// The layout must be square, closed along the border, wall-symmetric
    /// between neighbours, and only carry toggle bits on present inner walls.
    pub fn from_cells(columns: Vec<Vec<u8>>) -> Result<Self, MazeError> {
        let size = columns.len();
        if size < 1 {
            return Err(MazeError::InvalidSize(size));
        }
        if let Some(column) = columns.iter().find(|column| column.len() != size) {
            return Err(MazeError::InvalidGridState(format!(
                "expected {} cells per column, found {}",
                size,
                column.len()
            )));
        }

        let grid = Self {
            size,
            cells: columns
                .into_iter()
                .flatten()
                .map(Cell::from_bits)
                .collect(),
        };
        grid.validate()?;
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn origin(&self) -> Position {
        Position::new(0, 0)
    }

    pub fn exit(&self) -> Position {
        Position::new(self.size - 1, self.size - 1)
    }

    pub fn contains(&self, position: &Position) -> bool {
        position.x < self.size && position.y < self.size
    }

    pub fn cell(&self, position: &Position) -> Result<Cell, MazeError> {
        self.index(position).map(|i| self.cells[i])
    }

    pub fn can_move(&self, position: &Position, direction: Direction) -> Result<bool, MazeError> {
        Ok(!self.cell(position)?.has_wall(direction))
    }

    /// In-bounds neighbours of `position`, in N, E, S, W order.
    pub fn neighbors(&self, position: &Position) -> Vec<Position> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| position.step(direction, self.size))
            .collect()
    }

    pub fn punch_hole(&mut self, a: &Position, b: &Position) -> Result<(), MazeError> {
        let from = self.index(a)?;
        let to = self.index(b)?;
        let direction = a
            .direction_to(b)
            .ok_or(MazeError::NotAdjacent(*a, *b))?;

        self.cells[from].open(direction);
        self.cells[to].open(direction.opposite());
        Ok(())
    }

    pub fn mark_toggleable(
        &mut self,
        position: &Position,
        direction: Direction,
    ) -> Result<(), MazeError> {
        let i = self.index(position)?;
        if !self.cells[i].has_wall(direction) || position.step(direction, self.size).is_none() {
            return Err(MazeError::InvalidToggle(*position, direction));
        }

        debug!("wall {:?} of {} is now toggleable", direction, position);
        self.cells[i].mark_toggleable(direction);
        Ok(())
    }

    /// Opens a toggleable wall for good. Returns `false` and leaves the grid
    /// untouched when the wall is not toggleable.
    pub fn toggle(&mut self, position: &Position, direction: Direction) -> Result<bool, MazeError> {
        let cell = self.cell(position)?;
        let neighbor = position
            .step(direction, self.size)
            .ok_or(MazeError::OutOfBounds(*position))?;
        if !cell.is_toggleable(direction) {
            return Ok(false);
        }

        debug!("toggling wall {:?} of {}", direction, position);
        self.punch_hole(position, &neighbor)?;
        Ok(true)
    }

    /// Every open passage between adjacent cells, each pair reported once
    /// from its southern or western end.
    pub fn passages(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.positions().flat_map(move |position| {
            [Direction::North, Direction::East]
                .into_iter()
                .filter_map(move |direction| {
                    let neighbor = position.step(direction, self.size)?;
                    let open = !self.cells[self.offset(&position)].has_wall(direction);
                    open.then_some((position, neighbor))
                })
        })
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |x| (0..size).map(move |y| Position::new(x, y)))
    }

    fn validate(&self) -> Result<(), MazeError> {
        for position in self.positions() {
            let cell = self.cells[self.offset(&position)];
            for direction in Direction::ALL {
                if cell.is_toggleable(direction) && !cell.has_wall(direction) {
                    return Err(MazeError::InvalidGridState(format!(
                        "toggleable wall {:?} of {} is open",
                        direction, position
                    )));
                }

                match position.step(direction, self.size) {
                    None if !cell.has_wall(direction) || cell.is_toggleable(direction) => {
                        return Err(MazeError::InvalidGridState(format!(
                            "border wall {:?} of {} must be closed",
                            direction, position
                        )));
                    }
                    None => {}
                    Some(neighbor) => {
                        let other = self.cells[self.offset(&neighbor)];
                        if cell.has_wall(direction) != other.has_wall(direction.opposite()) {
                            return Err(MazeError::InvalidGridState(format!(
                                "wall between {} and {} is one-sided",
                                position, neighbor
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn index(&self, position: &Position) -> Result<usize, MazeError> {
        if !self.contains(position) {
            return Err(MazeError::OutOfBounds(*position));
        }
        Ok(self.offset(position))
    }

    fn offset(&self, position: &Position) -> usize {
        position.x * self.size + position.y
    }
}

impl FromStr for WallGrid {
    type Err = MazeError;

    /// One non-empty line per column (`x`), cells listed by increasing `y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let columns = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|line| {
                line.split(',')
                    .map(str::trim)
                    .map(|value| {
                        value.parse::<u8>().map_err(|_| {
                            MazeError::InvalidGridState(format!("bad cell value {:?}", value))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_cells(columns)
    }
}
