use tracing::{debug, info};

use crate::{
    error::MazeError,
    maze::{Direction, Heading, Position, WallGrid},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Power {
    Unpowered,
    Active,
}

/// Result of a multi-cell move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Every requested cell was walked.
    Clear,
    /// A wall stopped the walker early; the cells walked so far are kept.
    Blocked,
    /// The walker stepped onto the exit.
    Exited,
}

impl Movement {
    pub fn is_clear(&self) -> bool {
        matches!(self, Movement::Clear)
    }
}

#[derive(Debug)]
pub struct Walker<'a> {
    maze: &'a mut WallGrid,
    position: Position,
    facing: Direction,
    power: Power,
}

impl<'a> Walker<'a> {
    pub fn new(maze: &'a mut WallGrid) -> Self {
        let position = maze.origin();
        Self {
            maze,
            position,
            facing: Direction::North,
            power: Power::Unpowered,
        }
    }

    pub fn power_on(&mut self) {
        info!("walker powered on at {}", self.position);
        self.power = Power::Active;
    }

    pub fn power(&self) -> Power {
        self.power
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn maze(&self) -> &WallGrid {
        &*self.maze
    }

    /// Walks up to `distance` cells in a straight line.
    pub fn walk(&mut self, heading: Heading, distance: usize) -> Result<Movement, MazeError> {
        self.ensure_active()?;

        let direction = heading.resolve(self.facing);
        debug!("walk {:?} ({:?}) x{} from {}", heading, direction, distance, self.position);

        for _ in 0..distance {
            if !self.maze.can_move(&self.position, direction)? {
                debug!("blocked at {} heading {:?}", self.position, direction);
                return Ok(Movement::Blocked);
            }
            self.position = self
                .position
                .step(direction, self.maze.size())
                .ok_or(MazeError::OutOfBounds(self.position))?;
            self.facing = direction;

            if self.position == self.maze.exit() {
                info!("walker reached the exit at {}", self.position);
                return Ok(Movement::Exited);
            }
        }

        Ok(Movement::Clear)
    }

    /// Opens the toggleable wall in `heading`, if there is one.
    pub fn toggle_open(&mut self, heading: Heading) -> Result<bool, MazeError> {
        self.ensure_active()?;
        let direction = heading.resolve(self.facing);
        self.maze.toggle(&self.position, direction)
    }

    /// Tries every wall around the walker and returns the directions that opened.
    pub fn open_sesame(&mut self) -> Result<Vec<Direction>, MazeError> {
        self.ensure_active()?;

        let mut opened = vec![];
        for direction in Direction::ALL {
            if self.position.step(direction, self.maze.size()).is_none() {
                continue;
            }
            if self.maze.toggle(&self.position, direction)? {
                opened.push(direction);
            }
        }

        debug!("open sesame at {} opened {:?}", self.position, opened);
        Ok(opened)
    }

    fn ensure_active(&self) -> Result<(), MazeError> {
        match self.power {
            Power::Active => Ok(()),
            Power::Unpowered => Err(MazeError::WalkerNotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Movement, Power, Walker};
    use crate::{
        error::MazeError,
        maze::{open_grid, Direction, Heading, Position, RelativeDirection, WallGrid},
    };

    #[test]
    fn test_walker_needs_power() {
        let mut grid = open_grid(3);
        let mut walker = Walker::new(&mut grid);
        assert_eq!(walker.power(), Power::Unpowered);

        assert_eq!(
            walker.walk(Direction::North.into(), 1),
            Err(MazeError::WalkerNotReady)
        );
        assert_eq!(walker.open_sesame(), Err(MazeError::WalkerNotReady));
        assert_eq!(walker.position(), Position::new(0, 0));
    }

    #[test]
    fn test_walker_should_move_till_wall() {
        let mut grid = WallGrid::new(4).unwrap();
        grid.punch_hole(&Position::new(0, 0), &Position::new(0, 1))
            .unwrap();
        grid.punch_hole(&Position::new(0, 1), &Position::new(0, 2))
            .unwrap();

        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        assert_eq!(walker.walk(Direction::North.into(), 3), Ok(Movement::Blocked));
        assert_eq!(walker.position(), Position::new(0, 2));
        assert_eq!(walker.facing(), Direction::North);
    }

    #[test]
    fn test_blocked_move_keeps_facing() {
        let mut grid = WallGrid::new(2).unwrap();
        grid.punch_hole(&Position::new(0, 0), &Position::new(1, 0))
            .unwrap();
        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        assert_eq!(walker.walk(Direction::East.into(), 1), Ok(Movement::Clear));
        assert_eq!(walker.facing(), Direction::East);
        assert_eq!(walker.walk(Direction::East.into(), 1), Ok(Movement::Blocked));
        assert_eq!(walker.walk(Direction::South.into(), 1), Ok(Movement::Blocked));
        assert_eq!(walker.facing(), Direction::East);
        assert_eq!(walker.position(), Position::new(1, 0));
    }

    #[test]
    fn test_relative_moves_follow_facing() {
        let mut grid = open_grid(4);
        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        // facing north: right is east
        let right = Heading::Relative(RelativeDirection::Right);
        assert_eq!(walker.walk(right, 1), Ok(Movement::Clear));
        assert_eq!(walker.position(), Position::new(1, 0));
        assert_eq!(walker.facing(), Direction::East);

        // facing east: left is north
        let left = Heading::Relative(RelativeDirection::Left);
        assert_eq!(walker.walk(left, 2), Ok(Movement::Clear));
        assert_eq!(walker.position(), Position::new(1, 2));
        assert_eq!(walker.facing(), Direction::North);

        let backward = Heading::Relative(RelativeDirection::Backward);
        assert_eq!(walker.walk(backward, 1), Ok(Movement::Clear));
        assert_eq!(walker.position(), Position::new(1, 1));
        assert_eq!(walker.facing(), Direction::South);
    }

    #[test]
    fn test_exit_stops_mid_distance() {
        let mut grid = open_grid(2);
        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        assert_eq!(walker.walk(Direction::East.into(), 1), Ok(Movement::Clear));
        assert_eq!(walker.walk(Direction::North.into(), 5), Ok(Movement::Exited));
        assert_eq!(walker.position(), Position::new(1, 1));
    }

    #[test]
    fn test_open_sesame_reports_opened_walls() {
        let mut grid = WallGrid::new(3).unwrap();
        grid.mark_toggleable(&Position::new(0, 0), Direction::North)
            .unwrap();
        grid.mark_toggleable(&Position::new(0, 0), Direction::East)
            .unwrap();

        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        assert_eq!(
            walker.open_sesame(),
            Ok(vec![Direction::North, Direction::East])
        );
        assert_eq!(walker.open_sesame(), Ok(vec![]));
        assert!(walker.maze().can_move(&Position::new(0, 0), Direction::North).unwrap());
        assert_eq!(walker.position(), Position::new(0, 0));
    }

    #[test]
    fn test_toggle_open_uses_facing() {
        let mut grid = WallGrid::new(3).unwrap();
        grid.mark_toggleable(&Position::new(0, 0), Direction::East)
            .unwrap();

        let mut walker = Walker::new(&mut grid);
        walker.power_on();

        let forward = Heading::Relative(RelativeDirection::Forward);
        assert_eq!(walker.toggle_open(forward), Ok(false));
        let right = Heading::Relative(RelativeDirection::Right);
        assert_eq!(walker.toggle_open(right), Ok(true));
        assert_eq!(walker.walk(right, 1), Ok(Movement::Clear));
        assert_eq!(walker.position(), Position::new(1, 0));
    }
}
