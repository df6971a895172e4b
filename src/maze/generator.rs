use std::{collections::BTreeSet, str::FromStr};

use fastrand::Rng;
use tracing::{debug, info};

use super::{
    common::{Direction, Position},
    grid::WallGrid,
};
use crate::error::MazeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    DepthFirst,
    Prim,
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dfs" => Ok(Algorithm::DepthFirst),
            "prim" => Ok(Algorithm::Prim),
            _ => Err(MazeError::InvalidGridState(format!(
                "unknown generation algorithm {:?}",
                s
            ))),
        }
    }
}

/// Carves spanning-tree mazes out of fully walled grids.
///
/// Both algorithms treat the exit as a leaf: it gets carved into once and is
/// never expanded from.
pub struct MazeGenerator {
    rng: Rng,
}

impl MazeGenerator {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Rng::with_seed(seed))
    }

    pub fn generate(&mut self, size: usize, algorithm: Algorithm) -> Result<WallGrid, MazeError> {
        let mut grid = WallGrid::new(size)?;
        self.carve(&mut grid, algorithm)?;
        Ok(grid)
    }

    pub fn carve(&mut self, grid: &mut WallGrid, algorithm: Algorithm) -> Result<(), MazeError> {
        if grid.size() == 0 {
            return Err(MazeError::InvalidGridState(
                "cannot carve an empty grid".to_string(),
            ));
        }

        info!("carving {0}x{0} maze with {1:?}", grid.size(), algorithm);
        match algorithm {
            Algorithm::DepthFirst => self.depth_first(grid),
            Algorithm::Prim => self.prim(grid),
        }
    }

    /// Randomized depth-first carve with an explicit backtracking stack.
    fn depth_first(&mut self, grid: &mut WallGrid) -> Result<(), MazeError> {
        let exit = grid.exit();
        let mut visited = Visited::new(grid.size());
        let mut stack: Vec<Frame> = vec![];

        let mut current = Frame::new(grid.origin(), self.shuffled_neighbors(grid, &grid.origin()));
        visited.insert(&current.position);

        loop {
            let next = if current.position == exit {
                None
            } else {
                current.next_unvisited(&visited)
            };

            match next {
                Some(neighbor) => {
                    grid.punch_hole(&current.position, &neighbor)?;
                    visited.insert(&neighbor);
                    let child = Frame::new(neighbor, self.shuffled_neighbors(grid, &neighbor));
                    stack.push(std::mem::replace(&mut current, child));
                }
                None => match stack.pop() {
                    Some(parent) => current = parent,
                    None => break,
                },
            }
        }

        debug!("depth-first carve visited {} cells", visited.len());
        Ok(())
    }

    /// Randomized Prim's expansion over a frontier of candidate cells.
    fn prim(&mut self, grid: &mut WallGrid) -> Result<(), MazeError> {
        let exit = grid.exit();
        let mut visited = Visited::new(grid.size());
        visited.insert(&grid.origin());

        let mut candidates: BTreeSet<Position> = grid.neighbors(&grid.origin()).into_iter().collect();

        while !candidates.is_empty() {
            let pick = self.rng.usize(0..candidates.len());
            let candidate = match candidates.iter().nth(pick) {
                Some(candidate) => *candidate,
                None => break,
            };

            let mut punched = false;
            for neighbor in self.shuffled_neighbors(grid, &candidate) {
                if visited.contains(&neighbor) {
                    // the exit stays a leaf: nothing gets carved out of it
                    if !punched && neighbor != exit {
                        grid.punch_hole(&neighbor, &candidate)?;
                        punched = true;
                    }
                } else if candidate != exit {
                    candidates.insert(neighbor);
                }
            }

            candidates.remove(&candidate);
            visited.insert(&candidate);
        }

        debug!("prim carve visited {} cells", visited.len());
        Ok(())
    }

    /// Marks up to `count` random closed inner walls as toggleable.
    /// Returns how many were marked.
    pub fn scatter_secret_walls(
        &mut self,
        grid: &mut WallGrid,
        count: usize,
    ) -> Result<usize, MazeError> {
        let mut closed: Vec<(Position, Direction)> = grid
            .positions()
            .flat_map(|position| {
                [Direction::North, Direction::East]
                    .into_iter()
                    .map(move |direction| (position, direction))
            })
            .filter(|(position, direction)| {
                position.step(*direction, grid.size()).is_some()
                    && !matches!(grid.can_move(position, *direction), Ok(true))
            })
            .collect();
        self.rng.shuffle(&mut closed);

        let mut marked = 0;
        for (position, direction) in closed.into_iter().take(count) {
            // the secret side is chosen at random
            let (position, direction) = if self.rng.bool() {
                (position, direction)
            } else {
                match position.step(direction, grid.size()) {
                    Some(neighbor) => (neighbor, direction.opposite()),
                    None => (position, direction),
                }
            };
            grid.mark_toggleable(&position, direction)?;
            marked += 1;
        }

        info!("scattered {} secret walls", marked);
        Ok(marked)
    }

    fn shuffled_neighbors(&mut self, grid: &WallGrid, position: &Position) -> Vec<Position> {
        let mut neighbors = grid.neighbors(position);
        self.rng.shuffle(&mut neighbors);
        neighbors
    }
}

/// A cell on the backtracking stack together with its remaining neighbours.
struct Frame {
    position: Position,
    neighbors: Vec<Position>,
    cursor: usize,
}

impl Frame {
    fn new(position: Position, neighbors: Vec<Position>) -> Self {
        Self {
            position,
            neighbors,
            cursor: 0,
        }
    }

    fn next_unvisited(&mut self, visited: &Visited) -> Option<Position> {
        while let Some(neighbor) = self.neighbors.get(self.cursor) {
            self.cursor += 1;
            if !visited.contains(neighbor) {
                return Some(*neighbor);
            }
        }
        None
    }
}

struct Visited {
    size: usize,
    cells: Vec<bool>,
    count: usize,
}

impl Visited {
    fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
            count: 0,
        }
    }

    fn insert(&mut self, position: &Position) {
        let cell = &mut self.cells[position.x * self.size + position.y];
        if !*cell {
            *cell = true;
            self.count += 1;
        }
    }

    fn contains(&self, position: &Position) -> bool {
        self.cells[position.x * self.size + position.y]
    }

    fn len(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::{Algorithm, MazeGenerator};
    use crate::{
        error::MazeError,
        maze::{
            common::{Direction, Position},
            grid::{tests::assert_symmetric, WallGrid},
        },
    };

    fn reachable(grid: &WallGrid) -> HashSet<Position> {
        let mut seen = HashSet::from([grid.origin()]);
        let mut queue = VecDeque::from([grid.origin()]);
        while let Some(position) = queue.pop_front() {
            for direction in Direction::ALL {
                if !grid.can_move(&position, direction).unwrap() {
                    continue;
                }
                let neighbor = position.step(direction, grid.size()).unwrap();
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen
    }

    fn assert_spanning_tree(grid: &WallGrid) {
        let cells = grid.size() * grid.size();
        assert_eq!(reachable(grid).len(), cells);
        assert_eq!(grid.passages().count(), cells - 1);
        assert_symmetric(grid);
    }

    fn exit_degree(grid: &WallGrid) -> usize {
        let exit = grid.exit();
        Direction::ALL
            .into_iter()
            .filter(|direction| grid.can_move(&exit, *direction).unwrap())
            .count()
    }

    #[test]
    fn test_depth_first_builds_spanning_tree() {
        for seed in 0..20 {
            for size in 1..9 {
                let grid = MazeGenerator::seeded(seed)
                    .generate(size, Algorithm::DepthFirst)
                    .unwrap();
                assert_spanning_tree(&grid);
                if size > 1 {
                    assert_eq!(exit_degree(&grid), 1);
                }
            }
        }
    }

    #[test]
    fn test_prim_builds_spanning_tree() {
        for seed in 0..20 {
            for size in 1..9 {
                let grid = MazeGenerator::seeded(seed)
                    .generate(size, Algorithm::Prim)
                    .unwrap();
                assert_spanning_tree(&grid);
                if size > 1 {
                    assert_eq!(exit_degree(&grid), 1);
                }
            }
        }
    }

    #[test]
    fn test_large_depth_first_maze() {
        let grid = MazeGenerator::seeded(7)
            .generate(120, Algorithm::DepthFirst)
            .unwrap();
        assert_spanning_tree(&grid);
    }

    #[test]
    fn test_same_seed_same_maze() {
        for algorithm in [Algorithm::DepthFirst, Algorithm::Prim] {
            let a = MazeGenerator::seeded(42).generate(10, algorithm).unwrap();
            let b = MazeGenerator::seeded(42).generate(10, algorithm).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_generate_rejects_zero_size() {
        assert_eq!(
            MazeGenerator::seeded(1).generate(0, Algorithm::Prim),
            Err(MazeError::InvalidSize(0))
        );
    }

    #[test]
    fn test_secret_walls_open_into_cycles() {
        let mut generator = MazeGenerator::seeded(3);
        let mut grid = generator.generate(6, Algorithm::DepthFirst).unwrap();

        let marked = generator.scatter_secret_walls(&mut grid, 4).unwrap();
        assert_eq!(marked, 4);

        let secrets: Vec<(Position, Direction)> = grid
            .positions()
            .flat_map(|position| Direction::ALL.into_iter().map(move |d| (position, d)))
            .filter(|(position, direction)| grid.cell(position).unwrap().is_toggleable(*direction))
            .collect();
        assert_eq!(secrets.len(), 4);

        for (position, direction) in secrets {
            assert!(!grid.can_move(&position, direction).unwrap());
            assert_eq!(grid.toggle(&position, direction), Ok(true));
        }
        assert_eq!(grid.passages().count(), 35 + 4);
        assert_symmetric(&grid);
    }

    #[test]
    fn test_secret_walls_capped_by_closed_walls() {
        let mut generator = MazeGenerator::seeded(5);
        let mut grid = generator.generate(2, Algorithm::Prim).unwrap();
        // a 2x2 tree leaves exactly one inner wall closed
        assert_eq!(generator.scatter_secret_walls(&mut grid, 10), Ok(1));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("dfs".parse::<Algorithm>(), Ok(Algorithm::DepthFirst));
        assert_eq!("prim".parse::<Algorithm>(), Ok(Algorithm::Prim));
        assert!("kruskal".parse::<Algorithm>().is_err());
    }
}
