use fastrand::Rng;
use tracing::info;

use crate::{
    error::MazeError,
    maze::{Algorithm, MazeGenerator, WallGrid},
    walker::Interpreter,
};

/// Everything needed to set up a maze exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeConfiguration {
    pub size: usize,
    pub algorithm: Algorithm,
    /// Fixed seed for reproducible mazes; `None` seeds from the environment.
    pub seed: Option<u64>,
    pub secret_walls: usize,
    /// Instruction ceiling for runs, 0 for unlimited.
    pub instruction_budget: usize,
}

impl Default for MazeConfiguration {
    fn default() -> Self {
        Self {
            size: 5,
            algorithm: Algorithm::DepthFirst,
            seed: None,
            secret_walls: 0,
            instruction_budget: 0,
        }
    }
}

impl MazeConfiguration {
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_secret_walls(mut self, secret_walls: usize) -> Self {
        self.secret_walls = secret_walls;
        self
    }

    pub fn with_instruction_budget(mut self, instruction_budget: usize) -> Self {
        self.instruction_budget = instruction_budget;
        self
    }

    pub fn build(&self) -> Result<WallGrid, MazeError> {
        let rng = match self.seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let mut generator = MazeGenerator::new(rng);

        let mut grid = generator.generate(self.size, self.algorithm)?;
        if self.secret_walls > 0 {
            generator.scatter_secret_walls(&mut grid, self.secret_walls)?;
        }

        info!(
            "built {0}x{0} maze ({1:?}, seed {2:?})",
            self.size, self.algorithm, self.seed
        );
        Ok(grid)
    }

    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.instruction_budget)
    }
}
