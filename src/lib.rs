//! Grid maze engine: spanning-tree maze generation over a packed wall grid,
//! and a walker driven by a small instruction language.
//!
//! ```no_run
//! use maze_walker::{Algorithm, MazeGenerator, Outcome, Walker, Interpreter};
//!
//! let mut grid = MazeGenerator::seeded(7).generate(5, Algorithm::Prim)?;
//! let mut walker = Walker::new(&mut grid);
//! walker.power_on();
//! let report = Interpreter::new(10).run_source(&mut walker, "2 [north east]")?;
//! if report.outcome == Outcome::Win {
//!     println!("out in {} instructions", report.instructions);
//! }
//! # Ok::<(), maze_walker::MazeError>(())
//! ```

pub mod configuration;
pub mod error;
pub mod maze;
pub mod walker;

pub use configuration::MazeConfiguration;
pub use error::MazeError;
pub use maze::{
    Algorithm, Cell, Direction, Heading, MazeGenerator, Position, RelativeDirection, WallGrid,
};
pub use walker::{Instruction, Interpreter, Movement, Outcome, Power, Program, RunReport, Walker};
