mod interpreter;
mod movement;
mod program;

pub use interpreter::{Interpreter, Outcome, RunReport};
pub use movement::{Movement, Power, Walker};
pub use program::{Instruction, Program};
