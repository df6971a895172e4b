use tracing::{debug, info};

use super::{
    movement::{Movement, Power, Walker},
    program::{Instruction, Program},
};
use crate::error::MazeError;

/// How a run ended. Exactly one per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    BudgetExceeded,
    BadCommand(usize),
    /// The program ran out without reaching the exit.
    Incomplete,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        matches!(self, Outcome::Win)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Budget units consumed before the run ended.
    pub instructions: usize,
}

impl RunReport {
    /// Whether the walker made it out, with the failing signals as errors.
    pub fn into_result(self) -> Result<bool, MazeError> {
        match self.outcome {
            Outcome::Win => Ok(true),
            Outcome::Incomplete => Ok(false),
            Outcome::BudgetExceeded => Err(MazeError::InstructionBudgetExceeded),
            Outcome::BadCommand(position) => Err(MazeError::BadCommand { position }),
        }
    }
}

/// Evaluates instruction programs against a walker.
///
/// A budget of 0 means unlimited. Each repeat count and each move costs one
/// unit, regardless of how many cells the move walks; blocks cost nothing by
/// themselves but share the counter with everything they contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interpreter {
    budget: usize,
}

impl Interpreter {
    pub fn new(budget: usize) -> Self {
        Self { budget }
    }

    pub fn unlimited() -> Self {
        Self::new(0)
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Runs `program` to completion or until a halting signal.
    ///
    /// Only caller errors surface as `Err`: an unpowered walker, or a maze
    /// fault raised while moving.
    pub fn run(&self, walker: &mut Walker, program: &Program) -> Result<RunReport, MazeError> {
        if walker.power() != Power::Active {
            return Err(MazeError::WalkerNotReady);
        }

        let mut run = Run {
            walker,
            budget: self.budget,
            consumed: 0,
        };
        let outcome = match run.eval(program) {
            Ok(()) => Outcome::Incomplete,
            Err(Halt::Win) => Outcome::Win,
            Err(Halt::BudgetExceeded) => Outcome::BudgetExceeded,
            Err(Halt::BadCommand(position)) => Outcome::BadCommand(position),
            Err(Halt::Fault(error)) => return Err(error),
        };

        info!("run ended with {:?} after {} instructions", outcome, run.consumed);
        Ok(RunReport {
            outcome,
            instructions: run.consumed,
        })
    }

    /// Parses `source` and runs it. A malformed token ends the run with
    /// [`Outcome::BadCommand`] before the walker moves.
    pub fn run_source(&self, walker: &mut Walker, source: &str) -> Result<RunReport, MazeError> {
        match source.parse::<Program>() {
            Ok(program) => self.run(walker, &program),
            Err(MazeError::BadCommand { position }) => {
                if walker.power() != Power::Active {
                    return Err(MazeError::WalkerNotReady);
                }
                info!("rejected program: bad command at position {}", position);
                Ok(RunReport {
                    outcome: Outcome::BadCommand(position),
                    instructions: 0,
                })
            }
            Err(error) => Err(error),
        }
    }
}

/// Signals that stop evaluation at every nesting level.
enum Halt {
    Win,
    BudgetExceeded,
    BadCommand(usize),
    Fault(MazeError),
}

impl From<MazeError> for Halt {
    fn from(error: MazeError) -> Self {
        match error {
            MazeError::InstructionBudgetExceeded => Halt::BudgetExceeded,
            MazeError::BadCommand { position } => Halt::BadCommand(position),
            error => Halt::Fault(error),
        }
    }
}

struct Run<'w, 'a> {
    walker: &'w mut Walker<'a>,
    budget: usize,
    consumed: usize,
}

impl Run<'_, '_> {
    fn eval(&mut self, program: &Program) -> Result<(), Halt> {
        let mut repeat = 1;

        for (position, instruction) in program.instructions().iter().enumerate() {
            if self.budget > 0 && self.consumed >= self.budget {
                debug!("budget of {} exhausted", self.budget);
                return Err(Halt::BudgetExceeded);
            }

            match instruction {
                Instruction::Repeat(0) => return Err(Halt::BadCommand(position)),
                Instruction::Repeat(count) => {
                    self.consumed += 1;
                    repeat = *count;
                }
                Instruction::Move(heading) => {
                    self.consumed += 1;
                    let movement = self.walker.walk(*heading, repeat)?;
                    repeat = 1;
                    if movement == Movement::Exited {
                        return Err(Halt::Win);
                    }
                }
                Instruction::Block(block) => {
                    for _ in 0..repeat {
                        self.eval(block)?;
                    }
                    repeat = 1;
                }
            }
        }

        Ok(())
    }
}
