use std::{str::FromStr, vec::IntoIter};

use crate::{
    error::MazeError,
    maze::{Direction, Heading, RelativeDirection},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Move(Heading),
    /// Repeats the following instruction this many times.
    Repeat(usize),
    Block(Program),
}

impl From<Direction> for Instruction {
    fn from(direction: Direction) -> Self {
        Instruction::Move(direction.into())
    }
}

impl From<RelativeDirection> for Instruction {
    fn from(relative: RelativeDirection) -> Self {
        Instruction::Move(relative.into())
    }
}

impl From<Program> for Instruction {
    fn from(program: Program) -> Self {
        Instruction::Block(program)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Rejects zero repeat counts. Positions are relative to the list
    /// holding the offending instruction.
    pub fn validate(&self) -> Result<(), MazeError> {
        for (position, instruction) in self.instructions.iter().enumerate() {
            match instruction {
                Instruction::Repeat(0) => return Err(MazeError::BadCommand { position }),
                Instruction::Block(program) => program.validate()?,
                Instruction::Repeat(_) | Instruction::Move(_) => {}
            }
        }
        Ok(())
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Word(String),
}

fn tokenize(s: &str) -> Vec<Token> {
    let mut tokens = vec![];
    let mut word = String::new();

    for c in s.chars() {
        if c == '[' || c == ']' || c == ',' || c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            match c {
                '[' => tokens.push(Token::Open),
                ']' => tokens.push(Token::Close),
                _ => {}
            }
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }

    tokens
}

fn parse_list(tokens: &mut IntoIter<Token>, nested: bool) -> Result<Program, MazeError> {
    let mut instructions = vec![];

    loop {
        let position = instructions.len();
        let instruction = match tokens.next() {
            None if nested => return Err(MazeError::BadCommand { position }),
            None => break,
            Some(Token::Close) if nested => break,
            Some(Token::Close) => return Err(MazeError::BadCommand { position }),
            Some(Token::Open) => Instruction::Block(parse_list(tokens, true)?),
            Some(Token::Word(word)) => parse_word(&word, position)?,
        };
        instructions.push(instruction);
    }

    Ok(Program::new(instructions))
}

fn parse_word(word: &str, position: usize) -> Result<Instruction, MazeError> {
    if word.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
        return match word.parse::<usize>() {
            Ok(count) if count > 0 => Ok(Instruction::Repeat(count)),
            _ => Err(MazeError::BadCommand { position }),
        };
    }

    word.trim_matches(|c: char| c == '\'' || c == '"')
        .parse::<Heading>()
        .map(Instruction::Move)
        .map_err(|_| MazeError::BadCommand { position })
}

impl FromStr for Program {
    type Err = MazeError;

    /// Parses `2 [north, east] forward`-style text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = tokenize(s).into_iter();
        parse_list(&mut tokens, false)
    }
}
