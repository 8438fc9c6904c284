use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Increment,
    Decrement,
}

/// A request to move the counter by `amount` in the direction of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub amount: i64,
}

impl Command {
    pub fn increment(amount: i64) -> Self {
        Self {
            kind: CommandKind::Increment,
            amount,
        }
    }
    pub fn decrement(amount: i64) -> Self {
        Self {
            kind: CommandKind::Decrement,
            amount,
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            CommandKind::Increment => write!(f, "+{}", self.amount),
            CommandKind::Decrement => write!(f, "-{}", self.amount),
        }
    }
}
