use crate::models::command::{Command, CommandKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterError {
    #[error("counter cannot be negative")]
    Negative,
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(i64),
    #[error("counter overflow")]
    Overflow,
}

/// The shared counter value. Never observably negative.
#[derive(Debug, Default)]
pub struct Counter {
    value: i64,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn value(&self) -> i64 {
        self.value
    }
    /// Applies `command` and returns the committed value.
    ///
    /// The value is only written when the whole command is valid, a rejected
    /// command leaves the counter untouched.
    pub fn apply(&mut self, command: Command) -> Result<i64, CounterError> {
        if command.amount < 0 {
            return Err(CounterError::NegativeAmount(command.amount));
        }
        let next = match command.kind {
            CommandKind::Increment => self.value.checked_add(command.amount),
            CommandKind::Decrement => self.value.checked_sub(command.amount),
        }
        .ok_or(CounterError::Overflow)?;
        if next < 0 {
            return Err(CounterError::Negative);
        }
        self.value = next;
        Ok(next)
    }
}
