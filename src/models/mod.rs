pub mod command;
pub mod counter;
pub mod dtos;
pub mod event;

pub use command::{Command, CommandKind};
pub use counter::{Counter, CounterError};
pub use event::CounterEvent;
