pub mod command;
pub mod stats;
