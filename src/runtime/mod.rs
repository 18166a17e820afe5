pub mod command;
pub mod effect;
pub mod event;
pub mod key_bindings;
pub mod runner;
pub mod scheduler;

pub use runner::{RunOutcome, Runtime};
