pub mod combobox;
pub mod config;
pub mod error;
pub mod navigation;
pub mod runtime;
pub mod search;
pub mod terminal;
pub mod ui;

pub use error::{Error, Result};
