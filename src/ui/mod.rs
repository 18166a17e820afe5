pub mod renderer;
pub mod span;
pub mod style;

pub use renderer::{RenderFrame, Renderer};
