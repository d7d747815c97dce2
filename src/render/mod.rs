pub mod renderer;

pub use renderer::{PlayStyle, Renderer};
