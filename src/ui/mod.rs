//! Presentation: the bounded input widget and plain-text rendering.

pub mod input;
pub mod render;

pub use input::BoundedInput;
pub use render::{relative_time, short_address, Renderer};
