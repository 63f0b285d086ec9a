//! Color model shared by the render state and the vertex lanes.

pub mod color;

pub use color::Color;
