//! Model transform stack.
//!
//! The renderer bakes the current matrix into every vertex at emission time,
//! so a single draw call may span geometry emitted under many different
//! stack states.

mod stack;

pub use stack::{PopPolicy, TransformStack};
