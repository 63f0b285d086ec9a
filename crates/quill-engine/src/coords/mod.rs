//! Geometry types shared by the primitive builders and the device backends.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! The default projection built from [`Viewport`] maps this space to clip space.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
