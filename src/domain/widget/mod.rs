//! Widget payloads and their text renderings.

pub mod display;
pub mod payload;

pub use display::*;
pub use payload::*;
