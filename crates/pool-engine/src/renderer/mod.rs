//! Render boundary: colors, the draw-call sink trait, and a recording sink.

pub mod color;
pub mod sink;
