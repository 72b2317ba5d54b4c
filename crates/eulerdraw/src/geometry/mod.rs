//! Planar geometry: bounds, boolean areas and circles

mod area;
mod circle;
mod rect;

pub use area::*;
pub use circle::*;
pub use rect::*;
