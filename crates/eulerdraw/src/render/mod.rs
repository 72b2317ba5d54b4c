//! Output formats for finished diagrams

mod json;
mod svg;

pub use json::*;
pub use svg::*;
