//! Input formats for abstract diagrams
//!
//! Both the JSON wire format and the compact notation produce an
//! [`AbstractDiagramSpec`], which is validated before any curve or zone is
//! allocated. Nothing here reaches the placement engine on bad input.

mod compact;
mod json;

pub use compact::*;
pub use json::*;
