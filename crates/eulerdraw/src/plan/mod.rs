//! Build planning and guide-size estimation

mod build_step;
mod guide_size;

pub use build_step::*;
pub use guide_size::*;
