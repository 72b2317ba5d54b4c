//! Circle placement engine
//!
//! Turns a build plan into concrete circles, one build step at a time,
//! then seats spiders and rescales the result.

mod angles;
mod context;
mod engine;
mod nested;
mod piercing;
mod spiders;

pub use angles::*;
pub use context::*;
pub use engine::*;
pub use nested::*;
pub use piercing::*;
pub use spiders::*;
