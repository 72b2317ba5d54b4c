//! Core infrastructure shared by every layout stage
//!
//! Error types, logging bootstrap, configuration and the renderer seam.

pub mod chumsky_utils;
mod config;
mod error;
pub mod logging;
mod renderer;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use renderer::*;
