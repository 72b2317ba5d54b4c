//! Concrete diagrams: placed circles, zone shapes and spiders

mod diagram;
mod spider;
mod zone;

pub use diagram::*;
pub use spider::*;
pub use zone::*;
