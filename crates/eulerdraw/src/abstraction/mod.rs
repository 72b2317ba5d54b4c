//! Abstract diagram model
//!
//! Immutable value types describing what must be true of a diagram:
//! curves, the zones that must exist, shading and spiders, plus the
//! registries that canonicalize labels, curve ids and zones.

mod context;
mod curve;
mod description;
mod label;
mod spider;
mod zone;

pub use context::*;
pub use curve::*;
pub use description::*;
pub use label::*;
pub use spider::*;
pub use zone::*;
