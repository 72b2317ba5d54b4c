//! Eulerdraw - Lay out Euler and Venn diagrams as circles
//!
//! A library that takes an abstract description of a diagram (the curves,
//! the zones that must exist, which of them are shaded, and spiders living
//! in zones) and finds a placement of one circle per curve realizing it.
//!
//! # Quick Start
//!
//! ```rust
//! use eulerdraw::draw_compact;
//!
//! // Two overlapping circles with their overlap shaded
//! let diagram = draw_compact("a b ab, ab", 200.0).unwrap();
//! assert_eq!(diagram.circles().len(), 2);
//! assert_eq!(diagram.shaded_zones().len(), 1);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual stages:
//!
//! ```rust
//! use eulerdraw::prelude::*;
//!
//! let spec = parse_compact("a b ab").unwrap();
//! let mut ctx = DiagramContext::new();
//! let description = spec.to_description(&mut ctx).unwrap();
//!
//! // Inspect the plan before placing anything
//! let creator = DiagramCreator::new(LayoutConfig::default());
//! let plan = creator.plan(&description, &mut ctx).unwrap();
//! assert_eq!(plan.build_steps.len(), 2);
//!
//! // Lay out and render
//! let diagram = creator.create_diagram(&description, &mut ctx, 200.0).unwrap();
//! let svg = SvgRenderer::new().render(&diagram).unwrap();
//! assert!(svg.contains("<circle"));
//! ```

pub mod abstraction;
pub mod concrete;
pub mod core;
pub mod decomposition;
pub mod geometry;
pub mod input;
pub mod placement;
pub mod plan;
pub mod recomposition;
pub mod render;

pub use crate::core::*;

use anyhow::Context as _;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::abstraction::{
        AbstractCurve, AbstractDescription, AbstractSpider, DiagramContext, Zone,
    };
    pub use crate::concrete::{ConcreteDiagram, ConcreteSpider, ConcreteZone};
    pub use crate::core::{DiagramError, DiagramResult, LayoutConfig, RenderConfig, Renderer};
    pub use crate::geometry::{Area, CircleContour, Rect};
    pub use crate::input::{parse_compact, AbstractDiagramSpec};
    pub use crate::placement::{DiagramCreator, DiagramPlan};
    pub use crate::render::{JsonRenderer, SvgRenderer};
}

/// Lay out a diagram given in the JSON wire format.
///
/// # Example
/// ```rust
/// let json = r#"{"AbstractDiagram": {"Contours": ["a"], "Zones": [{"in": ["a"]}]}}"#;
/// let diagram = eulerdraw::draw(json, 100.0).unwrap();
/// assert_eq!(diagram.circles()[0].label_str(), "a");
/// ```
pub fn draw(json: &str, size: f64) -> anyhow::Result<concrete::ConcreteDiagram> {
    let spec = input::AbstractDiagramSpec::from_json(json).context("reading diagram JSON")?;
    draw_spec(&spec, size)
}

/// Lay out a diagram given in compact notation, e.g. `"a b ab, ab"`.
pub fn draw_compact(notation: &str, size: f64) -> anyhow::Result<concrete::ConcreteDiagram> {
    let spec = input::parse_compact(notation).context("reading compact notation")?;
    draw_spec(&spec, size)
}

/// Validate and lay out an already parsed diagram with default settings.
pub fn draw_spec(
    spec: &input::AbstractDiagramSpec,
    size: f64,
) -> anyhow::Result<concrete::ConcreteDiagram> {
    let mut ctx = abstraction::DiagramContext::new();
    let description = spec
        .to_description(&mut ctx)
        .context("validating diagram")?;
    let diagram = placement::DiagramCreator::default()
        .create_diagram(&description, &mut ctx, size)
        .context("laying out diagram")?;
    Ok(diagram)
}

/// Lay out a JSON diagram and render it to SVG.
pub fn render_svg(json: &str, size: f64) -> anyhow::Result<String> {
    let diagram = draw(json, size)?;
    render::SvgRenderer::new().render(&diagram)
}

/// Checksum of the layout of a JSON diagram.
pub fn checksum(json: &str, size: f64) -> anyhow::Result<f64> {
    Ok(draw(json, size)?.checksum())
}
