//! Core renderer trait for diagram output
//!
//! This trait defines the interface for turning a finished layout into
//! some output format (SVG, JSON, ...).

use anyhow::Result;

use crate::concrete::ConcreteDiagram;

/// Core trait for diagram renderers
///
/// Renderers consume a [`ConcreteDiagram`] read-only; the layout engine
/// never depends on any of them.
///
/// # Example
/// ```
/// use eulerdraw::core::Renderer;
/// use eulerdraw::render::SvgRenderer;
///
/// let diagram = eulerdraw::draw_compact(". a", 100.0).unwrap();
/// let svg = SvgRenderer::new().render(&diagram).unwrap();
/// assert!(svg.starts_with("<svg"));
/// ```
pub trait Renderer: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram into the output format
    fn render(&self, diagram: &ConcreteDiagram) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
