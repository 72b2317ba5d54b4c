//! JSON rendering of concrete diagrams

use anyhow::Result;
use tracing::{info, span, Level};

use crate::concrete::ConcreteDiagram;
use crate::core::Renderer;

/// Serializes the [`DiagramSummary`](crate::concrete::DiagramSummary) of a diagram.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, diagram: &ConcreteDiagram) -> Result<Self::Output> {
        let render_span = span!(Level::INFO, "render_json", pretty = self.pretty);
        let _enter = render_span.enter();

        let summary = diagram.summary();
        let json = if self.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };
        info!(bytes = json.len(), "JSON render completed");
        Ok(json)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn format(&self) -> &'static str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::DiagramContext;
    use crate::geometry::CircleContour;

    #[test]
    fn test_summary_fields() {
        let mut ctx = DiagramContext::new();
        let a = ctx.new_curve("a");
        let mut circle = CircleContour::new(50.0, 50.0, 47.5, Some(a));
        circle.assign_colour();
        let diagram = ConcreteDiagram::new(100.0, vec![circle], Vec::new(), Vec::new(), Vec::new(), 32);

        let json = JsonRenderer::compact().render(&diagram).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["size"], 100.0);
        assert_eq!(value["circles"][0]["label"], "a");
        assert_eq!(value["circles"][0]["radius"], 47.5);
        assert!(value["checksum"].as_f64().unwrap() > 0.0);
        assert!(value["spiders"].as_array().unwrap().is_empty());
    }
}
