//! SVG rendering of concrete diagrams

use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, info, span, Level};

use crate::concrete::ConcreteDiagram;
use crate::core::{RenderConfig, Renderer};

/// Draws shading first, then circles with their labels, then spiders.
pub struct SvgRenderer {
    config: RenderConfig,
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn write_shading(&self, out: &mut String, diagram: &ConcreteDiagram) -> std::fmt::Result {
        for zone in diagram.shaded_zones() {
            let path = diagram.zone_shape(zone).to_svg_path();
            if path.is_empty() {
                debug!(zone = %zone.zone(), "Skipping empty shaded zone");
                continue;
            }
            writeln!(
                out,
                r#"  <path d="{}" fill="{}" fill-rule="evenodd" stroke="none"/>"#,
                path, self.config.shading_fill
            )?;
        }
        Ok(())
    }

    fn write_circles(&self, out: &mut String, diagram: &ConcreteDiagram) -> std::fmt::Result {
        for circle in diagram.circles() {
            let colour = circle.colour.unwrap_or("black");
            writeln!(
                out,
                r#"  <circle cx="{}" cy="{}" r="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                circle.cx, circle.cy, circle.radius, colour, self.config.stroke_width
            )?;
            if self.config.show_labels {
                writeln!(
                    out,
                    r#"  <text x="{}" y="{}" text-anchor="middle" font-size="{}" fill="{}">{}</text>"#,
                    circle.cx,
                    circle.cy + circle.radius,
                    self.config.font_size,
                    colour,
                    escape(circle.label_str())
                )?;
            }
        }
        Ok(())
    }

    fn write_spiders(&self, out: &mut String, diagram: &ConcreteDiagram) -> std::fmt::Result {
        for spider in diagram.spiders() {
            for leg in &spider.legs {
                let (from, to) = spider.leg_ends(leg);
                writeln!(
                    out,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="black" stroke-width="{}"/>"#,
                    from.x, from.y, to.x, to.y, self.config.leg_width
                )?;
            }
            for foot in &spider.feet {
                writeln!(
                    out,
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="black"/>"#,
                    foot.x, foot.y, self.config.foot_radius
                )?;
            }
        }
        Ok(())
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, diagram: &ConcreteDiagram) -> Result<Self::Output> {
        let render_span = span!(
            Level::INFO,
            "render_svg",
            circles = diagram.circles().len(),
            spiders = diagram.spiders().len()
        );
        let _enter = render_span.enter();

        let size = diagram.size();
        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        )?;
        self.write_shading(&mut out, diagram)?;
        self.write_circles(&mut out, diagram)?;
        self.write_spiders(&mut out, diagram)?;
        out.push_str("</svg>\n");

        info!(bytes = out.len(), "SVG render completed");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "svg"
    }

    fn format(&self) -> &'static str {
        "image/svg+xml"
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
