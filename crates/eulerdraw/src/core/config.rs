//! Layout and rendering configuration

/// Tunables for the circle placement engine.
///
/// Distances are in working-scale units unless noted; the finished diagram
/// is rescaled to the requested size afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Minimum visible gap between features, also the grid spacing used
    /// when searching for room inside a zone.
    pub smallest_radius: f64,
    /// Number of polygon vertices used to approximate each circle.
    pub circle_segments: usize,
    /// Fraction of a fattened circle's area allowed to stick out of its
    /// target zone before the containment test fails.
    pub containment_tolerance: f64,
    /// Guide radius handed to the nesting search when seating spider feet,
    /// in output units.
    pub spider_foot_radius: f64,
    /// Band around a spider leg inside which a foreign foot counts as a
    /// collision, in output units.
    pub spider_tolerance: f64,
    /// Upper bound on collision-resolution passes.
    pub max_spider_passes: usize,
    /// Edge length of the working box used before any circle exists.
    pub empty_box_size: f64,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self {
            smallest_radius: 10.0,
            circle_segments: 64,
            containment_tolerance: 1e-4,
            spider_foot_radius: 3.0,
            spider_tolerance: 6.0,
            max_spider_passes: 64,
            empty_box_size: 1000.0,
        }
    }

    pub fn with_smallest_radius(mut self, radius: f64) -> Self {
        self.smallest_radius = radius;
        self
    }

    pub fn with_circle_segments(mut self, segments: usize) -> Self {
        self.circle_segments = segments.max(8);
        self
    }

    pub fn with_max_spider_passes(mut self, passes: usize) -> Self {
        self.max_spider_passes = passes;
        self
    }

    pub fn with_spider_tolerance(mut self, tolerance: f64) -> Self {
        self.spider_tolerance = tolerance;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation options for the SVG renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub stroke_width: f64,
    pub foot_radius: f64,
    pub leg_width: f64,
    pub shading_fill: String,
    pub show_labels: bool,
    pub font_size: f64,
}

impl RenderConfig {
    pub fn new() -> Self {
        Self {
            stroke_width: 2.0,
            foot_radius: 2.5,
            leg_width: 1.5,
            shading_fill: "#cccccc".to_string(),
            show_labels: true,
            font_size: 12.0,
        }
    }

    pub fn without_labels(mut self) -> Self {
        self.show_labels = false;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}
