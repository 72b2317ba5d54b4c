//! JSON wire format
//!
//! ```json
//! {"AbstractDiagram": {
//!     "Version": 0,
//!     "Contours": ["a", "b"],
//!     "Zones": [{"in": ["a"]}, {"in": ["a", "b"]}],
//!     "ShadedZones": [{"in": ["a", "b"]}],
//!     "Spiders": [{"name": "x", "habitat": [{"in": ["a"]}]}]
//! }}
//! ```
//!
//! Empty strings inside `in` are ignored, so `{"in": [""]}` is the outside
//! zone. The outside zone is always present whether listed or not.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, span, Level};

use crate::abstraction::{AbstractCurve, AbstractDescription, AbstractSpider, DiagramContext, Zone};
use crate::core::{DiagramError, DiagramResult};

/// Only version of the wire format understood here.
pub const SUPPORTED_VERSION: u32 = 0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DiagramDocument {
    #[serde(rename = "AbstractDiagram")]
    diagram: AbstractDiagramSpec,
}

/// One zone as a list of the contour labels it lies inside.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneSpec {
    #[serde(rename = "in", default)]
    pub labels: Vec<String>,
}

impl ZoneSpec {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn outside() -> Self {
        Self::default()
    }

    /// Label set with empty strings dropped.
    pub fn label_set(&self) -> BTreeSet<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|l| !l.is_empty())
            .collect()
    }

    pub fn is_outside(&self) -> bool {
        self.label_set().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpiderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub habitat: Vec<ZoneSpec>,
}

/// Unvalidated abstract diagram as written by a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbstractDiagramSpec {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub contours: Vec<String>,
    #[serde(default)]
    pub zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub shaded_zones: Vec<ZoneSpec>,
    #[serde(default)]
    pub spiders: Vec<SpiderSpec>,
}

impl AbstractDiagramSpec {
    pub fn from_json(json: &str) -> DiagramResult<Self> {
        let document: DiagramDocument = serde_json::from_str(json)?;
        Ok(document.diagram)
    }

    pub fn to_json(&self) -> DiagramResult<String> {
        let document = DiagramDocument {
            diagram: self.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Reject anything the layout engine cannot interpret.
    pub fn validate(&self) -> DiagramResult<()> {
        if self.version != SUPPORTED_VERSION {
            return Err(DiagramError::validation_error(format!(
                "unsupported version {} (expected {})",
                self.version, SUPPORTED_VERSION
            )));
        }

        let mut contours = BTreeSet::new();
        for name in &self.contours {
            if name.is_empty() {
                return Err(DiagramError::validation_error("contour names must not be empty"));
            }
            if !contours.insert(name.as_str()) {
                return Err(DiagramError::validation_error(format!(
                    "duplicate contour '{}'",
                    name
                )));
            }
        }

        let mut zones: BTreeSet<BTreeSet<&str>> = BTreeSet::new();
        zones.insert(BTreeSet::new());
        for zone in &self.zones {
            let labels = zone.label_set();
            if let Some(unknown) = labels.iter().find(|l| !contours.contains(*l)) {
                return Err(DiagramError::validation_error(format!(
                    "zone uses undefined curve '{}'",
                    unknown
                )));
            }
            zones.insert(labels);
        }

        for zone in &self.shaded_zones {
            if !zones.contains(&zone.label_set()) {
                return Err(DiagramError::validation_error(format!(
                    "shaded zone {} is not among the zones",
                    describe(zone)
                )));
            }
        }

        for spider in &self.spiders {
            let name = spider.name.as_deref().unwrap_or("<unnamed>");
            if spider.habitat.is_empty() {
                return Err(DiagramError::validation_error(format!(
                    "spider {} has an empty habitat",
                    name
                )));
            }
            if let Some(zone) = spider.habitat.iter().find(|z| !zones.contains(&z.label_set())) {
                return Err(DiagramError::validation_error(format!(
                    "spider {} lives in {} which is not among the zones",
                    name,
                    describe(zone)
                )));
            }
        }
        Ok(())
    }

    /// Validate, then allocate curves and zones in `ctx`.
    ///
    /// Curves get ids in `Contours` order.
    pub fn to_description(&self, ctx: &mut DiagramContext) -> DiagramResult<AbstractDescription> {
        let build_span = span!(
            Level::DEBUG,
            "to_description",
            contours = self.contours.len(),
            zones = self.zones.len()
        );
        let _enter = build_span.enter();

        self.validate()?;

        let curves: BTreeMap<&str, AbstractCurve> = self
            .contours
            .iter()
            .map(|name| (name.as_str(), ctx.new_curve(name)))
            .collect();

        let mut zone_of = |spec: &ZoneSpec| -> Zone {
            let set = spec
                .label_set()
                .into_iter()
                .filter_map(|l| curves.get(l).cloned())
                .collect();
            ctx.zones.intern(set)
        };

        let mut zones: BTreeSet<Zone> = self.zones.iter().map(&mut zone_of).collect();
        zones.insert(zone_of(&ZoneSpec::outside()));
        let shaded: BTreeSet<Zone> = self.shaded_zones.iter().map(&mut zone_of).collect();
        let spiders: Vec<AbstractSpider> = self
            .spiders
            .iter()
            .map(|s| AbstractSpider::new(s.name.clone(), s.habitat.iter().map(&mut zone_of).collect()))
            .collect();

        let description = AbstractDescription::try_new(
            curves.into_values().collect(),
            zones,
            shaded,
            spiders,
        )?;
        debug!(zones = %description.to_sentence(), "Built abstract description");
        Ok(description)
    }
}

fn describe(zone: &ZoneSpec) -> String {
    if zone.is_outside() {
        "the outside zone".to_string()
    } else {
        format!("{{{}}}", zone.label_set().into_iter().collect::<Vec<_>>().join(","))
    }
}
