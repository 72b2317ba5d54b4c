//! Compact notation for quick diagrams
//!
//! `"a b ab, ab, 'x a b, . a"` reads as: zones `a`, `b` and `ab` (every
//! character of a zone word is one curve label); zone `ab` shaded; a spider
//! named `x` with feet in `a` and `b`; an unnamed spider in the outside zone
//! and `a`. Sections are comma separated and may be empty. `.` is the
//! outside zone.

use chumsky::prelude::*;

use super::{AbstractDiagramSpec, SpiderSpec, ZoneSpec};
use crate::core::chumsky_utils::{line_and_column, optional_whitespace, whitespace_required, RichExtra};
use crate::core::{DiagramError, DiagramResult};

#[derive(Debug, Clone, PartialEq)]
enum Word {
    Outside,
    Zone(String),
    Name(String),
}

fn word<'src>() -> impl Parser<'src, &'src str, Word, RichExtra<'src>> + Clone {
    let outside = just('.').to(Word::Outside);
    let name = just('\'')
        .ignore_then(none_of(" \t\n\r,").repeated().at_least(1).to_slice())
        .map(|s: &str| Word::Name(s.to_string()));
    let zone = any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Word::Zone(s.to_string()));
    choice((outside, name, zone))
}

fn notation<'src>() -> impl Parser<'src, &'src str, Vec<Vec<Word>>, RichExtra<'src>> {
    let section = optional_whitespace().ignore_then(
        word()
            .separated_by(whitespace_required())
            .allow_trailing()
            .collect::<Vec<_>>(),
    );
    section
        .separated_by(just(','))
        .collect::<Vec<_>>()
        .then_ignore(end())
}

/// Parse the compact notation into an unvalidated [`AbstractDiagramSpec`].
///
/// Contours are declared in order of first appearance in the zone section.
pub fn parse_compact(input: &str) -> DiagramResult<AbstractDiagramSpec> {
    let sections = notation().parse(input).into_result().map_err(|errors| {
        match errors.into_iter().next() {
            Some(error) => {
                let (line, column) = line_and_column(input, error.span().start);
                DiagramError::parse_error(error.to_string(), line, column)
            }
            None => DiagramError::parse_error("invalid compact notation", 1, 0),
        }
    })?;

    let mut sections = sections.into_iter();
    let mut spec = AbstractDiagramSpec::default();

    for word in sections.next().unwrap_or_default() {
        let zone = zone_spec(word, "zone list")?;
        for label in &zone.labels {
            if !spec.contours.contains(label) {
                spec.contours.push(label.clone());
            }
        }
        if !zone.is_outside() {
            spec.zones.push(zone);
        }
    }

    for word in sections.next().unwrap_or_default() {
        spec.shaded_zones.push(zone_spec(word, "shaded zones")?);
    }

    for words in sections {
        let mut spider = SpiderSpec {
            name: None,
            habitat: Vec::new(),
        };
        for word in words {
            match word {
                Word::Name(name) => spider.name = Some(name),
                other => spider.habitat.push(zone_spec(other, "spider habitat")?),
            }
        }
        spec.spiders.push(spider);
    }
    Ok(spec)
}

fn zone_spec(word: Word, section: &str) -> DiagramResult<ZoneSpec> {
    match word {
        Word::Outside => Ok(ZoneSpec::outside()),
        Word::Zone(chars) => Ok(ZoneSpec::new(chars.chars().map(String::from))),
        Word::Name(name) => Err(DiagramError::validation_error(format!(
            "spider name '{}' is not allowed in the {}",
            name, section
        ))),
    }
}

impl AbstractDiagramSpec {
    /// Write the diagram back in compact notation.
    ///
    /// Fails when a contour label is not a single letter or digit, since
    /// zone words could not be split back into labels.
    pub fn to_compact(&self) -> DiagramResult<String> {
        if let Some(bad) = self.contours.iter().find(|c| {
            let mut chars = c.chars();
            !matches!((chars.next(), chars.next()), (Some(ch), None) if ch.is_alphanumeric() || ch == '_')
        }) {
            return Err(DiagramError::validation_error(format!(
                "contour '{}' cannot be written in compact notation",
                bad
            )));
        }

        let zones: Vec<String> = self
            .zones
            .iter()
            .filter(|z| !z.is_outside())
            .map(|z| self.zone_word(z))
            .collect();
        let shaded: Vec<String> = self.shaded_zones.iter().map(|z| self.zone_word(z)).collect();

        let mut out = format!("{}, {}", zones.join(" "), shaded.join(" "));
        for spider in &self.spiders {
            let mut words = Vec::with_capacity(spider.habitat.len() + 1);
            if let Some(name) = &spider.name {
                words.push(format!("'{}", name));
            }
            words.extend(spider.habitat.iter().map(|z| self.zone_word(z)));
            out.push_str(", ");
            out.push_str(&words.join(" "));
        }
        Ok(out)
    }

    // Labels in contour order; "." for the outside zone.
    fn zone_word(&self, zone: &ZoneSpec) -> String {
        let labels = zone.label_set();
        if labels.is_empty() {
            return ".".to_string();
        }
        self.contours
            .iter()
            .filter(|c| labels.contains(c.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::DiagramContext;

    #[test]
    fn test_zones_only() {
        let spec = parse_compact("a b ab").unwrap();
        assert_eq!(spec.contours, vec!["a", "b"]);
        assert_eq!(spec.zones.len(), 3);
        assert!(spec.shaded_zones.is_empty());
        assert!(spec.spiders.is_empty());
    }

    #[test]
    fn test_full_notation() {
        let spec = parse_compact("a b ab, ab ., 'x a b, . a").unwrap();
        assert_eq!(spec.shaded_zones, vec![ZoneSpec::new(["a", "b"]), ZoneSpec::outside()]);
        assert_eq!(spec.spiders.len(), 2);
        assert_eq!(spec.spiders[0].name.as_deref(), Some("x"));
        assert_eq!(spec.spiders[0].habitat.len(), 2);
        assert_eq!(spec.spiders[1].name, None);
        assert!(spec.spiders[1].habitat[0].is_outside());
    }

    #[test]
    fn test_empty_sections_and_outside() {
        let spec = parse_compact(". a,, 'y a").unwrap();
        assert_eq!(spec.contours, vec!["a"]);
        assert_eq!(spec.zones, vec![ZoneSpec::new(["a"])]);
        assert!(spec.shaded_zones.is_empty());
        assert_eq!(spec.spiders.len(), 1);

        let empty = parse_compact("").unwrap();
        assert!(empty.contours.is_empty());
    }

    #[test]
    fn test_first_appearance_order() {
        let spec = parse_compact("ca b").unwrap();
        assert_eq!(spec.contours, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_syntax_error_has_position() {
        let err = parse_compact("a b;c").unwrap_err();
        match err {
            DiagramError::Parse { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
            }
            other => panic!("expected parse error, got {other}"),
        }
    }

    #[test]
    fn test_unknown_curve_in_shading_fails_validation() {
        let spec = parse_compact("a b, c").unwrap();
        let err = spec.to_description(&mut DiagramContext::new()).unwrap_err();
        assert!(err.to_string().contains("not among the zones"));
    }

    #[test]
    fn test_spider_name_outside_spider_section() {
        let err = parse_compact("a 'x").unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_to_compact() {
        let spec = parse_compact("a b ab, ab, 'x a b").unwrap();
        let text = spec.to_compact().unwrap();
        assert_eq!(text, "a b ab, ab, 'x a b");
        assert_eq!(parse_compact(&text).unwrap(), spec);

        let wide = AbstractDiagramSpec {
            contours: vec!["long".into()],
            ..Default::default()
        };
        assert!(wide.to_compact().is_err());
    }
}
