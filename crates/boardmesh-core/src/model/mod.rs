//! Board-feature records.
//!
//! Records are deserialized leniently from the flat JSON record list and
//! then converted into typed shape variants. The conversion is where
//! missing or malformed fields turn into [`FeatureError`]s.

mod board;
mod legend;
mod plated_hole;
mod smt_pad;

pub use board::{AutoSizeConfig, Board, BoardAnchor, BoardMaterial};
pub use legend::{Component, LegendClass, LegendPath, LegendText};
pub use plated_hole::{PlatedHole, PlatedHoleShape, PolygonPadHole};
pub use smt_pad::{SmtPad, SmtPadShape};

use serde::{Deserialize, Serialize};

use crate::error::FeatureError;

/// A point in the board plane, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A number that may arrive as a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    /// The finite value, if any.
    pub fn value(&self) -> Option<f64> {
        let v = match self {
            NumberLike::Number(n) => *n,
            NumberLike::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }
}

/// Finite value of an optional lenient number, or `fallback`.
pub fn number_or(value: &Option<NumberLike>, fallback: f64) -> f64 {
    value.as_ref().and_then(NumberLike::value).unwrap_or(fallback)
}

/// A point whose coordinates may be missing, null or strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPoint {
    #[serde(default)]
    pub x: Option<NumberLike>,
    #[serde(default)]
    pub y: Option<NumberLike>,
}

impl RawPoint {
    /// The point if both coordinates are finite.
    pub fn finite(&self) -> Option<Point> {
        let x = self.x.as_ref()?.value()?;
        let y = self.y.as_ref()?.value()?;
        Some(Point::new(x, y))
    }

    /// Coordinates with unparsable values replaced by zero.
    pub fn or_zero(&self) -> Point {
        Point::new(number_or(&self.x, 0.0), number_or(&self.y, 0.0))
    }
}

impl From<Point> for RawPoint {
    fn from(p: Point) -> Self {
        Self {
            x: Some(NumberLike::Number(p.x)),
            y: Some(NumberLike::Number(p.y)),
        }
    }
}

/// Copper/legend side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Top,
    Bottom,
}

impl Layer {
    /// Anything other than `"bottom"` is the top layer.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("bottom") => Layer::Bottom,
            _ => Layer::Top,
        }
    }

    /// +1 for top, -1 for bottom.
    pub fn sign(self) -> f64 {
        match self {
            Layer::Top => 1.0,
            Layer::Bottom => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Layer::Top => "top",
            Layer::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rounded-corner radius, accepted under several field names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadius {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect_border_radius: Option<f64>,
    #[serde(default, rename = "rectBorderRadius", skip_serializing_if = "Option::is_none")]
    pub rect_border_radius_camel: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl CornerRadius {
    /// First finite radius in field precedence order.
    pub fn value(&self) -> Option<f64> {
        [
            self.rect_border_radius,
            self.rect_border_radius_camel,
            self.border_radius,
            self.corner_radius,
        ]
        .into_iter()
        .flatten()
        .find(|r| r.is_finite())
    }
}

pub(crate) fn require(value: Option<f64>, feature: &str, field: &str) -> Result<f64, FeatureError> {
    let v = value.ok_or_else(|| FeatureError::missing(feature, field))?;
    if !v.is_finite() {
        return Err(FeatureError::malformed(feature, format!("{field} is not finite")));
    }
    Ok(v)
}

pub(crate) fn require_positive(
    value: Option<f64>,
    feature: &str,
    field: &str,
) -> Result<f64, FeatureError> {
    let v = require(value, feature, field)?;
    if v <= 0.0 {
        return Err(FeatureError::malformed(feature, format!("{field} must be positive, got {v}")));
    }
    Ok(v)
}

/// Optional field: absent is fine, present must be finite.
pub(crate) fn optional_finite(
    value: Option<f64>,
    feature: &str,
    field: &str,
) -> Result<Option<f64>, FeatureError> {
    match value {
        Some(v) if !v.is_finite() => {
            Err(FeatureError::malformed(feature, format!("{field} is not finite")))
        }
        other => Ok(other),
    }
}

pub(crate) fn require_outline(
    points: Option<&[Point]>,
    feature: &str,
    field: &str,
) -> Result<Vec<Point>, FeatureError> {
    let points = points.ok_or_else(|| FeatureError::missing(feature, field))?;
    if points.len() < 3 {
        return Err(FeatureError::malformed(
            feature,
            format!("{field} needs at least 3 points, got {}", points.len()),
        ));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(FeatureError::malformed(feature, format!("{field} has a non-finite point")));
    }
    Ok(points.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_like_accepts_strings() {
        let n: NumberLike = serde_json::from_str("\"1.25\"").unwrap();
        assert_eq!(n.value(), Some(1.25));
        let n: NumberLike = serde_json::from_str("3").unwrap();
        assert_eq!(n.value(), Some(3.0));
        let n: NumberLike = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n.value(), None);
        assert_eq!(number_or(&Some(n), 0.1), 0.1);
        assert_eq!(number_or(&None, 0.25), 0.25);
    }

    #[test]
    fn test_raw_point_requires_both_coordinates() {
        let p: RawPoint = serde_json::from_str(r#"{"x": 1, "y": "2"}"#).unwrap();
        assert_eq!(p.finite(), Some(Point::new(1.0, 2.0)));
        let p: RawPoint = serde_json::from_str(r#"{"x": 1, "y": null}"#).unwrap();
        assert_eq!(p.finite(), None);
        assert_eq!(p.or_zero(), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_layer_normalisation() {
        assert_eq!(Layer::from_raw(Some("bottom")), Layer::Bottom);
        assert_eq!(Layer::from_raw(Some("top")), Layer::Top);
        assert_eq!(Layer::from_raw(Some("inner1")), Layer::Top);
        assert_eq!(Layer::from_raw(None), Layer::Top);
        assert_eq!(Layer::Bottom.sign(), -1.0);
    }

    #[test]
    fn test_corner_radius_precedence() {
        let r: CornerRadius =
            serde_json::from_str(r#"{"border_radius": 0.3, "rectBorderRadius": 0.2}"#).unwrap();
        assert_eq!(r.value(), Some(0.2));
        let r: CornerRadius = serde_json::from_str(r#"{"corner_radius": 0.5}"#).unwrap();
        assert_eq!(r.value(), Some(0.5));
        assert_eq!(CornerRadius::default().value(), None);
    }

    #[test]
    fn test_require_helpers() {
        assert!(matches!(
            require_positive(None, "ph-1", "hole_diameter"),
            Err(FeatureError::MissingField { .. })
        ));
        assert!(matches!(
            require_positive(Some(-1.0), "ph-1", "hole_diameter"),
            Err(FeatureError::MalformedGeometry { .. })
        ));
        assert_eq!(require_positive(Some(1.0), "ph-1", "hole_diameter"), Ok(1.0));
        let two = [Point::ORIGIN, Point::new(1.0, 0.0)];
        assert!(matches!(
            require_outline(Some(&two), "ph-1", "pad_outline"),
            Err(FeatureError::MalformedGeometry { .. })
        ));
    }
}
