use serde::{Deserialize, Serialize};

use super::{optional_finite, require, require_outline, require_positive, CornerRadius, Point};
use crate::constants::DEFAULT_PAD_EXTENSION;
use crate::error::FeatureError;
use crate::polygon::Bounds2;

/// A `pcb_plated_hole` record as it appears in the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlatedHole {
    #[serde(default)]
    pub pcb_plated_hole_id: Option<String>,
    pub shape: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub layers: Vec<String>,
    #[serde(default)]
    pub hole_diameter: Option<f64>,
    #[serde(default)]
    pub outer_diameter: Option<f64>,
    #[serde(default)]
    pub hole_width: Option<f64>,
    #[serde(default)]
    pub hole_height: Option<f64>,
    #[serde(default)]
    pub outer_width: Option<f64>,
    #[serde(default)]
    pub outer_height: Option<f64>,
    #[serde(default)]
    pub rect_pad_width: Option<f64>,
    #[serde(default)]
    pub rect_pad_height: Option<f64>,
    #[serde(default)]
    pub hole_offset_x: Option<f64>,
    #[serde(default)]
    pub hole_offset_y: Option<f64>,
    #[serde(default)]
    pub ccw_rotation: Option<f64>,
    #[serde(default)]
    pub hole_shape: Option<String>,
    #[serde(default)]
    pub pad_outline: Option<Vec<Point>>,
    #[serde(flatten)]
    pub corner: CornerRadius,
}

/// Bore of a `hole_with_polygon_pad`.
#[derive(Debug, Clone, PartialEq)]
pub enum PolygonPadHole {
    Circle {
        diameter: f64,
    },
    /// `pill`/`oval`, or `rotated_pill` when `ccw_rotation` is set.
    Pill {
        width: f64,
        height: f64,
        ccw_rotation: Option<f64>,
    },
}

impl PolygonPadHole {
    /// Bore extent along x and y, ignoring rotation.
    pub fn extent(&self) -> (f64, f64) {
        match *self {
            PolygonPadHole::Circle { diameter } => (diameter, diameter),
            PolygonPadHole::Pill { width, height, .. } => (width, height),
        }
    }
}

/// Validated plated-hole geometry, one variant per shape tag.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatedHoleShape {
    Circle {
        hole_diameter: f64,
        outer_diameter: f64,
    },
    Pill {
        hole_width: f64,
        hole_height: f64,
        outer_width: f64,
        outer_height: f64,
        ccw_rotation: f64,
    },
    PillHoleWithRectPad {
        hole_width: f64,
        hole_height: f64,
        hole_offset: Point,
        pad_width: f64,
        pad_height: f64,
        border_radius: Option<f64>,
    },
    CircularHoleWithRectPad {
        hole_diameter: f64,
        hole_offset: Point,
        pad_width: f64,
        pad_height: f64,
        border_radius: Option<f64>,
    },
    HoleWithPolygonPad {
        pad_outline: Vec<Point>,
        hole: PolygonPadHole,
        hole_offset: Point,
    },
}

impl PlatedHole {
    /// Stable mesh key, `ph-<id>` or `ph-<index>`.
    pub fn key(&self, index: usize) -> String {
        match self.pcb_plated_hole_id.as_deref() {
            Some(id) if !id.is_empty() => format!("ph-{id}"),
            _ => format!("ph-{index}"),
        }
    }

    /// Finite hole centre.
    pub fn position(&self, key: &str) -> Result<Point, FeatureError> {
        Ok(Point::new(require(self.x, key, "x")?, require(self.y, key, "y")?))
    }

    fn hole_offset(&self, key: &str) -> Result<Point, FeatureError> {
        Ok(Point::new(
            optional_finite(self.hole_offset_x, key, "hole_offset_x")?.unwrap_or(0.0),
            optional_finite(self.hole_offset_y, key, "hole_offset_y")?.unwrap_or(0.0),
        ))
    }

    /// Turn the record into a typed shape, checking every field the
    /// variant needs and that the hole stays inside its copper.
    pub fn shape(&self, key: &str) -> Result<PlatedHoleShape, FeatureError> {
        let shape = match self.shape.as_str() {
            "circle" => {
                let hole_diameter = require_positive(self.hole_diameter, key, "hole_diameter")?;
                let outer_diameter = require_positive(self.outer_diameter, key, "outer_diameter")?;
                ensure_smaller(key, "hole_diameter", hole_diameter, "outer_diameter", outer_diameter)?;
                PlatedHoleShape::Circle {
                    hole_diameter,
                    outer_diameter,
                }
            }
            "pill" | "oval" => {
                let hole_width = require_positive(self.hole_width, key, "hole_width")?;
                let hole_height = require_positive(self.hole_height, key, "hole_height")?;
                let outer_width = optional_finite(self.outer_width, key, "outer_width")?
                    .unwrap_or(hole_width + DEFAULT_PAD_EXTENSION);
                let outer_height = optional_finite(self.outer_height, key, "outer_height")?
                    .unwrap_or(hole_height + DEFAULT_PAD_EXTENSION);
                ensure_smaller(key, "hole_width", hole_width, "outer_width", outer_width)?;
                ensure_smaller(key, "hole_height", hole_height, "outer_height", outer_height)?;
                PlatedHoleShape::Pill {
                    hole_width,
                    hole_height,
                    outer_width,
                    outer_height,
                    ccw_rotation: optional_finite(self.ccw_rotation, key, "ccw_rotation")?
                        .unwrap_or(0.0),
                }
            }
            "pill_hole_with_rect_pad" => {
                let hole_width = require_positive(self.hole_width, key, "hole_width")?;
                let hole_height = require_positive(self.hole_height, key, "hole_height")?;
                let pad_width = require_positive(self.rect_pad_width, key, "rect_pad_width")?;
                let pad_height = require_positive(self.rect_pad_height, key, "rect_pad_height")?;
                ensure_smaller(key, "hole_width", hole_width, "rect_pad_width", pad_width)?;
                ensure_smaller(key, "hole_height", hole_height, "rect_pad_height", pad_height)?;
                PlatedHoleShape::PillHoleWithRectPad {
                    hole_width,
                    hole_height,
                    hole_offset: self.hole_offset(key)?,
                    pad_width,
                    pad_height,
                    border_radius: self.corner.value(),
                }
            }
            "circular_hole_with_rect_pad" => {
                let hole_diameter = require_positive(self.hole_diameter, key, "hole_diameter")?;
                let pad_width = optional_finite(self.rect_pad_width, key, "rect_pad_width")?
                    .unwrap_or(hole_diameter + DEFAULT_PAD_EXTENSION);
                let pad_height = optional_finite(self.rect_pad_height, key, "rect_pad_height")?
                    .unwrap_or(hole_diameter + DEFAULT_PAD_EXTENSION);
                ensure_smaller(key, "hole_diameter", hole_diameter, "rect_pad_width", pad_width)?;
                ensure_smaller(key, "hole_diameter", hole_diameter, "rect_pad_height", pad_height)?;
                PlatedHoleShape::CircularHoleWithRectPad {
                    hole_diameter,
                    hole_offset: self.hole_offset(key)?,
                    pad_width,
                    pad_height,
                    border_radius: self.corner.value(),
                }
            }
            "hole_with_polygon_pad" => {
                let pad_outline = require_outline(self.pad_outline.as_deref(), key, "pad_outline")?;
                let hole = self.polygon_pad_hole(key)?;
                let (hole_w, hole_h) = hole.extent();
                if let Some(bounds) = Bounds2::of(&pad_outline) {
                    ensure_smaller(key, "hole width", hole_w, "pad_outline width", bounds.width())?;
                    ensure_smaller(key, "hole height", hole_h, "pad_outline height", bounds.height())?;
                }
                PlatedHoleShape::HoleWithPolygonPad {
                    pad_outline,
                    hole,
                    hole_offset: self.hole_offset(key)?,
                }
            }
            other => return Err(FeatureError::unsupported(key, other)),
        };
        Ok(shape)
    }

    fn polygon_pad_hole(&self, key: &str) -> Result<PolygonPadHole, FeatureError> {
        match self.hole_shape.as_deref().unwrap_or("circle") {
            "circle" => Ok(PolygonPadHole::Circle {
                diameter: require_positive(self.hole_diameter, key, "hole_diameter")?,
            }),
            tag @ ("oval" | "pill" | "rotated_pill") => {
                let width = require_positive(self.hole_width, key, "hole_width")?;
                let height = require_positive(self.hole_height, key, "hole_height")?;
                let ccw_rotation = if tag == "rotated_pill" {
                    optional_finite(self.ccw_rotation, key, "ccw_rotation")?
                } else {
                    None
                };
                Ok(PolygonPadHole::Pill {
                    width,
                    height,
                    ccw_rotation,
                })
            }
            other => Err(FeatureError::unsupported(key, format!("hole_shape {other}"))),
        }
    }
}

fn ensure_smaller(
    key: &str,
    inner_name: &str,
    inner: f64,
    outer_name: &str,
    outer: f64,
) -> Result<(), FeatureError> {
    if inner < outer {
        Ok(())
    } else {
        Err(FeatureError::malformed(
            key,
            format!("{inner_name} ({inner}) must be smaller than {outer_name} ({outer})"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hole(value: serde_json::Value) -> PlatedHole {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_key_prefers_id() {
        let ph = hole(json!({"shape": "circle", "pcb_plated_hole_id": "H1"}));
        assert_eq!(ph.key(4), "ph-H1");
        let ph = hole(json!({"shape": "circle"}));
        assert_eq!(ph.key(4), "ph-4");
    }

    #[test]
    fn test_circle_requires_diameter() {
        let ph = hole(json!({"shape": "circle", "x": 0, "y": 0, "outer_diameter": 2.0}));
        assert_eq!(
            ph.shape("ph-0"),
            Err(FeatureError::missing("ph-0", "hole_diameter"))
        );
    }

    #[test]
    fn test_hole_must_be_smaller_than_pad() {
        let ph = hole(json!({
            "shape": "circle", "x": 0, "y": 0,
            "hole_diameter": 2.0, "outer_diameter": 2.0
        }));
        assert!(matches!(ph.shape("ph-0"), Err(FeatureError::MalformedGeometry { .. })));
    }

    #[test]
    fn test_pill_defaults_outer_size() {
        let ph = hole(json!({
            "shape": "oval", "x": 1, "y": 2,
            "hole_width": 1.0, "hole_height": 2.0
        }));
        match ph.shape("ph-0").unwrap() {
            PlatedHoleShape::Pill {
                outer_width,
                outer_height,
                ccw_rotation,
                ..
            } => {
                assert!((outer_width - 1.4).abs() < 1e-12);
                assert!((outer_height - 2.4).abs() < 1e-12);
                assert_eq!(ccw_rotation, 0.0);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_circular_rect_pad_defaults() {
        let ph = hole(json!({
            "shape": "circular_hole_with_rect_pad", "x": 0, "y": 0,
            "hole_diameter": 1.0, "hole_offset_x": 0.2, "rectBorderRadius": 0.1
        }));
        match ph.shape("ph-0").unwrap() {
            PlatedHoleShape::CircularHoleWithRectPad {
                pad_width,
                hole_offset,
                border_radius,
                ..
            } => {
                assert!((pad_width - 1.4).abs() < 1e-12);
                assert_eq!(hole_offset, Point::new(0.2, 0.0));
                assert_eq!(border_radius, Some(0.1));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_polygon_pad_needs_three_points() {
        let ph = hole(json!({
            "shape": "hole_with_polygon_pad", "x": 0, "y": 0,
            "hole_diameter": 0.5,
            "pad_outline": [{"x": 0, "y": 0}, {"x": 1, "y": 0}]
        }));
        assert!(matches!(ph.shape("ph-0"), Err(FeatureError::MalformedGeometry { .. })));
    }

    #[test]
    fn test_polygon_pad_rotated_pill() {
        let ph = hole(json!({
            "shape": "hole_with_polygon_pad", "x": 0, "y": 0,
            "hole_shape": "rotated_pill", "hole_width": 0.6, "hole_height": 1.0,
            "ccw_rotation": 30,
            "pad_outline": [{"x": -1, "y": -1}, {"x": 1, "y": -1}, {"x": 1, "y": 1}, {"x": -1, "y": 1}]
        }));
        match ph.shape("ph-0").unwrap() {
            PlatedHoleShape::HoleWithPolygonPad { hole, .. } => assert_eq!(
                hole,
                PolygonPadHole::Pill {
                    width: 0.6,
                    height: 1.0,
                    ccw_rotation: Some(30.0)
                }
            ),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_unknown_shape_is_unsupported() {
        let ph = hole(json!({"shape": "hexagon", "x": 0, "y": 0}));
        assert_eq!(ph.shape("ph-3"), Err(FeatureError::unsupported("ph-3", "hexagon")));

        let ph = hole(json!({
            "shape": "hole_with_polygon_pad", "x": 0, "y": 0, "hole_shape": "square",
            "pad_outline": [{"x": -1, "y": -1}, {"x": 1, "y": -1}, {"x": 1, "y": 1}]
        }));
        assert!(matches!(ph.shape("ph-0"), Err(FeatureError::UnsupportedVariant { .. })));
    }
}
