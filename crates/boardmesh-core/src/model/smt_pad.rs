use serde::{Deserialize, Serialize};

use super::{optional_finite, require_outline, require_positive, CornerRadius, Layer, Point};
use crate::error::FeatureError;

/// A `pcb_smtpad` record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SmtPad {
    #[serde(default)]
    pub pcb_smtpad_id: Option<String>,
    pub shape: String,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub radius: Option<f64>,
    #[serde(default)]
    pub ccw_rotation: Option<f64>,
    #[serde(default)]
    pub points: Option<Vec<Point>>,
    #[serde(flatten)]
    pub corner: CornerRadius,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SmtPadShape {
    Rect {
        width: f64,
        height: f64,
        border_radius: Option<f64>,
    },
    RotatedRect {
        width: f64,
        height: f64,
        border_radius: Option<f64>,
        ccw_rotation: f64,
    },
    Circle {
        radius: f64,
    },
    /// Points are absolute board coordinates.
    Polygon {
        points: Vec<Point>,
    },
}

impl SmtPad {
    pub fn layer(&self) -> Layer {
        Layer::from_raw(self.layer.as_deref())
    }

    /// Stable mesh key, `smt_pad-<layer>-<id|index>`.
    pub fn key(&self, index: usize) -> String {
        match self.pcb_smtpad_id.as_deref() {
            Some(id) if !id.is_empty() => format!("smt_pad-{}-{id}", self.layer()),
            _ => format!("smt_pad-{}-{index}", self.layer()),
        }
    }

    /// Pad origin; missing coordinates default to zero.
    pub fn position(&self) -> Point {
        let finite_or_zero = |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(0.0);
        Point::new(finite_or_zero(self.x), finite_or_zero(self.y))
    }

    pub fn shape(&self, key: &str) -> Result<SmtPadShape, FeatureError> {
        let shape = match self.shape.as_str() {
            "rect" => SmtPadShape::Rect {
                width: require_positive(self.width, key, "width")?,
                height: require_positive(self.height, key, "height")?,
                border_radius: self.corner.value(),
            },
            "rotated_rect" => SmtPadShape::RotatedRect {
                width: require_positive(self.width, key, "width")?,
                height: require_positive(self.height, key, "height")?,
                border_radius: self.corner.value(),
                ccw_rotation: optional_finite(self.ccw_rotation, key, "ccw_rotation")?
                    .unwrap_or(0.0),
            },
            "circle" => SmtPadShape::Circle {
                radius: require_positive(self.radius, key, "radius")?,
            },
            "polygon" => SmtPadShape::Polygon {
                points: require_outline(self.points.as_deref(), key, "points")?,
            },
            other => return Err(FeatureError::unsupported(key, other)),
        };
        Ok(shape)
    }
}
