use serde::{Deserialize, Serialize};

use super::{number_or, Layer, NumberLike, Point, RawPoint};
use crate::constants::{DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH};

/// Which family of printed markings a legend record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegendClass {
    Silkscreen,
    FabricationNote,
}

impl LegendClass {
    pub fn as_str(self) -> &'static str {
        match self {
            LegendClass::Silkscreen => "silkscreen",
            LegendClass::FabricationNote => "fabrication_note",
        }
    }
}

/// Silkscreen or fabrication-note text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendText {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub font_size: Option<NumberLike>,
    #[serde(default)]
    pub anchor_position: Option<RawPoint>,
    #[serde(default)]
    pub anchor_alignment: Option<String>,
    #[serde(default)]
    pub layer: Option<String>,
    #[serde(default)]
    pub ccw_rotation: Option<NumberLike>,
    #[serde(default)]
    pub rotation: Option<NumberLike>,
    #[serde(default)]
    pub pcb_component_id: Option<String>,
}

impl LegendText {
    pub fn layer(&self) -> Layer {
        Layer::from_raw(self.layer.as_deref())
    }

    /// Text content, `None` when absent or empty.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Font size; zero or unparsable falls back to the default.
    pub fn font_size(&self) -> f64 {
        let size = number_or(&self.font_size, DEFAULT_FONT_SIZE);
        if size > 0.0 {
            size
        } else {
            DEFAULT_FONT_SIZE
        }
    }

    /// `ccw_rotation`, then `rotation`, in degrees.
    pub fn rotation_degrees(&self) -> f64 {
        self.ccw_rotation
            .as_ref()
            .and_then(NumberLike::value)
            .or_else(|| self.rotation.as_ref().and_then(NumberLike::value))
            .unwrap_or(0.0)
    }

    /// Explicit anchor, if both coordinates parse.
    pub fn explicit_anchor(&self) -> Option<Point> {
        self.anchor_position.as_ref().and_then(RawPoint::finite)
    }
}

/// Silkscreen or fabrication-note polyline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LegendPath {
    #[serde(default)]
    pub route: Vec<RawPoint>,
    #[serde(default)]
    pub stroke_width: Option<NumberLike>,
    #[serde(default)]
    pub layer: Option<String>,
}

impl LegendPath {
    pub fn layer(&self) -> Layer {
        Layer::from_raw(self.layer.as_deref())
    }

    pub fn stroke_width(&self) -> f64 {
        let width = number_or(&self.stroke_width, DEFAULT_STROKE_WIDTH);
        if width > 0.0 {
            width
        } else {
            DEFAULT_STROKE_WIDTH
        }
    }

    /// Route points with unparsable coordinates read as zero.
    pub fn points(&self) -> Vec<Point> {
        self.route.iter().map(RawPoint::or_zero).collect()
    }

    /// A path needs two points to draw anything.
    pub fn is_drawable(&self) -> bool {
        self.route.len() >= 2
    }
}

/// The subset of `pcb_component` needed to place legend text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub pcb_component_id: String,
    #[serde(default)]
    pub center: Option<Point>,
}
