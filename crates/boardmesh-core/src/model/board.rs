use serde::{Deserialize, Serialize};

use super::{Point, RawPoint};

/// Substrate material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardMaterial {
    #[default]
    Fr4,
    Fr1,
}

impl BoardMaterial {
    /// Unknown materials render as FR-4.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "fr1" => BoardMaterial::Fr1,
            _ => BoardMaterial::Fr4,
        }
    }
}

/// Anchor block nested under `auto_size_config`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardAnchor {
    #[serde(default)]
    pub position: Option<RawPoint>,
    #[serde(default)]
    pub alignment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AutoSizeConfig {
    #[serde(default)]
    pub board_anchor: Option<BoardAnchor>,
    #[serde(default)]
    pub board_anchor_position: Option<RawPoint>,
    #[serde(default)]
    pub board_anchor_alignment: Option<String>,
    #[serde(default)]
    pub anchor_position: Option<RawPoint>,
    #[serde(default)]
    pub anchor_alignment: Option<String>,
}

/// A `pcb_board` record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub pcb_board_id: Option<String>,
    #[serde(default)]
    pub center: Option<RawPoint>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub thickness: Option<f64>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub outline: Option<Vec<Point>>,
    #[serde(default)]
    pub anchor_position: Option<RawPoint>,
    #[serde(default)]
    pub anchor_alignment: Option<String>,
    #[serde(default)]
    pub board_anchor_position: Option<RawPoint>,
    #[serde(default)]
    pub board_anchor_alignment: Option<String>,
    #[serde(default)]
    pub auto_size_config: Option<AutoSizeConfig>,
}

impl Board {
    /// A centred rectangular board, mostly for tests and callers building
    /// records in code.
    pub fn rectangle(center: Point, width: f64, height: f64) -> Self {
        Self {
            center: Some(center.into()),
            width: Some(width),
            height: Some(height),
            ..Default::default()
        }
    }

    pub fn material(&self) -> BoardMaterial {
        BoardMaterial::from_raw(self.material.as_deref())
    }

    /// Outline with at least three finite points.
    pub fn usable_outline(&self) -> Option<&[Point]> {
        self.outline
            .as_deref()
            .filter(|o| o.len() >= 3 && o.iter().all(Point::is_finite))
    }

    pub fn stated_center(&self) -> Option<Point> {
        self.center.as_ref().and_then(RawPoint::finite)
    }

    /// Width and height when both are finite and positive.
    pub fn stated_size(&self) -> Option<(f64, f64)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 => {
                Some((w, h))
            }
            _ => None,
        }
    }
}
