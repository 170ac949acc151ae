//! Build configuration
//!
//! One JSON file tunes the whole pipeline. Missing keys take their
//! defaults, so `{}` is a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use boardmesh_core::constants::{
    DEFAULT_BOARD_THICKNESS, RECT_PAD_SEGMENTS, SMOOTH_CIRCLE_SEGMENTS,
};
use boardmesh_geometry::{GeometryOptions, KernelConfig};
use boardmesh_legend::{RasterConfig, DEFAULT_MAX_CANVAS_PIXELS, DEFAULT_TEXTURE_RESOLUTION};
use serde::{Deserialize, Serialize};

/// Settings for one board build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Legend raster pixels per millimetre
    pub texture_resolution: f64,
    /// Pixel ceiling per legend canvas; larger boards get a lower resolution
    pub max_texture_pixels: u64,
    /// Board thickness when the board record has none (mm)
    pub default_board_thickness: f64,
    pub circle_segments: usize,
    pub rect_corner_segments: usize,
    /// Also build 3D solids for legend paths and text
    pub emit_legend_solids: bool,
    /// Intersect copper with the board volume
    pub clip_to_board: bool,
    pub silkscreen_color: [u8; 4],
    pub fabrication_note_color: [u8; 4],
    /// Font file for legend text; the system font is used when unset
    pub font_path: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let raster = RasterConfig::default();
        Self {
            texture_resolution: DEFAULT_TEXTURE_RESOLUTION,
            max_texture_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            default_board_thickness: DEFAULT_BOARD_THICKNESS,
            circle_segments: SMOOTH_CIRCLE_SEGMENTS,
            rect_corner_segments: RECT_PAD_SEGMENTS,
            emit_legend_solids: false,
            clip_to_board: true,
            silkscreen_color: raster.silkscreen_color,
            fabrication_note_color: raster.fabrication_note_color,
            font_path: None,
        }
    }
}

impl BuildConfig {
    /// Load and validate a JSON config file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.texture_resolution.is_finite() && self.texture_resolution > 0.0) {
            bail!("texture_resolution must be > 0");
        }
        if self.max_texture_pixels == 0 {
            bail!("max_texture_pixels must be > 0");
        }
        if !(self.default_board_thickness.is_finite() && self.default_board_thickness > 0.0) {
            bail!("default_board_thickness must be > 0");
        }
        if self.circle_segments < 3 || self.rect_corner_segments < 3 {
            bail!("circle_segments and rect_corner_segments must be at least 3");
        }
        Ok(())
    }

    pub fn kernel(&self) -> KernelConfig {
        KernelConfig {
            circle_segments: self.circle_segments,
            rect_corner_segments: self.rect_corner_segments,
        }
    }

    pub fn geometry(&self) -> GeometryOptions {
        GeometryOptions {
            default_board_thickness: self.default_board_thickness,
            clip_to_board: self.clip_to_board,
            emit_legend_solids: self.emit_legend_solids,
        }
    }

    pub fn raster(&self) -> RasterConfig {
        RasterConfig {
            resolution: self.texture_resolution,
            max_canvas_pixels: self.max_texture_pixels,
            silkscreen_color: self.silkscreen_color,
            fabrication_note_color: self.fabrication_note_color,
        }
    }
}
