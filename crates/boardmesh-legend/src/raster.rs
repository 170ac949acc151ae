//! Legend rasterizer.
//!
//! Each (layer, class) pair with at least one path or text record becomes
//! one RGBA image covering the board. Pixel (0, 0) is the board's top-left
//! corner seen from the top; bottom-layer canvases are flipped vertically
//! so they read correctly when viewed from below.

use std::collections::HashMap;
use std::path::Path;

use boardmesh_core::{
    BoardDocument, BoardFrame, Diagnostic, FeatureError, Layer, LegendClass, LegendPath,
    LegendText, Point,
};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::LegendError;
use crate::font::VectorFont;
use crate::text::layout_legend_text;

/// Pixels per millimetre.
pub const DEFAULT_TEXTURE_RESOLUTION: f64 = 150.0;

/// Pixel ceiling per canvas (64 Mpx, 256 MiB of RGBA).
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 1 << 26;

/// Raster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub resolution: f64,
    /// Larger boards are rendered at a lower resolution to stay under this.
    pub max_canvas_pixels: u64,
    pub silkscreen_color: [u8; 4],
    pub fabrication_note_color: [u8; 4],
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_TEXTURE_RESOLUTION,
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            silkscreen_color: [255, 255, 255, 255],
            fabrication_note_color: [255, 204, 51, 255],
        }
    }
}

impl RasterConfig {
    pub fn color(&self, class: LegendClass) -> [u8; 4] {
        match class {
            LegendClass::Silkscreen => self.silkscreen_color,
            LegendClass::FabricationNote => self.fabrication_note_color,
        }
    }

    /// Configured resolution, lowered until a `width` x `height` mm canvas
    /// fits in `max_canvas_pixels`.
    pub fn effective_resolution(&self, width: f64, height: f64) -> f64 {
        let pixels = |res: f64| {
            u64::from(canvas_dimension(width, res)) * u64::from(canvas_dimension(height, res))
        };
        let max = self.max_canvas_pixels.max(1);
        let mut resolution = self.resolution;
        if pixels(resolution) <= max {
            return resolution;
        }
        resolution *= (max as f64 / pixels(resolution) as f64).sqrt();
        // Rounding up a dimension can still overshoot by a row or column.
        while resolution > 0.0 && pixels(resolution) > max {
            resolution *= 0.99;
        }
        tracing::warn!(
            requested = self.resolution,
            resolution,
            max_pixels = max,
            "board too large for the legend canvas; resolution lowered"
        );
        resolution
    }
}

/// Rasters for every populated (layer, class) pair, plus the pairs that
/// could not be rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderedLegends {
    pub rasters: Vec<LegendRaster>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One rendered legend layer.
#[derive(Debug, Clone)]
pub struct LegendRaster {
    pub layer: Layer,
    pub class: LegendClass,
    pub image: RgbaImage,
}

impl LegendRaster {
    /// e.g. `silkscreen_top.png`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.png", self.class.as_str(), self.layer)
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), LegendError> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Board-to-canvas mapping for one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasMapping {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub resolution: f64,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub layer: Layer,
}

/// `ceil(mm × resolution)`, at least one pixel.
pub fn canvas_dimension(mm: f64, resolution: f64) -> u32 {
    let px = (mm * resolution).ceil();
    if px.is_finite() && px >= 1.0 {
        px.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

impl CanvasMapping {
    pub fn new(frame: &BoardFrame, resolution: f64, layer: Layer) -> Self {
        Self {
            center: frame.center,
            width: frame.width,
            height: frame.height,
            resolution,
            pixel_width: canvas_dimension(frame.width, resolution),
            pixel_height: canvas_dimension(frame.height, resolution),
            layer,
        }
    }

    /// Canvas coordinates of a board point, before the layer flip.
    pub fn to_canvas(&self, p: Point) -> (f32, f32) {
        let x = (p.x - self.center.x + self.width / 2.0) * self.resolution;
        let y = (-(p.y - self.center.y) + self.height / 2.0) * self.resolution;
        (x as f32, y as f32)
    }

    /// Vertical flip for the bottom layer.
    pub fn transform(&self) -> Transform {
        match self.layer {
            Layer::Top => Transform::identity(),
            Layer::Bottom => {
                Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, self.pixel_height as f32)
            }
        }
    }
}

/// Where legend text without an explicit anchor goes.
#[derive(Debug, Clone, Default)]
pub struct TextAnchors {
    components: HashMap<String, Point>,
    board_center: Point,
}

impl TextAnchors {
    pub fn new(doc: &BoardDocument, board_center: Point) -> Self {
        let components = doc
            .components()
            .filter_map(|c| {
                let center = c.center.filter(Point::is_finite)?;
                Some((c.pcb_component_id.clone(), center))
            })
            .collect();
        Self {
            components,
            board_center,
        }
    }

    /// Explicit anchor, then the owning component's centre, then the board
    /// centre.
    pub fn resolve(&self, text: &LegendText) -> Point {
        text.explicit_anchor()
            .or_else(|| {
                text.pcb_component_id
                    .as_ref()
                    .and_then(|id| self.components.get(id).copied())
            })
            .unwrap_or(self.board_center)
    }
}

fn stroke_polyline(
    pixmap: &mut Pixmap,
    mapping: &CanvasMapping,
    points: &[Point],
    paint: &Paint,
    stroke: &Stroke,
) {
    let mut pb = PathBuilder::new();
    for (i, p) in points.iter().enumerate() {
        let (x, y) = mapping.to_canvas(*p);
        if i == 0 {
            pb.move_to(x, y);
        } else {
            pb.line_to(x, y);
        }
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, mapping.transform(), None);
    }
}

/// Draw paths and texts of one class onto a fresh canvas.
pub fn render_layer(
    mapping: &CanvasMapping,
    paths: &[&LegendPath],
    texts: &[&LegendText],
    font: Option<&dyn VectorFont>,
    anchors: &TextAnchors,
    color: [u8; 4],
) -> Result<RgbaImage, LegendError> {
    let (width, height) = (mapping.pixel_width, mapping.pixel_height);
    let mut pixmap = Pixmap::new(width, height).ok_or(LegendError::Canvas { width, height })?;

    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = true;

    for path in paths.iter().filter(|p| p.is_drawable()) {
        let stroke = Stroke {
            width: (path.stroke_width() * mapping.resolution) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        stroke_polyline(&mut pixmap, mapping, &path.points(), &paint, &stroke);
    }

    match font {
        Some(font) => {
            for text in texts {
                let Some(outlines) = layout_legend_text(font, text) else {
                    continue;
                };
                let stroke = Stroke {
                    width: (outlines.stroke_width() * mapping.resolution) as f32,
                    line_cap: LineCap::Butt,
                    line_join: LineJoin::Miter,
                    ..Default::default()
                };
                for line in outlines.placed(anchors.resolve(text)) {
                    stroke_polyline(&mut pixmap, mapping, &line, &paint, &stroke);
                }
            }
        }
        None if !texts.is_empty() => {
            tracing::warn!(count = texts.len(), "no font available; legend text skipped");
        }
        None => {}
    }

    let pixels = pixmap.pixels();
    Ok(RgbaImage::from_fn(width, height, |x, y| {
        let c = pixels[(y * width + x) as usize].demultiply();
        Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    }))
}

/// Render every non-empty (layer, class) pair of the document.
///
/// A pair whose canvas cannot be rendered is reported as a diagnostic keyed
/// `<class>_<layer>`; the other pairs are still rendered.
pub fn render_legends(
    doc: &BoardDocument,
    frame: &BoardFrame,
    font: Option<&dyn VectorFont>,
    config: &RasterConfig,
) -> RenderedLegends {
    let anchors = TextAnchors::new(doc, frame.center);
    let resolution = config.effective_resolution(frame.width, frame.height);
    let mut out = RenderedLegends::default();

    for class in [LegendClass::Silkscreen, LegendClass::FabricationNote] {
        let (all_paths, all_texts): (Vec<&LegendPath>, Vec<&LegendText>) = match class {
            LegendClass::Silkscreen => (
                doc.silkscreen_paths().collect(),
                doc.silkscreen_texts().collect(),
            ),
            LegendClass::FabricationNote => (
                doc.fabrication_note_paths().collect(),
                doc.fabrication_note_texts().collect(),
            ),
        };

        for layer in [Layer::Top, Layer::Bottom] {
            let paths: Vec<&LegendPath> = all_paths
                .iter()
                .copied()
                .filter(|p| p.layer() == layer)
                .collect();
            let texts: Vec<&LegendText> = all_texts
                .iter()
                .copied()
                .filter(|t| t.layer() == layer)
                .collect();
            if paths.is_empty() && texts.is_empty() {
                continue;
            }

            let mapping = CanvasMapping::new(frame, resolution, layer);
            let rendered = render_layer(
                &mapping,
                &paths,
                &texts,
                font,
                &anchors,
                config.color(class),
            );
            let image = match rendered {
                Ok(image) => image,
                Err(e) => {
                    let key = format!("{}_{}", class.as_str(), layer);
                    out.diagnostics.push(Diagnostic::skipped(
                        "legend",
                        FeatureError::malformed(key, e.to_string()),
                    ));
                    continue;
                }
            };
            tracing::debug!(
                class = class.as_str(),
                %layer,
                width = image.width(),
                height = image.height(),
                "legend raster rendered"
            );
            out.rasters.push(LegendRaster {
                layer,
                class,
                image,
            });
        }
    }
    out
}
