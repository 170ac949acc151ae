//! Vector-font seam.
//!
//! Legend text is drawn from glyph outlines, not rasterised glyphs, so any
//! font source only has to turn a string into polylines. [`OutlineFont`]
//! does that with `rusttype` over a TrueType/OpenType face located through
//! `fontdb`.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use boardmesh_core::Point;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};

/// Line segments used to flatten one Bézier curve.
const CURVE_STEPS: usize = 8;

/// Source of glyph outlines.
pub trait VectorFont {
    /// Outlines of `text` with glyphs `glyph_height` tall, one polyline per
    /// contour. Coordinates are y-up with the baseline start at the origin.
    fn outlines(&self, text: &str, glyph_height: f64) -> Vec<Vec<Point>>;
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "system fonts loaded");
        db
    })
}

/// A scalable font whose glyph contours become polylines.
pub struct OutlineFont {
    font: Font<'static>,
}

impl std::fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl OutlineFont {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let bytes = fs::read(path.as_ref()).ok()?;
        Self::from_bytes(bytes)
    }

    /// Look up an installed face. An empty name or `"Monospace"` asks for
    /// the system monospace family.
    pub fn system(family: &str) -> Option<Self> {
        let families: Vec<Family<'_>> = match family.trim() {
            "" | "Monospace" => vec![Family::Monospace],
            "Sans" => vec![Family::SansSerif],
            "Serif" => vec![Family::Serif],
            other => vec![Family::Name(other)],
        };
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = db().query(&query)?;
        let face = db().face(id)?;
        let font = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                let bytes = fs::read(path).ok()?;
                Font::try_from_vec_and_index(bytes, face.index)
            }
            fontdb::Source::Binary(bytes) => {
                Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
            }
        }?;
        Some(Self { font })
    }

    /// Monospace face, else any sans-serif face.
    pub fn system_default() -> Option<Self> {
        let found = Self::system("Monospace").or_else(|| Self::system("Sans"));
        if found.is_none() {
            tracing::warn!("no usable system font found; legend text will be skipped");
        }
        found
    }
}

impl VectorFont for OutlineFont {
    fn outlines(&self, text: &str, glyph_height: f64) -> Vec<Vec<Point>> {
        let scale = Scale::uniform(glyph_height as f32);
        let mut builder = ContourBuilder::default();
        for glyph in self.font.layout(text, scale, rt_point(0.0, 0.0)) {
            glyph.build_outline(&mut builder);
            builder.flush();
        }
        builder.contours
    }
}

/// Collects glyph contours, flattening curves and flipping y to point up.
#[derive(Default)]
struct ContourBuilder {
    contours: Vec<Vec<Point>>,
    current: Vec<Point>,
    last: (f32, f32),
}

impl ContourBuilder {
    fn push(&mut self, x: f32, y: f32) {
        self.current.push(Point::new(x as f64, -(y as f64)));
        self.last = (x, y);
    }

    fn flush(&mut self) {
        let contour = std::mem::take(&mut self.current);
        if contour.len() >= 2 {
            self.contours.push(contour);
        }
    }
}

impl OutlineBuilder for ContourBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.flush();
        self.push(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.last;
        for i in 1..=CURVE_STEPS {
            let t = i as f32 / CURVE_STEPS as f32;
            let mt = 1.0 - t;
            self.push(
                mt * mt * x0 + 2.0 * mt * t * x1 + t * t * x,
                mt * mt * y0 + 2.0 * mt * t * y1 + t * t * y,
            );
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x0, y0) = self.last;
        for i in 1..=CURVE_STEPS {
            let t = i as f32 / CURVE_STEPS as f32;
            let mt = 1.0 - t;
            let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
            self.push(
                a * x0 + b * x1 + c * x2 + d * x,
                a * y0 + b * y1 + c * y2 + d * y,
            );
        }
    }

    fn close(&mut self) {
        if let Some(&first) = self.current.first() {
            if self.current.last() != Some(&first) {
                self.current.push(first);
            }
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_flips_y_and_closes() {
        let mut b = ContourBuilder::default();
        b.move_to(0.0, 0.0);
        b.line_to(1.0, 0.0);
        b.line_to(1.0, -1.0);
        b.close();
        assert_eq!(b.contours.len(), 1);
        let c = &b.contours[0];
        assert_eq!(c.len(), 4);
        assert_eq!(c[2], Point::new(1.0, 1.0));
        assert_eq!(c[3], c[0]);
    }

    #[test]
    fn test_quad_is_flattened() {
        let mut b = ContourBuilder::default();
        b.move_to(0.0, 0.0);
        b.quad_to(1.0, -2.0, 2.0, 0.0);
        b.flush();
        let c = &b.contours[0];
        assert_eq!(c.len(), 1 + CURVE_STEPS);
        assert_eq!(*c.last().unwrap(), Point::new(2.0, 0.0));
        assert!(c[CURVE_STEPS / 2].y > 0.9);
    }

    #[test]
    fn test_lone_move_is_dropped() {
        let mut b = ContourBuilder::default();
        b.move_to(0.0, 0.0);
        b.move_to(1.0, 1.0);
        b.line_to(2.0, 1.0);
        b.flush();
        assert_eq!(b.contours.len(), 1);
    }
}
