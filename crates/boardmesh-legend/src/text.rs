//! Text outline generation for legend text.
//!
//! A string becomes a set of polylines around the origin: split where the
//! font emits merged contours, centred on their bounding box, shifted for
//! the requested alignment, then mirrored and rotated for the layer.

use boardmesh_core::{AnchorAlignment, Bounds2, Horizontal, Layer, LegendText, Point, Vertical};

use crate::font::VectorFont;

/// Glyph height as a fraction of the font size.
pub const GLYPH_HEIGHT_RATIO: f64 = 0.45;
pub const TEXT_STROKE_RATIO: f64 = 0.05;
pub const MIN_TEXT_STROKE: f64 = 0.01;

/// Split contours the vector font merges into one outline.
///
/// 29-point outlines come apart into points 0..15 and 14..29, 17-point
/// outlines into 0..10 and 9..17. Both halves share one point.
pub fn split_outline(outline: Vec<Point>) -> Vec<Vec<Point>> {
    match outline.len() {
        29 => vec![outline[0..15].to_vec(), outline[14..29].to_vec()],
        17 => vec![outline[0..10].to_vec(), outline[9..17].to_vec()],
        _ => vec![outline],
    }
}

pub fn text_stroke_width(font_size: f64) -> f64 {
    (font_size * TEXT_STROKE_RATIO).max(MIN_TEXT_STROKE)
}

/// Laid-out text, relative to its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOutlines {
    /// Polylines after mirroring and rotation, before the alignment offset.
    pub polylines: Vec<Vec<Point>>,
    /// Centre of the unrotated outline bounds; the mirror/rotation pivot.
    pub center: Point,
    /// Alignment offset added to every point.
    pub offset: Point,
    pub font_size: f64,
}

impl TextOutlines {
    /// Polylines in board coordinates for text anchored at `anchor`.
    pub fn placed(&self, anchor: Point) -> Vec<Vec<Point>> {
        let dx = self.offset.x + anchor.x;
        let dy = self.offset.y + anchor.y;
        self.polylines
            .iter()
            .map(|line| line.iter().map(|p| p.offset(dx, dy)).collect())
            .collect()
    }

    pub fn stroke_width(&self) -> f64 {
        text_stroke_width(self.font_size)
    }
}

/// Lay out `text`. Returns `None` when the font yields no outlines.
///
/// Unknown alignment strings read as centre. On the bottom layer the text
/// is mirrored about its own centre and the rotation sense is reversed,
/// which keeps it readable from the back.
pub fn layout_text(
    font: &dyn VectorFont,
    text: &str,
    font_size: f64,
    alignment: Option<&str>,
    rotation_degrees: f64,
    layer: Layer,
) -> Option<TextOutlines> {
    let polylines: Vec<Vec<Point>> = font
        .outlines(text, font_size * GLYPH_HEIGHT_RATIO)
        .into_iter()
        .flat_map(split_outline)
        .filter(|line| !line.is_empty())
        .collect();

    let all: Vec<Point> = polylines.iter().flatten().copied().collect();
    let bounds = Bounds2::of(&all)?;
    let center = bounds.center();

    let alignment = alignment
        .and_then(AnchorAlignment::parse)
        .unwrap_or_default();
    let offset_x = match alignment.horizontal() {
        Horizontal::Left => -bounds.min_x,
        Horizontal::Right => -bounds.max_x,
        Horizontal::Center => -center.x,
    };
    let offset_y = match alignment.vertical() {
        Vertical::Bottom => -bounds.min_y,
        Vertical::Top => -bounds.max_y,
        Vertical::Center => -center.y,
    };

    let (mirror, angle) = match layer {
        Layer::Top => (false, rotation_degrees),
        Layer::Bottom => (true, -rotation_degrees),
    };
    let (sin, cos) = angle.to_radians().sin_cos();
    let transform = |p: &Point| {
        let mut x = p.x - center.x;
        let y = p.y - center.y;
        if mirror {
            x = -x;
        }
        Point::new(
            center.x + x * cos - y * sin,
            center.y + x * sin + y * cos,
        )
    };

    let polylines = if mirror || angle != 0.0 {
        polylines
            .iter()
            .map(|line| line.iter().map(transform).collect())
            .collect()
    } else {
        polylines
    };

    Some(TextOutlines {
        polylines,
        center,
        offset: Point::new(offset_x, offset_y),
        font_size,
    })
}

/// Lay out a legend text record. Empty text yields `None`.
pub fn layout_legend_text(font: &dyn VectorFont, text: &LegendText) -> Option<TextOutlines> {
    let content = text.content()?;
    layout_text(
        font,
        content,
        text.font_size(),
        text.anchor_alignment.as_deref(),
        text.rotation_degrees(),
        text.layer(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One unit-wide box per character, `h` tall.
    struct BoxFont;

    impl VectorFont for BoxFont {
        fn outlines(&self, text: &str, h: f64) -> Vec<Vec<Point>> {
            text.chars()
                .enumerate()
                .map(|(i, _)| {
                    let x = i as f64 * h;
                    vec![
                        Point::new(x, 0.0),
                        Point::new(x + 0.5 * h, 0.0),
                        Point::new(x + 0.5 * h, h),
                        Point::new(x, h),
                        Point::new(x, 0.0),
                    ]
                })
                .collect()
        }
    }

    fn ring(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 0.0)).collect()
    }

    #[test]
    fn test_split_outline_counts() {
        let parts = split_outline(ring(29));
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 15);
        assert_eq!(parts[1].len(), 15);
        assert_eq!(parts[0][14], parts[1][0]);

        let parts = split_outline(ring(17));
        assert_eq!((parts[0].len(), parts[1].len()), (10, 8));
        assert_eq!(parts[0][9], parts[1][0]);

        assert_eq!(split_outline(ring(5)).len(), 1);
    }

    #[test]
    fn test_stroke_width_floor() {
        assert!((text_stroke_width(1.0) - 0.05).abs() < 1e-12);
        assert_eq!(text_stroke_width(0.1), MIN_TEXT_STROKE);
    }

    #[test]
    fn test_centered_layout() {
        let t = layout_text(&BoxFont, "AB", 1.0, None, 0.0, Layer::Top).unwrap();
        let placed = t.placed(Point::ORIGIN);
        let all: Vec<Point> = placed.iter().flatten().copied().collect();
        let b = Bounds2::of(&all).unwrap();
        assert!((b.center().x).abs() < 1e-12);
        assert!((b.center().y).abs() < 1e-12);
        assert!((b.height() - GLYPH_HEIGHT_RATIO).abs() < 1e-12);
    }

    #[test]
    fn test_alignment_offsets() {
        let t = layout_text(&BoxFont, "AB", 1.0, Some("top_right"), 0.0, Layer::Top).unwrap();
        let all: Vec<Point> = t.placed(Point::new(3.0, 4.0)).into_iter().flatten().collect();
        let b = Bounds2::of(&all).unwrap();
        assert!((b.max_x - 3.0).abs() < 1e-12);
        assert!((b.max_y - 4.0).abs() < 1e-12);

        let t = layout_text(&BoxFont, "AB", 1.0, Some("bottomLeft"), 0.0, Layer::Top).unwrap();
        let all: Vec<Point> = t.placed(Point::ORIGIN).into_iter().flatten().collect();
        let b = Bounds2::of(&all).unwrap();
        assert!(b.min_x.abs() < 1e-12 && b.min_y.abs() < 1e-12);
    }

    #[test]
    fn test_bottom_is_mirrored_top() {
        let top = layout_text(&BoxFont, "ABC", 1.2, Some("left"), 30.0, Layer::Top).unwrap();
        let bottom = layout_text(&BoxFont, "ABC", 1.2, Some("left"), 30.0, Layer::Bottom).unwrap();
        assert_eq!(top.offset, bottom.offset);
        for (lt, lb) in top.polylines.iter().zip(&bottom.polylines) {
            for (pt, pb) in lt.iter().zip(lb) {
                assert!((pb.x - (2.0 * top.center.x - pt.x)).abs() < 1e-9);
                assert!((pb.y - pt.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let t = layout_text(&BoxFont, "A", 2.0, None, 90.0, Layer::Top).unwrap();
        let all: Vec<Point> = t.polylines.iter().flatten().copied().collect();
        let b = Bounds2::of(&all).unwrap();
        // 0.45 wide, 0.9 tall box turned on its side.
        assert!((b.width() - 0.9).abs() < 1e-9);
        assert!((b.height() - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_record() {
        let text = LegendText::default();
        assert!(layout_legend_text(&BoxFont, &text).is_none());
    }
}
