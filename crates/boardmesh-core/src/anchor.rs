//! Board anchor and alignment resolution.
//!
//! Boards may state their placement through several historical fields. All
//! of them go through one ordered candidate list and one alias table here.

use std::fmt;

use crate::constants::{ALIGNMENT_TOLERANCE, DEFAULT_BOARD_THICKNESS};
use crate::error::FeatureError;
use crate::model::{Board, BoardMaterial, Point, RawPoint};
use crate::polygon::Bounds2;

/// Which part of a box sits on its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorAlignment {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Horizontal component of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Vertical component of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

const ALIASES: &[(&str, AnchorAlignment)] = {
    use AnchorAlignment::*;
    &[
        ("center", Center),
        ("centre", Center),
        ("middle", Center),
        ("center_center", Center),
        ("center_middle", Center),
        ("middle_center", Center),
        ("middle_middle", Center),
        ("top", Top),
        ("top_center", Top),
        ("center_top", Top),
        ("top_middle", Top),
        ("middle_top", Top),
        ("bottom", Bottom),
        ("bottom_center", Bottom),
        ("center_bottom", Bottom),
        ("bottom_middle", Bottom),
        ("middle_bottom", Bottom),
        ("left", Left),
        ("left_center", Left),
        ("center_left", Left),
        ("left_middle", Left),
        ("middle_left", Left),
        ("right", Right),
        ("right_center", Right),
        ("center_right", Right),
        ("right_middle", Right),
        ("middle_right", Right),
        ("top_left", TopLeft),
        ("left_top", TopLeft),
        ("topleft", TopLeft),
        ("lefttop", TopLeft),
        ("top_center_left", TopLeft),
        ("top_right", TopRight),
        ("right_top", TopRight),
        ("topright", TopRight),
        ("righttop", TopRight),
        ("top_center_right", TopRight),
        ("bottom_left", BottomLeft),
        ("left_bottom", BottomLeft),
        ("bottomleft", BottomLeft),
        ("leftbottom", BottomLeft),
        ("bottom_center_left", BottomLeft),
        ("bottom_right", BottomRight),
        ("right_bottom", BottomRight),
        ("bottomright", BottomRight),
        ("rightbottom", BottomRight),
        ("bottom_center_right", BottomRight),
    ]
};

impl AnchorAlignment {
    /// Parse any spelling found in board records: `top-right`, `top_right`,
    /// `topRight`, `TOP RIGHT`, `right-top`, `top-right-center`...
    pub fn parse(raw: &str) -> Option<Self> {
        let token = canonical_token(raw);
        if token.is_empty() {
            return None;
        }
        if let Some(found) = lookup(&token) {
            return Some(found);
        }
        let mut simplified = token.as_str();
        for modifier in ["_center", "_middle", "_centre"] {
            simplified = simplified.strip_suffix(modifier).unwrap_or(simplified);
        }
        for modifier in ["center_", "middle_", "centre_"] {
            simplified = simplified.strip_prefix(modifier).unwrap_or(simplified);
        }
        lookup(simplified)
    }

    /// Canonical tag, e.g. `top_right`.
    pub fn as_str(self) -> &'static str {
        match self {
            AnchorAlignment::Center => "center",
            AnchorAlignment::Top => "top",
            AnchorAlignment::Bottom => "bottom",
            AnchorAlignment::Left => "left",
            AnchorAlignment::Right => "right",
            AnchorAlignment::TopLeft => "top_left",
            AnchorAlignment::TopRight => "top_right",
            AnchorAlignment::BottomLeft => "bottom_left",
            AnchorAlignment::BottomRight => "bottom_right",
        }
    }

    pub fn horizontal(self) -> Horizontal {
        match self {
            AnchorAlignment::Left | AnchorAlignment::TopLeft | AnchorAlignment::BottomLeft => {
                Horizontal::Left
            }
            AnchorAlignment::Right | AnchorAlignment::TopRight | AnchorAlignment::BottomRight => {
                Horizontal::Right
            }
            _ => Horizontal::Center,
        }
    }

    pub fn vertical(self) -> Vertical {
        match self {
            AnchorAlignment::Top | AnchorAlignment::TopLeft | AnchorAlignment::TopRight => {
                Vertical::Top
            }
            AnchorAlignment::Bottom
            | AnchorAlignment::BottomLeft
            | AnchorAlignment::BottomRight => Vertical::Bottom,
            _ => Vertical::Center,
        }
    }

    pub fn from_components(h: Horizontal, v: Vertical) -> Self {
        match (v, h) {
            (Vertical::Center, Horizontal::Center) => AnchorAlignment::Center,
            (Vertical::Top, Horizontal::Center) => AnchorAlignment::Top,
            (Vertical::Bottom, Horizontal::Center) => AnchorAlignment::Bottom,
            (Vertical::Center, Horizontal::Left) => AnchorAlignment::Left,
            (Vertical::Center, Horizontal::Right) => AnchorAlignment::Right,
            (Vertical::Top, Horizontal::Left) => AnchorAlignment::TopLeft,
            (Vertical::Top, Horizontal::Right) => AnchorAlignment::TopRight,
            (Vertical::Bottom, Horizontal::Left) => AnchorAlignment::BottomLeft,
            (Vertical::Bottom, Horizontal::Right) => AnchorAlignment::BottomRight,
        }
    }
}

impl fmt::Display for AnchorAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lookup(token: &str) -> Option<AnchorAlignment> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, alignment)| *alignment)
}

/// Lowercase, split camelCase words, collapse `-`, `_` and whitespace runs
/// into a single `_`.
fn canonical_token(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.extend(ch.to_lowercase());
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

/// Explicit anchor candidates, richest first. The board centre is not one
/// of them.
fn explicit_anchor_candidates(board: &Board) -> [Option<&RawPoint>; 5] {
    let cfg = board.auto_size_config.as_ref();
    [
        cfg.and_then(|c| c.board_anchor.as_ref())
            .and_then(|a| a.position.as_ref()),
        cfg.and_then(|c| c.board_anchor_position.as_ref()),
        cfg.and_then(|c| c.anchor_position.as_ref()),
        board.board_anchor_position.as_ref(),
        board.anchor_position.as_ref(),
    ]
}

fn alignment_candidates(board: &Board) -> [Option<&str>; 5] {
    let cfg = board.auto_size_config.as_ref();
    [
        cfg.and_then(|c| c.board_anchor.as_ref())
            .and_then(|a| a.alignment.as_deref()),
        cfg.and_then(|c| c.board_anchor_alignment.as_deref()),
        cfg.and_then(|c| c.anchor_alignment.as_deref()),
        board.board_anchor_alignment.as_deref(),
        board.anchor_alignment.as_deref(),
    ]
}

/// First explicitly configured anchor point.
pub fn explicit_anchor(board: &Board) -> Option<Point> {
    explicit_anchor_candidates(board)
        .into_iter()
        .flatten()
        .find_map(RawPoint::finite)
}

/// First explicitly configured alignment that parses.
pub fn explicit_alignment(board: &Board) -> Option<AnchorAlignment> {
    alignment_candidates(board)
        .into_iter()
        .flatten()
        .find_map(AnchorAlignment::parse)
}

/// The board's anchor point: explicit anchors, then the centre, then the
/// origin.
pub fn board_anchor_position(board: &Board) -> Point {
    explicit_anchor(board)
        .or_else(|| board.stated_center())
        .unwrap_or(Point::ORIGIN)
}

/// The board's anchor alignment: explicit tag, then inferred from the
/// centre/anchor offset, then centre.
pub fn board_anchor_alignment(board: &Board) -> AnchorAlignment {
    if let Some(alignment) = explicit_alignment(board) {
        return alignment;
    }
    let anchor = board_anchor_position(board);
    match (board.stated_center(), board.stated_size()) {
        (Some(center), Some((w, h))) => {
            infer_alignment(center, anchor, w, h).unwrap_or_default()
        }
        _ => AnchorAlignment::Center,
    }
}

/// Infer the alignment that would place a `width`×`height` box centred on
/// `center` with `anchor` as its reference point. Both components must
/// match within tolerance.
pub fn infer_alignment(
    center: Point,
    anchor: Point,
    width: f64,
    height: f64,
) -> Option<AnchorAlignment> {
    let (half_w, half_h) = (width / 2.0, height / 2.0);
    if !half_w.is_finite() || !half_h.is_finite() {
        return None;
    }
    let close = |a: f64, b: f64| (a - b).abs() <= ALIGNMENT_TOLERANCE;
    let dx = center.x - anchor.x;
    let dy = center.y - anchor.y;

    let horizontal = if close(dx, 0.0) {
        Horizontal::Center
    } else if close(dx, half_w) {
        Horizontal::Left
    } else if close(dx, -half_w) {
        Horizontal::Right
    } else {
        return None;
    };
    let vertical = if close(dy, 0.0) {
        Vertical::Center
    } else if close(dy, half_h) {
        Vertical::Bottom
    } else if close(dy, -half_h) {
        Vertical::Top
    } else {
        return None;
    };
    Some(AnchorAlignment::from_components(horizontal, vertical))
}

/// Centre of a `width`×`height` box whose `alignment` point sits on
/// `anchor`.
pub fn center_from_anchor(
    anchor: Point,
    alignment: AnchorAlignment,
    width: f64,
    height: f64,
) -> Point {
    let dx = match alignment.horizontal() {
        Horizontal::Left => width / 2.0,
        Horizontal::Center => 0.0,
        Horizontal::Right => -width / 2.0,
    };
    let dy = match alignment.vertical() {
        Vertical::Bottom => height / 2.0,
        Vertical::Center => 0.0,
        Vertical::Top => -height / 2.0,
    };
    anchor.offset(dx, dy)
}

/// Resolved board placement used by every downstream stage.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardFrame {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    /// Counter-clockwise outline when the board has one.
    pub outline: Option<Vec<Point>>,
    pub material: BoardMaterial,
}

impl BoardFrame {
    /// Resolve dimensions and centre. An outline is authoritative; without
    /// one the board needs a positive width and height.
    pub fn resolve(board: &Board, default_thickness: f64) -> Result<Self, FeatureError> {
        let thickness = board
            .thickness
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(if default_thickness > 0.0 {
                default_thickness
            } else {
                DEFAULT_BOARD_THICKNESS
            });

        if let Some(outline) = board.usable_outline() {
            if let Some(bounds) = Bounds2::of(outline) {
                if bounds.width() > 0.0 && bounds.height() > 0.0 {
                    return Ok(Self {
                        center: bounds.center(),
                        width: bounds.width(),
                        height: bounds.height(),
                        thickness,
                        outline: Some(crate::polygon::ensure_ccw(outline.to_vec())),
                        material: board.material(),
                    });
                }
            }
            tracing::debug!("board outline is degenerate, falling back to width/height");
        }

        let (width, height) = match board.stated_size() {
            Some(size) => size,
            None if board.width.is_none() => return Err(FeatureError::missing("board", "width")),
            None if board.height.is_none() => {
                return Err(FeatureError::missing("board", "height"))
            }
            None => {
                return Err(FeatureError::malformed(
                    "board",
                    "width and height must be finite and positive",
                ))
            }
        };

        let center = match (explicit_anchor(board), explicit_alignment(board)) {
            (Some(anchor), Some(alignment)) => center_from_anchor(anchor, alignment, width, height),
            _ => board.stated_center().unwrap_or(Point::ORIGIN),
        };

        Ok(Self {
            center,
            width,
            height,
            thickness,
            outline: None,
            material: board.material(),
        })
    }

    pub fn bounds(&self) -> Bounds2 {
        Bounds2 {
            min_x: self.center.x - self.width / 2.0,
            min_y: self.center.y - self.height / 2.0,
            max_x: self.center.x + self.width / 2.0,
            max_y: self.center.y + self.height / 2.0,
        }
    }
}
