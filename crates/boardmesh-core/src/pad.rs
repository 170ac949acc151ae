//! Pad helpers shared by the SMT and plated-hole processors.

use crate::model::{Layer, SmtPad};

/// Pad rotation as seen from the pad's own layer; bottom-layer pads rotate
/// the other way.
pub fn pad_rotation_degrees(pad: &SmtPad) -> f64 {
    let rotation = pad.ccw_rotation.filter(|r| r.is_finite()).unwrap_or(0.0);
    rotation_for_layer(rotation, pad.layer())
}

pub fn pad_rotation_radians(pad: &SmtPad) -> f64 {
    pad_rotation_degrees(pad).to_radians()
}

pub fn rotation_for_layer(ccw_degrees: f64, layer: Layer) -> f64 {
    ccw_degrees * layer.sign()
}

/// Corner radius limited to half the smaller side. Missing, non-finite or
/// non-positive radii give a square corner.
pub fn clamp_border_radius(width: f64, height: f64, radius: Option<f64>) -> f64 {
    match radius {
        Some(r) if r.is_finite() && r > 0.0 => r.min(width.min(height) / 2.0).max(0.0),
        _ => 0.0,
    }
}
