//! # boardmesh geometry
//!
//! Turns board-feature records into renderable CSG solids.
//!
//! ## Stages
//!
//! - **Kernel**: owned solid handles with scoped release and leak counting
//! - **Plated holes**: drills plus copper barrels and pads for five variants
//! - **SMT pads**: rect, rotated rect, circle and polygon pads on either face
//! - **Board**: substrate extrusion with drills removed, and the clip volume
//! - **Legend solids**: thin extrusions for silkscreen and fabrication paths
//! - **Export**: triangle buffers with per-feature keys and colours

pub mod board;
pub mod export;
pub mod kernel;
pub mod legend_solids;
pub mod pipeline;
pub mod plated_holes;
pub mod shapes;
pub mod smt_pads;

// Re-export commonly used items
pub use board::{clip_volume, material_color, substrate};
pub use export::ExportedMesh;
pub use kernel::{Bounds3, CsgKernel, KernelConfig, Solid};
pub use legend_solids::{legend_color, legend_polylines_solid, legend_z, process_legend_paths};
pub use pipeline::{build_board_geometry, BoardGeometry, GeometryOptions};
pub use plated_holes::{process_plated_holes, PlatedHoleOutput};
pub use smt_pads::{process_smt_pads, SmtPadOutput};
