//! Boolean composition and clipping for a whole board.
//!
//! Stage order: board frame and clip volume, plated holes (drills and
//! copper), SMT pads (minus plated-hole copper), substrate (minus drills),
//! then optional legend solids. Every intermediate solid is released before
//! [`build_board_geometry`] returns.

use boardmesh_core::constants::{colors, DEFAULT_BOARD_THICKNESS};
use boardmesh_core::{BoardDocument, BoardFrame, Diagnostic, LegendClass};
use serde::{Deserialize, Serialize};

use crate::board::{clip_volume, material_color, substrate};
use crate::export::ExportedMesh;
use crate::kernel::CsgKernel;
use crate::legend_solids::process_legend_paths;
use crate::plated_holes::process_plated_holes;
use crate::smt_pads::process_smt_pads;

/// Pipeline switches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryOptions {
    /// Used when the board record has no usable thickness.
    pub default_board_thickness: f64,
    /// Intersect copper with the board volume.
    pub clip_to_board: bool,
    /// Also build solids for legend paths.
    pub emit_legend_solids: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            default_board_thickness: DEFAULT_BOARD_THICKNESS,
            clip_to_board: true,
            emit_legend_solids: false,
        }
    }
}

/// Finished geometry for one board.
#[derive(Debug, Clone, Default)]
pub struct BoardGeometry {
    /// Resolved placement, `None` without a usable board record.
    pub frame: Option<BoardFrame>,
    /// Substrate, copper and legend meshes.
    pub meshes: Vec<ExportedMesh>,
    /// Drill solids, keyed `drill-<n>`.
    pub drills: Vec<ExportedMesh>,
    /// Features that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl BoardGeometry {
    pub fn mesh(&self, key: &str) -> Option<&ExportedMesh> {
        self.meshes.iter().find(|m| m.key == key)
    }

    /// Board thickness the meshes were built for; `fallback` without a
    /// frame.
    pub fn thickness_or(&self, fallback: f64) -> f64 {
        self.frame.as_ref().map_or(fallback, |f| f.thickness)
    }
}

/// Resolve the board frame, reporting a board that cannot be placed.
pub fn resolve_frame(
    doc: &BoardDocument,
    default_thickness: f64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<BoardFrame> {
    let Some(board) = doc.board() else {
        tracing::debug!("no pcb_board record; substrate and clipping skipped");
        return None;
    };
    match BoardFrame::resolve(board, default_thickness) {
        Ok(frame) => Some(frame),
        Err(e) => {
            diagnostics.push(Diagnostic::skipped("board", e));
            None
        }
    }
}

pub fn build_board_geometry(
    kernel: &CsgKernel,
    doc: &BoardDocument,
    options: &GeometryOptions,
) -> BoardGeometry {
    let mut diagnostics: Vec<Diagnostic> = doc.diagnostics().to_vec();
    let frame = resolve_frame(doc, options.default_board_thickness, &mut diagnostics);
    let thickness = frame
        .as_ref()
        .map_or(options.default_board_thickness, |f| f.thickness);

    let clip = frame
        .as_ref()
        .filter(|_| options.clip_to_board)
        .map(|f| clip_volume(kernel, f));

    let holes = process_plated_holes(kernel, doc.plated_holes(), thickness, clip.as_ref());
    let pads = process_smt_pads(
        kernel,
        doc.smt_pads(),
        thickness,
        holes.copper_union.as_ref(),
        clip.as_ref(),
    );

    let mut meshes = Vec::new();
    if let Some(frame) = &frame {
        let board = substrate(kernel, frame, &holes.drills);
        meshes.push(ExportedMesh::from_solid(
            "board",
            &board,
            material_color(frame.material),
        ));
    }
    meshes.extend(holes.copper);
    meshes.extend(pads.meshes);

    if options.emit_legend_solids {
        meshes.extend(process_legend_paths(
            kernel,
            doc.silkscreen_paths(),
            LegendClass::Silkscreen,
            thickness,
        ));
        meshes.extend(process_legend_paths(
            kernel,
            doc.fabrication_note_paths(),
            LegendClass::FabricationNote,
            thickness,
        ));
    }

    let drills = holes
        .drills
        .iter()
        .enumerate()
        .map(|(n, drill)| ExportedMesh::from_solid(format!("drill-{n}"), drill, colors::DRILL))
        .collect();

    diagnostics.extend(holes.diagnostics);
    diagnostics.extend(pads.diagnostics);

    tracing::debug!(
        meshes = meshes.len(),
        diagnostics = diagnostics.len(),
        solids_created = kernel.solids_created(),
        "board geometry built"
    );

    BoardGeometry {
        frame,
        meshes,
        drills,
        diagnostics,
    }
}
