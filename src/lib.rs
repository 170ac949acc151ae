//! # boardmesh
//!
//! Turns a PCB board record list into renderable artifacts:
//! - copper, substrate and drill meshes built with constructive solid geometry
//! - silkscreen and fabrication-note rasters per board side
//!
//! ## Architecture
//!
//! The project is organized as a workspace with multiple crates:
//!
//! 1. **boardmesh-core** - Board records, anchor resolution, constants, errors
//! 2. **boardmesh-geometry** - CSG kernel, feature processors, mesh export
//! 3. **boardmesh-legend** - Text outlines and legend rasterization
//! 4. **boardmesh** - Configuration, logging and the command-line binary

pub mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

pub use boardmesh_core::{BoardDocument, BoardFrame, Diagnostic, FeatureError, Layer, Point};
pub use boardmesh_geometry::{
    build_board_geometry, BoardGeometry, CsgKernel, ExportedMesh, GeometryOptions, KernelConfig,
};
pub use boardmesh_legend::{LegendRaster, OutlineFont, RasterConfig, VectorFont};
pub use config::BuildConfig;

use boardmesh_core::LegendClass;
use boardmesh_geometry::{legend_color, legend_polylines_solid};
use boardmesh_legend::{layout_legend_text, render_legends, TextAnchors};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// File name of the mesh bundle written by [`BoardArtifacts::write_to_dir`].
pub const MESH_FILE_NAME: &str = "meshes.json";

/// Everything built for one board.
#[derive(Debug, Clone)]
pub struct BoardArtifacts {
    pub geometry: BoardGeometry,
    pub rasters: Vec<LegendRaster>,
}

#[derive(Serialize)]
struct MeshBundle<'a> {
    version: &'a str,
    meshes: &'a [ExportedMesh],
    drills: &'a [ExportedMesh],
    diagnostics: Vec<String>,
}

impl BoardArtifacts {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.geometry.diagnostics
    }

    /// Mesh bundle as pretty JSON.
    pub fn meshes_json(&self) -> Result<String> {
        let bundle = MeshBundle {
            version: VERSION,
            meshes: &self.geometry.meshes,
            drills: &self.geometry.drills,
            diagnostics: self.diagnostics().iter().map(ToString::to_string).collect(),
        };
        serde_json::to_string_pretty(&bundle).context("Failed to serialize meshes")
    }

    /// Write `meshes.json` and one PNG per raster into `dir`, creating it if
    /// needed. Returns the written paths.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let mut written = Vec::new();
        let mesh_path = dir.join(MESH_FILE_NAME);
        std::fs::write(&mesh_path, self.meshes_json()?)
            .with_context(|| format!("Failed to write {}", mesh_path.display()))?;
        written.push(mesh_path);

        for raster in &self.rasters {
            let path = dir.join(raster.file_name());
            raster
                .save_png(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Font for legend text: the configured file, else an installed face.
pub fn load_font(config: &BuildConfig) -> Option<OutlineFont> {
    if let Some(path) = &config.font_path {
        match OutlineFont::from_file(path) {
            Some(font) => return Some(font),
            None => tracing::warn!(path = %path.display(), "cannot load font file, trying system fonts"),
        }
    }
    OutlineFont::system_default()
}

/// 3D solids for legend text, keyed `<class>_text-<n>`.
pub fn legend_text_solids(
    kernel: &CsgKernel,
    doc: &BoardDocument,
    board_center: Point,
    font: &dyn VectorFont,
    board_thickness: f64,
) -> Vec<ExportedMesh> {
    let anchors = TextAnchors::new(doc, board_center);
    let mut meshes = Vec::new();

    for class in [LegendClass::Silkscreen, LegendClass::FabricationNote] {
        let texts: Vec<_> = match class {
            LegendClass::Silkscreen => doc.silkscreen_texts().collect(),
            LegendClass::FabricationNote => doc.fabrication_note_texts().collect(),
        };
        for (index, text) in texts.into_iter().enumerate() {
            let Some(outlines) = layout_legend_text(font, text) else {
                continue;
            };
            let placed = outlines.placed(anchors.resolve(text));
            if let Some(solid) = legend_polylines_solid(
                kernel,
                &placed,
                outlines.stroke_width(),
                text.layer(),
                class,
                board_thickness,
            ) {
                meshes.push(ExportedMesh::from_solid(
                    format!("{}_text-{index}", class.as_str()),
                    &solid,
                    legend_color(class),
                ));
            }
        }
    }
    meshes
}

/// Build meshes and legend rasters for one board document.
///
/// Feature-level problems never fail the build; they are returned as
/// diagnostics, including legend canvases that could not be rendered.
pub fn build_board_artifacts(
    doc: &BoardDocument,
    config: &BuildConfig,
    font: Option<&dyn VectorFont>,
) -> Result<BoardArtifacts> {
    let kernel = CsgKernel::new(config.kernel());
    let mut geometry = build_board_geometry(&kernel, doc, &config.geometry());

    if config.emit_legend_solids {
        match font {
            Some(font) => {
                let center = geometry.frame.as_ref().map_or(Point::ORIGIN, |f| f.center);
                let thickness = geometry.thickness_or(config.default_board_thickness);
                geometry
                    .meshes
                    .extend(legend_text_solids(&kernel, doc, center, font, thickness));
            }
            None => tracing::debug!("no font; legend text solids skipped"),
        }
    }

    let rasters = match &geometry.frame {
        Some(frame) => {
            let legends = render_legends(doc, frame, font, &config.raster());
            geometry.diagnostics.extend(legends.diagnostics);
            legends.rasters
        }
        None => {
            tracing::debug!("no board frame; legend rasters skipped");
            Vec::new()
        }
    };

    tracing::info!(
        meshes = geometry.meshes.len(),
        drills = geometry.drills.len(),
        rasters = rasters.len(),
        skipped = geometry.diagnostics.len(),
        "board artifacts built"
    );

    Ok(BoardArtifacts { geometry, rasters })
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}
