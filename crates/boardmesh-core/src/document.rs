//! Reading the flat board record list.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Diagnostic, Error, FeatureError, Result};
use crate::model::{Board, Component, LegendPath, LegendText, PlatedHole, SmtPad};

/// One record of the board document, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum BoardElement {
    #[serde(rename = "pcb_board")]
    Board(Board),
    #[serde(rename = "pcb_plated_hole")]
    PlatedHole(PlatedHole),
    #[serde(rename = "pcb_smtpad")]
    SmtPad(SmtPad),
    #[serde(rename = "pcb_silkscreen_text")]
    SilkscreenText(LegendText),
    #[serde(rename = "pcb_silkscreen_path")]
    SilkscreenPath(LegendPath),
    #[serde(rename = "pcb_fabrication_note_text")]
    FabricationNoteText(LegendText),
    #[serde(rename = "pcb_fabrication_note_path")]
    FabricationNotePath(LegendPath),
    #[serde(rename = "pcb_component")]
    Component(Component),
}

const KNOWN_TYPES: &[&str] = &[
    "pcb_board",
    "pcb_plated_hole",
    "pcb_smtpad",
    "pcb_silkscreen_text",
    "pcb_silkscreen_path",
    "pcb_fabrication_note_text",
    "pcb_fabrication_note_path",
    "pcb_component",
];

/// A parsed board document.
///
/// Records of unknown type are ignored. Known records that fail to
/// deserialize are dropped and reported in [`BoardDocument::diagnostics`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardDocument {
    elements: Vec<BoardElement>,
    diagnostics: Vec<Diagnostic>,
}

impl BoardDocument {
    pub fn new(elements: Vec<BoardElement>) -> Self {
        Self {
            elements,
            diagnostics: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Array(records) = value else {
            return Err(Error::InvalidDocument(
                "expected a JSON array of board records".to_string(),
            ));
        };

        let mut doc = Self::default();
        for (index, record) in records.into_iter().enumerate() {
            let Some(kind) = record.get("type").and_then(Value::as_str) else {
                tracing::debug!(index, "record without a type field ignored");
                continue;
            };
            if !KNOWN_TYPES.contains(&kind) {
                continue;
            }
            let key = format!("{kind}-{index}");
            match BoardElement::deserialize(&record) {
                Ok(element) => doc.elements.push(element),
                Err(e) => doc
                    .diagnostics
                    .push(Diagnostic::skipped("parse", FeatureError::malformed(key, e.to_string()))),
            }
        }
        tracing::debug!(
            records = doc.elements.len(),
            skipped = doc.diagnostics.len(),
            "board document parsed"
        );
        Ok(doc)
    }

    pub fn elements(&self) -> &[BoardElement] {
        &self.elements
    }

    /// Records that could not be read.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The first board record.
    pub fn board(&self) -> Option<&Board> {
        self.elements.iter().find_map(|e| match e {
            BoardElement::Board(b) => Some(b),
            _ => None,
        })
    }

    pub fn plated_holes(&self) -> impl Iterator<Item = &PlatedHole> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::PlatedHole(h) => Some(h),
            _ => None,
        })
    }

    pub fn smt_pads(&self) -> impl Iterator<Item = &SmtPad> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::SmtPad(p) => Some(p),
            _ => None,
        })
    }

    pub fn silkscreen_texts(&self) -> impl Iterator<Item = &LegendText> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::SilkscreenText(t) => Some(t),
            _ => None,
        })
    }

    pub fn silkscreen_paths(&self) -> impl Iterator<Item = &LegendPath> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::SilkscreenPath(p) => Some(p),
            _ => None,
        })
    }

    pub fn fabrication_note_texts(&self) -> impl Iterator<Item = &LegendText> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::FabricationNoteText(t) => Some(t),
            _ => None,
        })
    }

    pub fn fabrication_note_paths(&self) -> impl Iterator<Item = &LegendPath> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::FabricationNotePath(p) => Some(p),
            _ => None,
        })
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.elements.iter().filter_map(|e| match e {
            BoardElement::Component(c) => Some(c),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_array() {
        let err = BoardDocument::from_json_str(r#"{"type": "pcb_board"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(_)));
        assert!(matches!(
            BoardDocument::from_json_str("not json").unwrap_err(),
            Error::Json(_)
        ));
    }

    #[test]
    fn test_unknown_types_ignored() {
        let doc = BoardDocument::from_json_str(
            r#"[{"type": "source_component", "name": "R1"}, {"no_type": true},
                {"type": "pcb_board", "width": 10, "height": 5}]"#,
        )
        .unwrap();
        assert_eq!(doc.elements().len(), 1);
        assert!(doc.diagnostics().is_empty());
        assert_eq!(doc.board().and_then(|b| b.width), Some(10.0));
    }

    #[test]
    fn test_bad_record_is_skipped() {
        let doc = BoardDocument::from_json_str(
            r#"[{"type": "pcb_plated_hole", "x": 1},
                {"type": "pcb_plated_hole", "shape": "circle", "x": 0, "y": 0}]"#,
        )
        .unwrap();
        assert_eq!(doc.plated_holes().count(), 1);
        assert_eq!(doc.diagnostics().len(), 1);
        assert_eq!(doc.diagnostics()[0].error.feature(), "pcb_plated_hole-0");
    }
}
