//! Error handling for boardmesh
//!
//! Two layers of errors exist:
//! - [`FeatureError`]: a single board feature could not be turned into
//!   geometry. These are never fatal; the batch skips the feature and
//!   records a [`Diagnostic`].
//! - [`Error`]: the document itself could not be read.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::io;
use thiserror::Error;

/// Per-feature error taxonomy.
///
/// Every variant carries the stable feature key (for example `ph-H1`) so a
/// diagnostic can be traced back to its source record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    /// A required numeric or geometry field is absent
    #[error("{feature}: missing required field '{field}'")]
    MissingField {
        /// Key of the feature being processed.
        feature: String,
        /// Name of the missing field.
        field: String,
    },

    /// Geometry is degenerate or contains non-finite coordinates
    #[error("{feature}: malformed geometry: {reason}")]
    MalformedGeometry {
        /// Key of the feature being processed.
        feature: String,
        /// What is wrong with the geometry.
        reason: String,
    },

    /// Shape tag not recognised
    #[error("{feature}: unsupported variant '{variant}'")]
    UnsupportedVariant {
        /// Key of the feature being processed.
        feature: String,
        /// The unrecognised shape tag.
        variant: String,
    },
}

impl FeatureError {
    pub fn missing(feature: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            feature: feature.into(),
            field: field.into(),
        }
    }

    pub fn malformed(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            feature: feature.into(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>, variant: impl Into<String>) -> Self {
        Self::UnsupportedVariant {
            feature: feature.into(),
            variant: variant.into(),
        }
    }

    /// Key of the feature this error belongs to.
    pub fn feature(&self) -> &str {
        match self {
            Self::MissingField { feature, .. }
            | Self::MalformedGeometry { feature, .. }
            | Self::UnsupportedVariant { feature, .. } => feature,
        }
    }
}

/// A skipped feature, kept so callers can report what was dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub stage: &'static str,
    pub error: FeatureError,
}

impl Diagnostic {
    /// Log the skip and wrap it.
    pub fn skipped(stage: &'static str, error: FeatureError) -> Self {
        tracing::warn!(stage, feature = error.feature(), "skipping feature: {}", error);
        Self { stage, error }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.error)
    }
}

/// Document-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// The document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading a document
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document parsed but is not a record list
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A feature error surfaced where it cannot be skipped
    #[error(transparent)]
    Feature(#[from] FeatureError),
}

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;
