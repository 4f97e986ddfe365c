//! Error types shared across the crate.
//!
//! Parse failures of single SMILES strings are described by [`SmilesError`].
//! Everything that aborts an operation is an [`Error`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clustering::ClusterAssignment;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a SMILES string.
///
/// Positions are byte offsets into the input. Everything the molecule parser
/// itself rejects is reported as [`SmilesError::Parse`] with its message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("empty SMILES string")]
    Empty,

    #[error("bracket atom opened at position {position} is never closed")]
    UnclosedBracket { position: usize },

    #[error("malformed bracket atom at position {position}: {detail}")]
    InvalidBracketAtom { position: usize, detail: String },

    #[error("{0}")]
    Parse(String),
}

impl From<cyanea_core::CyaneaError> for SmilesError {
    fn from(err: cyanea_core::CyaneaError) -> Self {
        SmilesError::Parse(err.to_string())
    }
}

/// Errors raised by the analysis pipeline and the adapters.
#[derive(Debug, Error)]
pub enum Error {
    /// An invalid parameter or parameter combination. Raised before any
    /// artifact is written.
    #[error("invalid configuration for '{parameter}': {detail}")]
    Configuration { parameter: String, detail: String },

    /// The chart could not be written. The mapping is kept when the caller
    /// asked for it, since it does not depend on the artifact.
    #[error("failed to write artifact to {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
        mapping: Option<ClusterAssignment>,
    },

    #[error("failed to render chart: {0}")]
    Render(#[source] anyhow::Error),

    #[error("failed to display chart: {0}")]
    Display(#[source] anyhow::Error),

    #[error("numeric backend failed: {0}")]
    Numeric(#[source] anyhow::Error),

    #[error("invalid SMILES '{smiles}': {source}")]
    Smiles {
        smiles: String,
        #[source]
        source: SmilesError,
    },

    #[error("unknown residue: {0}")]
    UnknownResidue(String),

    #[error("node '{from}' references unknown node '{to}'")]
    UnknownNode { from: String, to: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn configuration(parameter: impl Into<String>, detail: impl Into<String>) -> Self {
        Error::Configuration {
            parameter: parameter.into(),
            detail: detail.into(),
        }
    }

    pub fn smiles(smiles: impl Into<String>, source: SmilesError) -> Self {
        Error::Smiles {
            smiles: smiles.into(),
            source,
        }
    }

    /// Returns `true` for [`Error::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// The mapping carried by an [`Error::Artifact`], if any.
    pub fn into_mapping(self) -> Option<ClusterAssignment> {
        match self {
            Error::Artifact { mapping, .. } => mapping,
            _ => None,
        }
    }
}
