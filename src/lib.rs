pub mod amino_acid;
pub mod analysis;
pub mod chem;
pub mod clustering;
pub mod dimred;
pub mod error;
pub mod extensions;
pub mod filters;
pub mod fingerprint;
pub mod network;
pub mod report;
pub mod svd;

pub use analysis::{AnalysisReport, PcaAnalysis, PipelineConfig};
pub use clustering::ClusterAssignment;
pub use error::{Error, Result, SmilesError};
pub use extensions::ChemExtensions;
