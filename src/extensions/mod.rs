//! Single entry point for the extension operations.

use crate::amino_acid::AminoAcidConverter;
use crate::analysis::{AnalysisReport, PcaAnalysis, PipelineConfig};
use crate::error::Result;
use crate::filters::{DrugDesignFilters, FilterCriteria, FilterOutcome};
use crate::network::{ChemicalGraph, ChemicalNetwork};

#[derive(Debug, Clone, Copy, Default)]
pub struct ChemExtensions;

impl ChemExtensions {
    /// Fingerprint PCA and k-means over a SMILES list.
    ///
    /// ```no_run
    /// use chem_extensions::{ChemExtensions, PipelineConfig};
    ///
    /// let config = PipelineConfig::builder().n_clusters(2).save_file(true).build().unwrap();
    /// ChemExtensions::node_pca_analysis(&["CCO", "CCN", "c1ccccc1"], config).unwrap();
    /// ```
    pub fn node_pca_analysis<S: AsRef<str>>(
        smiles_list: &[S],
        config: PipelineConfig,
    ) -> Result<AnalysisReport> {
        PcaAnalysis::new(config)?.conduct_analysis(smiles_list)
    }

    pub fn filter_smiles_by_criteria<S: AsRef<str>>(
        smiles_list: &[S],
        criteria: FilterCriteria,
    ) -> FilterOutcome {
        DrugDesignFilters::new(criteria).filter(smiles_list)
    }

    pub fn smiles_to_amino_acids<S: AsRef<str>>(smiles_list: &[S]) -> Vec<Result<String>> {
        AminoAcidConverter::new().smiles_to_sequences(smiles_list)
    }

    pub fn amino_acids_to_smiles<S: AsRef<str>>(sequences: &[S]) -> Vec<Result<String>> {
        AminoAcidConverter::new().sequences_to_smiles(sequences)
    }

    pub fn convert_to_graph(network: &ChemicalNetwork) -> Result<ChemicalGraph> {
        ChemicalGraph::from_network(network)
    }
}
