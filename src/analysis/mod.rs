//! # PCA cluster analysis
//!
//! SMILES → fingerprint → PCA → k-means → chart and/or mapping.
//!
//! Identifiers that fail to parse are dropped from every later stage and
//! reported in [`AnalysisReport::skipped`]; the batch itself only fails on
//! configuration problems and artifact errors. All configuration checks that
//! depend on the data (too many clusters or components for the valid
//! molecules) run before anything is written.
//!
//! ```no_run
//! use chem_extensions::analysis::{PcaAnalysis, PipelineConfig};
//!
//! let config = PipelineConfig::builder()
//!     .n_clusters(2)
//!     .return_mapping(true)
//!     .build()
//!     .unwrap();
//! let report = PcaAnalysis::new(config)
//!     .unwrap()
//!     .conduct_analysis(&["CCO", "CCN", "c1ccccc1", "c1ccccc1O"])
//!     .unwrap();
//! let mapping = report.mapping.unwrap();
//! assert_eq!(mapping.len(), 4);
//! ```

mod config;
pub use config::{PipelineConfig, PipelineConfigBuilder};

use std::path::PathBuf;

use log::{debug, info, warn};
use ndarray::Array2;

use crate::clustering::{ClusterAssignment, KMeans};
use crate::dimred::PCABuilder;
use crate::error::{Error, Result, SmilesError};
use crate::fingerprint::{to_matrix, Fingerprint, FingerprintEncoder, MorganEncoder};
use crate::report::{render_html, write_chart, ChartData, ChartViewer, TempFileViewer};
use crate::svd::{NalgebraSVD, SVDImplementation};

/// One valid input molecule as it moves through the stages.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeRecord {
    /// Position in the input list.
    pub index: usize,
    pub identifier: String,
    pub fingerprint: Fingerprint,
    pub coordinates: Vec<f64>,
    pub cluster: Option<usize>,
}

/// An input identifier that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedIdentifier {
    pub index: usize,
    pub identifier: String,
    pub error: SmilesError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Saved(PathBuf),
    Displayed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Present when `return_mapping` was set.
    pub mapping: Option<ClusterAssignment>,
    pub artifact: Option<Artifact>,
    pub skipped: Vec<SkippedIdentifier>,
    pub n_components: usize,
    /// Explained-variance ratio of each retained component.
    pub explained_variance: Vec<f64>,
}

pub struct PcaAnalysis<E = MorganEncoder, S = NalgebraSVD, V = TempFileViewer> {
    config: PipelineConfig,
    encoder: E,
    svd: S,
    viewer: V,
}

impl PcaAnalysis {
    /// Morgan fingerprints with the configured radius and length, nalgebra
    /// SVD and a temp-file viewer named after the configured file.
    ///
    /// The configuration is validated first, so a deserialized value that
    /// never went through the builder is rejected here.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let encoder = MorganEncoder::new(config.radius(), config.n_bits())?;
        let viewer = TempFileViewer::for_chart(config.file_name());
        Ok(PcaAnalysis {
            config,
            encoder,
            svd: NalgebraSVD,
            viewer,
        })
    }
}

impl<E, S, V> PcaAnalysis<E, S, V>
where
    E: FingerprintEncoder,
    S: SVDImplementation + Clone,
    V: ChartViewer,
{
    pub fn with_encoder<E2: FingerprintEncoder>(self, encoder: E2) -> PcaAnalysis<E2, S, V> {
        PcaAnalysis {
            config: self.config,
            encoder,
            svd: self.svd,
            viewer: self.viewer,
        }
    }

    pub fn with_svd<S2: SVDImplementation + Clone>(self, svd: S2) -> PcaAnalysis<E, S2, V> {
        PcaAnalysis {
            config: self.config,
            encoder: self.encoder,
            svd,
            viewer: self.viewer,
        }
    }

    pub fn with_viewer<V2: ChartViewer>(self, viewer: V2) -> PcaAnalysis<E, S, V2> {
        PcaAnalysis {
            config: self.config,
            encoder: self.encoder,
            svd: self.svd,
            viewer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn conduct_analysis<T: AsRef<str>>(&self, identifiers: &[T]) -> Result<AnalysisReport> {
        self.config.validate()?;

        let (mut records, skipped) = self.encode(identifiers);
        debug!(
            "encoded {} of {} identifiers into {}-bit fingerprints",
            records.len(),
            identifiers.len(),
            self.encoder.n_bits()
        );
        self.check_sample_count(records.len())?;

        let fingerprints: Vec<&Fingerprint> = records.iter().map(|r| &r.fingerprint).collect();
        let matrix = to_matrix(&fingerprints);

        let mut pca = PCABuilder::new(self.svd.clone())
            .n_components(self.config.n_components())
            .build();
        let projection = pca.fit_transform(matrix.view())?;
        let explained_variance = pca
            .explained_variance_ratio()
            .map(|r| r.to_vec())
            .unwrap_or_default();
        debug!(
            "projected {} molecules onto {} components ({:.1}% of the variance)",
            projection.nrows(),
            projection.ncols(),
            pca.retained_variance().unwrap_or(0.0) * 100.0
        );

        let labels = KMeans::new(self.config.n_clusters())
            .random_state(self.config.random_state())
            .fit_predict(projection.view())?;

        for ((record, row), &label) in records.iter_mut().zip(projection.rows()).zip(&labels) {
            record.coordinates = row.to_vec();
            record.cluster = Some(label);
        }

        let mapping = self.config.return_mapping().then(|| {
            records
                .iter()
                .filter_map(|r| r.cluster.map(|c| (r.identifier.clone(), c)))
                .collect::<ClusterAssignment>()
        });

        let artifact = self.report(&records, projection, &explained_variance, &mapping)?;

        Ok(AnalysisReport {
            mapping,
            artifact,
            skipped,
            n_components: explained_variance.len(),
            explained_variance,
        })
    }

    fn encode<T: AsRef<str>>(&self, identifiers: &[T]) -> (Vec<MoleculeRecord>, Vec<SkippedIdentifier>) {
        let mut records = Vec::with_capacity(identifiers.len());
        let mut skipped = Vec::new();

        for (index, (identifier, encoded)) in identifiers
            .iter()
            .zip(self.encoder.encode_all(identifiers))
            .enumerate()
        {
            let identifier = identifier.as_ref().to_string();
            match encoded {
                Ok(fingerprint) => records.push(MoleculeRecord {
                    index,
                    identifier,
                    fingerprint,
                    coordinates: Vec::new(),
                    cluster: None,
                }),
                Err(error) => {
                    warn!("skipping identifier {} '{}': {}", index, identifier, error);
                    skipped.push(SkippedIdentifier {
                        index,
                        identifier,
                        error,
                    });
                }
            }
        }

        (records, skipped)
    }

    fn check_sample_count(&self, n_valid: usize) -> Result<()> {
        if n_valid == 0 {
            return Err(Error::configuration(
                "smiles_list",
                "no identifier could be parsed",
            ));
        }
        if self.config.n_clusters() > n_valid {
            return Err(Error::configuration(
                "n_clusters",
                format!(
                    "{} clusters requested but only {} valid molecules are available",
                    self.config.n_clusters(),
                    n_valid
                ),
            ));
        }
        Ok(())
    }

    fn report(
        &self,
        records: &[MoleculeRecord],
        projection: Array2<f64>,
        explained_variance: &[f64],
        mapping: &Option<ClusterAssignment>,
    ) -> Result<Option<Artifact>> {
        let save = self.config.save_file();
        if !save && self.config.return_mapping() {
            return Ok(None);
        }

        let chart = ChartData {
            title: "PCA Analysis".to_string(),
            identifiers: records.iter().map(|r| r.identifier.clone()).collect(),
            labels: records.iter().filter_map(|r| r.cluster).collect(),
            projection,
            n_clusters: self.config.n_clusters(),
            explained_variance: explained_variance.to_vec(),
        };
        let html = render_html(&chart).map_err(Error::Render)?;

        if save {
            let path = self.config.file_name().to_path_buf();
            if let Err(source) = write_chart(&path, &html) {
                return Err(Error::Artifact {
                    path,
                    source,
                    mapping: mapping.clone(),
                });
            }
            Ok(Some(Artifact::Saved(path)))
        } else {
            self.viewer.show(&html).map_err(Error::Display)?;
            info!("PCA chart handed to the viewer");
            Ok(Some(Artifact::Displayed))
        }
    }
}
