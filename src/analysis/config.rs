use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dimred::ComponentSelection;
use crate::error::{Error, Result};

/// Parameters of one PCA cluster analysis.
///
/// Built through [`PipelineConfigBuilder`] or [`PipelineConfig::from_json`];
/// both validate, and the value is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    radius: usize,
    n_bits: usize,
    n_clusters: usize,
    n_components: ComponentSelection,
    random_state: u64,
    file_name: PathBuf,
    save_file: bool,
    return_mapping: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            radius: 1,
            n_bits: 512,
            n_clusters: 5,
            n_components: ComponentSelection::default(),
            random_state: 0,
            file_name: PathBuf::from("pca_analysis.html"),
            save_file: false,
            return_mapping: false,
        }
    }
}

impl PipelineConfig {
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Reads a configuration from JSON. Missing keys keep their defaults.
    ///
    /// ```
    /// use chem_extensions::analysis::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_json(r#"{"n_clusters": 3, "n_components": {"exact": 2}}"#).unwrap();
    /// assert_eq!(config.n_clusters(), 3);
    /// assert_eq!(config.n_bits(), 512);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_bits == 0 {
            return Err(Error::configuration(
                "n_bits",
                "fingerprints need at least one bit",
            ));
        }
        if self.n_clusters == 0 {
            return Err(Error::configuration(
                "n_clusters",
                "at least one cluster is required",
            ));
        }
        self.n_components.validate()?;
        if let ComponentSelection::Exact(k) = self.n_components {
            if k > self.n_bits {
                return Err(Error::configuration(
                    "n_components",
                    format!("{} components requested from {}-bit fingerprints", k, self.n_bits),
                ));
            }
        }
        if self.save_file && self.file_name.as_os_str().is_empty() {
            return Err(Error::configuration(
                "file_name",
                "a file name is required when saving",
            ));
        }
        Ok(())
    }

    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn n_bits(&self) -> usize {
        self.n_bits
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn n_components(&self) -> ComponentSelection {
        self.n_components
    }

    pub fn random_state(&self) -> u64 {
        self.random_state
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    pub fn save_file(&self) -> bool {
        self.save_file
    }

    pub fn return_mapping(&self) -> bool {
        self.return_mapping
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn radius(mut self, radius: usize) -> Self {
        self.config.radius = radius;
        self
    }

    pub fn n_bits(mut self, n_bits: usize) -> Self {
        self.config.n_bits = n_bits;
        self
    }

    pub fn n_clusters(mut self, n_clusters: usize) -> Self {
        self.config.n_clusters = n_clusters;
        self
    }

    pub fn n_components(mut self, n_components: impl Into<ComponentSelection>) -> Self {
        self.config.n_components = n_components.into();
        self
    }

    pub fn random_state(mut self, random_state: u64) -> Self {
        self.config.random_state = random_state;
        self
    }

    pub fn file_name(mut self, file_name: impl Into<PathBuf>) -> Self {
        self.config.file_name = file_name.into();
        self
    }

    pub fn save_file(mut self, save_file: bool) -> Self {
        self.config.save_file = save_file;
        self
    }

    pub fn return_mapping(mut self, return_mapping: bool) -> Self {
        self.config.return_mapping = return_mapping;
        self
    }

    pub fn build(self) -> Result<PipelineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.radius(), 1);
        assert_eq!(config.n_bits(), 512);
        assert_eq!(config.n_clusters(), 5);
        assert_eq!(config.n_components(), ComponentSelection::VarianceFraction(0.95));
        assert_eq!(config.random_state(), 0);
        assert_eq!(config.file_name(), Path::new("pca_analysis.html"));
        assert!(!config.save_file());
        assert!(!config.return_mapping());
    }

    #[test]
    fn test_flags_pass_through() {
        let config = PipelineConfig::builder()
            .save_file(true)
            .return_mapping(true)
            .build()
            .unwrap();
        assert!(config.save_file());
        assert!(config.return_mapping());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = PipelineConfig::builder().n_clusters(0).build().unwrap_err();
        assert!(err.is_configuration());
        assert!(PipelineConfig::builder().n_bits(0).build().is_err());
        assert!(PipelineConfig::builder().n_components(1.5).build().is_err());
        assert!(PipelineConfig::builder().n_components(ComponentSelection::Exact(0)).build().is_err());
        assert!(PipelineConfig::builder().n_bits(16).n_components(ComponentSelection::Exact(32)).build().is_err());
        assert!(PipelineConfig::builder()
            .file_name("")
            .save_file(true)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_json() {
        let config = PipelineConfig::from_json(
            r#"{"radius": 2, "n_components": {"variance_fraction": 0.8}, "save_file": true}"#,
        )
        .unwrap();
        assert_eq!(config.radius(), 2);
        assert_eq!(config.n_components(), ComponentSelection::VarianceFraction(0.8));
        assert!(config.save_file());
        assert_eq!(config.n_clusters(), 5);

        let err = PipelineConfig::from_json(r#"{"n_clusters": 0}"#).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            PipelineConfig::from_json("{not json").unwrap_err(),
            Error::Json(_)
        ));
    }
}
