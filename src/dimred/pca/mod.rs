//! # Principal Component Analysis
//!
//! Dense PCA over a `samples × features` matrix. The number of retained
//! components is chosen with a [`ComponentSelection`]: either an exact count
//! or the smallest count whose cumulative explained variance reaches a
//! fraction of the total.
//!
//! The decomposition is delegated to an [`SVDImplementation`]; results are
//! made deterministic by fixing the sign of every component so that its
//! largest-magnitude loading is positive.

use log::debug;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::svd::{NalgebraSVD, SVDImplementation};

/// How many principal components to keep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSelection {
    /// Keep exactly this many components.
    Exact(usize),
    /// Keep the fewest components explaining at least this fraction of the
    /// total variance. Must lie in `(0, 1]`.
    VarianceFraction(f64),
}

impl ComponentSelection {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ComponentSelection::Exact(0) => Err(Error::configuration(
                "n_components",
                "at least one component must be retained",
            )),
            ComponentSelection::VarianceFraction(f) if !(f > 0.0 && f <= 1.0) => {
                Err(Error::configuration(
                    "n_components",
                    format!("variance fraction {} is outside (0, 1]", f),
                ))
            }
            _ => Ok(()),
        }
    }

    /// Number of components to keep given the explained-variance ratios of
    /// all available components (descending).
    pub fn resolve(&self, explained_variance_ratio: &Array1<f64>) -> Result<usize> {
        self.validate()?;
        let available = explained_variance_ratio.len();
        match *self {
            ComponentSelection::Exact(k) if k > available => Err(Error::configuration(
                "n_components",
                format!(
                    "{} components requested but only {} are available (min of samples and features)",
                    k, available
                ),
            )),
            ComponentSelection::Exact(k) => Ok(k),
            ComponentSelection::VarianceFraction(fraction) => {
                if available == 0 {
                    return Err(Error::configuration(
                        "n_components",
                        "no components are available",
                    ));
                }
                if !explained_variance_ratio.iter().any(|&r| r > 0.0) {
                    // zero total variance: every point sits on the mean
                    return Ok(1);
                }
                let mut cumulative = 0.0;
                for (i, ratio) in explained_variance_ratio.iter().enumerate() {
                    cumulative += ratio;
                    if cumulative >= fraction - 1e-12 {
                        return Ok(i + 1);
                    }
                }
                Ok(available)
            }
        }
    }
}

impl Default for ComponentSelection {
    fn default() -> Self {
        ComponentSelection::VarianceFraction(0.95)
    }
}

impl From<usize> for ComponentSelection {
    fn from(count: usize) -> Self {
        ComponentSelection::Exact(count)
    }
}

impl From<f64> for ComponentSelection {
    fn from(fraction: f64) -> Self {
        ComponentSelection::VarianceFraction(fraction)
    }
}

pub struct PCABuilder<S: SVDImplementation> {
    n_components: ComponentSelection,
    center: bool,
    svd_implementation: S,
}

impl PCABuilder<NalgebraSVD> {
    pub fn with_default_svd() -> Self {
        PCABuilder::new(NalgebraSVD)
    }
}

impl<S: SVDImplementation> PCABuilder<S> {
    pub fn new(svd_implementation: S) -> Self {
        PCABuilder {
            n_components: ComponentSelection::default(),
            center: true,
            svd_implementation,
        }
    }

    pub fn n_components(mut self, n_components: impl Into<ComponentSelection>) -> Self {
        self.n_components = n_components.into();
        self
    }

    pub fn center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn build(self) -> Pca<S> {
        Pca {
            n_components: self.n_components,
            center: self.center,
            svd_implementation: self.svd_implementation,
            components: None,
            mean: None,
            explained_variance_ratio: None,
            total_variance: None,
            eigenvalues: None,
        }
    }
}

pub struct Pca<S: SVDImplementation> {
    n_components: ComponentSelection,
    center: bool,
    svd_implementation: S,
    components: Option<Array2<f64>>,
    mean: Option<Array1<f64>>,
    explained_variance_ratio: Option<Array1<f64>>,
    total_variance: Option<f64>,
    eigenvalues: Option<Array1<f64>>,
}

impl<S: SVDImplementation> Pca<S> {
    pub fn fit(&mut self, x: ArrayView2<f64>) -> Result<()> {
        let (n_samples, n_features) = x.dim();
        self.n_components.validate()?;
        if n_samples == 0 || n_features == 0 {
            return Err(Error::configuration(
                "input",
                format!("cannot fit PCA on a {}x{} matrix", n_samples, n_features),
            ));
        }

        let mean = if self.center {
            x.mean_axis(Axis(0))
        } else {
            None
        };
        let x_preprocessed = self.preprocess(x, &mean);

        let (_u, s, mut vt) = self
            .svd_implementation
            .compute(x_preprocessed.view())
            .map_err(Error::Numeric)?;

        for mut component in vt.axis_iter_mut(Axis(0)) {
            let pivot = component
                .iter()
                .copied()
                .fold(0.0_f64, |best, v| if v.abs() > best.abs() { v } else { best });
            if pivot < 0.0 {
                component.mapv_inplace(|v| -v);
            }
        }

        let ddof = (n_samples as f64 - 1.0).max(1.0);
        let eigenvalues = s.mapv(|x| x * x / ddof);
        let total_variance = eigenvalues.sum();
        // zero total variance reports a ratio of 0 for every component
        let explained_variance_ratio = if total_variance > 0.0 {
            &eigenvalues / total_variance
        } else {
            Array1::zeros(eigenvalues.len())
        };

        let n_components = self.n_components.resolve(&explained_variance_ratio)?;
        debug!(
            "PCA on {} samples x {} features keeps {} of {} components",
            n_samples,
            n_features,
            n_components,
            s.len()
        );

        self.components = Some(vt.slice(s![..n_components, ..]).to_owned());
        self.mean = mean;
        self.explained_variance_ratio = Some(
            explained_variance_ratio
                .slice(s![..n_components])
                .to_owned(),
        );
        self.total_variance = Some(total_variance);
        self.eigenvalues = Some(eigenvalues.slice(s![..n_components]).to_owned());

        Ok(())
    }

    fn preprocess(&self, x: ArrayView2<f64>, mean: &Option<Array1<f64>>) -> Array2<f64> {
        let mut x_preprocessed = x.to_owned();

        if let Some(m) = mean {
            for mut row in x_preprocessed.axis_iter_mut(Axis(0)) {
                row -= m;
            }
        }

        x_preprocessed
    }

    pub fn transform(&self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        let components = self.components.as_ref().ok_or_else(|| {
            Error::configuration("pca", "PCA has not been fitted yet")
        })?;
        if x.ncols() != components.ncols() {
            return Err(Error::configuration(
                "input",
                format!(
                    "expected {} features, got {}",
                    components.ncols(),
                    x.ncols()
                ),
            ));
        }
        let x_preprocessed = self.preprocess(x, &self.mean);
        Ok(x_preprocessed.dot(&components.t()))
    }

    pub fn fit_transform(&mut self, x: ArrayView2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    pub fn n_components(&self) -> Option<usize> {
        self.components.as_ref().map(|c| c.nrows())
    }

    pub fn components(&self) -> Option<&Array2<f64>> {
        self.components.as_ref()
    }

    pub fn explained_variance_ratio(&self) -> Option<&Array1<f64>> {
        self.explained_variance_ratio.as_ref()
    }

    /// Fraction of the total variance captured by the retained components.
    pub fn retained_variance(&self) -> Option<f64> {
        self.explained_variance_ratio.as_ref().map(|r| r.sum())
    }

    pub fn total_variance(&self) -> Option<f64> {
        self.total_variance
    }

    pub fn eigenvalues(&self) -> Option<&Array1<f64>> {
        self.eigenvalues.as_ref()
    }
}
