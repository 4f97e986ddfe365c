//! K-means clustering with k-means++ seeding.
//!
//! All randomness comes from a `ChaCha8Rng` seeded with `random_state`, so a
//! fixed seed always yields the same labels. Each of the `n_init` restarts
//! draws its initial centroids from the same stream and the run with the
//! lowest inertia wins; ties keep the earlier run.

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use num_traits::Float;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct KMeansResult {
    pub labels: Vec<usize>,
    pub centroids: Array2<f64>,
    /// Sum of squared distances of every point to its centroid.
    pub inertia: f64,
    pub n_iter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    n_clusters: usize,
    n_init: usize,
    max_iter: usize,
    tolerance: f64,
    random_state: u64,
}

impl KMeans {
    /// Defaults: 10 restarts, 300 iterations, tolerance 1e-4, seed 0.
    pub fn new(n_clusters: usize) -> Self {
        KMeans {
            n_clusters,
            n_init: 10,
            max_iter: 300,
            tolerance: 1e-4,
            random_state: 0,
        }
    }

    pub fn n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init.max(1);
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter.max(1);
        self
    }

    /// Convergence threshold on the squared centroid shift, relative to the
    /// mean per-feature variance of the data.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn fit(&self, x: ArrayView2<f64>) -> Result<KMeansResult> {
        let n_samples = x.nrows();
        if self.n_clusters == 0 {
            return Err(Error::configuration(
                "n_clusters",
                "at least one cluster is required",
            ));
        }
        if self.n_clusters > n_samples {
            return Err(Error::configuration(
                "n_clusters",
                format!(
                    "{} clusters requested but only {} valid samples are available",
                    self.n_clusters, n_samples
                ),
            ));
        }

        let mean_variance = x
            .var_axis(Axis(0), 0.0)
            .mean()
            .unwrap_or(0.0);
        let tolerance = self.tolerance * mean_variance;

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        let mut best: Option<KMeansResult> = None;

        for run in 0..self.n_init {
            let centroids = self.init_centroids(x, &mut rng);
            let result = self.lloyd(x, centroids, tolerance);
            debug!(
                "k-means run {} finished after {} iterations with inertia {:.6}",
                run, result.n_iter, result.inertia
            );
            if best
                .as_ref()
                .map_or(true, |current| result.inertia < current.inertia)
            {
                best = Some(result);
            }
        }

        best.ok_or_else(|| Error::configuration("n_init", "no k-means run was performed"))
    }

    pub fn fit_predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>> {
        self.fit(x).map(|result| result.labels)
    }

    /// k-means++: the first centroid is uniform, every further one is drawn
    /// with probability proportional to its squared distance from the
    /// nearest centroid chosen so far.
    fn init_centroids(&self, x: ArrayView2<f64>, rng: &mut ChaCha8Rng) -> Array2<f64> {
        let n_samples = x.nrows();
        let mut centroids = Array2::zeros((self.n_clusters, x.ncols()));

        let first = rng.random_range(0..n_samples);
        centroids.row_mut(0).assign(&x.row(first));

        let mut closest: Vec<f64> = x
            .axis_iter(Axis(0))
            .map(|point| squared_euclidean(point, x.row(first)))
            .collect();

        for k in 1..self.n_clusters {
            let total: f64 = closest.iter().sum();
            let chosen = if total > 0.0 {
                let target = rng.random::<f64>() * total;
                let mut cumulative = 0.0;
                let mut chosen = None;
                for (i, &weight) in closest.iter().enumerate() {
                    if weight <= 0.0 {
                        continue;
                    }
                    cumulative += weight;
                    chosen = Some(i);
                    if cumulative > target {
                        break;
                    }
                }
                chosen.unwrap_or(first)
            } else {
                rng.random_range(0..n_samples)
            };

            centroids.row_mut(k).assign(&x.row(chosen));
            for (i, point) in x.axis_iter(Axis(0)).enumerate() {
                let distance = squared_euclidean(point, x.row(chosen));
                if distance < closest[i] {
                    closest[i] = distance;
                }
            }
        }

        centroids
    }

    fn lloyd(&self, x: ArrayView2<f64>, mut centroids: Array2<f64>, tolerance: f64) -> KMeansResult {
        let mut labels = vec![0; x.nrows()];
        let mut n_iter = 0;

        for iteration in 1..=self.max_iter {
            n_iter = iteration;
            let distances = assign(x, centroids.view(), &mut labels);
            let updated = self.update_centroids(x, &labels, &distances);

            let shift: f64 = centroids
                .axis_iter(Axis(0))
                .zip(updated.axis_iter(Axis(0)))
                .map(|(old, new)| squared_euclidean(old, new))
                .sum();
            centroids = updated;

            if shift <= tolerance {
                break;
            }
        }

        let distances = assign(x, centroids.view(), &mut labels);
        KMeansResult {
            labels,
            centroids,
            inertia: distances.sum(),
            n_iter,
        }
    }

    /// Means of the assigned points. A cluster left empty takes over the
    /// point currently farthest from its own centroid.
    fn update_centroids(&self, x: ArrayView2<f64>, labels: &[usize], distances: &Array1<f64>) -> Array2<f64> {
        let mut sums = Array2::<f64>::zeros((self.n_clusters, x.ncols()));
        let mut counts = vec![0usize; self.n_clusters];
        for (point, &label) in x.axis_iter(Axis(0)).zip(labels) {
            let mut row = sums.row_mut(label);
            row += &point;
            counts[label] += 1;
        }

        let mut donors: Vec<usize> = (0..x.nrows()).collect();
        donors.sort_by(|&a, &b| distances[b].total_cmp(&distances[a]).then(a.cmp(&b)));
        let mut donors = donors.into_iter();

        for (cluster, &count) in counts.iter().enumerate() {
            let mut row = sums.row_mut(cluster);
            if count > 0 {
                row /= count as f64;
            } else if let Some(donor) = donors.next() {
                row.assign(&x.row(donor));
            }
        }
        sums
    }
}

/// Assigns every point to its nearest centroid (lowest index on ties) and
/// returns the squared distance to it.
fn assign(x: ArrayView2<f64>, centroids: ArrayView2<f64>, labels: &mut [usize]) -> Array1<f64> {
    let mut distances = Array1::zeros(x.nrows());
    for (i, point) in x.axis_iter(Axis(0)).enumerate() {
        let (label, distance) = centroids
            .axis_iter(Axis(0))
            .map(|centroid| squared_euclidean(point, centroid))
            .enumerate()
            .fold((0, f64::INFINITY), |best, (k, d)| if d < best.1 { (k, d) } else { best });
        labels[i] = label;
        distances[i] = distance;
    }
    distances
}

pub fn squared_euclidean<T: Float>(a: ArrayView1<T>, b: ArrayView1<T>) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&p, &q)| acc + (p - q) * (p - q))
}
