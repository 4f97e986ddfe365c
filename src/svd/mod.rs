use anyhow::anyhow;
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2, Axis};
use nshare::{IntoNalgebra, IntoNdarray2};

// Trait for SVD implementations
pub trait SVDImplementation {
    /// Thin decomposition `x = u · diag(s) · vt` with singular values in
    /// descending order.
    fn compute(&self, matrix: ArrayView2<f64>) -> anyhow::Result<(Array2<f64>, Array1<f64>, Array2<f64>)>;
}

/// Dense SVD backed by nalgebra.
#[derive(Debug, Default, Clone, Copy)]
pub struct NalgebraSVD;

impl SVDImplementation for NalgebraSVD {
    fn compute(&self, matrix: ArrayView2<f64>) -> anyhow::Result<(Array2<f64>, Array1<f64>, Array2<f64>)> {
        decompose(matrix)
    }
}

fn decompose(x: ArrayView2<f64>) -> anyhow::Result<(Array2<f64>, Array1<f64>, Array2<f64>)> {
    if x.is_empty() {
        return Err(anyhow!("cannot decompose an empty {:?} matrix", x.dim()));
    }
    let matrix: DMatrix<f64> = x.to_owned().into_nalgebra();

    let svd = matrix.svd(true, true);
    let u = svd.u.ok_or_else(|| anyhow!("SVD did not return U"))?;
    let vt = svd.v_t.ok_or_else(|| anyhow!("SVD did not return V^T"))?;

    let u = u.into_ndarray2();
    let vt = vt.into_ndarray2();
    let s = Array1::from(svd.singular_values.as_slice().to_vec());

    // descending singular values
    let mut order: Vec<usize> = (0..s.len()).collect();
    order.sort_by(|&a, &b| s[b].total_cmp(&s[a]));

    Ok((
        u.select(Axis(1), &order),
        s.select(Axis(0), &order),
        vt.select(Axis(0), &order),
    ))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    use super::*;

    #[test]
    fn test_simple_svd() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let (u, s, vt) = NalgebraSVD.compute(a.view()).unwrap();
        // Check dimensions
        assert_eq!(u.shape(), &[2, 2]);
        assert_eq!(s.len(), 2);
        assert_eq!(vt.shape(), &[2, 2]);

        // Check singular values (pre-computed)
        assert_abs_diff_eq!(s[0], 5.4649857, epsilon = 1e-6);
        assert_abs_diff_eq!(s[1], 0.3659662, epsilon = 1e-6);

        let reconstructed = u.dot(&Array2::from_diag(&s)).dot(&vt);
        for i in 0..2 {
            for j in 0..2 {
                assert_abs_diff_eq!(reconstructed[[i, j]], a[[i, j]], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_wide_matrix_is_thin() {
        let a = array![[1.0, 0.0, 2.0, 0.0], [0.0, 3.0, 0.0, 1.0], [1.0, 1.0, 1.0, 1.0]];
        let (u, s, vt) = NalgebraSVD.compute(a.view()).unwrap();

        assert_eq!(u.shape(), &[3, 3]);
        assert_eq!(s.len(), 3);
        assert_eq!(vt.shape(), &[3, 4]);
        assert!(s.windows(2).into_iter().all(|w| w[0] >= w[1]));

        let reconstructed = u.dot(&Array2::from_diag(&s)).dot(&vt);
        for (x, y) in reconstructed.iter().zip(a.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_empty_matrix_is_rejected() {
        let a = Array2::<f64>::zeros((0, 3));
        assert!(NalgebraSVD.compute(a.view()).is_err());
    }
}
