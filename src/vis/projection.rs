//! 2D topic layout via classical multidimensional scaling
//!
//! Principal-coordinates analysis of the inter-topic distance matrix: square
//! the distances, double-center to obtain the Gram matrix, and take its two
//! leading eigenpairs with power iteration and deflation. Coordinates are
//! the eigenvectors scaled by the square root of their eigenvalues.

use ndarray::{Array1, Array2};

use super::VisError;

const MAX_ITER: usize = 200;
const TOL: f64 = 1e-10;

/// Project a K x K distance matrix onto 2D coordinates
///
/// Eigenvalues that come out negative (floating error, or a distance matrix
/// that is not exactly Euclidean-embeddable) are clamped to zero, collapsing
/// that axis rather than producing NaN coordinates. A single topic maps to
/// the origin.
pub fn project_topics(distances: &Array2<f64>) -> Result<Vec<(f64, f64)>, VisError> {
    let n = distances.nrows();
    if distances.ncols() != n {
        return Err(VisError::DimensionMismatch(format!(
            "distance matrix is {}x{}, expected square",
            n,
            distances.ncols()
        )));
    }
    if n == 0 {
        return Err(VisError::DimensionMismatch(
            "distance matrix is empty".into(),
        ));
    }
    if n == 1 {
        return Ok(vec![(0.0, 0.0)]);
    }

    let gram = double_center(distances);

    let mut coords = vec![(0.0, 0.0); n];
    let mut deflated = gram;

    for axis in 0..2 {
        let (eigenvalue, eigenvector) = power_iteration(&deflated);

        // Clamp: a non-positive leading eigenvalue means no variance is left
        // along this axis
        if eigenvalue <= TOL {
            break;
        }

        let scale = eigenvalue.sqrt();
        for (i, coord) in coords.iter_mut().enumerate() {
            if axis == 0 {
                coord.0 = scale * eigenvector[i];
            } else {
                coord.1 = scale * eigenvector[i];
            }
        }

        // Deflate: remove this component before extracting the next
        for i in 0..n {
            for j in 0..n {
                deflated[[i, j]] -= eigenvalue * eigenvector[i] * eigenvector[j];
            }
        }
    }

    Ok(coords)
}

/// Double-center squared distances into the Gram matrix
///
/// `B[i,j] = -0.5 * (d2[i,j] - rowmean[i] - colmean[j] + grandmean)`
fn double_center(distances: &Array2<f64>) -> Array2<f64> {
    let n = distances.nrows();

    let mut squared = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            squared[[i, j]] = distances[[i, j]] * distances[[i, j]];
        }
    }

    let row_means: Vec<f64> = (0..n).map(|i| squared.row(i).sum() / n as f64).collect();
    let grand_mean: f64 = row_means.iter().sum::<f64>() / n as f64;

    let mut gram = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            // Symmetric input, so column means equal row means
            gram[[i, j]] = -0.5 * (squared[[i, j]] - row_means[i] - row_means[j] + grand_mean);
        }
    }

    gram
}

/// Power iteration for the leading eigenpair of a symmetric matrix
///
/// The eigenvalue is the Rayleigh quotient of the converged vector, so a
/// negative leading eigenvalue is reported as such for the caller to clamp.
fn power_iteration(matrix: &Array2<f64>) -> (f64, Array1<f64>) {
    let n = matrix.nrows();

    // Deterministic non-degenerate start vector
    let mut v: Array1<f64> = Array1::from_iter((0..n).map(|i| ((i + 1) as f64).sin()));
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    v /= norm;

    let mut eigenvalue = 0.0;

    for _ in 0..MAX_ITER {
        let mut next = Array1::zeros(n);
        for i in 0..n {
            for j in 0..n {
                next[i] += matrix[[i, j]] * v[j];
            }
        }

        // Rayleigh quotient with the previous (unit) vector
        let new_eigenvalue: f64 = v.iter().zip(next.iter()).map(|(&a, &b)| a * b).sum();

        let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm < TOL {
            return (0.0, v);
        }
        next /= norm;

        if (new_eigenvalue - eigenvalue).abs() < TOL {
            return (new_eigenvalue, next);
        }

        eigenvalue = new_eigenvalue;
        v = next;
    }

    (eigenvalue, v)
}
