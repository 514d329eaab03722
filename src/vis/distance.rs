//! Inter-topic distances
//!
//! Topics are probability distributions over the vocabulary, so they are
//! compared with Jensen-Shannon divergence: symmetric, bounded by ln 2, and
//! finite even where supports differ.

use ndarray::{Array2, ArrayView1};

use super::VisError;

/// Jensen-Shannon divergence between two distributions (natural log)
///
/// `JS(p, q) = 0.5 * KL(p || m) + 0.5 * KL(q || m)` with `m = (p + q) / 2`.
/// Zero-probability components contribute nothing to their KL term.
pub fn jensen_shannon(p: ArrayView1<f64>, q: ArrayView1<f64>) -> f64 {
    let mut js = 0.0;

    for (&pi, &qi) in p.iter().zip(q.iter()) {
        let mi = 0.5 * (pi + qi);
        if pi > 0.0 {
            js += 0.5 * pi * (pi / mi).ln();
        }
        if qi > 0.0 {
            js += 0.5 * qi * (qi / mi).ln();
        }
    }

    // Floating error can leave a tiny negative residue for near-identical rows
    js.max(0.0)
}

/// Pairwise Jensen-Shannon distance matrix between topic rows
///
/// Returns a K x K symmetric matrix with an exactly-zero diagonal. A phi row
/// summing to zero indicates invalid sampler output and is rejected.
pub fn topic_distance_matrix(phi: &Array2<f64>) -> Result<Array2<f64>, VisError> {
    let n_topics = phi.nrows();

    for topic in 0..n_topics {
        if phi.row(topic).sum() <= 0.0 {
            return Err(VisError::DegenerateDistribution(format!(
                "topic {} has zero total probability",
                topic
            )));
        }
    }

    let mut distances = Array2::zeros((n_topics, n_topics));
    for i in 0..n_topics {
        for j in (i + 1)..n_topics {
            let d = jensen_shannon(phi.row(i), phi.row(j));
            distances[[i, j]] = d;
            distances[[j, i]] = d;
        }
    }

    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    const LN_2: f64 = std::f64::consts::LN_2;

    #[test]
    fn test_identical_distributions() {
        let p = arr1(&[0.3, 0.3, 0.4]);
        let js = jensen_shannon(p.view(), p.view());
        assert!(js.abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_supports_reach_ln2() {
        let p = arr1(&[1.0, 0.0]);
        let q = arr1(&[0.0, 1.0]);
        let js = jensen_shannon(p.view(), q.view());
        assert!((js - LN_2).abs() < 1e-12);
    }

    #[test]
    fn test_distance_matrix_properties() {
        let phi = arr2(&[
            [0.7, 0.1, 0.1, 0.1],
            [0.1, 0.7, 0.1, 0.1],
            [0.25, 0.25, 0.25, 0.25],
        ]);

        let distances = topic_distance_matrix(&phi).unwrap();

        for i in 0..3 {
            // Exactly-zero diagonal
            assert_eq!(distances[[i, i]], 0.0);
            for j in 0..3 {
                // Symmetry and JS bounds
                assert_eq!(distances[[i, j]], distances[[j, i]]);
                assert!(distances[[i, j]] >= 0.0);
                assert!(distances[[i, j]] <= LN_2 + 1e-12);
            }
        }

        // Skewed topics are farther from each other than from uniform
        assert!(distances[[0, 1]] > distances[[0, 2]]);
    }

    #[test]
    fn test_zero_row_rejected() {
        let phi = arr2(&[
            [0.5, 0.5],
            [0.0, 0.0],
        ]);
        assert!(topic_distance_matrix(&phi).is_err());
    }
}
