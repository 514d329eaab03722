//! Term relevance ranking
//!
//! Relevance balances a term's probability within a topic against its lift
//! (probability within the topic relative to its corpus-wide marginal):
//!
//! ```text
//! relevance(t, w, lambda) = lambda * ln p(w|t) + (1 - lambda) * ln(p(w|t) / p(w))
//! ```
//!
//! Computed in the log domain so rare terms do not underflow. At lambda = 1
//! the ranking follows p(w|t) alone; at lambda = 0 it follows lift alone.

use ndarray::Array2;

use super::VisError;

/// Compute the K x W relevance matrix for a single lambda
///
/// Terms with zero probability in a topic get relevance negative infinity,
/// so they can never outrank a term the topic actually uses.
pub fn relevance_matrix(
    phi: &Array2<f64>,
    term_frequencies: &[usize],
    lambda: f64,
) -> Result<Array2<f64>, VisError> {
    if !(0.0..=1.0).contains(&lambda) {
        return Err(VisError::InvalidLambda(lambda));
    }
    if phi.ncols() != term_frequencies.len() {
        return Err(VisError::DimensionMismatch(format!(
            "phi has {} columns but {} term frequencies were given",
            phi.ncols(),
            term_frequencies.len()
        )));
    }

    let total: usize = term_frequencies.iter().sum();
    if total == 0 {
        return Err(VisError::DegenerateDistribution(
            "all term frequencies are zero".into(),
        ));
    }
    if let Some(idx) = term_frequencies.iter().position(|&f| f == 0) {
        return Err(VisError::DegenerateDistribution(format!(
            "term {} has zero corpus frequency",
            idx
        )));
    }

    let n = total as f64;
    let log_pw: Vec<f64> = term_frequencies
        .iter()
        .map(|&f| (f as f64 / n).ln())
        .collect();

    let mut relevance = Array2::zeros((phi.nrows(), phi.ncols()));
    for topic in 0..phi.nrows() {
        for word in 0..phi.ncols() {
            let p = phi[[topic, word]];
            relevance[[topic, word]] = if p > 0.0 {
                let log_p = p.ln();
                lambda * log_p + (1.0 - lambda) * (log_p - log_pw[word])
            } else {
                f64::NEG_INFINITY
            };
        }
    }

    Ok(relevance)
}

/// Select the top-R terms per topic by relevance
///
/// Returns, for each topic, `min(r, W)` pairs of (term index, relevance) in
/// descending relevance order. Exact ties are broken by ascending term index
/// so the output is deterministic.
pub fn top_terms(relevance: &Array2<f64>, r: usize) -> Vec<Vec<(usize, f64)>> {
    let n_terms = relevance.ncols();
    let keep = r.min(n_terms);

    (0..relevance.nrows())
        .map(|topic| {
            let mut ranked: Vec<(usize, f64)> = relevance
                .row(topic)
                .iter()
                .enumerate()
                .map(|(idx, &score)| (idx, score))
                .collect();

            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });
            ranked.truncate(keep);
            ranked
        })
        .collect()
}

/// Per-term saliency: distinctiveness weighted by corpus frequency
///
/// `saliency(w) = p(w) * sum_t p(t|w) * ln(p(t|w) / p(t))`, where p(t|w) is
/// obtained from phi and the topic proportions by Bayes' rule. The inner sum
/// is a KL divergence, so saliency is always non-negative.
pub fn saliency(
    phi: &Array2<f64>,
    term_frequencies: &[usize],
    topic_proportions: &[f64],
) -> Result<Vec<f64>, VisError> {
    if phi.ncols() != term_frequencies.len() {
        return Err(VisError::DimensionMismatch(format!(
            "phi has {} columns but {} term frequencies were given",
            phi.ncols(),
            term_frequencies.len()
        )));
    }
    if phi.nrows() != topic_proportions.len() {
        return Err(VisError::DimensionMismatch(format!(
            "phi has {} rows but {} topic proportions were given",
            phi.nrows(),
            topic_proportions.len()
        )));
    }

    let total: usize = term_frequencies.iter().sum();
    if total == 0 {
        return Err(VisError::DegenerateDistribution(
            "all term frequencies are zero".into(),
        ));
    }
    let n = total as f64;

    let n_topics = phi.nrows();
    let mut saliencies = Vec::with_capacity(phi.ncols());

    for word in 0..phi.ncols() {
        // Joint p(t, w) up to the common normalizer p(w)
        let joint: Vec<f64> = (0..n_topics)
            .map(|t| phi[[t, word]] * topic_proportions[t])
            .collect();
        let norm: f64 = joint.iter().sum();

        let distinctiveness = if norm > 0.0 {
            (0..n_topics)
                .map(|t| {
                    let p_t_given_w = joint[t] / norm;
                    if p_t_given_w > 0.0 && topic_proportions[t] > 0.0 {
                        p_t_given_w * (p_t_given_w / topic_proportions[t]).ln()
                    } else {
                        0.0
                    }
                })
                .sum()
        } else {
            0.0
        };

        let p_w = term_frequencies[word] as f64 / n;
        saliencies.push(p_w * distinctiveness);
    }

    Ok(saliencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    fn test_phi() -> Array2<f64> {
        arr2(&[
            [0.7, 0.1, 0.1, 0.1],
            [0.1, 0.1, 0.1, 0.7],
        ])
    }

    #[test]
    fn test_invalid_lambda_rejected() {
        let phi = test_phi();
        let tf = vec![10, 10, 10, 10];

        assert!(relevance_matrix(&phi, &tf, -0.1).is_err());
        assert!(relevance_matrix(&phi, &tf, 1.1).is_err());
        assert!(relevance_matrix(&phi, &tf, 0.0).is_ok());
        assert!(relevance_matrix(&phi, &tf, 1.0).is_ok());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let phi = test_phi();
        let tf = vec![10, 10, 10];
        assert!(relevance_matrix(&phi, &tf, 0.5).is_err());
    }

    #[test]
    fn test_zero_frequencies_rejected() {
        let phi = test_phi();
        assert!(relevance_matrix(&phi, &[0, 0, 0, 0], 0.5).is_err());
        assert!(relevance_matrix(&phi, &[10, 0, 10, 10], 0.5).is_err());
    }

    #[test]
    fn test_lambda_one_ranks_by_probability() {
        let phi = test_phi();
        // Skewed frequencies so a pure lift ranking would differ
        let tf = vec![70, 10, 10, 10];

        let relevance = relevance_matrix(&phi, &tf, 1.0).unwrap();
        let ranked = top_terms(&relevance, 4);

        // At lambda = 1 relevance is ln p(w|t), so term 0 leads topic 0
        assert_eq!(ranked[0][0].0, 0);
        assert!((relevance[[0, 0]] - 0.7_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_lambda_zero_ranks_by_lift() {
        // Term 0 is probable everywhere, term 1 is exclusive to topic 0
        let phi = arr2(&[
            [0.5, 0.4, 0.1],
            [0.5, 0.0, 0.5],
        ]);
        let tf = vec![100, 4, 60];

        let relevance = relevance_matrix(&phi, &tf, 0.0).unwrap();
        let ranked = top_terms(&relevance, 3);

        // lift(0, term 1) = 0.4 / (4/164) is far above lift for term 0
        assert_eq!(ranked[0][0].0, 1);
    }

    #[test]
    fn test_zero_probability_is_never_ranked_first() {
        let phi = arr2(&[
            [0.5, 0.0, 0.5],
        ]);
        let tf = vec![5, 5, 5];

        let relevance = relevance_matrix(&phi, &tf, 0.3).unwrap();
        assert_eq!(relevance[[0, 1]], f64::NEG_INFINITY);

        let ranked = top_terms(&relevance, 3);
        assert_eq!(ranked[0][2].0, 1); // dead last
    }

    #[test]
    fn test_top_terms_tie_break_by_index() {
        // Uniform row: every relevance value is identical
        let phi = arr2(&[[0.25, 0.25, 0.25, 0.25]]);
        let tf = vec![10, 10, 10, 10];

        let relevance = relevance_matrix(&phi, &tf, 0.5).unwrap();
        let ranked = top_terms(&relevance, 4);

        let indices: Vec<usize> = ranked[0].iter().map(|(idx, _)| *idx).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_top_terms_clamps_r_to_vocabulary() {
        let phi = test_phi();
        let tf = vec![10, 10, 10, 10];

        let relevance = relevance_matrix(&phi, &tf, 0.5).unwrap();
        let ranked = top_terms(&relevance, 30);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].len(), 4); // min(30, W)
        assert_eq!(ranked[1].len(), 4);
    }

    #[test]
    fn test_top_terms_descending() {
        let phi = test_phi();
        let tf = vec![10, 20, 30, 40];

        let relevance = relevance_matrix(&phi, &tf, 0.4).unwrap();
        for topic in top_terms(&relevance, 4) {
            for pair in topic.windows(2) {
                assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    #[test]
    fn test_saliency_non_negative() {
        let phi = test_phi();
        let tf = vec![10, 10, 10, 10];
        let proportions = vec![0.5, 0.5];

        let saliencies = saliency(&phi, &tf, &proportions).unwrap();
        assert_eq!(saliencies.len(), 4);
        for s in &saliencies {
            assert!(*s >= 0.0);
        }
    }

    #[test]
    fn test_saliency_favors_exclusive_terms() {
        // Term 0 spread evenly, term 1 concentrated in topic 0
        let phi = arr2(&[
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
        ]);
        let tf = vec![10, 10, 10];
        let proportions = vec![0.5, 0.5];

        let saliencies = saliency(&phi, &tf, &proportions).unwrap();
        assert!(saliencies[1] > saliencies[0]);
        // Evenly spread term carries no distinctiveness
        assert!(saliencies[0].abs() < 1e-12);
    }
}
