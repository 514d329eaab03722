//! Assembly of the viewer payload
//!
//! Validates the fitted-model inputs, derives topic marginals, runs the
//! distance/projection and relevance passes, and packages everything into a
//! single serializable structure.

use log::debug;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::distance::topic_distance_matrix;
use super::projection::project_topics;
use super::relevance::{relevance_matrix, saliency, top_terms};
use super::VisError;

/// Tolerance for probability rows summing to one
const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Immutable fitted-model inputs produced by an external sampler
///
/// The engine never mutates these; all derived quantities are computed
/// fresh from them.
#[derive(Debug, Clone)]
pub struct FittedModel {
    /// Topic-term matrix (K x W), each row a distribution over terms
    pub phi: Array2<f64>,
    /// Document-topic matrix (D x K), each row a distribution over topics
    pub theta: Array2<f64>,
    /// Token count per document (length D)
    pub doc_lengths: Vec<usize>,
    /// Vocabulary in positional order (length W)
    pub vocab: Vec<String>,
    /// Corpus-wide occurrence count per term (length W)
    pub term_frequencies: Vec<usize>,
}

impl FittedModel {
    /// Number of topics
    pub fn n_topics(&self) -> usize {
        self.phi.nrows()
    }

    /// Vocabulary size
    pub fn n_terms(&self) -> usize {
        self.phi.ncols()
    }

    /// Number of documents
    pub fn n_documents(&self) -> usize {
        self.theta.nrows()
    }

    /// Total token count
    pub fn total_tokens(&self) -> usize {
        self.term_frequencies.iter().sum()
    }

    /// Check every structural invariant before any computation
    ///
    /// Dimension mismatches and degenerate distributions are fatal; nothing
    /// downstream runs on a model that fails here.
    pub fn validate(&self) -> Result<(), VisError> {
        let k = self.n_topics();
        let w = self.n_terms();
        let d = self.n_documents();

        if k == 0 || w == 0 {
            return Err(VisError::DimensionMismatch(
                "phi must have at least one topic and one term".into(),
            ));
        }
        if self.theta.ncols() != k {
            return Err(VisError::DimensionMismatch(format!(
                "theta has {} topic columns but phi has {} topics",
                self.theta.ncols(),
                k
            )));
        }
        if self.vocab.len() != w {
            return Err(VisError::DimensionMismatch(format!(
                "vocabulary has {} terms but phi has {} columns",
                self.vocab.len(),
                w
            )));
        }
        if self.term_frequencies.len() != w {
            return Err(VisError::DimensionMismatch(format!(
                "{} term frequencies given but phi has {} columns",
                self.term_frequencies.len(),
                w
            )));
        }
        if self.doc_lengths.len() != d {
            return Err(VisError::DimensionMismatch(format!(
                "{} document lengths given but theta has {} rows",
                self.doc_lengths.len(),
                d
            )));
        }

        for (idx, &len) in self.doc_lengths.iter().enumerate() {
            if len == 0 {
                return Err(VisError::DegenerateDistribution(format!(
                    "document {} has zero length",
                    idx
                )));
            }
        }
        for (idx, &freq) in self.term_frequencies.iter().enumerate() {
            if freq == 0 {
                return Err(VisError::DegenerateDistribution(format!(
                    "term {} has zero corpus frequency",
                    idx
                )));
            }
        }

        check_row_stochastic(&self.phi, "phi")?;
        check_row_stochastic(&self.theta, "theta")?;

        Ok(())
    }
}

/// Verify that every row of a matrix is a probability distribution
fn check_row_stochastic(matrix: &Array2<f64>, name: &str) -> Result<(), VisError> {
    for row_idx in 0..matrix.nrows() {
        let row = matrix.row(row_idx);
        if row.iter().any(|&p| p < 0.0) {
            return Err(VisError::DegenerateDistribution(format!(
                "{} row {} has a negative entry",
                name, row_idx
            )));
        }
        let sum = row.sum();
        if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
            return Err(VisError::DegenerateDistribution(format!(
                "{} row {} sums to {} instead of 1",
                name, row_idx, sum
            )));
        }
    }
    Ok(())
}

/// Expected token count attributable to each topic
///
/// `freq[t] = sum_d theta[d,t] * doc_lengths[d]`; the frequencies sum to the
/// total token count because every theta row sums to one.
pub fn topic_frequencies(
    theta: &Array2<f64>,
    doc_lengths: &[usize],
) -> Result<Vec<f64>, VisError> {
    if theta.nrows() != doc_lengths.len() {
        return Err(VisError::DimensionMismatch(format!(
            "theta has {} rows but {} document lengths were given",
            theta.nrows(),
            doc_lengths.len()
        )));
    }

    let n_topics = theta.ncols();
    let mut frequencies = vec![0.0; n_topics];

    for (doc_idx, &len) in doc_lengths.iter().enumerate() {
        for topic in 0..n_topics {
            frequencies[topic] += theta[[doc_idx, topic]] * len as f64;
        }
    }

    Ok(frequencies)
}

/// Preparation configuration
#[derive(Debug, Clone)]
pub struct PrepareConfig {
    /// Number of terms to keep per topic (clamped to the vocabulary size)
    pub r: usize,
    /// Resolution of the lambda grid over [0, 1]
    pub lambda_step: f64,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            r: 30,
            lambda_step: 0.01,
        }
    }
}

impl PrepareConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of terms per topic
    pub fn r(mut self, r: usize) -> Self {
        self.r = r;
        self
    }

    /// Set the lambda grid step
    pub fn lambda_step(mut self, step: f64) -> Self {
        self.lambda_step = step;
        self
    }

    fn validate(&self) -> Result<(), VisError> {
        if self.r == 0 {
            return Err(VisError::InvalidParameter(
                "r must be at least 1".into(),
            ));
        }
        if !(self.lambda_step > 0.0 && self.lambda_step <= 1.0) {
            return Err(VisError::InvalidParameter(format!(
                "lambda_step must be in (0, 1], got {}",
                self.lambda_step
            )));
        }
        Ok(())
    }

    /// The lambda grid: 0, step, 2*step, ..., always ending at exactly 1
    fn lambda_grid(&self) -> Vec<f64> {
        let n = (1.0 / self.lambda_step).ceil() as usize;
        let mut grid: Vec<f64> = (0..=n)
            .map(|i| (i as f64 * self.lambda_step).min(1.0))
            .collect();
        grid.dedup();
        grid
    }
}

/// 2D position and marginal weight of a single topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCoordinate {
    /// Topic index (input order)
    pub topic: usize,
    pub x: f64,
    pub y: f64,
    /// Expected token count attributable to this topic
    pub frequency: f64,
    /// Frequency as a share of the corpus
    pub proportion: f64,
}

/// One ranked term within a topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    /// Relevance at the slice's lambda
    pub relevance: f64,
    /// ln p(w|t)
    pub log_prob: f64,
    /// ln(p(w|t) / p(w))
    pub log_lift: f64,
    /// Corpus-wide distinctiveness of the term
    pub saliency: f64,
}

/// Ranked term lists for every topic at one lambda grid point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LambdaSlice {
    pub lambda: f64,
    /// One ranked list per topic, input topic order
    pub topics: Vec<Vec<TermEntry>>,
}

/// Everything a browser viewer needs, ready for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparedData {
    pub n_topics: usize,
    pub n_terms: usize,
    pub n_documents: usize,
    pub total_tokens: usize,
    /// Terms kept per topic after clamping to the vocabulary size
    pub r: usize,
    pub lambda_step: f64,
    pub topic_coordinates: Vec<TopicCoordinate>,
    pub lambda_grid: Vec<LambdaSlice>,
}

impl PreparedData {
    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, VisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full preparation pipeline
///
/// Validates the model and configuration, computes the topic layout and
/// marginals once, then sweeps the lambda grid. Each grid point is
/// independent of the others; results are assembled in grid order.
pub fn prepare(model: &FittedModel, config: &PrepareConfig) -> Result<PreparedData, VisError> {
    model.validate()?;
    config.validate()?;

    let k = model.n_topics();
    let w = model.n_terms();
    let r = config.r.min(w);
    let total_tokens = model.total_tokens();

    debug!("preparing visualization data for {} topics, {} terms", k, w);

    // Topic layout from inter-topic distances
    let distances = topic_distance_matrix(&model.phi)?;
    let coords = project_topics(&distances)?;

    // Topic marginals
    let frequencies = topic_frequencies(&model.theta, &model.doc_lengths)?;
    let freq_total: f64 = frequencies.iter().sum();

    let topic_coordinates: Vec<TopicCoordinate> = (0..k)
        .map(|t| TopicCoordinate {
            topic: t,
            x: coords[t].0,
            y: coords[t].1,
            frequency: frequencies[t],
            proportion: frequencies[t] / freq_total,
        })
        .collect();

    // Lambda-independent per-term scores
    let proportions: Vec<f64> = frequencies.iter().map(|&f| f / freq_total).collect();
    let saliencies = saliency(&model.phi, &model.term_frequencies, &proportions)?;

    let n = total_tokens as f64;
    let log_pw: Vec<f64> = model
        .term_frequencies
        .iter()
        .map(|&f| (f as f64 / n).ln())
        .collect();

    // Sweep the lambda grid
    let lambdas = config.lambda_grid();
    let mut lambda_grid = Vec::with_capacity(lambdas.len());

    for &lambda in &lambdas {
        let relevance = relevance_matrix(&model.phi, &model.term_frequencies, lambda)?;
        let ranked = top_terms(&relevance, r);

        let topics: Vec<Vec<TermEntry>> = ranked
            .into_iter()
            .enumerate()
            .map(|(topic, terms)| {
                terms
                    .into_iter()
                    .map(|(word, rel)| {
                        let p = model.phi[[topic, word]];
                        let log_prob = if p > 0.0 { p.ln() } else { f64::NEG_INFINITY };
                        TermEntry {
                            term: model.vocab[word].clone(),
                            relevance: rel,
                            log_prob,
                            log_lift: log_prob - log_pw[word],
                            saliency: saliencies[word],
                        }
                    })
                    .collect()
            })
            .collect();

        lambda_grid.push(LambdaSlice { lambda, topics });
    }

    debug!("prepared {} lambda grid points", lambda_grid.len());

    Ok(PreparedData {
        n_topics: k,
        n_terms: w,
        n_documents: model.n_documents(),
        total_tokens,
        r,
        lambda_step: config.lambda_step,
        topic_coordinates,
        lambda_grid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    /// The two-topic, four-term model used throughout: each topic has one
    /// dominant term, uniform corpus frequencies.
    fn two_topic_model() -> FittedModel {
        FittedModel {
            phi: arr2(&[
                [0.7, 0.1, 0.1, 0.1],
                [0.1, 0.1, 0.1, 0.7],
            ]),
            theta: arr2(&[
                [0.9, 0.1],
                [0.2, 0.8],
                [0.5, 0.5],
                [0.6, 0.4],
            ]),
            doc_lengths: vec![10, 10, 10, 10],
            vocab: vec![
                "thriller".into(),
                "pacing".into(),
                "cast".into(),
                "comedy".into(),
            ],
            term_frequencies: vec![10, 10, 10, 10],
        }
    }

    #[test]
    fn test_validate_accepts_consistent_model() {
        assert!(two_topic_model().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_dimension_mismatch() {
        let mut model = two_topic_model();
        model.vocab.pop();
        assert!(matches!(
            model.validate(),
            Err(VisError::DimensionMismatch(_))
        ));

        let mut model = two_topic_model();
        model.doc_lengths.push(5);
        assert!(model.validate().is_err());

        let mut model = two_topic_model();
        model.theta = arr2(&[[1.0, 0.0, 0.0]]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_stochastic_rows() {
        let mut model = two_topic_model();
        model.phi[[0, 0]] = 0.5;
        assert!(matches!(
            model.validate(),
            Err(VisError::DegenerateDistribution(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_doc_length() {
        let mut model = two_topic_model();
        model.doc_lengths[2] = 0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_topic_frequencies_sum_to_token_count() {
        let model = two_topic_model();
        let frequencies = topic_frequencies(&model.theta, &model.doc_lengths).unwrap();

        let total: f64 = frequencies.iter().sum();
        assert!((total - 40.0).abs() < 1e-9);

        // theta column sums weighted by uniform lengths
        assert!((frequencies[0] - 22.0).abs() < 1e-9);
        assert!((frequencies[1] - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_validation() {
        assert!(PrepareConfig::new().validate().is_ok());
        assert!(PrepareConfig::new().r(0).validate().is_err());
        assert!(PrepareConfig::new().lambda_step(0.0).validate().is_err());
        assert!(PrepareConfig::new().lambda_step(1.5).validate().is_err());
    }

    #[test]
    fn test_lambda_grid_endpoints() {
        let grid = PrepareConfig::new().lambda_step(0.25).lambda_grid();
        assert_eq!(grid, vec![0.0, 0.25, 0.5, 0.75, 1.0]);

        // A step that does not divide 1 evenly still ends at exactly 1
        let grid = PrepareConfig::new().lambda_step(0.3).lambda_grid();
        assert_eq!(*grid.first().unwrap(), 0.0);
        assert_eq!(*grid.last().unwrap(), 1.0);
    }

    #[test]
    fn test_prepare_end_to_end() {
        let model = two_topic_model();
        let config = PrepareConfig::new().r(2).lambda_step(0.5);

        let prepared = prepare(&model, &config).unwrap();

        assert_eq!(prepared.n_topics, 2);
        assert_eq!(prepared.n_terms, 4);
        assert_eq!(prepared.total_tokens, 40);
        assert_eq!(prepared.topic_coordinates.len(), 2);
        assert_eq!(prepared.lambda_grid.len(), 3); // 0, 0.5, 1

        // Dominant terms lead their topics at both lambda extremes
        for slice in &prepared.lambda_grid {
            assert_eq!(slice.topics[0][0].term, "thriller");
            assert_eq!(slice.topics[1][0].term, "comedy");
            assert_eq!(slice.topics[0].len(), 2);
        }

        // Proportions sum to one
        let prop_total: f64 = prepared
            .topic_coordinates
            .iter()
            .map(|c| c.proportion)
            .sum();
        assert!((prop_total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_prepare_clamps_r() {
        let model = two_topic_model();
        let config = PrepareConfig::new().r(100).lambda_step(1.0);

        let prepared = prepare(&model, &config).unwrap();
        assert_eq!(prepared.r, 4);
        for slice in &prepared.lambda_grid {
            for topic in &slice.topics {
                assert_eq!(topic.len(), 4);
            }
        }
    }

    #[test]
    fn test_prepare_rejects_invalid_model() {
        let mut model = two_topic_model();
        model.term_frequencies[1] = 0;
        assert!(prepare(&model, &PrepareConfig::new()).is_err());
    }

    #[test]
    fn test_prepared_data_serializes() {
        let model = two_topic_model();
        let config = PrepareConfig::new().r(3).lambda_step(0.5);

        let prepared = prepare(&model, &config).unwrap();
        let json = prepared.to_json().unwrap();

        assert!(json.contains("\"topic_coordinates\""));
        assert!(json.contains("\"lambda_grid\""));
        assert!(json.contains("\"thriller\""));

        let round_trip: PreparedData = serde_json::from_str(&json).unwrap();
        assert_eq!(round_trip.n_topics, 2);
    }

    #[test]
    fn test_log_prob_and_lift_consistent_with_relevance() {
        let model = two_topic_model();
        let config = PrepareConfig::new().r(4).lambda_step(1.0);

        let prepared = prepare(&model, &config).unwrap();
        for slice in &prepared.lambda_grid {
            for topic in &slice.topics {
                for entry in topic {
                    let expected = slice.lambda * entry.log_prob
                        + (1.0 - slice.lambda) * entry.log_lift;
                    assert!((entry.relevance - expected).abs() < 1e-9);
                }
            }
        }
    }
}
