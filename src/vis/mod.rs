//! Relevance & projection engine
//!
//! Given a fitted topic model (topic-term matrix phi, document-topic matrix
//! theta) and corpus marginals, this module produces everything an
//! interactive viewer needs:
//! - per-topic term rankings under a grid of relevance weights
//! - pairwise Jensen-Shannon distances between topics
//! - a 2D principal-coordinates layout of the topics
//!
//! All computation is deterministic and operates on immutable inputs.

use thiserror::Error;

pub mod distance;
pub mod prepare;
pub mod projection;
pub mod relevance;

/// Errors that can occur while preparing visualization data
#[derive(Error, Debug)]
pub enum VisError {
    #[error("matrix dimensions mismatch: {0}")]
    DimensionMismatch(String),

    #[error("lambda must be in [0, 1], got {0}")]
    InvalidLambda(f64),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("degenerate distribution: {0}")]
    DegenerateDistribution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
