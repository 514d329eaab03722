//! JSON input/output
//!
//! The fitted model arrives as plain nested numeric arrays (the wire format
//! an external sampler writes); the prepared payload leaves as a single JSON
//! document for the viewer.

use std::fs;
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::vis::prepare::{FittedModel, PreparedData};
use crate::vis::VisError;

/// Serialized fitted-model inputs
///
/// Matrices are rows of numbers so any upstream tool can produce them
/// without knowing this crate's matrix types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInputs {
    /// Topic-term rows (K rows of W values)
    pub phi: Vec<Vec<f64>>,
    /// Document-topic rows (D rows of K values)
    pub theta: Vec<Vec<f64>>,
    pub doc_lengths: Vec<usize>,
    pub vocab: Vec<String>,
    pub term_frequencies: Vec<usize>,
}

impl ModelInputs {
    /// Load from a JSON file
    pub fn load_json(path: &Path) -> Result<Self, VisError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Convert into a validated [`FittedModel`]
    pub fn into_model(self) -> Result<FittedModel, VisError> {
        let phi = rows_to_matrix(self.phi, "phi")?;
        let theta = rows_to_matrix(self.theta, "theta")?;

        let model = FittedModel {
            phi,
            theta,
            doc_lengths: self.doc_lengths,
            vocab: self.vocab,
            term_frequencies: self.term_frequencies,
        };
        model.validate()?;
        Ok(model)
    }
}

/// Build a dense matrix from JSON rows, rejecting ragged input
fn rows_to_matrix(rows: Vec<Vec<f64>>, name: &str) -> Result<Array2<f64>, VisError> {
    let n_rows = rows.len();
    if n_rows == 0 {
        return Err(VisError::DimensionMismatch(format!("{} has no rows", name)));
    }

    let n_cols = rows[0].len();
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != n_cols {
            return Err(VisError::DimensionMismatch(format!(
                "{} row {} has {} values, expected {}",
                name,
                idx,
                row.len(),
                n_cols
            )));
        }
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| {
        VisError::DimensionMismatch(format!("{} could not be shaped: {}", name, e))
    })
}

/// Write the prepared payload as pretty-printed JSON
pub fn save_prepared(data: &PreparedData, path: &Path) -> Result<(), VisError> {
    let json = data.to_json()?;
    fs::write(path, json)?;
    Ok(())
}

/// Create a directory (and parents) if it does not exist
pub fn ensure_directory(path: &Path) -> Result<(), VisError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
