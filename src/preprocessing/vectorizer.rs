//! Bag-of-words vectorization
//!
//! Converts tokenized documents into a count matrix plus the corpus
//! marginals (per-document token counts and corpus-wide term frequencies)
//! that downstream visualization requires.

use hashbrown::HashMap;
use ndarray::Array2;
use std::collections::HashSet;

/// Bag-of-words corpus: the count matrix together with the marginal
/// statistics derived from it.
///
/// Invariant: `doc_lengths` are the row sums of `counts` and
/// `term_frequencies` are its column sums, so both sum to the same total
/// token count.
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Count matrix (n_documents x n_terms)
    pub counts: Array2<f64>,
    /// Term -> index mapping
    pub vocabulary: HashMap<String, usize>,
    /// Index -> term, positional vocabulary order
    pub terms: Vec<String>,
    /// Token count per document (row sums)
    pub doc_lengths: Vec<usize>,
    /// Corpus-wide occurrence count per term (column sums)
    pub term_frequencies: Vec<usize>,
}

impl Corpus {
    /// Get number of documents
    pub fn n_documents(&self) -> usize {
        self.counts.nrows()
    }

    /// Get vocabulary size
    pub fn n_terms(&self) -> usize {
        self.counts.ncols()
    }

    /// Total token count across the corpus
    pub fn total_tokens(&self) -> usize {
        self.term_frequencies.iter().sum()
    }

    /// Indices of documents that lost every token to vocabulary pruning
    pub fn empty_documents(&self) -> Vec<usize> {
        self.doc_lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len == 0)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Count Vectorizer (Bag of Words)
///
/// Builds a pruned vocabulary from tokenized documents and produces a
/// [`Corpus`] with count matrix and marginals.
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    /// Minimum document frequency for a term to be kept
    min_df: usize,
    /// Maximum document frequency ratio for a term to be kept
    max_df_ratio: f64,
    /// Maximum vocabulary size
    max_features: Option<usize>,
}

impl CountVectorizer {
    /// Create a new count vectorizer
    pub fn new() -> Self {
        Self {
            min_df: 1,
            max_df_ratio: 1.0,
            max_features: None,
        }
    }

    /// Set minimum document frequency
    pub fn min_df(mut self, min_df: usize) -> Self {
        self.min_df = min_df;
        self
    }

    /// Set maximum document frequency ratio
    pub fn max_df_ratio(mut self, ratio: f64) -> Self {
        self.max_df_ratio = ratio;
        self
    }

    /// Set maximum vocabulary size
    pub fn max_features(mut self, max: usize) -> Self {
        self.max_features = Some(max);
        self
    }

    /// Build a corpus from tokenized documents
    ///
    /// Vocabulary selection: terms are filtered by document frequency,
    /// the most frequent `max_features` survive, and the final vocabulary
    /// is ordered alphabetically so term indices are deterministic.
    pub fn fit_transform(&self, tokenized_docs: &[Vec<String>]) -> Corpus {
        let n_docs = tokenized_docs.len();

        // Document and total frequencies per term
        let mut term_doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_total_freq: HashMap<String, usize> = HashMap::new();

        for doc in tokenized_docs {
            let unique_terms: HashSet<&String> = doc.iter().collect();
            for term in &unique_terms {
                *term_doc_freq.entry((*term).clone()).or_insert(0) += 1;
            }
            for term in doc {
                *term_total_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Filter by document frequency
        let max_df = (n_docs as f64 * self.max_df_ratio) as usize;
        let mut filtered_terms: Vec<(String, usize)> = term_doc_freq
            .into_iter()
            .filter(|(_, df)| *df >= self.min_df && *df <= max_df)
            .map(|(term, _)| {
                let total = term_total_freq.get(&term).copied().unwrap_or(0);
                (term, total)
            })
            .collect();

        // Keep the most frequent terms when capped
        filtered_terms.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(max) = self.max_features {
            filtered_terms.truncate(max);
        }

        // Alphabetical order for stable term indices
        filtered_terms.sort_by(|a, b| a.0.cmp(&b.0));

        let mut vocabulary = HashMap::new();
        let mut terms = Vec::with_capacity(filtered_terms.len());
        for (idx, (term, _)) in filtered_terms.into_iter().enumerate() {
            vocabulary.insert(term.clone(), idx);
            terms.push(term);
        }

        // Count matrix and marginals
        let n_terms = terms.len();
        let mut counts = Array2::zeros((n_docs, n_terms));

        for (doc_idx, doc) in tokenized_docs.iter().enumerate() {
            for term in doc {
                if let Some(&term_idx) = vocabulary.get(term) {
                    counts[[doc_idx, term_idx]] += 1.0;
                }
            }
        }

        let doc_lengths: Vec<usize> = (0..n_docs)
            .map(|d| counts.row(d).sum() as usize)
            .collect();
        let term_frequencies: Vec<usize> = (0..n_terms)
            .map(|w| counts.column(w).sum() as usize)
            .collect();

        Corpus {
            counts,
            vocabulary,
            terms,
            doc_lengths,
            term_frequencies,
        }
    }
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}
