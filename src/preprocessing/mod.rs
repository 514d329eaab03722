//! Text preprocessing
//!
//! Turns raw documents into the bag-of-words statistics the visualization
//! engine consumes: tokenization, vocabulary pruning, and corpus marginals
//! (document lengths and corpus-wide term frequencies).

pub mod tokenizer;
pub mod vectorizer;
