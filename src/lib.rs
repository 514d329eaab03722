//! # ldavis - Topic Model Visualization Preparation
//!
//! This library turns a fitted topic model (topic-term and document-topic
//! probability matrices) into the data a browser-based viewer needs:
//! per-topic ranked term lists under a grid of relevance weights, pairwise
//! topic distances, and a 2D layout of the topics.
//!
//! ## Modules
//!
//! - `preprocessing` - Tokenization and bag-of-words corpus statistics
//! - `vis` - Relevance ranking, topic distances, and MDS projection
//! - `utils` - JSON input/output helpers
//!
//! The topic model itself is an external collaborator: phi and theta are
//! consumed as immutable, already-fitted inputs.

pub mod preprocessing;
pub mod utils;
pub mod vis;

pub use preprocessing::tokenizer::Tokenizer;
pub use preprocessing::vectorizer::{Corpus, CountVectorizer};
pub use vis::prepare::{prepare, FittedModel, PrepareConfig, PreparedData};
pub use vis::VisError;
