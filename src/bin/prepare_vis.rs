//! Topic Visualization Preparation Example
//!
//! This example demonstrates how to:
//! - Preprocess a small review corpus into bag-of-words form
//! - Stand in for an external sampler with a seeded synthetic fitted model
//! - Prepare relevance rankings and a 2D topic layout
//! - Serialize the result as JSON for a browser viewer
//!
//! Pass a path to a model-inputs JSON file to prepare a real fitted model
//! instead of the synthetic one.

use anyhow::Result;
use ndarray::Array2;
use rand::prelude::*;
use rand_distr::Dirichlet;
use std::path::{Path, PathBuf};

use ldavis::utils::io::{ensure_directory, save_prepared, ModelInputs};
use ldavis::{prepare, CountVectorizer, FittedModel, PrepareConfig, Tokenizer};

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Topic Visualization Preparation Example ===\n");

    let model = match std::env::args().nth(1) {
        Some(path) => {
            println!("Loading fitted model from {}...", path);
            ModelInputs::load_json(Path::new(&path))?.into_model()?
        }
        None => build_synthetic_model()?,
    };

    println!(
        "Model: {} topics x {} terms, {} documents, {} tokens\n",
        model.n_topics(),
        model.n_terms(),
        model.n_documents(),
        model.total_tokens()
    );

    // Prepare the viewer payload
    println!("Preparing visualization data...");
    let config = PrepareConfig::new().r(10).lambda_step(0.1);
    let prepared = prepare(&model, &config)?;
    println!(
        "  {} lambda grid points, {} terms per topic\n",
        prepared.lambda_grid.len(),
        prepared.r
    );

    // Topic layout
    println!("=== Topic Layout ===\n");
    for coord in &prepared.topic_coordinates {
        println!(
            "  Topic {}: ({:+.3}, {:+.3})  share {:.1}%",
            coord.topic,
            coord.x,
            coord.y,
            coord.proportion * 100.0
        );
    }

    // Term rankings at a mid-grid lambda
    let slice = &prepared.lambda_grid[prepared.lambda_grid.len() / 2];
    println!("\n=== Top Terms (lambda = {:.2}) ===\n", slice.lambda);
    for (topic_idx, terms) in slice.topics.iter().enumerate() {
        let listing: Vec<String> = terms
            .iter()
            .take(6)
            .map(|entry| format!("{} ({:.2})", entry.term, entry.relevance))
            .collect();
        println!("  Topic {}: {}", topic_idx, listing.join(", "));
    }

    // Write the payload
    let out_dir = PathBuf::from("output");
    ensure_directory(&out_dir)?;
    let out_path = out_dir.join("prepared.json");
    save_prepared(&prepared, &out_path)?;
    println!("\nWrote viewer payload to {:?}", out_path);

    println!("\n=== Example Complete ===");
    Ok(())
}

/// Build a fitted model over the sample corpus
///
/// The corpus statistics (vocabulary, document lengths, term frequencies)
/// are real; phi and theta are seeded Dirichlet draws standing in for the
/// external sampler that would normally produce them.
fn build_synthetic_model() -> Result<FittedModel> {
    println!("Step 1: Tokenizing sample reviews...");
    let documents = sample_reviews();
    let tokenizer = Tokenizer::for_reviews().min_length(3);
    let tokenized = tokenizer.tokenize_documents(&documents);

    println!("Step 2: Building bag-of-words corpus...");
    let corpus = CountVectorizer::new().min_df(1).fit_transform(&tokenized);
    println!(
        "  {} documents x {} terms, {} tokens",
        corpus.n_documents(),
        corpus.n_terms(),
        corpus.total_tokens()
    );

    // Vocabulary pruning can empty a document; such rows have no length and
    // cannot carry a topic distribution
    let kept: Vec<usize> = (0..corpus.n_documents())
        .filter(|&d| corpus.doc_lengths[d] > 0)
        .collect();

    println!("Step 3: Drawing synthetic topic distributions (seeded)...");
    let n_topics = 4;
    let mut rng = StdRng::seed_from_u64(42);

    let phi_alpha = vec![0.1; corpus.n_terms()];
    let phi_dist = Dirichlet::new(&phi_alpha)?;
    let mut phi = Array2::zeros((n_topics, corpus.n_terms()));
    for topic in 0..n_topics {
        let row = phi_dist.sample(&mut rng);
        for (word, value) in row.into_iter().enumerate() {
            phi[[topic, word]] = value;
        }
    }

    let theta_alpha = vec![0.5; n_topics];
    let theta_dist = Dirichlet::new(&theta_alpha)?;
    let mut theta = Array2::zeros((kept.len(), n_topics));
    for doc in 0..kept.len() {
        let row = theta_dist.sample(&mut rng);
        for (topic, value) in row.into_iter().enumerate() {
            theta[[doc, topic]] = value;
        }
    }

    Ok(FittedModel {
        phi,
        theta,
        doc_lengths: kept.iter().map(|&d| corpus.doc_lengths[d]).collect(),
        vocab: corpus.terms.clone(),
        term_frequencies: corpus.term_frequencies.clone(),
    })
}

/// Small embedded review corpus with a few clear themes
fn sample_reviews() -> Vec<String> {
    let texts = vec![
        // Theme: suspense and plot
        "A gripping thriller with plot twists that kept me guessing until the final reveal",
        "The suspense builds slowly but the payoff in the last act is worth every minute",
        "Tense pacing and a clever mystery plot make this a standout thriller",
        "The detective story unfolds with sharp twists and a satisfying resolution",

        // Theme: acting and performances
        "Outstanding performances from the entire cast elevate an otherwise ordinary script",
        "The lead actor delivers a nuanced performance full of quiet emotional depth",
        "Brilliant supporting cast though the dialogue occasionally feels wooden",
        "Her performance carries the entire picture with remarkable emotional range",

        // Theme: visuals and effects
        "Stunning cinematography and visual effects create a breathtaking spectacle",
        "The special effects are dazzling but cannot hide the thin storyline",
        "Gorgeous visuals and inventive camera work make every frame painterly",
        "Spectacular action sequences with seamless effects and dynamic camera angles",

        // Theme: comedy
        "A hilarious comedy with sharp wit and perfectly timed jokes throughout",
        "The humor lands consistently thanks to clever writing and comic timing",
        "Laugh out loud funny with absurd situations and deadpan delivery",
        "A charming comedy that balances slapstick gags with genuine warmth",
    ];

    texts.into_iter().map(String::from).collect()
}
