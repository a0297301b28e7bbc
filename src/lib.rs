//! Loqui — self-contained conversational text engine.
//!
//! Core pipeline:
//!   - Lexicon: token counts, n-grams, TF-IDF, Markov transitions
//!   - EmbeddingTrainer: 100-dim windowed co-occurrence vectors
//!   - analysis::understand: intent, entities, sentiment, topics, keywords
//!   - ResponseGenerator: encode -> refine -> improve -> decode stages
//!     plus the word-by-word long-form loop
//!   - TextEngine: orchestration, memory, snapshots, typed output

pub mod errors;
pub mod types;
pub mod ops;
pub mod optimizer;
pub mod network;
pub mod lexicon;
pub mod embedding;
pub mod data;
pub mod analysis;
pub mod generator;
pub mod engine;
pub mod ingest;

pub use engine::{EngineConfig, TextEngine};
pub use errors::{EngineError, Result};
