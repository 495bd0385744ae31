//! # cw2vec-data: Stroke N-gram Training Data
//!
//! Corpus statistics and sampling for cw2vec-style Chinese word embeddings, where
//! each word is represented by its own id plus the ids of its stroke n-grams.
//!
//! ## Pipeline
//!
//! 1. **Corpus** - one whitespace-tokenized example per line
//! 2. **Vocabulary** - frequency cutoffs, ids by descending count, `<unk>` last
//! 3. **Negative table** - flat table sampling ids ∝ frequency^0.75
//! 4. **Stroke n-grams** - character → stroke codes → n-grams (3..=5 by default)
//! 5. **Subsampling** - frequent words thinned out before training
//! 6. **Pairs** - dynamic-window skip-gram pairs with per-pair negatives
//!
//! ## Example Usage
//!
//! ```ignore
//! use cw2vec_data::{BincodeDirSink, Config, StrokeDataset};
//!
//! let config = Config::from_json_file("config.json")?;
//! let mut dataset = StrokeDataset::from_paths(config, "corpus.txt", "strokes.txt", None)?;
//!
//! // Persist vocabulary tables for the model side
//! dataset.persist(&mut BincodeDirSink::new("output"))?;
//!
//! // One epoch of training pairs
//! for pair in dataset.pairs() {
//!     // pair.pos_u, pair.pos_v, pair.neg_u, pair.neg_v
//! }
//! # Ok::<(), cw2vec_data::DatasetError>(())
//! ```
//!
//! ## Determinism
//!
//! All randomness flows through one `ChaCha20Rng` seeded from `Config::seed`:
//! subsampling first, then window sizes and negative draws epoch by epoch.

pub mod config;
pub mod corpus;
pub mod dataset;
pub mod ngram;
pub mod pairs;
pub mod persistence;
pub mod sampling;
pub mod strokes;
pub mod transliterate;
pub mod types;
pub mod vocab;

// Re-export main types and functions for convenience
pub use config::Config;
pub use corpus::{CorpusReader, LinePreprocessor};
pub use dataset::{DatasetStats, StrokeDataset};
pub use ngram::{NgramVocabulary, NgramVocabularyBuilder, WordFeatureTable};
pub use pairs::PairGenerator;
pub use persistence::{load_artifact, BincodeDirSink, PersistenceSink};
pub use sampling::{NegativeSampleTable, Subsampler};
pub use strokes::{StrokeFeatureExtractor, StrokeIndex, StrokeMap, NGRAM_SENTINEL};
pub use transliterate::{transliterate, TransliteratedCorpus};
pub use types::{DatasetError, Example, Result, TokenId, TrainingPair};
pub use vocab::{Vocabulary, VocabularyBuilder, UNK_TOKEN};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
