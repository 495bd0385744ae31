// cw2vec-data Configuration
// Hyperparameters for vocabulary, sampling and n-gram extraction

use crate::strokes::StrokeIndex;
use crate::types::{DatasetError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default size of the flat negative sampling table
pub const DEFAULT_NEGATIVE_TABLE_SIZE: usize = 100_000_000;

/// Data preparation settings
///
/// `shuffle` and `batch_size` are not used by the sampling pipeline; they are
/// carried for the training loop that consumes the pair stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed for the single RNG feeding subsampling, windows and negatives
    pub seed: u64,
    pub shuffle: bool,
    /// Subsampling target ratio (not a corpus size)
    pub sample: f64,
    pub window_size: usize,
    /// Negative draws per positive pair
    pub negative_num: usize,
    pub min_freq: u64,
    /// Maximum vocabulary size, unknown token excluded
    pub vocab_size: Option<usize>,
    /// Examples longer than this are truncated by the corpus reader
    pub max_seq_len: Option<usize>,
    pub batch_size: usize,
    /// Discard the first corpus line
    pub skip_header: bool,
    /// Shortest stroke n-gram
    pub n1: usize,
    /// Longest stroke n-gram
    pub n2: usize,
    pub negative_table_size: usize,
    /// Stroke name → stroke class digit
    pub stroke2idx: StrokeIndex,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: 2018,
            shuffle: true,
            sample: 1e-3,
            window_size: 5,
            negative_num: 5,
            min_freq: 5,
            vocab_size: None,
            max_seq_len: None,
            batch_size: 128,
            skip_header: false,
            n1: 3,
            n2: 5,
            negative_table_size: DEFAULT_NEGATIVE_TABLE_SIZE,
            stroke2idx: StrokeIndex::standard(),
        }
    }
}

impl Config {
    /// Load a JSON config; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the sampling formulas cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(DatasetError::invalid_config(
                "window_size",
                "must be at least 1",
            ));
        }
        if self.n1 == 0 {
            return Err(DatasetError::invalid_config("n1", "must be at least 1"));
        }
        if self.n1 > self.n2 {
            return Err(DatasetError::invalid_config(
                "n1",
                format!("({}) must not exceed n2 ({})", self.n1, self.n2),
            ));
        }
        if !(self.sample > 0.0) {
            return Err(DatasetError::invalid_config(
                "sample",
                format!("must be positive, got {}", self.sample),
            ));
        }
        if self.negative_table_size == 0 {
            return Err(DatasetError::invalid_config(
                "negative_table_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
