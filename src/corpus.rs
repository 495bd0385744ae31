// cw2vec-data Corpus Reader
// Reads raw lines into whitespace-tokenized examples

use crate::types::{Example, Result};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Per-line text transformation applied before tokenization
///
/// Any `Fn(&str) -> String` closure is a preprocessor.
pub trait LinePreprocessor {
    fn transform(&self, line: &str) -> String;
}

impl<F> LinePreprocessor for F
where
    F: Fn(&str) -> String,
{
    fn transform(&self, line: &str) -> String {
        self(line)
    }
}

/// Corpus reading options
pub struct CorpusReader<'p> {
    skip_header: bool,
    max_seq_len: Option<usize>,
    preprocessor: Option<&'p dyn LinePreprocessor>,
}

impl<'p> CorpusReader<'p> {
    pub fn new() -> Self {
        Self {
            skip_header: false,
            max_seq_len: None,
            preprocessor: None,
        }
    }

    /// Discard the first line (column names)
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    /// Truncate every example to at most this many tokens
    pub fn max_seq_len(mut self, max_seq_len: Option<usize>) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn preprocessor(mut self, preprocessor: &'p dyn LinePreprocessor) -> Self {
        self.preprocessor = Some(preprocessor);
        self
    }

    /// Read examples, one per line that is non-empty after preprocessing
    ///
    /// A whitespace-only line still counts as non-empty and yields an empty
    /// example.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<Vec<Example>> {
        let mut examples = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if i == 0 && self.skip_header {
                continue;
            }
            if let Some(example) = self.tokenize_line(line) {
                examples.push(example);
            }
        }
        log::info!("corpus: read {} examples", examples.len());
        Ok(examples)
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<Example>> {
        let path = path.as_ref();
        log::debug!("reading corpus from {}", path.display());
        let file = std::fs::File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read from already-loaded lines
    pub fn read_lines<I, S>(&self, lines: I) -> Vec<Example>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !(*i == 0 && self.skip_header))
            .filter_map(|(_, line)| self.tokenize_line(line.into()))
            .collect()
    }

    fn tokenize_line(&self, line: String) -> Option<Example> {
        let line = match self.preprocessor {
            Some(preprocessor) => preprocessor.transform(&line),
            None => line,
        };
        if line.is_empty() {
            return None;
        }

        let tokens = line.split_whitespace().map(str::to_string);
        Some(match self.max_seq_len {
            Some(max) => tokens.take(max).collect(),
            None => tokens.collect(),
        })
    }
}

impl Default for CorpusReader<'_> {
    fn default() -> Self {
        Self::new()
    }
}
