// cw2vec-data Dataset
// Main API that builds every table and hands out training pairs

use crate::config::Config;
use crate::corpus::{CorpusReader, LinePreprocessor};
use crate::ngram::{NgramVocabulary, NgramVocabularyBuilder, WordFeatureTable};
use crate::pairs::PairGenerator;
use crate::persistence::{
    PersistenceSink, CHAR_TO_STROKE_ARTIFACT, NGRAM_VOCAB_ARTIFACT, REVERSE_WORDS_ARTIFACT,
    SENTENCES_ARTIFACT, VOCAB_ARTIFACT,
};
use crate::sampling::{NegativeSampleTable, Subsampler};
use crate::strokes::{StrokeFeatureExtractor, StrokeMap};
use crate::transliterate::{transliterate, TransliteratedCorpus};
use crate::types::{Example, Result, TokenId};
use crate::vocab::{Vocabulary, VocabularyBuilder};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::path::Path;

/// Prepared cw2vec training data
///
/// Combines all components:
/// - Vocabulary with frequency cutoffs
/// - Negative sampling table
/// - Stroke n-gram vocabulary and per-word features
/// - Subsampled training examples
///
/// Every random draw (subsampling, windows, negatives) comes from one
/// `ChaCha20Rng` seeded with `config.seed`, so a fixed seed reproduces the
/// whole pair stream.
pub struct StrokeDataset {
    config: Config,
    examples: Vec<Example>,
    vocab: Vocabulary,
    negatives: NegativeSampleTable,
    strokes: StrokeMap,
    ngrams: NgramVocabulary,
    train_examples: Vec<Vec<TokenId>>,
    features: WordFeatureTable,
    rng: ChaCha20Rng,
}

/// Sizes of the prepared tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetStats {
    pub examples: usize,
    pub train_examples: usize,
    pub vocab_size: usize,
    pub ngram_count: usize,
    pub feature_words: usize,
    pub negative_table_len: usize,
}

impl StrokeDataset {
    /// Build from tokenized examples and a parsed stroke map
    pub fn build(config: Config, examples: Vec<Example>, strokes: StrokeMap) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha20Rng::seed_from_u64(config.seed);

        let vocab = VocabularyBuilder::new(config.min_freq)
            .max_size(config.vocab_size)
            .build(&examples);
        let frequencies = vocab.frequencies();
        let negatives = NegativeSampleTable::new(&frequencies, config.negative_table_size);

        let extractor = StrokeFeatureExtractor::new(&strokes, config.n1, config.n2);
        let ngrams = NgramVocabularyBuilder::new(extractor).build(&vocab);

        let train_examples =
            Subsampler::new(&frequencies, config.sample).subsample(&examples, &vocab, &mut rng);
        let features = WordFeatureTable::build(&vocab, &ngrams, &extractor);

        Ok(Self {
            config,
            examples,
            vocab,
            negatives,
            strokes,
            ngrams,
            train_examples,
            features,
            rng,
        })
    }

    /// Read the corpus and stroke table from disk, then build
    pub fn from_paths(
        config: Config,
        corpus_path: impl AsRef<Path>,
        strokes_path: impl AsRef<Path>,
        preprocessor: Option<&dyn LinePreprocessor>,
    ) -> Result<Self> {
        let mut reader = CorpusReader::new()
            .skip_header(config.skip_header)
            .max_seq_len(config.max_seq_len);
        if let Some(preprocessor) = preprocessor {
            reader = reader.preprocessor(preprocessor);
        }
        let examples = reader.read_path(corpus_path)?;
        let strokes = StrokeMap::from_path(strokes_path, &config.stroke2idx)?;
        Self::build(config, examples, strokes)
    }

    /// One epoch of training pairs
    ///
    /// Each call restarts from the first example and draws fresh windows and
    /// negatives from the dataset's RNG.
    pub fn pairs(&mut self) -> PairGenerator<'_, ChaCha20Rng> {
        PairGenerator::new(
            &self.train_examples,
            &self.features,
            &self.negatives,
            &mut self.rng,
            self.config.window_size,
            self.config.negative_num,
        )
    }

    /// Store vocabulary, n-gram vocabulary and the stroke map
    pub fn persist<S: PersistenceSink>(&self, sink: &mut S) -> Result<()> {
        sink.persist(VOCAB_ARTIFACT, &self.vocab)?;
        sink.persist(NGRAM_VOCAB_ARTIFACT, &self.ngrams)?;
        sink.persist(CHAR_TO_STROKE_ARTIFACT, &self.strokes)?;
        log::info!("persisted vocabulary, n-gram vocabulary and stroke map");
        Ok(())
    }

    /// Stroke-code version of the raw examples
    pub fn transliterate(&self) -> TransliteratedCorpus {
        transliterate(&self.examples, &self.strokes)
    }

    /// Transliterate and store the sentences and reverse word map
    pub fn persist_transliteration<S: PersistenceSink>(
        &self,
        sink: &mut S,
    ) -> Result<TransliteratedCorpus> {
        let corpus = self.transliterate();
        sink.persist(SENTENCES_ARTIFACT, &corpus.sentences)?;
        sink.persist(REVERSE_WORDS_ARTIFACT, &corpus.reverse)?;
        Ok(corpus)
    }

    /// Stroke n-gram extractor configured with this dataset's bounds
    pub fn extractor(&self) -> StrokeFeatureExtractor<'_> {
        StrokeFeatureExtractor::new(&self.strokes, self.config.n1, self.config.n2)
    }

    pub fn stats(&self) -> DatasetStats {
        DatasetStats {
            examples: self.examples.len(),
            train_examples: self.train_examples.len(),
            vocab_size: self.vocab.len(),
            ngram_count: self.ngrams.len(),
            feature_words: self.features.len(),
            negative_table_len: self.negatives.len(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw tokenized examples, before subsampling
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn ngrams(&self) -> &NgramVocabulary {
        &self.ngrams
    }

    pub fn strokes(&self) -> &StrokeMap {
        &self.strokes
    }

    pub fn features(&self) -> &WordFeatureTable {
        &self.features
    }

    pub fn negatives(&self) -> &NegativeSampleTable {
        &self.negatives
    }

    /// Subsampled id sequences
    pub fn train_examples(&self) -> &[Vec<TokenId>] {
        &self.train_examples
    }
}
