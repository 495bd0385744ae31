// cw2vec-data N-gram Vocabulary
// Stroke n-gram ids and the per-word feature table

use crate::strokes::StrokeFeatureExtractor;
use crate::types::TokenId;
use crate::vocab::Vocabulary;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Stroke n-gram features with ids following the word-id range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NgramEntries", into = "NgramEntries")]
pub struct NgramVocabulary {
    /// First n-gram id, equal to the word vocabulary size
    offset: usize,

    /// (feature, occurrence count), indexed by `id - offset`
    entries: Vec<(String, u64)>,

    ngram_to_id: FxHashMap<String, TokenId>,
}

/// Serialized form; the lookup index is rebuilt on load
#[derive(Serialize, Deserialize)]
struct NgramEntries {
    offset: usize,
    entries: Vec<(String, u64)>,
}

impl From<NgramEntries> for NgramVocabulary {
    fn from(stored: NgramEntries) -> Self {
        Self::from_entries(stored.offset, stored.entries)
    }
}

impl From<NgramVocabulary> for NgramEntries {
    fn from(ngrams: NgramVocabulary) -> Self {
        Self {
            offset: ngrams.offset,
            entries: ngrams.entries,
        }
    }
}

impl NgramVocabulary {
    fn from_entries(offset: usize, entries: Vec<(String, u64)>) -> Self {
        let ngram_to_id = entries
            .iter()
            .enumerate()
            .map(|(i, (ngram, _))| (ngram.clone(), (offset + i) as TokenId))
            .collect();
        Self {
            offset,
            entries,
            ngram_to_id,
        }
    }

    pub fn get_id(&self, ngram: &str) -> Option<TokenId> {
        self.ngram_to_id.get(ngram).copied()
    }

    pub fn get_ngram(&self, id: TokenId) -> Option<&str> {
        (id as usize)
            .checked_sub(self.offset)
            .and_then(|i| self.entries.get(i))
            .map(|(ngram, _)| ngram.as_str())
    }

    pub fn count(&self, ngram: &str) -> Option<u64> {
        self.get_id(ngram)
            .map(|id| self.entries[id as usize - self.offset].1)
    }

    /// Number of distinct n-grams
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First n-gram id
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Size of the combined word + n-gram id space
    pub fn total_ids(&self) -> usize {
        self.offset + self.entries.len()
    }

    /// Iterate `(id, ngram, count)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str, u64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, (ngram, count))| ((self.offset + i) as TokenId, ngram.as_str(), *count))
    }

    /// Lookup in the combined id space, n-grams taking precedence over words
    pub fn combined_id(&self, vocab: &Vocabulary, key: &str) -> Option<TokenId> {
        self.get_id(key).or_else(|| vocab.get_id(key))
    }
}

/// Counts stroke n-grams over the word vocabulary
pub struct NgramVocabularyBuilder<'a> {
    extractor: StrokeFeatureExtractor<'a>,
}

impl<'a> NgramVocabularyBuilder<'a> {
    pub fn new(extractor: StrokeFeatureExtractor<'a>) -> Self {
        Self { extractor }
    }

    /// Count features of every word (id order) and assign ids by ascending count
    ///
    /// Ties keep the order in which features were first produced.
    pub fn build(&self, vocab: &Vocabulary) -> NgramVocabulary {
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut counted: Vec<(String, u64)> = Vec::new();

        for (_, word, _) in vocab.iter() {
            for ngram in self.extractor.extract(word) {
                match index.get(&ngram) {
                    Some(&slot) => counted[slot].1 += 1,
                    None => {
                        index.insert(ngram.clone(), counted.len());
                        counted.push((ngram, 1));
                    }
                }
            }
        }

        counted.sort_by(|a, b| a.1.cmp(&b.1));
        let ngrams = NgramVocabulary::from_entries(vocab.len(), counted);
        log::info!(
            "n-gram vocabulary: {} features, ids {}..{}",
            ngrams.len(),
            ngrams.offset(),
            ngrams.total_ids()
        );
        ngrams
    }
}

/// Word id → (word id, n-gram ids...)
///
/// Words without any stroke n-gram have no entry and never act as center words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFeatureTable {
    features: Vec<Option<Box<[TokenId]>>>,
    present: usize,
}

impl WordFeatureTable {
    pub fn build(
        vocab: &Vocabulary,
        ngrams: &NgramVocabulary,
        extractor: &StrokeFeatureExtractor<'_>,
    ) -> Self {
        let mut features = Vec::with_capacity(vocab.len());
        let mut present = 0;

        for (id, word, _) in vocab.iter() {
            let ngram_features = extractor.extract(word);
            if ngram_features.is_empty() {
                features.push(None);
                continue;
            }

            let mut tuple = Vec::with_capacity(ngram_features.len() + 1);
            tuple.push(id);
            // Every extracted feature was counted by the n-gram builder
            tuple.extend(ngram_features.iter().filter_map(|f| ngrams.get_id(f)));
            features.push(Some(tuple.into_boxed_slice()));
            present += 1;
        }

        log::info!(
            "word features: {} of {} words have stroke n-grams",
            present,
            vocab.len()
        );
        Self { features, present }
    }

    /// Feature tuple of a word, first element being the word id
    pub fn get(&self, id: TokenId) -> Option<&[TokenId]> {
        self.features.get(id as usize).and_then(|f| f.as_deref())
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.get(id).is_some()
    }

    /// Number of words with features
    pub fn len(&self) -> usize {
        self.present
    }

    pub fn is_empty(&self) -> bool {
        self.present == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &[TokenId])> + '_ {
        self.features
            .iter()
            .enumerate()
            .filter_map(|(id, f)| f.as_deref().map(|f| (id as TokenId, f)))
    }
}
