// cw2vec-data Vocabulary
// Maps corpus words to dense ids ordered by frequency

use crate::types::{Example, TokenId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Reserved token for words outside the vocabulary
pub const UNK_TOKEN: &str = "<unk>";

/// One vocabulary word and its raw corpus count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub count: u64,
}

/// Word vocabulary with frequency counts
///
/// Structure:
/// - ids `0..N-1`: words meeting the frequency cutoff, most frequent first
/// - id `N-1`: `<unk>` with count 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<VocabEntry>", into = "Vec<VocabEntry>")]
pub struct Vocabulary {
    /// Entries indexed by id
    entries: Vec<VocabEntry>,

    /// Word → id
    token_to_id: FxHashMap<String, TokenId>,
}

impl Vocabulary {
    /// Build from entries already in id order
    ///
    /// Appends `<unk>` when the last entry is not the unknown token.
    pub fn from_entries(mut entries: Vec<VocabEntry>) -> Self {
        if entries.last().map(|e| e.word.as_str()) != Some(UNK_TOKEN) {
            entries.push(VocabEntry {
                word: UNK_TOKEN.to_string(),
                count: 0,
            });
        }

        let token_to_id = entries
            .iter()
            .enumerate()
            .map(|(id, entry)| (entry.word.clone(), id as TokenId))
            .collect();

        Self {
            entries,
            token_to_id,
        }
    }

    /// Number of ids, unknown token included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the unknown token is always present
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get word id, `None` for out-of-vocabulary words
    pub fn get_id(&self, word: &str) -> Option<TokenId> {
        self.token_to_id.get(word).copied()
    }

    /// Get word id, falling back to the unknown id
    pub fn id_or_unk(&self, word: &str) -> TokenId {
        self.get_id(word).unwrap_or_else(|| self.unk_id())
    }

    pub fn unk_id(&self) -> TokenId {
        (self.entries.len() - 1) as TokenId
    }

    /// Get word from id
    pub fn get_token(&self, id: TokenId) -> Option<&str> {
        self.entries.get(id as usize).map(|e| e.word.as_str())
    }

    /// Raw corpus count of a word id
    pub fn count(&self, id: TokenId) -> Option<u64> {
        self.entries.get(id as usize).map(|e| e.count)
    }

    /// Encode tokens to ids; unknown tokens map to `<unk>`
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<TokenId> {
        tokens
            .iter()
            .map(|token| self.id_or_unk(token.as_ref()))
            .collect()
    }

    /// Decode ids back to words, dropping ids outside the vocabulary
    pub fn decode(&self, ids: &[TokenId]) -> Vec<&str> {
        ids.iter().filter_map(|&id| self.get_token(id)).collect()
    }

    /// Frequency table: counts indexed by id
    pub fn frequencies(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.count).collect()
    }

    /// Sum of all counts
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Iterate `(id, word, count)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (TokenId, &str, u64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(id, e)| (id as TokenId, e.word.as_str(), e.count))
    }

    pub fn entries(&self) -> &[VocabEntry] {
        &self.entries
    }
}

impl From<Vec<VocabEntry>> for Vocabulary {
    fn from(entries: Vec<VocabEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Vocabulary> for Vec<VocabEntry> {
    fn from(vocab: Vocabulary) -> Self {
        vocab.entries
    }
}

/// Counts tokens and applies frequency and size cutoffs
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    min_freq: u64,
    max_size: Option<usize>,
}

impl VocabularyBuilder {
    pub fn new(min_freq: u64) -> Self {
        Self {
            min_freq,
            max_size: None,
        }
    }

    /// Cap the number of words kept, unknown token excluded
    ///
    /// `Some(0)` means no cap, same as `None`.
    pub fn max_size(mut self, max_size: Option<usize>) -> Self {
        self.max_size = max_size.filter(|&n| n > 0);
        self
    }

    /// Count, filter, sort by count descending and assign ids
    ///
    /// Ties keep first-seen order. Literal `<unk>` tokens are not counted.
    pub fn build(&self, examples: &[Example]) -> Vocabulary {
        let mut index: FxHashMap<&str, usize> = FxHashMap::default();
        let mut counted: Vec<(&str, u64)> = Vec::new();

        for token in examples.iter().flatten() {
            if token == UNK_TOKEN {
                continue;
            }
            match index.get(token.as_str()) {
                Some(&slot) => counted[slot].1 += 1,
                None => {
                    index.insert(token.as_str(), counted.len());
                    counted.push((token.as_str(), 1));
                }
            }
        }
        let distinct = counted.len();

        // Stable sort: equal counts stay in first-seen order
        counted.sort_by(|a, b| b.1.cmp(&a.1));
        let mut kept: Vec<VocabEntry> = counted
            .into_iter()
            .filter(|(_, count)| *count >= self.min_freq)
            .map(|(word, count)| VocabEntry {
                word: word.to_string(),
                count,
            })
            .collect();
        if let Some(max_size) = self.max_size {
            kept.truncate(max_size);
        }

        let vocab = Vocabulary::from_entries(kept);
        log::info!(
            "vocabulary: {} distinct tokens, {} ids after min_freq={} cutoff",
            distinct,
            vocab.len(),
            self.min_freq
        );
        vocab
    }
}
