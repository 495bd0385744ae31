// cw2vec-data Sampling
// Negative sampling table and frequent-word subsampling

use crate::types::{Example, TokenId};
use crate::vocab::Vocabulary;
use rand::Rng;

/// Exponent smoothing the unigram distribution for negative draws
pub const NEGATIVE_POWER: f64 = 0.75;

/// Population size the subsampling keep-probability is scaled to (2^32)
pub const SUBSAMPLE_TOTAL: f64 = 4_294_967_296.0;

/// Flat table of word ids for O(1) draws from P(id) ∝ freq(id)^0.75
///
/// Each id occupies `round(ratio * size)` consecutive slots (ties rounded to
/// even). Rounding per id means the table length may differ slightly from the
/// requested size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegativeSampleTable {
    table: Vec<TokenId>,
}

impl NegativeSampleTable {
    /// Build from the frequency table (counts indexed by id)
    pub fn new(frequencies: &[u64], size: usize) -> Self {
        let pow: Vec<f64> = frequencies
            .iter()
            .map(|&f| (f as f64).powf(NEGATIVE_POWER))
            .collect();
        let pow_sum: f64 = pow.iter().sum();

        let mut table = Vec::new();
        if pow_sum > 0.0 {
            table.reserve(size);
            for (id, p) in pow.iter().enumerate() {
                let slots = (p / pow_sum * size as f64).round_ties_even() as usize;
                table.extend(std::iter::repeat(id as TokenId).take(slots));
            }
        } else {
            log::warn!("negative sample table is empty: every frequency is zero");
        }

        log::info!(
            "negative sample table: {} slots over {} ids",
            table.len(),
            frequencies.len()
        );
        Self { table }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn as_slice(&self) -> &[TokenId] {
        &self.table
    }

    /// Number of slots held by an id
    pub fn slots(&self, id: TokenId) -> usize {
        self.table.iter().filter(|&&t| t == id).count()
    }

    /// Single uniform draw from the table
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<TokenId> {
        if self.table.is_empty() {
            return None;
        }
        Some(self.table[rng.gen_range(0..self.table.len())])
    }

    /// Draw `count` ids, each different from `exclude`
    ///
    /// Retries without bound: if `exclude` fills (almost) the whole table this
    /// can spin for a very long time, and forever when it is the only id.
    /// Returns nothing when the table is empty.
    pub fn draw_negative<R: Rng + ?Sized>(
        &self,
        exclude: TokenId,
        count: usize,
        rng: &mut R,
    ) -> Vec<TokenId> {
        let mut negatives = Vec::with_capacity(count);
        while negatives.len() < count {
            let Some(id) = self.sample(rng) else {
                break;
            };
            if id != exclude {
                negatives.push(id);
            }
        }
        negatives
    }
}

/// Frequent-word down-sampling
///
/// `keep(id) = min(1, (sqrt(ratio / sample) + 1) * sample / ratio) * 2^32`
/// where `ratio` is the id's share of all counts. An occurrence survives when
/// `keep(id)` is at least a uniform draw from `[0, 2^32)`.
#[derive(Debug, Clone)]
pub struct Subsampler {
    keep: Vec<f64>,
}

impl Subsampler {
    pub fn new(frequencies: &[u64], sample: f64) -> Self {
        let total_count: u64 = frequencies.iter().sum();
        let keep = frequencies
            .iter()
            .map(|&f| {
                let ratio = f as f64 / total_count as f64;
                keep_population(ratio, sample)
            })
            .collect();
        Self { keep }
    }

    /// Keep threshold of an id on the `[0, 2^32]` scale
    pub fn keep_threshold(&self, id: TokenId) -> f64 {
        self.keep.get(id as usize).copied().unwrap_or(0.0)
    }

    /// Keep probability of an id
    pub fn keep_probability(&self, id: TokenId) -> f64 {
        self.keep_threshold(id) / SUBSAMPLE_TOTAL
    }

    /// Convert examples to ids, dropping unknown words and subsampled occurrences
    ///
    /// Unknown words are dropped rather than mapped to `<unk>`. Examples left
    /// empty are removed; the rest keep their order.
    pub fn subsample<R: Rng + ?Sized>(
        &self,
        examples: &[Example],
        vocab: &Vocabulary,
        rng: &mut R,
    ) -> Vec<Vec<TokenId>> {
        let mut train_examples = Vec::new();
        let mut kept_words = 0usize;

        for example in examples {
            let words: Vec<TokenId> = example
                .iter()
                .filter_map(|word| vocab.get_id(word))
                .filter(|&id| self.keep_threshold(id) >= rng.gen::<f64>() * SUBSAMPLE_TOTAL)
                .collect();
            if !words.is_empty() {
                kept_words += words.len();
                train_examples.push(words);
            }
        }

        log::info!(
            "subsampling: kept {} words in {} of {} examples",
            kept_words,
            train_examples.len(),
            examples.len()
        );
        train_examples
    }
}

fn keep_population(ratio: f64, sample: f64) -> f64 {
    let p = ((ratio / sample).sqrt() + 1.0) * sample / ratio;
    // Zero-count ids give an infinite (or NaN) ratio term; they always pass
    if p.is_nan() || p > 1.0 {
        SUBSAMPLE_TOTAL
    } else {
        p * SUBSAMPLE_TOTAL
    }
}
