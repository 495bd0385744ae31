// cw2vec-data Pair Generator
// Dynamic-window skip-gram pairs with per-pair negative draws

use crate::ngram::WordFeatureTable;
use crate::sampling::NegativeSampleTable;
use crate::types::{TokenId, TrainingPair};
use rand::Rng;

/// Lazy iterator over one epoch of training pairs
///
/// Yields one [`TrainingPair`] per (example, center word) where the example
/// has at least two words and the center word has stroke features. For each
/// center the window shrinks by `reduced_window ~ U[0, window_size)` on both
/// sides, then every context word gets `negative_num` negatives that differ
/// from it.
pub struct PairGenerator<'a, R: Rng + ?Sized> {
    examples: &'a [Vec<TokenId>],
    features: &'a WordFeatureTable,
    negatives: &'a NegativeSampleTable,
    rng: &'a mut R,
    window_size: usize,
    negative_num: usize,
    example: usize,
    position: usize,
}

impl<'a, R: Rng + ?Sized> PairGenerator<'a, R> {
    /// A `window_size` of 0 yields no pairs
    pub fn new(
        examples: &'a [Vec<TokenId>],
        features: &'a WordFeatureTable,
        negatives: &'a NegativeSampleTable,
        rng: &'a mut R,
        window_size: usize,
        negative_num: usize,
    ) -> Self {
        Self {
            examples,
            features,
            negatives,
            rng,
            window_size,
            negative_num,
            example: 0,
            position: 0,
        }
    }

    fn pair_at(
        &mut self,
        sentence: &'a [TokenId],
        i: usize,
        center: &'a [TokenId],
    ) -> TrainingPair<'a> {
        let reduced_window = self.rng.gen_range(0..self.window_size);
        let start = (i + reduced_window).saturating_sub(self.window_size);
        let end = (i + self.window_size + 1 - reduced_window).min(sentence.len());

        let pos_v: Vec<TokenId> = (start..end)
            .filter(|&j| j != i)
            .map(|j| sentence[j])
            .collect();
        let pos_u = vec![center; pos_v.len()];

        let mut neg_v = Vec::with_capacity(pos_v.len() * self.negative_num);
        for &v in &pos_v {
            neg_v.extend(self.negatives.draw_negative(v, self.negative_num, &mut *self.rng));
        }
        let neg_u = vec![center; neg_v.len()];

        TrainingPair {
            pos_u,
            pos_v,
            neg_u,
            neg_v,
        }
    }
}

impl<'a, R: Rng + ?Sized> Iterator for PairGenerator<'a, R> {
    type Item = TrainingPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.window_size == 0 {
            return None;
        }
        let examples = self.examples;
        let features = self.features;

        while let Some(sentence) = examples.get(self.example) {
            if sentence.len() < 2 || self.position >= sentence.len() {
                self.example += 1;
                self.position = 0;
                continue;
            }

            let i = self.position;
            self.position += 1;
            if let Some(center) = features.get(sentence[i]) {
                return Some(self.pair_at(sentence, i, center));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::NgramVocabularyBuilder;
    use crate::strokes::{StrokeFeatureExtractor, StrokeMap};
    use crate::vocab::{Vocabulary, VocabularyBuilder};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct Fixture {
        vocab: Vocabulary,
        features: WordFeatureTable,
        negatives: NegativeSampleTable,
    }

    fn fixture(words: &[&str]) -> Fixture {
        let examples = vec![words.iter().map(|w| w.to_string()).collect::<Vec<_>>()];
        let vocab = VocabularyBuilder::new(1).build(&examples);
        let mut strokes = StrokeMap::new();
        for (i, ch) in ('a'..='z').enumerate() {
            strokes.insert(ch, format!("{}", 100 + i));
        }
        let extractor = StrokeFeatureExtractor::new(&strokes, 3, 5);
        let ngrams = NgramVocabularyBuilder::new(extractor).build(&vocab);
        let features = WordFeatureTable::build(&vocab, &ngrams, &extractor);
        let negatives = NegativeSampleTable::new(&vocab.frequencies(), 10_000);
        Fixture {
            vocab,
            features,
            negatives,
        }
    }

    #[test]
    fn test_window_bounds_and_parallel_lengths() {
        let f = fixture(&["a", "b", "c", "d", "e", "f", "g"]);
        let sentence = f.vocab.encode(&["a", "b", "c", "d", "e", "f", "g"]);
        let examples = vec![sentence.clone()];
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let pairs: Vec<_> =
            PairGenerator::new(&examples, &f.features, &f.negatives, &mut rng, 2, 3).collect();
        assert_eq!(pairs.len(), sentence.len());

        for (i, pair) in pairs.iter().enumerate() {
            assert_eq!(pair.center(), Some(sentence[i]));
            assert!(!pair.pos_v.is_empty() && pair.pos_v.len() <= 4);
            assert_eq!(pair.pos_u.len(), pair.pos_v.len());
            assert_eq!(pair.neg_v.len(), pair.pos_v.len() * 3);
            assert_eq!(pair.neg_u.len(), pair.neg_v.len());
            assert!(!pair.pos_v.contains(&sentence[i]));
            for (k, &v) in pair.pos_v.iter().enumerate() {
                assert!(pair.neg_v[k * 3..k * 3 + 3].iter().all(|&n| n != v));
            }
        }
    }

    #[test]
    fn test_window_of_one_is_immediate_neighbours() {
        let f = fixture(&["a", "b", "c"]);
        let sentence = f.vocab.encode(&["a", "b", "c"]);
        let examples = vec![sentence.clone()];
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let pairs: Vec<_> =
            PairGenerator::new(&examples, &f.features, &f.negatives, &mut rng, 1, 1).collect();
        assert_eq!(pairs[0].pos_v, vec![sentence[1]]);
        assert_eq!(pairs[1].pos_v, vec![sentence[0], sentence[2]]);
        assert_eq!(pairs[2].pos_v, vec![sentence[1]]);
    }

    #[test]
    fn test_short_examples_and_featureless_words_skipped() {
        let f = fixture(&["a", "b", "1"]);
        let a = f.vocab.get_id("a").unwrap();
        let b = f.vocab.get_id("b").unwrap();
        let digit = f.vocab.get_id("1").unwrap();
        let examples = vec![vec![a], vec![digit, b], vec![]];
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let pairs: Vec<_> =
            PairGenerator::new(&examples, &f.features, &f.negatives, &mut rng, 2, 1).collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].center(), Some(b));
        assert_eq!(pairs[0].pos_v, vec![digit]);
    }

    #[test]
    fn test_zero_window_yields_nothing() {
        let f = fixture(&["a", "b", "c"]);
        let examples = vec![f.vocab.encode(&["a", "b", "c"])];
        let mut rng = ChaCha20Rng::seed_from_u64(4);

        let mut pairs = PairGenerator::new(&examples, &f.features, &f.negatives, &mut rng, 0, 2);
        assert!(pairs.next().is_none());
    }

    #[test]
    fn test_same_seed_same_stream() {
        let f = fixture(&["a", "b", "c", "d"]);
        let examples = vec![f.vocab.encode(&["a", "b", "c", "d", "a", "c"])];

        let run = |seed: u64| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            PairGenerator::new(&examples, &f.features, &f.negatives, &mut rng, 3, 2)
                .map(|p| (p.pos_v, p.neg_v))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }
}
