// cw2vec-data Transliteration
// Rewrites the corpus with each word replaced by its stroke codes

use crate::strokes::StrokeMap;
use crate::types::Example;
use rustc_hash::FxHashMap;

/// Stroke-code corpus for embedding tools that only see Latin-like tokens
///
/// Example: 迎园 → "5412254661"; `reverse` maps each code word back to the
/// original word. Distinct words with identical stroke codes collide, and the
/// last one seen wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransliteratedCorpus {
    /// One space-joined line per example (possibly empty)
    pub sentences: Vec<String>,
    /// Code word → original word
    pub reverse: FxHashMap<String, String>,
}

impl TransliteratedCorpus {
    /// Original word for a code word
    pub fn original(&self, code_word: &str) -> Option<&str> {
        self.reverse.get(code_word).map(|s| s.as_str())
    }
}

/// Transliterate raw examples; words without any stroke code are left out
pub fn transliterate(examples: &[Example], strokes: &StrokeMap) -> TransliteratedCorpus {
    let mut corpus = TransliteratedCorpus::default();

    for example in examples {
        let mut sentence: Vec<String> = Vec::with_capacity(example.len());
        for word in example {
            let code_word = strokes.word_strokes(word);
            if code_word.is_empty() {
                continue;
            }
            corpus.reverse.insert(code_word.clone(), word.clone());
            sentence.push(code_word);
        }
        corpus.sentences.push(sentence.join(" "));
    }

    log::info!(
        "transliteration: {} sentences, {} distinct code words",
        corpus.sentences.len(),
        corpus.reverse.len()
    );
    corpus
}
