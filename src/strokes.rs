// cw2vec-data Stroke Features
// Parses the character → stroke table and extracts stroke n-grams per word

use crate::types::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Code substituted for stroke names missing from the [`StrokeIndex`]
pub const UNKNOWN_STROKE_CODE: u32 = 0;

/// Prefix marking a string as an n-gram feature rather than a word token
pub const NGRAM_SENTINEL: char = '0';

/// Stroke name → stroke class code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeIndex(BTreeMap<String, u32>);

impl StrokeIndex {
    pub fn new(map: BTreeMap<String, u32>) -> Self {
        Self(map)
    }

    /// The five stroke classes used by cw2vec
    ///
    /// - 1: horizontal and rising
    /// - 2: vertical and vertical hook
    /// - 3: left-falling
    /// - 4: right-falling and dot
    /// - 5: every turning stroke
    pub fn standard() -> Self {
        const CLASSES: &[(&str, u32)] = &[
            ("横", 1),
            ("提", 1),
            ("竖", 2),
            ("竖钩", 2),
            ("撇", 3),
            ("捺", 4),
            ("点", 4),
            ("横折", 5),
            ("横钩", 5),
            ("横撇", 5),
            ("横折钩", 5),
            ("横折提", 5),
            ("横折弯", 5),
            ("横折折", 5),
            ("横斜钩", 5),
            ("横折弯钩", 5),
            ("横撇弯钩", 5),
            ("横折折撇", 5),
            ("横折折折", 5),
            ("横折折折钩", 5),
            ("竖提", 5),
            ("竖折", 5),
            ("竖弯", 5),
            ("竖弯钩", 5),
            ("竖折撇", 5),
            ("竖折折", 5),
            ("竖折折钩", 5),
            ("撇折", 5),
            ("撇点", 5),
            ("斜钩", 5),
            ("弯钩", 5),
            ("卧钩", 5),
        ];
        Self(
            CLASSES
                .iter()
                .map(|(name, code)| (name.to_string(), *code))
                .collect(),
        )
    }

    /// Code for a stroke name, [`UNKNOWN_STROKE_CODE`] when unlisted
    pub fn code(&self, stroke: &str) -> u32 {
        self.0.get(stroke).copied().unwrap_or(UNKNOWN_STROKE_CODE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for StrokeIndex {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Character → concatenated stroke codes (e.g. '猫' → "123")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeMap {
    char_to_stroke: FxHashMap<char, String>,
}

impl StrokeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `character:stroke,stroke,...` table
    ///
    /// Lines that do not split into exactly two `:` fields are skipped, as are
    /// keys that are not a single character.
    pub fn from_reader<R: BufRead>(reader: R, index: &StrokeIndex) -> Result<Self> {
        let mut map = Self::new();
        let mut skipped = 0usize;
        for line in reader.lines() {
            if !map.insert_line(&line?, index) {
                skipped += 1;
            }
        }
        log::info!(
            "stroke table: {} characters mapped, {} lines skipped",
            map.len(),
            skipped
        );
        Ok(map)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>, index: &StrokeIndex) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file), index)
    }

    pub fn parse_str(table: &str, index: &StrokeIndex) -> Self {
        let mut map = Self::new();
        for line in table.lines() {
            map.insert_line(line, index);
        }
        map
    }

    fn insert_line(&mut self, line: &str, index: &StrokeIndex) -> bool {
        let fields: Vec<&str> = line.trim().split(':').collect();
        let [character, strokes] = fields.as_slice() else {
            return false;
        };

        let mut chars = character.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            log::debug!("skipping stroke entry with multi-character key {:?}", character);
            return false;
        };

        let code: String = strokes
            .split(',')
            .map(|stroke| index.code(stroke).to_string())
            .collect();
        self.char_to_stroke.insert(ch, code);
        true
    }

    /// Insert a precomputed code string directly
    pub fn insert(&mut self, ch: char, code: impl Into<String>) {
        self.char_to_stroke.insert(ch, code.into());
    }

    pub fn get(&self, ch: char) -> Option<&str> {
        self.char_to_stroke.get(&ch).map(|s| s.as_str())
    }

    /// Concatenated codes of every character with a known decomposition
    ///
    /// Characters without one are skipped, not replaced.
    pub fn word_strokes(&self, word: &str) -> String {
        word.chars().filter_map(|ch| self.get(ch)).collect()
    }

    pub fn len(&self) -> usize {
        self.char_to_stroke.len()
    }

    pub fn is_empty(&self) -> bool {
        self.char_to_stroke.is_empty()
    }
}

/// Turns words into stroke n-gram feature strings
#[derive(Debug, Clone, Copy)]
pub struct StrokeFeatureExtractor<'a> {
    strokes: &'a StrokeMap,
    n1: usize,
    n2: usize,
}

impl<'a> StrokeFeatureExtractor<'a> {
    /// Extractor over `n1..=n2`; callers validate `1 <= n1 <= n2`
    pub fn new(strokes: &'a StrokeMap, n1: usize, n2: usize) -> Self {
        Self { strokes, n1, n2 }
    }

    /// Extractor with the default 3..=5 n-gram lengths
    pub fn with_defaults(strokes: &'a StrokeMap) -> Self {
        Self::new(strokes, 3, 5)
    }

    /// Stroke n-grams of a word, shortest first, then left to right
    ///
    /// # Examples
    /// ```
    /// # use cw2vec_data::strokes::{StrokeFeatureExtractor, StrokeMap, NGRAM_SENTINEL};
    /// let mut strokes = StrokeMap::new();
    /// strokes.insert('大', "134");
    /// let features = StrokeFeatureExtractor::with_defaults(&strokes).extract("大");
    /// assert_eq!(features, vec![format!("{}134", NGRAM_SENTINEL)]);
    /// ```
    pub fn extract(&self, word: &str) -> Vec<String> {
        let text: Vec<char> = self.strokes.word_strokes(word).chars().collect();
        if text.is_empty() {
            return Vec::new();
        }

        let mut features = Vec::new();
        for n in self.n1..=self.n2 {
            for window in text.windows(n) {
                let mut feature = String::with_capacity(n + 1);
                feature.push(NGRAM_SENTINEL);
                feature.extend(window);
                features.push(feature);
            }
        }
        features
    }
}
