// Integration tests for the full preparation pipeline

use cw2vec_data::persistence::{
    CHAR_TO_STROKE_ARTIFACT, NGRAM_VOCAB_ARTIFACT, REVERSE_WORDS_ARTIFACT, SENTENCES_ARTIFACT,
    VOCAB_ARTIFACT,
};
use cw2vec_data::{
    load_artifact, BincodeDirSink, Config, CorpusReader, NgramVocabulary, StrokeDataset,
    StrokeIndex, StrokeMap, Vocabulary, UNK_TOKEN,
};
use std::io::Write;

const CORPUS: &str = "猫 喜欢 鱼\n鱼 喜欢 水";

const STROKE_TABLE: &str = "\
猫:撇,撇,竖,横,横,竖,横折,横,横
喜:横,竖,横,竖,横折,横,点,撇,横,竖,横折,横
欢:横撇,点,撇,横撇,捺
鱼:撇,横撇,竖,横折,横,竖,横,横
水:竖钩,横撇,撇,捺
";

fn config() -> Config {
    Config {
        min_freq: 1,
        vocab_size: None,
        window_size: 2,
        negative_num: 1,
        sample: 1.0,
        negative_table_size: 100_000,
        ..Config::default()
    }
}

fn build(config: Config) -> StrokeDataset {
    let examples = CorpusReader::new().read(CORPUS.as_bytes()).unwrap();
    let strokes = StrokeMap::parse_str(STROKE_TABLE, &config.stroke2idx);
    StrokeDataset::build(config, examples, strokes).unwrap()
}

// ============ Vocabulary ============

#[test]
fn test_vocabulary_counts() {
    let dataset = build(config());
    let vocab = dataset.vocab();

    assert_eq!(vocab.len(), 5);
    let count = |w: &str| vocab.count(vocab.get_id(w).unwrap()).unwrap();
    assert_eq!(count("喜欢"), 2);
    assert_eq!(count("鱼"), 2);
    assert_eq!(count("猫"), 1);
    assert_eq!(count("水"), 1);
    assert_eq!(count(UNK_TOKEN), 0);
}

#[test]
fn test_vocabulary_id_order() {
    let dataset = build(config());
    let words: Vec<&str> = dataset.vocab().iter().map(|(_, w, _)| w).collect();
    // Descending count, ties in first-seen order, <unk> last
    assert_eq!(words, vec!["喜欢", "鱼", "猫", "水", UNK_TOKEN]);
}

#[test]
fn test_vocabulary_ids_contiguous() {
    let dataset = build(config());
    let vocab = dataset.vocab();
    let ids: Vec<u32> = vocab.iter().map(|(id, _, _)| id).collect();
    assert_eq!(ids, (0..vocab.len() as u32).collect::<Vec<_>>());
    assert_eq!(vocab.unk_id() as usize, vocab.len() - 1);
}

#[test]
fn test_zero_vocab_size_keeps_all_words() {
    let dataset = build(Config {
        vocab_size: Some(0),
        ..config()
    });
    assert_eq!(dataset.vocab().len(), 5);
    assert_eq!(dataset.train_examples().len(), 2);
}

// ============ N-grams and features ============

#[test]
fn test_ngram_ids_follow_words() {
    let dataset = build(config());
    let vocab_len = dataset.vocab().len() as u32;
    let ids: Vec<u32> = dataset.ngrams().iter().map(|(id, _, _)| id).collect();

    assert!(!ids.is_empty());
    assert_eq!(ids[0], vocab_len);
    assert!(ids.windows(2).all(|w| w[1] == w[0] + 1));
}

#[test]
fn test_feature_tuples_start_with_word_id() {
    let dataset = build(config());
    for (id, word, _) in dataset.vocab().iter() {
        if let Some(features) = dataset.features().get(id) {
            assert_eq!(features[0], id, "word {}", word);
            assert_eq!(features.len() - 1, dataset.extractor().extract(word).len());
        }
    }
    // Every word except <unk> has strokes
    assert_eq!(dataset.features().len(), 4);
}

// ============ Pairs ============

#[test]
fn test_pairs_bounded_by_line_length() {
    let mut dataset = build(config());
    let lengths: Vec<usize> = dataset.train_examples().iter().map(|e| e.len()).collect();
    assert_eq!(lengths, vec![3, 3]);

    let pairs: Vec<_> = dataset
        .pairs()
        .map(|p| (p.pos_v, p.neg_v, p.pos_u.len(), p.neg_u.len()))
        .collect();
    assert_eq!(pairs.len(), 6);
    for (pos_v, neg_v, pos_u, neg_u) in pairs {
        assert!(!pos_v.is_empty());
        assert!(pos_v.len() < 3);
        assert_eq!(pos_u, pos_v.len());
        assert_eq!(neg_v.len(), pos_v.len());
        assert_eq!(neg_u, neg_v.len());
        for (v, n) in pos_v.iter().zip(&neg_v) {
            assert_ne!(v, n);
        }
    }
}

#[test]
fn test_same_seed_reproduces_stream() {
    let collect = |seed: u64| {
        let mut dataset = build(Config { seed, ..config() });
        let epochs: Vec<Vec<(Vec<u32>, Vec<u32>)>> = (0..2)
            .map(|_| dataset.pairs().map(|p| (p.pos_v, p.neg_v)).collect())
            .collect();
        epochs
    };
    assert_eq!(collect(11), collect(11));
}

#[test]
fn test_subsampling_is_seeded() {
    let lines: Vec<String> = (0..200).map(|i| format!("的 的 的 词{}", i % 7)).collect();
    let strokes = StrokeMap::new();
    let config = Config {
        min_freq: 1,
        sample: 1e-2,
        negative_table_size: 10_000,
        ..Config::default()
    };

    let run = |seed: u64| {
        let examples = CorpusReader::new().read_lines(lines.iter().cloned());
        let config = Config {
            seed,
            ..config.clone()
        };
        let dataset = StrokeDataset::build(config, examples, strokes.clone()).unwrap();
        dataset.train_examples().to_vec()
    };
    assert_eq!(run(1), run(1));
    assert_ne!(run(1), run(2));
}

// ============ Strokes ============

#[test]
fn test_stroke_table_with_custom_index() {
    let index: StrokeIndex = [("撇", 1), ("竖提", 2), ("横折", 3)].into_iter().collect();
    let strokes = StrokeMap::parse_str("猫:撇,竖提,横折", &index);
    assert_eq!(strokes.get('猫'), Some("123"));
}

// ============ Persistence and files ============

#[test]
fn test_from_paths_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.txt");
    let strokes_path = dir.path().join("strokes.txt");

    let mut corpus = std::fs::File::create(&corpus_path).unwrap();
    writeln!(corpus, "header line").unwrap();
    write!(corpus, "{}", CORPUS).unwrap();
    std::fs::write(&strokes_path, STROKE_TABLE).unwrap();

    let config = Config {
        skip_header: true,
        ..config()
    };
    let dataset = StrokeDataset::from_paths(config, &corpus_path, &strokes_path, None).unwrap();
    assert_eq!(dataset.examples().len(), 2);

    let mut sink = BincodeDirSink::new(dir.path().join("out"));
    dataset.persist(&mut sink).unwrap();
    let transliterated = dataset.persist_transliteration(&mut sink).unwrap();

    let vocab: Vocabulary = load_artifact(sink.path_for(VOCAB_ARTIFACT)).unwrap();
    assert_eq!(&vocab, dataset.vocab());
    let ngrams: NgramVocabulary = load_artifact(sink.path_for(NGRAM_VOCAB_ARTIFACT)).unwrap();
    assert_eq!(&ngrams, dataset.ngrams());
    for (id, ngram, _) in dataset.ngrams().iter() {
        assert_eq!(ngrams.get_id(ngram), Some(id));
    }
    let strokes: StrokeMap = load_artifact(sink.path_for(CHAR_TO_STROKE_ARTIFACT)).unwrap();
    assert_eq!(&strokes, dataset.strokes());

    let sentences: Vec<String> = load_artifact(sink.path_for(SENTENCES_ARTIFACT)).unwrap();
    assert_eq!(sentences, transliterated.sentences);
    let reverse: std::collections::HashMap<String, String> =
        load_artifact(sink.path_for(REVERSE_WORDS_ARTIFACT)).unwrap();
    for (code_word, word) in &reverse {
        assert_eq!(dataset.strokes().word_strokes(word), *code_word);
    }
    assert_eq!(reverse.len(), 4);
}

#[test]
fn test_preprocessor_from_paths() {
    let dir = tempfile::tempdir().unwrap();
    let corpus_path = dir.path().join("corpus.txt");
    let strokes_path = dir.path().join("strokes.txt");
    std::fs::write(&corpus_path, "猫，喜欢，鱼").unwrap();
    std::fs::write(&strokes_path, STROKE_TABLE).unwrap();

    let split_commas = |line: &str| line.replace('，', " ");
    let dataset =
        StrokeDataset::from_paths(config(), &corpus_path, &strokes_path, Some(&split_commas))
            .unwrap();
    assert_eq!(dataset.examples()[0], vec!["猫", "喜欢", "鱼"]);
}

#[test]
fn test_empty_corpus() {
    let mut dataset = StrokeDataset::build(config(), Vec::new(), StrokeMap::new()).unwrap();
    assert_eq!(dataset.vocab().len(), 1);
    assert!(dataset.negatives().is_empty());
    assert!(dataset.train_examples().is_empty());
    assert_eq!(dataset.pairs().count(), 0);
}
