// cw2vec-data Preparation CLI
// Builds vocabulary, stroke n-gram tables and reports the pair stream

use clap::Parser;
use cw2vec_data::{BincodeDirSink, Config, StrokeDataset};
use std::path::PathBuf;

/// Prepare cw2vec training data from a tokenized Chinese corpus
#[derive(Parser, Debug)]
#[command(name = "cw2vec-prepare")]
#[command(about = "Build vocabulary, stroke n-gram and sampling tables for cw2vec", long_about = None)]
#[command(version)]
struct Args {
    /// Whitespace-tokenized corpus, one sentence per line
    #[arg(value_name = "CORPUS")]
    corpus: PathBuf,

    /// Stroke table with `character:stroke,stroke,...` lines
    #[arg(value_name = "STROKES")]
    strokes: PathBuf,

    /// Directory receiving the persisted tables
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    min_freq: Option<u64>,

    #[arg(long)]
    window_size: Option<usize>,

    #[arg(long)]
    negative_num: Option<usize>,

    #[arg(long)]
    sample: Option<f64>,

    /// Discard the first corpus line
    #[arg(long)]
    skip_header: bool,

    /// Also write the stroke-code corpus and its reverse word map
    #[arg(short, long)]
    transliterate: bool,

    /// Epochs of pairs to generate and count (0 skips generation)
    #[arg(short, long, default_value = "1")]
    epochs: usize,
}

impl Args {
    fn config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(min_freq) = self.min_freq {
            config.min_freq = min_freq;
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(negative_num) = self.negative_num {
            config.negative_num = negative_num;
        }
        if let Some(sample) = self.sample {
            config.sample = sample;
        }
        config.skip_header |= self.skip_header;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.config()?;
    log::debug!("configuration: {:?}", config);

    println!("📖 Building dataset from {}", args.corpus.display());
    let mut dataset = StrokeDataset::from_paths(config, &args.corpus, &args.strokes, None)?;

    let stats = dataset.stats();
    println!("✅ Dataset ready:");
    println!("  - Examples: {} ({} after subsampling)", stats.examples, stats.train_examples);
    println!("  - Vocabulary: {} words", stats.vocab_size);
    println!("  - Stroke n-grams: {}", stats.ngram_count);
    println!("  - Words with features: {}", stats.feature_words);
    println!("  - Negative table slots: {}", stats.negative_table_len);

    let mut sink = BincodeDirSink::new(&args.output);
    dataset.persist(&mut sink)?;
    println!("\n💾 Tables written to {}", sink.dir().display());

    if args.transliterate {
        let corpus = dataset.persist_transliteration(&mut sink)?;
        println!(
            "💾 Transliterated corpus: {} sentences, {} code words",
            corpus.sentences.len(),
            corpus.reverse.len()
        );
    }

    for epoch in 1..=args.epochs {
        let mut groups = 0usize;
        let mut positives = 0usize;
        let mut negatives = 0usize;
        for pair in dataset.pairs() {
            groups += 1;
            positives += pair.positive_count();
            negatives += pair.negative_count();
        }
        println!(
            "🔄 Epoch {}: {} center words, {} positive pairs, {} negative pairs",
            epoch, groups, positives, negatives
        );
    }

    Ok(())
}
