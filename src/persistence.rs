// cw2vec-data Persistence
// Writes prepared tables to disk as bincode files

use crate::types::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Artifact names used by [`crate::StrokeDataset::persist`]
pub const VOCAB_ARTIFACT: &str = "vocab";
pub const NGRAM_VOCAB_ARTIFACT: &str = "ngram_vocab";
pub const CHAR_TO_STROKE_ARTIFACT: &str = "char_to_stroke";
pub const SENTENCES_ARTIFACT: &str = "idx2sentence";
pub const REVERSE_WORDS_ARTIFACT: &str = "idx2word";

/// Destination for named, serializable artifacts
pub trait PersistenceSink {
    fn persist<T: Serialize + ?Sized>(&mut self, name: &str, data: &T) -> Result<()>;
}

/// Writes each artifact to `<dir>/<name>.bin`
///
/// Files are written to a temporary file in the same directory and renamed
/// into place, so readers never see a partial artifact.
#[derive(Debug, Clone)]
pub struct BincodeDirSink {
    dir: PathBuf,
}

impl BincodeDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PersistenceSink for BincodeDirSink {
    fn persist<T: Serialize + ?Sized>(&mut self, name: &str, data: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            bincode::serialize_into(&mut writer, data)?;
            writer.flush()?;
        }

        let path = self.path_for(name);
        temp_file.persist(&path)?;
        log::debug!("persisted {} to {}", name, path.display());
        Ok(())
    }
}

/// Read back an artifact written by [`BincodeDirSink`]
pub fn load_artifact<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(bincode::deserialize_from(reader)?)
}
