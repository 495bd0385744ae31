// cw2vec-data Type Definitions
// Shared ids, training pair layout, and the error type

use thiserror::Error;

/// Dense id in the shared word / n-gram id space
pub type TokenId = u32;

/// One tokenized corpus line
pub type Example = Vec<String>;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, DatasetError>;

/// One group of skip-gram training data for a single center word
///
/// The four vectors are parallel in pairs:
/// - `pos_u[k]` is the center word's feature tuple for context word `pos_v[k]`
/// - `neg_u[k]` is the same feature tuple for negative word `neg_v[k]`
///
/// Feature tuples borrow from the word feature table; the first element of
/// every tuple is the center word id itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingPair<'a> {
    pub pos_u: Vec<&'a [TokenId]>,
    pub pos_v: Vec<TokenId>,
    pub neg_u: Vec<&'a [TokenId]>,
    pub neg_v: Vec<TokenId>,
}

impl<'a> TrainingPair<'a> {
    /// Number of positive (center, context) pairs in this group
    pub fn positive_count(&self) -> usize {
        self.pos_v.len()
    }

    /// Number of negative (center, sampled) pairs in this group
    pub fn negative_count(&self) -> usize {
        self.neg_v.len()
    }

    /// Center word id shared by every tuple in the group
    pub fn center(&self) -> Option<TokenId> {
        self.pos_u.first().and_then(|features| features.first().copied())
    }
}

/// Errors raised at the crate's collaborator boundaries
///
/// The statistical core itself does not fail on well-formed input; these
/// cover reading files, configuration and persistence.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not persist artifact: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl DatasetError {
    pub(crate) fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        DatasetError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_pair_counts() {
        let features: Vec<TokenId> = vec![3, 10, 11];
        let pair = TrainingPair {
            pos_u: vec![&features, &features],
            pos_v: vec![1, 2],
            neg_u: vec![&features, &features, &features, &features],
            neg_v: vec![0, 4, 0, 5],
        };

        assert_eq!(pair.positive_count(), 2);
        assert_eq!(pair.negative_count(), 4);
        assert_eq!(pair.center(), Some(3));
    }

    #[test]
    fn test_empty_pair_has_no_center() {
        let pair = TrainingPair {
            pos_u: vec![],
            pos_v: vec![],
            neg_u: vec![],
            neg_v: vec![],
        };
        assert_eq!(pair.center(), None);
    }

    #[test]
    fn test_invalid_config_display() {
        let err = DatasetError::invalid_config("window_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: window_size must be at least 1"
        );
    }
}
