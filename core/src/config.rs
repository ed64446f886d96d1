use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_NGRAM_LEN: usize = 3;
pub const DEFAULT_CUTOFF_WEIGHT: usize = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ngram_len must be at least 1")]
    ZeroNgramLen,
}

/// Construction-time settings of an index. Fixed once the index exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Window size used for shingling.
    pub ngram_len: usize,
    /// A document is reported only when its hit count is strictly greater than this.
    pub cutoff_weight: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { ngram_len: DEFAULT_NGRAM_LEN, cutoff_weight: DEFAULT_CUTOFF_WEIGHT }
    }
}

impl IndexConfig {
    pub fn new(ngram_len: usize, cutoff_weight: usize) -> Self { Self { ngram_len, cutoff_weight } }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ngram_len == 0 {
            return Err(ConfigError::ZeroNgramLen);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_trigrams_without_cutoff() {
        let cfg = IndexConfig::default();
        assert_eq!(cfg.ngram_len, 3);
        assert_eq!(cfg.cutoff_weight, 0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_ngram_len() {
        assert_eq!(IndexConfig::new(0, 0).validate(), Err(ConfigError::ZeroNgramLen));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: IndexConfig = serde_json::from_str(r#"{"ngram_len": 2}"#).unwrap();
        assert_eq!(cfg, IndexConfig::new(2, 0));
    }
}
