use crate::config::{ConfigError, IndexConfig};
use crate::index::NgramIndex;
use crate::normalize::{Identity, Normalizer};
use crate::score::Match;

/// String front end for [`NgramIndex`].
///
/// Every document field and every query goes through the same normalizer `N`
/// before shingling.
#[derive(Debug)]
pub struct StringIndex<T, N = Identity> {
    index: NgramIndex<T>,
    normalizer: N,
}

impl<T> Default for StringIndex<T, Identity> {
    fn default() -> Self { Self::from_index(NgramIndex::new(), Identity) }
}

impl<T> StringIndex<T, Identity> {
    /// Trigram index over raw code points.
    pub fn new() -> Self { Self::default() }

    pub fn with_config(cfg: IndexConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_index(NgramIndex::with_config(cfg)?, Identity))
    }
}

impl<T, N: Normalizer> StringIndex<T, N> {
    /// Default trigram index behind a custom normalizer.
    pub fn with_normalizer(normalizer: N) -> Self { Self::from_index(NgramIndex::new(), normalizer) }

    /// Wraps an already configured index. Anything it holds must have been
    /// normalized the way `normalizer` does it.
    pub fn from_index(index: NgramIndex<T>, normalizer: N) -> Self { Self { index, normalizer } }

    pub fn index(&self) -> &NgramIndex<T> { &self.index }
    pub fn normalizer(&self) -> &N { &self.normalizer }
    pub fn into_inner(self) -> NgramIndex<T> { self.index }

    pub fn len(&self) -> usize { self.index.len() }
    pub fn is_empty(&self) -> bool { self.index.is_empty() }

    fn sequences<I, S>(&self, texts: I) -> Vec<Vec<char>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts.into_iter().flat_map(|t| self.normalizer.normalize(t.as_ref())).collect()
    }

    pub fn add(&mut self, doc: T, text: &str) { self.add_fields(doc, [text]) }

    /// Indexes several text fields as one document.
    pub fn add_fields<I, S>(&mut self, doc: T, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let seqs = self.sequences(fields);
        self.index.add_sequences(doc, seqs);
    }
}

impl<T: Clone, N: Normalizer> StringIndex<T, N> {
    pub fn lookup(&self, query: &str) -> Vec<Match<T>> { self.lookup_fields([query]) }

    pub fn lookup_fields<I, S>(&self, queries: I) -> Vec<Match<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.index.lookup_sequences(self.sequences(queries))
    }

    pub fn search(&self, query: &str) -> Vec<T> { self.search_fields([query]) }

    pub fn search_fields<I, S>(&self, queries: I) -> Vec<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.index.search_sequences(self.sequences(queries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Fold;

    #[test]
    fn normalizes_both_paths() {
        let mut idx = StringIndex::with_normalizer(Fold::insensitive());
        idx.add(1, "Café");
        assert_eq!(idx.search("CAFÉ"), vec![1]);
        assert_eq!(idx.search("cafe"), vec![1]);
    }

    #[test]
    fn identity_is_case_sensitive() {
        let mut idx = StringIndex::new();
        idx.add(1, "Café");
        assert!(idx.search("CAFÉ").is_empty());
    }

    #[test]
    fn split_output_is_flattened_into_one_document() {
        let mut idx = StringIndex::with_normalizer(Fold::new().split_words(true));
        idx.add("d", "abc de fgh");
        assert_eq!(idx.len(), 1);
        let rec = idx.index().documents().next().unwrap();
        // "abc" and "fgh" give one window each, "de" none
        assert_eq!(rec.ngram_count(), 2);
        assert!(idx.search("c d").is_empty());
    }

    #[test]
    fn with_config_applies_ngram_len() {
        let mut idx = StringIndex::with_config(IndexConfig::new(2, 0)).unwrap();
        idx.add(1, "what");
        idx.add(2, "that");
        assert_eq!(idx.index().ngram_len(), 2);
        assert_eq!(idx.search("with"), vec![2]);
        assert!(StringIndex::<u8>::with_config(IndexConfig::new(0, 0)).is_err());
    }

    #[test]
    fn fields_are_pooled() {
        let mut idx = StringIndex::new();
        idx.add_fields("doc", ["Title", "Body text"]);
        let m = idx.lookup_fields(["itl", "ody"]);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].matched_ngrams, 2);
        assert_eq!(m[0].total_ngrams, 3 + 7);
    }
}
