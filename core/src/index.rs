use serde::Serialize;
use std::collections::HashMap;

use crate::config::{ConfigError, IndexConfig};
use crate::score::{rank, HitCounter, Match};
use crate::shingle::{shingle_count, shingles};
use crate::DocId;

/// A stored document: the caller's handle and how many windows it produced.
#[derive(Debug, Clone)]
pub struct DocRecord<T> {
    pub(crate) handle: T,
    pub(crate) ngram_count: usize,
}

impl<T> DocRecord<T> {
    pub fn handle(&self) -> &T { &self.handle }
    pub fn ngram_count(&self) -> usize { self.ngram_count }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub distinct_ngrams: usize,
    /// Total posting entries, duplicates included.
    pub postings: usize,
}

/// Inverted index from code-point n-grams to the documents containing them.
///
/// The handle type `T` is opaque to the index; it is only cloned out into
/// results. Documents cannot be removed and posting lists only grow.
///
/// All mutation goes through `&mut self`. Share an index between threads
/// behind a reader/writer lock.
#[derive(Debug)]
pub struct NgramIndex<T> {
    /// n-gram -> document ids, in insertion order, one entry per occurrence
    postings: HashMap<Box<[char]>, Vec<DocId>>,
    docs: Vec<DocRecord<T>>,
    ngram_len: usize,
    cutoff_weight: usize,
}

impl<T> Default for NgramIndex<T> {
    fn default() -> Self {
        let cfg = IndexConfig::default();
        Self { postings: HashMap::new(), docs: Vec::new(), ngram_len: cfg.ngram_len, cutoff_weight: cfg.cutoff_weight }
    }
}

impl<T> NgramIndex<T> {
    /// Trigram index with no cutoff.
    pub fn new() -> Self { Self::default() }

    pub fn with_config(cfg: IndexConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        tracing::debug!(ngram_len = cfg.ngram_len, cutoff_weight = cfg.cutoff_weight, "created ngram index");
        Ok(Self { ngram_len: cfg.ngram_len, cutoff_weight: cfg.cutoff_weight, ..Self::default() })
    }

    pub fn config(&self) -> IndexConfig { IndexConfig::new(self.ngram_len, self.cutoff_weight) }
    pub fn ngram_len(&self) -> usize { self.ngram_len }
    pub fn cutoff_weight(&self) -> usize { self.cutoff_weight }

    /// Number of stored documents.
    pub fn len(&self) -> usize { self.docs.len() }
    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    /// Stored documents in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &DocRecord<T>> { self.docs.iter() }

    pub fn distinct_ngrams(&self) -> usize { self.postings.len() }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.docs.len(),
            distinct_ngrams: self.postings.len(),
            postings: self.postings.values().map(Vec::len).sum(),
        }
    }

    /// Associates the windows of `text` with `doc`.
    ///
    /// `doc` can be anything identifying the document: a row id, a path, a
    /// title. Text shorter than the n-gram length is ignored and `doc` is
    /// dropped.
    pub fn add(&mut self, doc: T, text: &[char]) { self.add_sequences(doc, [text]) }

    /// Associates several independent sequences (e.g. title and body) with one
    /// document. Windows never span two sequences; their counts are pooled.
    ///
    /// Nothing is stored when no sequence is long enough to yield a window.
    pub fn add_sequences<I, S>(&mut self, doc: T, sequences: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[char]>,
    {
        let sequences: Vec<S> = sequences.into_iter().collect();
        let total: usize = sequences.iter().map(|s| shingle_count(s.as_ref().len(), self.ngram_len)).sum();
        if total == 0 {
            return;
        }

        let id = self.docs.len();
        for seq in &sequences {
            for window in shingles(seq.as_ref(), self.ngram_len) {
                self.push_posting(window, id);
            }
        }
        self.docs.push(DocRecord { handle: doc, ngram_count: total });
    }

    fn push_posting(&mut self, window: &[char], id: DocId) {
        // avoid allocating a key for windows already present
        if let Some(list) = self.postings.get_mut(window) {
            list.push(id);
        } else {
            self.postings.insert(window.into(), vec![id]);
        }
    }

    fn count_hits<I, S>(&self, queries: I) -> HitCounter
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[char]>,
    {
        let mut hits = HitCounter::new(self.docs.len());
        let mut windows = 0usize;
        for query in queries {
            for window in shingles(query.as_ref(), self.ngram_len) {
                windows += 1;
                if let Some(list) = self.postings.get(window) {
                    hits.record(list);
                }
            }
        }
        tracing::trace!(windows, docs = self.docs.len(), "counted query hits");
        hits
    }
}

impl<T: Clone> NgramIndex<T> {
    /// Every document sharing more than `cutoff_weight` windows with `query`,
    /// unsorted (insertion order), with hit details.
    pub fn lookup(&self, query: &[char]) -> Vec<Match<T>> { self.lookup_sequences([query]) }

    pub fn lookup_sequences<I, S>(&self, queries: I) -> Vec<Match<T>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[char]>,
    {
        self.count_hits(queries).into_matches(&self.docs, self.cutoff_weight)
    }

    /// Handles of matching documents, most hits first. Ties keep insertion order.
    pub fn search(&self, query: &[char]) -> Vec<T> { self.search_sequences([query]) }

    pub fn search_sequences<I, S>(&self, queries: I) -> Vec<T>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[char]>,
    {
        rank(self.lookup_sequences(queries)).into_iter().map(|m| m.document).collect()
    }
}
