//! Hit accumulation, cutoff filtering and ranking of lookup results.

use serde::Serialize;

use crate::index::DocRecord;
use crate::DocId;

/// Detailed result of a lookup for one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match<T> {
    pub document: T,
    /// Windows the document produced when it was added.
    pub total_ngrams: usize,
    /// Query windows found in the document, counted with multiplicity.
    pub matched_ngrams: usize,
    /// `matched_ngrams / total_ngrams`. Can exceed 1.0 when windows repeat.
    pub match_rate: f64,
}

/// Per-document hit counters for a single query.
#[derive(Debug)]
pub struct HitCounter {
    hits: Vec<usize>,
}

impl HitCounter {
    pub fn new(num_docs: usize) -> Self { Self { hits: vec![0; num_docs] } }

    /// Adds one hit for every entry of a posting list, duplicates included.
    #[inline]
    pub fn record(&mut self, postings: &[DocId]) {
        for &doc in postings {
            self.hits[doc] += 1;
        }
    }

    pub fn hits(&self, doc: DocId) -> usize { self.hits[doc] }

    /// Documents whose hit count is strictly above `cutoff`, in insertion order.
    pub fn into_matches<T: Clone>(self, docs: &[DocRecord<T>], cutoff: usize) -> Vec<Match<T>> {
        self.hits
            .into_iter()
            .zip(docs)
            .filter(|(count, _)| *count > cutoff)
            .map(|(count, rec)| Match {
                document: rec.handle.clone(),
                total_ngrams: rec.ngram_count,
                matched_ngrams: count,
                match_rate: count as f64 / rec.ngram_count as f64,
            })
            .collect()
    }
}

/// Orders matches by absolute hit count, highest first.
///
/// The sort is stable: documents with equal counts keep insertion order.
/// `match_rate` plays no part, so a long document with many hits outranks a
/// short one that matched a larger share of its windows.
pub fn rank<T>(mut matches: Vec<Match<T>>) -> Vec<Match<T>> {
    matches.sort_by(|a, b| b.matched_ngrams.cmp(&a.matched_ngrams));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(handle: &'static str, ngram_count: usize) -> DocRecord<&'static str> {
        DocRecord { handle, ngram_count }
    }

    #[test]
    fn counts_every_posting_entry() {
        let mut hits = HitCounter::new(3);
        hits.record(&[0, 2, 2]);
        hits.record(&[2]);
        assert_eq!(hits.hits(0), 1);
        assert_eq!(hits.hits(1), 0);
        assert_eq!(hits.hits(2), 3);
    }

    #[test]
    fn cutoff_is_exclusive() {
        let docs = [rec("a", 4), rec("b", 10), rec("c", 2)];
        let mut hits = HitCounter::new(3);
        hits.record(&[0, 1, 1, 2, 2, 2]);
        let m = hits.into_matches(&docs, 2);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].document, "c");
        assert_eq!(m[0].matched_ngrams, 3);
        assert_eq!(m[0].total_ngrams, 2);
        assert!((m[0].match_rate - 1.5).abs() < 1e-12);
    }

    #[test]
    fn rank_prefers_absolute_count_over_rate() {
        let matches = vec![
            Match { document: "short", total_ngrams: 2, matched_ngrams: 2, match_rate: 1.0 },
            Match { document: "long", total_ngrams: 100, matched_ngrams: 3, match_rate: 0.03 },
        ];
        let ranked: Vec<_> = rank(matches).into_iter().map(|m| m.document).collect();
        assert_eq!(ranked, vec!["long", "short"]);
    }

    #[test]
    fn rank_keeps_insertion_order_on_ties() {
        let matches = (0..5)
            .map(|i| Match { document: i, total_ngrams: 10, matched_ngrams: 1 + (i % 2), match_rate: 0.0 })
            .collect();
        let ranked: Vec<_> = rank(matches).into_iter().map(|m| m.document).collect();
        assert_eq!(ranked, vec![1, 3, 0, 2, 4]);
    }
}
