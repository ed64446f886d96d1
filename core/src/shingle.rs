//! Sliding-window n-gram generation over code-point sequences.

use std::iter::FusedIterator;
use std::slice::Windows;

/// Lazy iterator over the `n`-length windows of a sequence, sliding by one.
///
/// Windows borrow the input and compare by content, so they can be used
/// directly as keys into a map of `Box<[char]>`.
#[derive(Debug, Clone)]
pub struct Shingles<'a> {
    inner: Option<Windows<'a, char>>,
}

/// Windows of `seq` of length `n`. Yields nothing when `seq` is shorter than `n`.
///
/// `n` must be non-zero; [`crate::IndexConfig::validate`] guarantees this for
/// every index.
pub fn shingles(seq: &[char], n: usize) -> Shingles<'_> {
    // slice::windows panics on 0
    let inner = if n == 0 || seq.len() < n { None } else { Some(seq.windows(n)) };
    Shingles { inner }
}

/// Number of windows [`shingles`] yields for a sequence of `len` code points.
#[inline]
pub fn shingle_count(len: usize, n: usize) -> usize {
    if n == 0 || len < n { 0 } else { len - n + 1 }
}

impl<'a> Iterator for Shingles<'a> {
    type Item = &'a [char];

    #[inline]
    fn next(&mut self) -> Option<Self::Item> { self.inner.as_mut()?.next() }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Some(w) => w.size_hint(),
            None => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for Shingles<'_> {}
impl FusedIterator for Shingles<'_> {}
