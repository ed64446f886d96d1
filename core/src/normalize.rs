//! Text to code-point conversion applied before indexing and before querying.
//!
//! A [`StringIndex`](crate::StringIndex) runs the same normalizer on both
//! paths. Folding only one side would make stored windows unreachable.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"\S+").expect("valid regex");
}

/// Converts one text unit into one or more code-point sequences.
///
/// Each returned sequence is shingled on its own.
pub trait Normalizer {
    fn normalize(&self, text: &str) -> Vec<Vec<char>>;
}

/// Raw code points, untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    fn normalize(&self, text: &str) -> Vec<Vec<char>> { vec![text.chars().collect()] }
}

/// Wraps a function producing a single sequence. See [`normalizer_fn`].
#[derive(Clone, Copy)]
pub struct FnNormalizer<F>(F);

/// Wraps a function producing several sequences. See [`split_normalizer_fn`].
#[derive(Clone, Copy)]
pub struct SplitFnNormalizer<F>(F);

/// Uses `f` as the normalizer.
///
/// ```
/// use ngram_core::{normalizer_fn, StringIndex};
///
/// let mut idx = StringIndex::with_normalizer(normalizer_fn(|s: &str| {
///     s.replace('ú', "u").to_lowercase().chars().collect()
/// }));
/// idx.add("Luke_22:35", "Then Jesus asked them");
/// assert_eq!(idx.search("JESÚS"), vec!["Luke_22:35"]);
/// ```
pub fn normalizer_fn<F>(f: F) -> FnNormalizer<F>
where
    F: Fn(&str) -> Vec<char>,
{
    FnNormalizer(f)
}

/// Uses `f`, which may split a text unit into independent sequences.
pub fn split_normalizer_fn<F>(f: F) -> SplitFnNormalizer<F>
where
    F: Fn(&str) -> Vec<Vec<char>>,
{
    SplitFnNormalizer(f)
}

impl<F> Normalizer for FnNormalizer<F>
where
    F: Fn(&str) -> Vec<char>,
{
    fn normalize(&self, text: &str) -> Vec<Vec<char>> { vec![(self.0)(text)] }
}

impl<F> Normalizer for SplitFnNormalizer<F>
where
    F: Fn(&str) -> Vec<Vec<char>>,
{
    fn normalize(&self, text: &str) -> Vec<Vec<char>> { (self.0)(text) }
}

/// Configurable folding normalizer. With every switch off it behaves like
/// [`Identity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fold {
    lowercase: bool,
    strip_accents: bool,
    collapse_whitespace: bool,
    split_words: bool,
}

impl Fold {
    pub fn new() -> Self { Self::default() }

    /// Lowercase plus accent stripping.
    pub fn insensitive() -> Self { Self::new().lowercase(true).strip_accents(true) }

    pub fn lowercase(mut self, on: bool) -> Self { self.lowercase = on; self }

    /// Decomposes (NFKD) and drops combining marks, so "ú" becomes "u".
    pub fn strip_accents(mut self, on: bool) -> Self { self.strip_accents = on; self }

    /// Turns every run of whitespace into one space and trims both ends.
    pub fn collapse_whitespace(mut self, on: bool) -> Self { self.collapse_whitespace = on; self }

    /// Emits one sequence per whitespace-separated word, so no window spans
    /// two words.
    pub fn split_words(mut self, on: bool) -> Self { self.split_words = on; self }

    fn fold(&self, text: &str) -> String {
        let mut s = if self.strip_accents {
            text.nfkd().filter(|c| !is_combining_mark(*c)).collect::<String>()
        } else {
            text.to_string()
        };
        if self.lowercase {
            s = s.to_lowercase();
        }
        if self.collapse_whitespace {
            s = WHITESPACE.replace_all(s.trim(), " ").into_owned();
        }
        s
    }
}

impl Normalizer for Fold {
    fn normalize(&self, text: &str) -> Vec<Vec<char>> {
        let folded = self.fold(text);
        if self.split_words {
            WORD.find_iter(&folded).map(|m| m.as_str().chars().collect::<Vec<_>>()).collect()
        } else {
            vec![folded.chars().collect()]
        }
    }
}
