//! In-memory fuzzy matching over character n-grams.
//!
//! Documents are indexed by the overlapping code-point windows ("shingles") of
//! their text. A query is shingled the same way and every document sharing at
//! least one window with it is returned, ranked by how many windows matched.
//!
//! [`NgramIndex`] works on raw `char` sequences. [`StringIndex`] puts a
//! [`Normalizer`] in front of it for callers holding plain strings.

pub mod config;
pub mod facade;
pub mod index;
pub mod normalize;
pub mod score;
pub mod shingle;

pub use config::{ConfigError, IndexConfig};
pub use facade::StringIndex;
pub use index::{DocRecord, IndexStats, NgramIndex};
pub use normalize::{normalizer_fn, split_normalizer_fn, Fold, Identity, Normalizer};
pub use score::Match;

/// Position of a document in insertion order.
pub type DocId = usize;
