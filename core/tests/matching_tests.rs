use ngram_core::{normalizer_fn, Fold, IndexConfig, NgramIndex, StringIndex};

const LUKE: [(&str, &str); 4] = [
    ("Luke_22:35", r#"Then Jesus asked them, "When I sent you without purse, bag or sandals, did you lack anything?" "Nothing," they answered."#),
    ("Luke_22:36", r#"He said to them, "But now if you have a purse, take it, and also a bag; and if you don’t have a sword, sell your cloak and buy one."#),
    ("Luke_22:37", r#"It is written: 'And he was numbered with the transgressors'; and I tell you that this must be fulfilled in me. Yes, what is written about me is reaching its fulfillment.""#),
    ("Luke_22:38", r#"The disciples said, "See, Lord, here are two swords." "That’s enough!" he replied."#),
];

fn windows(text: &str, n: usize) -> usize { text.chars().count().saturating_sub(n - 1) }

#[test]
fn sword_ranks_by_absolute_hits() {
    let mut idx = StringIndex::new();
    for (id, text) in LUKE {
        idx.add(id, text);
    }
    // 22:38 wins because "Lord" also matches "ord"
    assert_eq!(idx.search("sword"), vec!["Luke_22:38", "Luke_22:36"]);
}

#[test]
fn sword_lookup_details() {
    let mut idx = StringIndex::new();
    for (id, text) in LUKE {
        idx.add(id, text);
    }
    let mut matches = idx.lookup("sword");
    // lookup leaves the order to the caller
    matches.sort_by(|a, b| a.match_rate.partial_cmp(&b.match_rate).unwrap());

    let got: Vec<_> = matches.iter().map(|m| (m.document, m.matched_ngrams, m.total_ngrams)).collect();
    assert_eq!(
        got,
        vec![("Luke_22:36", 3, windows(LUKE[1].1, 3)), ("Luke_22:38", 4, windows(LUKE[3].1, 3))]
    );
    for m in &matches {
        assert!((m.match_rate - m.matched_ngrams as f64 / m.total_ngrams as f64).abs() < 1e-12);
    }
}

#[test]
fn normalizer_makes_lookup_insensitive() {
    let mut idx = StringIndex::with_normalizer(normalizer_fn(|s: &str| {
        s.replace('ú', "u").to_lowercase().chars().collect()
    }));
    for (id, text) in LUKE {
        idx.add(id, text);
    }
    assert_eq!(idx.search("JESÚS"), vec!["Luke_22:35"]);
}

#[test]
fn fold_makes_lookup_insensitive() {
    let mut idx = StringIndex::with_normalizer(Fold::insensitive());
    for (id, text) in LUKE {
        idx.add(id, text);
    }
    assert_eq!(idx.search("JESÚS"), vec!["Luke_22:35"]);
}

#[test]
fn bigram_index_behind_facade() {
    let core = NgramIndex::with_config(IndexConfig::new(2, 0)).unwrap();
    let mut idx = StringIndex::from_index(core, ngram_core::Identity);
    idx.add(1, "what");
    idx.add(2, "that");
    // "th" is common to "with" and "that"
    assert_eq!(idx.search("with"), vec![2]);
}

#[test]
fn short_document_with_extra_window_beats_proportional_match() {
    let mut idx = StringIndex::new();
    idx.add("long", "abcd plus a great deal of unrelated filler text");
    idx.add("short", "abcdab");
    let m = idx.lookup("abcdab");
    let long = m.iter().find(|m| m.document == "long").unwrap();
    let short = m.iter().find(|m| m.document == "short").unwrap();
    assert!(short.matched_ngrams > long.matched_ngrams);
    assert_eq!(idx.search("abcdab"), vec!["short", "long"]);

    // and the reverse: many hits in a long document win despite a low rate
    let mut idx = StringIndex::new();
    idx.add("tiny", "abc");
    idx.add("big", "abc abc abc and then a very long tail of other words");
    let m = idx.lookup("abc");
    let tiny = m.iter().find(|m| m.document == "tiny").unwrap();
    let big = m.iter().find(|m| m.document == "big").unwrap();
    assert!(tiny.match_rate > big.match_rate);
    assert_eq!(idx.search("abc"), vec!["big", "tiny"]);
}

#[test]
fn ties_keep_insertion_order() {
    let mut idx = StringIndex::new();
    for id in ["c", "a", "b"] {
        idx.add(id, "shared");
    }
    assert_eq!(idx.search("shared"), vec!["c", "a", "b"]);
}

#[test]
fn cutoff_results_are_subset_and_strictly_above() {
    for cutoff in 0..4 {
        let core = NgramIndex::with_config(IndexConfig::new(3, cutoff)).unwrap();
        let mut idx = StringIndex::from_index(core, ngram_core::Identity);
        for (id, text) in LUKE {
            idx.add(id, text);
        }
        let stored: Vec<_> = idx.index().documents().map(|d| *d.handle()).collect();
        for m in idx.lookup("the sword of the Lord") {
            assert!(m.matched_ngrams > cutoff);
            assert!(stored.contains(&m.document));
        }
    }
}

#[test]
fn search_is_sorted_descending() {
    let mut idx = StringIndex::with_normalizer(Fold::insensitive());
    for (id, text) in LUKE {
        idx.add(id, text);
    }
    let ranked = idx.search("and the purse");
    let details = idx.lookup("and the purse");
    let counts: Vec<usize> = ranked
        .iter()
        .map(|id| details.iter().find(|m| m.document == *id).unwrap().matched_ngrams)
        .collect();
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(ranked.len(), details.len());
}

#[test]
fn short_query_matches_nothing() {
    let mut idx = StringIndex::new();
    idx.add(1, "abcdef");
    assert!(idx.lookup("ab").is_empty());
    assert!(idx.search("").is_empty());
}
