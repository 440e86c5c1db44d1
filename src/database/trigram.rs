//! Trigram similarity with `pg_trgm` semantics
//!
//! Words are runs of alphanumeric characters, lowercased, padded with two
//! spaces in front and one behind. Similarity is the Jaccard index of the
//! two trigram sets.

use std::collections::BTreeSet;

pub type Trigram = [char; 3];

pub fn trigrams(text: &str) -> BTreeSet<Trigram> {
    let lowered = text.to_lowercase();
    let mut set = BTreeSet::new();

    for word in lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = "  "
            .chars()
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert([window[0], window[1], window[2]]);
        }
    }

    set
}

pub fn similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count();
    shared as f32 / (left.len() + right.len() - shared) as f32
}
