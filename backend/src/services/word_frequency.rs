use crate::models::WordCount;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"\W+").expect("static pattern compiles");
}

/// Counts lowercased words across all texts, most frequent first.
///
/// Words with equal counts keep the order in which they first appeared in the
/// batch.
pub fn count_words<S: AsRef<str>>(texts: &[S]) -> Vec<WordCount> {
    // word -> (count, first-seen position)
    let mut counts: HashMap<String, (usize, usize)> = HashMap::new();

    for text in texts {
        for token in NON_WORD.split(text.as_ref()) {
            if token.is_empty() {
                continue;
            }
            let next_position = counts.len();
            counts
                .entry(token.to_lowercase())
                .or_insert((0, next_position))
                .0 += 1;
        }
    }

    let mut entries: Vec<(String, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first_seen))| (word, count, first_seen))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    entries
        .into_iter()
        .map(|(word, count, _)| WordCount { word, count })
        .collect()
}
