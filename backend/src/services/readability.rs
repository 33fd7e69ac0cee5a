//! Flesch reading-ease and Flesch-Kincaid grade level for video descriptions.

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReadabilityScores {
    pub grade_level: f64,
    pub reading_ease: f64,
}

/// Scores a text body. Both scores are floored at 0.
///
/// A body without any words scores 0.0 on both scales. Sentence count is
/// floored at 1 so unpunctuated text is treated as one sentence.
pub fn score(text: &str) -> ReadabilityScores {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return ReadabilityScores::default();
    }

    let word_count = words.len() as f64;
    let sentence_count = count_sentences(text).max(1) as f64;
    let syllable_count: usize = words.iter().map(|w| count_syllables_in_word(w)).sum();

    let words_per_sentence = word_count / sentence_count;
    let syllables_per_word = syllable_count as f64 / word_count;

    let reading_ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade_level = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;

    ReadabilityScores {
        grade_level: grade_level.max(0.0),
        reading_ease: reading_ease.max(0.0),
    }
}

/// Fragments between `.`, `!` and `?`, ignoring empty fragments at the end.
fn count_sentences(text: &str) -> usize {
    let fragments: Vec<&str> = text.split(['.', '!', '?']).collect();
    fragments
        .iter()
        .rposition(|f| !f.is_empty())
        .map_or(0, |last| last + 1)
}

fn count_syllables_in_word(word: &str) -> usize {
    let lower = word.to_lowercase();
    let mut count: usize = 0;
    let mut last_was_vowel = false;

    for c in lower.chars() {
        if VOWELS.contains(&c) {
            if !last_was_vowel {
                count += 1;
                last_was_vowel = true;
            }
        } else {
            last_was_vowel = false;
        }
    }

    if lower.ends_with('e') {
        count = count.saturating_sub(1);
    }

    count.max(1)
}
