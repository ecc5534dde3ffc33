//! Typo correction for unrecognized commands.

/// Minimum Jaro similarity for a candidate to be offered.
pub const SIMILARITY_CUTOFF: f64 = 0.7;

/// Shortest input that is ever corrected.
pub const MIN_WORD_LEN: usize = 2;

/// The single most similar choice to `word`, if any clears the cutoff.
///
/// Ties go to the earliest choice. Words under [`MIN_WORD_LEN`] characters
/// get no match, and a choice whose length differs from the word's by more
/// than a factor of two is skipped.
pub fn closest_match<'a, I>(word: &str, choices: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let word_len = word.chars().count();
    if word_len < MIN_WORD_LEN {
        return None;
    }
    let mut best: Option<(&'a str, f64)> = None;
    for choice in choices {
        if !comparable_lengths(word_len, choice.chars().count()) {
            continue;
        }
        let score = strsim::jaro(word, choice);
        if score < SIMILARITY_CUTOFF {
            continue;
        }
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((choice, score));
        }
    }
    best.map(|(choice, _)| choice)
}

fn comparable_lengths(a: usize, b: usize) -> bool {
    let (short, long) = if a <= b { (a, b) } else { (b, a) };
    short * 2 >= long
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_letter_typo() {
        assert_eq!(closest_match("foo", ["for", "bar"]), Some("for"));
        assert_eq!(closest_match("stokcs", ["crypto", "stocks"]), Some("stocks"));
    }

    #[test]
    fn nothing_close() {
        assert_eq!(closest_match("zzzz", ["stocks", "crypto", "help"]), None);
    }

    #[test]
    fn single_letters_are_never_corrected() {
        let choices = ["exit", "home", "stop", "stocks", "load", "help"];
        for word in ["e", "o", "s", "l", "h"] {
            assert_eq!(closest_match(word, choices), None, "{word}");
        }
    }

    #[test]
    fn lopsided_lengths_are_skipped() {
        assert_eq!(closest_match("ex", ["exit"]), Some("exit"));
        assert_eq!(closest_match("st", ["stocks"]), None);
    }

    #[test]
    fn exact_match_wins() {
        assert_eq!(closest_match("load", ["lead", "load"]), Some("load"));
    }
}
