use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static TLG_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-\n|[«»<>‘’_]|\.\.\.|\{.+?\}|\(.+?\)|[a-zA-Z0-9]").expect("tlg noise pattern")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

const PUNCTUATION: &[char] = &[',', '·', ':', '"', '\'', '?', '-', '!', '*', '[', ']', '{', '}'];
const PERIODS: &[char] = &['.', ';'];

/// Unicode NFKC, so accents typed as combining marks and precomposed
/// letters compare equal.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// Strips the markup left in TLG plain-text exports: guillemets, angle
/// brackets, ellipses, quotes, `{..}` and `(..)` spans, Latin letters and
/// digits. Optionally drops punctuation, and periods with it.
pub fn tlg_cleanup(text: &str, rm_punctuation: bool, rm_periods: bool) -> String {
    let mut cleaned = TLG_NOISE.replace_all(text, "").into_owned();
    if rm_punctuation {
        cleaned.retain(|c| !PUNCTUATION.contains(&c) && !(rm_periods && PERIODS.contains(&c)));
    }
    WHITESPACE.replace_all(&cleaned, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAGMENT: &str = "ῖν», εἰς δὲ τὸν ἕτερον κ[α]ττίτ[ερον «εἰ λῶιον καὶ ἄμει]νόν ἐστι";

    #[test]
    fn test_tlg_cleanup() {
        assert_eq!(
            tlg_cleanup(FRAGMENT, true, false),
            "ῖν εἰς δὲ τὸν ἕτερον καττίτερον εἰ λῶιον καὶ ἄμεινόν ἐστι"
        );
    }

    #[test]
    fn test_tlg_cleanup_keeps_punctuation_when_asked() {
        assert_eq!(tlg_cleanup("λόγος, (sic) ἄνθρωπος.", false, false), "λόγος, ἄνθρωπος.");
        assert_eq!(tlg_cleanup("λόγος; ἄνθρωπος.", true, false), "λόγος; ἄνθρωπος.");
        assert_eq!(tlg_cleanup("λόγος; ἄνθρωπος.", true, true), "λόγος ἄνθρωπος");
    }

    #[test]
    fn test_tlg_cleanup_joins_hyphenated_lines() {
        assert_eq!(tlg_cleanup("ἄν-\nθρωπος\nλόγος", true, false), "ἄνθρωπος λόγος");
    }

    #[test]
    fn test_normalize_composes_accents() {
        let decomposed = "α\u{0301}";
        assert_eq!(normalize(decomposed), "\u{03AC}");
        assert_eq!(normalize(FRAGMENT), FRAGMENT.nfkc().collect::<String>());
    }
}
