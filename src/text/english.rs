//! Suffix rules used for English words missing from the lexicon.

/// Penn Treebank tag guessed from the shape of `token`.
pub(crate) fn guess_tag(token: &str) -> String {
    if !token.chars().any(char::is_alphanumeric) {
        return match token {
            "." | "!" | "?" => ".",
            ";" | ":" | "..." => ":",
            other => other,
        }
        .to_string();
    }

    let lower = token.to_lowercase();
    let tag = if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        "CD"
    } else if token.chars().next().is_some_and(char::is_uppercase) {
        "NNP"
    } else if lower.ends_with("ing") {
        "VBG"
    } else if lower.ends_with("ed") {
        "VBD"
    } else if lower.ends_with("ly") {
        "RB"
    } else if lower.ends_with('s') && !lower.ends_with("ss") {
        "NNS"
    } else {
        "NN"
    };
    tag.to_string()
}

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

/// Possible base forms of lowercase `word` given its tag, most likely first.
pub(crate) fn lemma_candidates(word: &str, tag: &str) -> Vec<String> {
    let rules = match tag.chars().next() {
        Some('N') => NOUN_RULES,
        Some('V') => VERB_RULES,
        Some('J') => ADJECTIVE_RULES,
        _ => return Vec::new(),
    };
    rules
        .iter()
        .filter_map(|(suffix, replacement)| {
            word.strip_suffix(suffix)
                .filter(|stem| !stem.is_empty())
                .map(|stem| format!("{stem}{replacement}"))
        })
        .collect()
}
