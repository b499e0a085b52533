//! Latin orthography normalization and Schinke stemming.

/// Replaces `j` with `i` and `v` with `u`, keeping case.
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'j' => 'i',
            'J' => 'I',
            'v' => 'u',
            'V' => 'U',
            other => other,
        })
        .collect()
}

const STOPWORDS: &[&str] = &[
    "ab", "ac", "ad", "adhic", "aliqui", "aliquis", "an", "ante", "apud", "at", "atque", "aut", "autem",
    "cum", "cur", "de", "deinde", "dum", "ego", "enim", "ergo", "es", "est", "et", "etiam", "etsi", "ex",
    "fio", "haud", "hic", "iam", "idem", "igitur", "ille", "in", "infra", "inter", "interim", "ipse", "is",
    "ita", "magis", "modo", "mox", "nam", "ne", "nec", "necque", "neque", "nisi", "non", "nos", "o", "ob",
    "per", "possum", "post", "pro", "quae", "quam", "quare", "qui", "quia", "quicumque", "quidem",
    "quilibet", "quis", "quisnam", "quisquam", "quisque", "quisquis", "quo", "quoniam", "sed", "si",
    "sic", "sive", "sub", "sui", "sum", "super", "suus", "tam", "tamen", "trans", "tu", "tum", "ubi",
    "uel", "uero", "unus", "ut",
];

/// Words ending in `-que` where the ending is part of the word.
const QUE_EXCEPTIONS: &[&str] = &[
    "atque", "quoque", "neque", "itaque", "absque", "apsque", "abusque", "adaeque", "adusque", "denique",
    "deque", "susque", "oblique", "peraeque", "plenisque", "quandoque", "quisque", "quaeque", "cuiusque",
    "cuique", "quemque", "quamque", "quaque", "quique", "quorumque", "quarumque", "quibusque", "quosque",
    "quasque", "quotusquisque", "quousque", "ubique", "undique", "usque", "uterque", "utique", "utroque",
    "utribique", "torque", "coque", "concoque", "contorque", "detorque", "decoque", "excoque", "extorque",
    "obtorque", "optorque", "retorque", "recoque", "attorque", "incoque", "intorque", "praetorque",
];

const NOUN_ENDINGS: &[&str] = &[
    "ibus", "ius", "ae", "am", "as", "em", "es", "ia", "is", "nt", "os", "ud", "um", "us", "a", "e", "i", "o", "u",
];

/// Verb endings and what replaces them.
const VERB_ENDINGS: &[(&str, &str)] = &[
    ("iuntur", "i"),
    ("erunt", "i"),
    ("untur", "i"),
    ("iunt", "i"),
    ("unt", "i"),
    ("beris", "bi"),
    ("bor", "bi"),
    ("bo", "bi"),
    ("ero", "eri"),
    ("mini", ""),
    ("ntur", ""),
    ("stis", ""),
    ("mur", ""),
    ("mus", ""),
    ("ris", ""),
    ("sti", ""),
    ("tis", ""),
    ("tur", ""),
    ("ns", ""),
    ("nt", ""),
    ("ri", ""),
    ("m", ""),
    ("r", ""),
    ("s", ""),
    ("t", ""),
];

const MIN_STEM: usize = 2;

/// `word` without `ending`, if what remains is long enough to be a stem.
fn strip<'a>(word: &'a str, ending: &str) -> Option<&'a str> {
    word.strip_suffix(ending)
        .filter(|stem| stem.chars().count() >= MIN_STEM)
}

fn stem_word(word: &str) -> String {
    if STOPWORDS.contains(&word) || QUE_EXCEPTIONS.contains(&word) {
        return word.to_string();
    }
    let word = strip(word, "que").unwrap_or(word);

    if let Some(stem) = NOUN_ENDINGS.iter().find_map(|ending| strip(word, ending)) {
        return stem.to_string();
    }
    verb_stem(word)
}

fn verb_stem(word: &str) -> String {
    VERB_ENDINGS
        .iter()
        .find_map(|(ending, replacement)| strip(word, ending).map(|stem| format!("{stem}{replacement}")))
        .unwrap_or_else(|| word.to_string())
}

/// Lowercases `text` and reduces every whitespace-delimited word to its
/// stem. Stopwords are kept as they are.
pub fn stem(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .map(stem_word)
        .collect::<Vec<_>>()
        .join(" ")
}
