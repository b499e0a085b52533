use std::fmt;
use std::str::FromStr;

use crate::error::DhelpError;

/// Languages with a built-in profile and backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Latin,
    AncientGreek,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Latin, Language::AncientGreek];

    pub fn profile(self) -> &'static LanguageProfile {
        match self {
            Language::English => &ENGLISH,
            Language::Latin => &LATIN,
            Language::AncientGreek => &GREEK,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = DhelpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "english" | "en" => Ok(Language::English),
            "latin" | "la" => Ok(Language::Latin),
            "greek" | "ancient greek" | "grc" => Ok(Language::AncientGreek),
            other => Err(DhelpError::MalformedInput(format!("unknown language '{other}'"))),
        }
    }
}

/// Everything that differs between language variants of [`crate::text::Text`].
///
/// Variants start from the base profile and override only what they need.
#[derive(Debug)]
pub struct LanguageProfile {
    pub name: &'static str,
    /// Directory under the data root holding installed resources.
    pub data_dir: &'static str,
    /// Characters kept by `remove_non_characters`.
    pub alphabet: fn(char) -> bool,
    pub sentence_terminators: &'static [char],
    /// Tag and lemmatize words missing from the lexicon with suffix rules
    /// instead of leaving them unknown.
    pub guess_unknown: bool,
    pub bundled_lexicon: &'static str,
    pub bundled_entities: &'static str,
}

const BASE_PUNCTUATION: &str = ".,;:!?'\"-";

fn base_alphabet(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || BASE_PUNCTUATION.contains(c)
}

fn latin_alphabet(c: char) -> bool {
    base_alphabet(c) || "āēīōūȳĀĒĪŌŪȲăĕĭŏŭĂĔĬŎŬ".contains(c)
}

fn greek_alphabet(c: char) -> bool {
    ('\u{0374}'..='\u{03E1}').contains(&c)
        || ('\u{1F00}'..='\u{1FFE}').contains(&c)
        || c.is_whitespace()
        || ".,;·'’".contains(c)
}

const BASE: LanguageProfile = LanguageProfile {
    name: "english",
    data_dir: "english",
    alphabet: base_alphabet,
    sentence_terminators: &['.', '!', '?'],
    guess_unknown: true,
    bundled_lexicon: include_str!("../../data/english/lexicon.tsv"),
    bundled_entities: include_str!("../../data/english/entities.txt"),
};

pub static ENGLISH: LanguageProfile = BASE;

pub static LATIN: LanguageProfile = LanguageProfile {
    name: "latin",
    data_dir: "latin",
    alphabet: latin_alphabet,
    guess_unknown: false,
    bundled_lexicon: include_str!("../../data/latin/lexicon.tsv"),
    bundled_entities: include_str!("../../data/latin/entities.txt"),
    ..BASE
};

pub static GREEK: LanguageProfile = LanguageProfile {
    name: "greek",
    data_dir: "greek",
    alphabet: greek_alphabet,
    sentence_terminators: &['.', ';', '·', '\u{037E}'],
    guess_unknown: false,
    bundled_lexicon: include_str!("../../data/greek/lexicon.tsv"),
    bundled_entities: include_str!("../../data/greek/entities.txt"),
};
