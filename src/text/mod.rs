//! Text values with chainable cleaning operations and language-aware
//! analysis.
//!
//! Every cleaning method returns a new [`Text`] bound to the same backend,
//! so calls compose:
//!
//! ```no_run
//! use dhelp::text::Text;
//!
//! let cleaned = Text::english("Lorem\nipsum do-\nlor  [sic] sit amet....\n")
//!     .remove_line_breaks()
//!     .remove_editorial_marks()
//!     .collapse_whitespace();
//! assert_eq!(cleaned, "Lorem ipsum dolor sit amet....");
//! ```

pub mod analysis;
pub mod backend;
pub mod compare;
mod english;
pub mod greek;
pub mod language;
pub mod latin;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::Options;
use crate::error::Result;
use crate::files::TextFile;

pub use backend::{default_backend, BackendStatus, LexiconBackend, NlpBackend, TaggedToken, TokenMode};
pub use language::{Language, LanguageProfile};

static HYPHENATED_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-[ \t]*(?:\r\n|\r|\n)+[ \t]*").expect("hyphenated break pattern"));
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*(?:\r\n|\r|\n)+[ \t]*").expect("line break pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]{2,}").expect("space run pattern"));
static EDITORIAL_MARKS: Lazy<[Regex; 5]> = Lazy::new(|| {
    [r"\[[^\]]*\]", r"<[^>]*>", r"\([^)]*\)", r"\{[^}]*\}", r"〚[^〛]*〛"]
        .map(|pattern| Regex::new(pattern).expect("editorial mark pattern"))
});

/// An immutable piece of text bound to a language backend.
#[derive(Clone)]
pub struct Text {
    data: String,
    backend: Arc<dyn NlpBackend>,
}

impl Text {
    pub fn new(data: impl Into<String>, language: Language) -> Self {
        Self::with_backend(data, default_backend(language))
    }

    pub fn with_backend(data: impl Into<String>, backend: Arc<dyn NlpBackend>) -> Self {
        Self {
            data: data.into(),
            backend,
        }
    }

    pub fn english(data: impl Into<String>) -> Self {
        Self::new(data, Language::English)
    }

    pub fn latin(data: impl Into<String>) -> Self {
        Self::new(data, Language::Latin)
    }

    pub fn ancient_greek(data: impl Into<String>) -> Self {
        Self::new(data, Language::AncientGreek)
    }

    /// Reads a text file into a new value.
    pub fn load(path: impl AsRef<Path>, options: &Options, language: Language) -> Result<Self> {
        let data = TextFile::new(path)?.load(options)?;
        Ok(Self::new(data, language))
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    pub fn into_string(self) -> String {
        self.data
    }

    pub fn language(&self) -> Language {
        self.backend.language()
    }

    pub fn backend(&self) -> &Arc<dyn NlpBackend> {
        &self.backend
    }

    fn derive(&self, data: String) -> Self {
        Self {
            data,
            backend: Arc::clone(&self.backend),
        }
    }

    /// Replaces line breaks with single spaces. A hyphen directly before a
    /// break is treated as a split word and rejoined without a space.
    pub fn remove_line_breaks(&self) -> Self {
        // Rejoin split words first so a hyphen before the final break is
        // caught too, then drop the outer breaks.
        let joined = HYPHENATED_BREAK.replace_all(&self.data, "");
        let trimmed = joined.trim_matches(|c| c == '\n' || c == '\r');
        self.derive(LINE_BREAK.replace_all(trimmed, " ").into_owned())
    }

    /// Keeps only the characters of the language's alphabet.
    pub fn remove_non_characters(&self) -> Self {
        let keep = self.language().profile().alphabet;
        self.derive(self.data.chars().filter(|c| keep(*c)).collect())
    }

    /// Drops `[..]`, `<..>`, `(..)`, `{..}` and `〚..〛` spans with their
    /// delimiters, then squeezes the spaces left behind.
    pub fn remove_editorial_marks(&self) -> Self {
        let mut data = self.data.clone();
        for pattern in EDITORIAL_MARKS.iter() {
            data = pattern.replace_all(&data, "").into_owned();
        }
        let squeezed = SPACE_RUN.replace_all(&data, " ");
        self.derive(squeezed.trim_matches(|c| c == ' ' || c == '\t').to_string())
    }

    pub fn collapse_whitespace(&self) -> Self {
        self.derive(WHITESPACE.replace_all(&self.data, " ").trim().to_string())
    }

    /// Removes every listed word or phrase. Matching ignores case and the
    /// punctuation around words; remaining words are joined by single
    /// spaces.
    pub fn remove_stopwords<S: AsRef<str>>(&self, stoplist: &[S]) -> Self {
        fn key(word: &str) -> String {
            let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
            // Punctuation-only words are compared as written.
            if bare.is_empty() {
                word.to_lowercase()
            } else {
                bare.to_lowercase()
            }
        }

        let mut phrases: Vec<Vec<String>> = stoplist
            .iter()
            .map(|phrase| phrase.as_ref().split_whitespace().map(key).collect::<Vec<_>>())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        phrases.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));

        let words: Vec<&str> = self.data.split_whitespace().collect();
        let keys: Vec<String> = words.iter().map(|word| key(word)).collect();
        let mut kept = Vec::with_capacity(words.len());
        let mut index = 0;
        while index < words.len() {
            let matched = phrases
                .iter()
                .find(|phrase| keys[index..].starts_with(phrase))
                .map(Vec::len);
            match matched {
                Some(len) => index += len,
                None => {
                    kept.push(words[index]);
                    index += 1;
                }
            }
        }
        self.derive(kept.join(" "))
    }

    /// True when the regular expression `pattern` matches anywhere.
    pub fn matches_pattern(&self, pattern: &str) -> Result<bool> {
        Ok(Regex::new(pattern)?.is_match(&self.data))
    }

    pub fn status(&self) -> BackendStatus {
        self.backend.status()
    }

    pub fn setup(&self) -> Result<BackendStatus> {
        self.backend.setup()
    }

    pub fn tokenize(&self, mode: TokenMode) -> Vec<String> {
        self.backend.tokenize(&self.data, mode)
    }

    pub fn tag(&self) -> Result<Vec<TaggedToken>> {
        self.backend.tag(&self.data)
    }

    /// Every word replaced by its lowercase base form.
    pub fn lemmatize(&self) -> Result<Self> {
        let lemmas = self.backend.lemmatize(&self.data)?;
        Ok(self.derive(lemmas.join(" ")))
    }

    /// Proper names found in the text. With `unique`, each name is listed
    /// once, at its first appearance.
    pub fn entities(&self, unique: bool) -> Result<Vec<String>> {
        let mut entities = self.backend.entities(&self.data)?;
        if unique {
            let mut seen = std::collections::HashSet::new();
            entities.retain(|entity| seen.insert(entity.clone()));
        }
        Ok(entities)
    }

    pub fn ngrams(&self, n: usize) -> Vec<Vec<String>> {
        analysis::ngrams(&self.tokenize(TokenMode::Word), n)
    }

    pub fn skipgrams(&self, n: usize, k: usize) -> Vec<Vec<String>> {
        analysis::skipgrams(&self.tokenize(TokenMode::Word), n, k)
    }

    pub fn word_count(&self) -> BTreeMap<String, usize> {
        analysis::word_count(&self.tokenize(TokenMode::Word))
    }

    pub fn word_count_of(&self, word: &str) -> usize {
        self.word_count().get(word).copied().unwrap_or(0)
    }

    pub fn compare_longest_common_substring(&self, other: impl AsRef<str>) -> String {
        compare::longest_common_substring(&self.data, other.as_ref())
    }

    pub fn compare_minhash(&self, other: impl AsRef<str>) -> f64 {
        compare::minhash_similarity(&self.data, other.as_ref())
    }

    pub fn latin_normalize(&self) -> Self {
        self.derive(latin::normalize(&self.data))
    }

    pub fn latin_stem(&self) -> Self {
        self.derive(latin::stem(&self.data))
    }

    pub fn greek_normalize(&self) -> Self {
        self.derive(greek::normalize(&self.data))
    }

    pub fn greek_tlg_cleanup(&self, rm_punctuation: bool, rm_periods: bool) -> Self {
        self.derive(greek::tlg_cleanup(&self.data, rm_punctuation, rm_periods))
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("data", &self.data)
            .field("language", &self.language())
            .finish()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data)
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.data
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.language() == other.language()
    }
}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.data == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.data == *other
    }
}
