//! Pluggable language capabilities behind [`crate::text::Text`].
//!
//! [`NlpBackend`] is the seam: tokenizing works out of the box from the
//! language profile, while tagging, lemmatizing and entity recognition need
//! resources installed by [`NlpBackend::setup`]. [`LexiconBackend`] is the
//! built-in implementation reading a tab-separated lexicon and a list of
//! proper names from `<data_root>/<language>/`.

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{DhelpError, Result};
use crate::text::english;
use crate::text::language::{Language, LanguageProfile};

pub const LEXICON_FILE: &str = "lexicon.tsv";
pub const ENTITIES_FILE: &str = "entities.txt";

static WORD_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:['’-]\w+)*|\.{2,}|[^\w\s]").expect("word token pattern"));
static WORDPUNCT_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+|[^\w\s]+").expect("wordpunct pattern"));

/// Unit produced by tokenizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenMode {
    /// Words, with punctuation split off as separate tokens.
    #[default]
    Word,
    Sentence,
    /// Runs of word characters and runs of punctuation.
    WordPunct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    Ready,
    NeedsSetup { missing: Vec<PathBuf> },
}

impl BackendStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, BackendStatus::Ready)
    }
}

/// A token and its part-of-speech tag, when one is known.
pub type TaggedToken = (String, Option<String>);

pub trait NlpBackend: Send + Sync {
    fn language(&self) -> Language;

    fn status(&self) -> BackendStatus;

    /// Installs whatever the backend needs locally and reports the result.
    fn setup(&self) -> Result<BackendStatus>;

    fn tokenize(&self, text: &str, mode: TokenMode) -> Vec<String> {
        tokenize(text, mode, self.language().profile())
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>>;

    /// Base form of every word token, in order.
    fn lemmatize(&self, text: &str) -> Result<Vec<String>>;

    /// Proper names in order of appearance.
    fn entities(&self, text: &str) -> Result<Vec<String>>;
}

pub fn tokenize(text: &str, mode: TokenMode, profile: &LanguageProfile) -> Vec<String> {
    match mode {
        TokenMode::Word => WORD_TOKEN.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        TokenMode::WordPunct => WORDPUNCT_TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect(),
        TokenMode::Sentence => split_sentences(text, profile.sentence_terminators),
    }
}

/// Splits after a run of terminators (and closing quotes) that is followed
/// by whitespace or the end of the text.
fn split_sentences(text: &str, terminators: &[char]) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        if !terminators.contains(&c) {
            continue;
        }
        // Swallow repeated terminators and closing quotes or brackets.
        let mut end = index + c.len_utf8();
        while let Some(&(next_index, next)) = chars.peek() {
            if terminators.contains(&next) || matches!(next, '"' | '\'' | '’' | '”' | ')') {
                end = next_index + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        // Only a break when followed by whitespace or the end of the text.
        if chars.peek().map_or(true, |&(_, next)| next.is_whitespace()) {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

#[derive(Debug)]
struct Entry {
    tag: Option<String>,
    lemma: String,
}

#[derive(Debug, Default)]
struct Lexicon {
    entries: HashMap<String, Entry>,
    lemmas: HashSet<String>,
    names: HashSet<String>,
}

impl Lexicon {
    fn parse(lexicon: &str, names: &str, origin: &Path) -> Result<Self> {
        let mut parsed = Lexicon::default();
        for (number, line) in lexicon.lines().enumerate() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let [form, tag, lemma] = fields[..] else {
                return Err(DhelpError::MalformedInput(format!(
                    "{}:{}: expected form, tag and lemma separated by tabs",
                    origin.display(),
                    number + 1
                )));
            };
            // An empty lemma column means the form is its own lemma.
            let lemma = if lemma.is_empty() { form } else { lemma };
            parsed.lemmas.insert(lemma.to_lowercase());
            parsed.entries.insert(
                form.to_string(),
                Entry {
                    tag: Some(tag.to_string()).filter(|tag| !tag.is_empty()),
                    lemma: lemma.to_string(),
                },
            );
        }
        parsed.names = names
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(parsed)
    }

    fn lookup(&self, token: &str) -> Option<&Entry> {
        self.entries
            .get(token)
            .or_else(|| self.entries.get(&token.to_lowercase()))
    }
}

/// Lexicon-driven backend for one language.
#[derive(Debug)]
pub struct LexiconBackend {
    language: Language,
    data_root: PathBuf,
    lexicon: OnceCell<Lexicon>,
}

impl LexiconBackend {
    pub fn new(language: Language, data_root: impl Into<PathBuf>) -> Self {
        Self {
            language,
            data_root: data_root.into(),
            lexicon: OnceCell::new(),
        }
    }

    /// Backend rooted at the configured data directory (see
    /// [`crate::config::TextSettings::resolve_data_root`]).
    pub fn with_default_root(language: Language) -> Self {
        let settings = Settings::discover().unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {}", e);
            Settings::default()
        });
        Self::new(language, settings.text.resolve_data_root())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_root.join(self.language.profile().data_dir)
    }

    fn resources(&self) -> [(PathBuf, &'static str); 2] {
        let profile = self.language.profile();
        let dir = self.data_dir();
        [
            (dir.join(LEXICON_FILE), profile.bundled_lexicon),
            (dir.join(ENTITIES_FILE), profile.bundled_entities),
        ]
    }

    fn lexicon(&self) -> Result<&Lexicon> {
        self.lexicon.get_or_try_init(|| {
            if let BackendStatus::NeedsSetup { missing } = self.status() {
                let missing = missing
                    .iter()
                    .map(|path| path.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(DhelpError::BackendUnavailable {
                    language: self.language.to_string(),
                    missing,
                });
            }
            let [(lexicon_path, _), (names_path, _)] = self.resources();
            let lexicon = Lexicon::parse(
                &fs::read_to_string(&lexicon_path)?,
                &fs::read_to_string(&names_path)?,
                &lexicon_path,
            )?;
            debug!(
                "Loaded {} lexicon entries and {} names for {}",
                lexicon.entries.len(),
                lexicon.names.len(),
                self.language
            );
            Ok(lexicon)
        })
    }

    fn lemma_for(&self, lexicon: &Lexicon, token: &str, tag: Option<&str>) -> String {
        if let Some(entry) = lexicon.lookup(token) {
            return entry.lemma.to_lowercase();
        }
        // Unknown words: try morphological candidates the lexicon knows,
        // otherwise fall back to the lowercased token.
        let lower = token.to_lowercase();
        if self.language.profile().guess_unknown {
            if let Some(tag) = tag {
                if let Some(lemma) = english::lemma_candidates(&lower, tag)
                    .into_iter()
                    .find(|candidate| lexicon.lemmas.contains(candidate))
                {
                    return lemma;
                }
            }
        }
        lower
    }
}

impl NlpBackend for LexiconBackend {
    fn language(&self) -> Language {
        self.language
    }

    fn status(&self) -> BackendStatus {
        let missing: Vec<PathBuf> = self
            .resources()
            .into_iter()
            .map(|(path, _)| path)
            .filter(|path| !path.is_file())
            .collect();
        if missing.is_empty() {
            BackendStatus::Ready
        } else {
            BackendStatus::NeedsSetup { missing }
        }
    }

    fn setup(&self) -> Result<BackendStatus> {
        let dir = self.data_dir();
        fs::create_dir_all(&dir)?;
        for (path, content) in self.resources() {
            // Existing resources are left as they are.
            if path.is_file() {
                debug!("{} already installed", path.display());
                continue;
            }
            fs::write(&path, content)?;
            info!("Installed {} resource {}", self.language, path.display());
        }
        Ok(self.status())
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let lexicon = self.lexicon()?;
        let guess = self.language.profile().guess_unknown;
        Ok(self
            .tokenize(text, TokenMode::Word)
            .into_iter()
            .map(|token| {
                let tag = match lexicon.lookup(&token) {
                    Some(entry) => entry.tag.clone(),
                    None if guess => Some(english::guess_tag(&token)),
                    None => None,
                };
                (token, tag)
            })
            .collect())
    }

    fn lemmatize(&self, text: &str) -> Result<Vec<String>> {
        let lexicon = self.lexicon()?;
        Ok(self
            .tag(text)?
            .into_iter()
            .map(|(token, tag)| self.lemma_for(lexicon, &token, tag.as_deref()))
            .collect())
    }

    fn entities(&self, text: &str) -> Result<Vec<String>> {
        let lexicon = self.lexicon()?;
        Ok(self
            .tokenize(text, TokenMode::Word)
            .into_iter()
            .filter(|token| lexicon.names.contains(token))
            .collect())
    }
}

static DEFAULT_BACKENDS: Lazy<[Arc<LexiconBackend>; 3]> = Lazy::new(|| {
    Language::ALL.map(|language| Arc::new(LexiconBackend::with_default_root(language)))
});

/// Shared backend for `language` rooted at the configured data directory.
pub fn default_backend(language: Language) -> Arc<dyn NlpBackend> {
    let index = match language {
        Language::English => 0,
        Language::Latin => 1,
        Language::AncientGreek => 2,
    };
    DEFAULT_BACKENDS[index].clone()
}
