use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{DhelpError, Result};

/// File name looked up by [`Settings::discover`].
pub const SETTINGS_FILE: &str = "dhelp.toml";

/// Environment variable overriding the language data directory.
pub const DATA_ROOT_ENV_VAR: &str = "DHELP_DATA_ROOT";

/// Per-call options shared by every file, folder and CSV operation.
///
/// Keys missing from a TOML table take the defaults below and unknown keys
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    pub encoding: String,
    pub silent: bool,
    pub overwrite: bool,
    pub destination: Option<PathBuf>,
    pub extensions: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            silent: false,
            overwrite: false,
            destination: None,
            extensions: vec!["txt".to_string()],
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebSettings {
    pub delay_ms: u64,
    pub max_retries: u32,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub silent: bool,
}

impl Default for WebSettings {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            max_retries: 3,
            timeout_seconds: 30,
            user_agent: concat!("dhelp/", env!("CARGO_PKG_VERSION")).to_string(),
            silent: false,
        }
    }
}

impl WebSettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub data_root: Option<PathBuf>,
}

impl TextSettings {
    /// Directory holding installed language resources.
    ///
    /// `DHELP_DATA_ROOT` wins over the configured value, which wins over
    /// `$HOME/dhelp_data`.
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(root) = std::env::var_os(DATA_ROOT_ENV_VAR) {
            return PathBuf::from(root);
        }
        if let Some(root) = &self.data_root {
            return root.clone();
        }
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join("dhelp_data")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "dhelp=info".to_string(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub files: Options,
    pub web: WebSettings,
    pub text: TextSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DhelpError::NotFound(path.to_path_buf()),
            _ => DhelpError::Io(e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Reads `./dhelp.toml` when present, otherwise returns the defaults.
    pub fn discover() -> Result<Self> {
        let path = Path::new(SETTINGS_FILE);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = Options::default();
        assert_eq!(options.encoding, "utf-8");
        assert!(!options.silent);
        assert!(!options.overwrite);
        assert_eq!(options.destination, None);
        assert_eq!(options.extensions, vec!["txt".to_string()]);
    }

    #[test]
    fn test_options_builder() {
        let options = Options::new()
            .silent(true)
            .overwrite(true)
            .destination("out")
            .extensions(["txt", "md"]);
        assert!(options.silent);
        assert!(options.overwrite);
        assert_eq!(options.destination, Some(PathBuf::from("out")));
        assert_eq!(options.extensions, vec!["txt".to_string(), "md".to_string()]);
    }

    #[test]
    fn test_settings_partial_toml_fills_defaults() {
        let settings = Settings::from_toml(
            r#"
            [files]
            silent = true
            colour = "ignored"

            [web]
            max_retries = 5
            "#,
        )
        .unwrap();
        assert!(settings.files.silent);
        assert_eq!(settings.files.encoding, "utf-8");
        assert_eq!(settings.web.max_retries, 5);
        assert_eq!(settings.web.delay_ms, 2000);
        assert_eq!(settings.logging.filter, "dhelp=info");
    }

    #[test]
    fn test_settings_rejects_wrong_types() {
        let result = Settings::from_toml("[web]\nmax_retries = \"many\"\n");
        assert!(matches!(result, Err(DhelpError::Toml(_))));
    }

    #[test]
    fn test_settings_load_missing_file() {
        let result = Settings::load("definitely/not/here/dhelp.toml");
        assert!(matches!(result, Err(DhelpError::NotFound(_))));
    }
}
