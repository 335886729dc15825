//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section is
//! `#[serde(default)]`, so a hand-written `settings.toml` only needs the
//! keys it changes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::llm::Dictionary;
use crate::text::{Aligner, HighlightStyle, Theme};

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

// ---------------------------------------------------------------------------
// DomainMode
// ---------------------------------------------------------------------------

/// Register the corrected text should be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DomainMode {
    /// Clear, natural English for general audiences.
    #[default]
    General,
    /// Formal academic tone.
    Academic,
    /// Professional, concise business email.
    Business,
    /// Prose around code; code syntax is never touched.
    CodeComments,
}

impl DomainMode {
    /// Human-readable label, as shown in settings and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            DomainMode::General => "General English",
            DomainMode::Academic => "Academic Writing",
            DomainMode::Business => "Business Emails",
            DomainMode::CodeComments => "Code Comments",
        }
    }
}

// ---------------------------------------------------------------------------
// StyleMode
// ---------------------------------------------------------------------------

/// Rephrasing style requested from the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StyleMode {
    #[default]
    Neutral,
    Casual,
    Formal,
    Persuasive,
    Concise,
}

impl StyleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleMode::Neutral => "neutral",
            StyleMode::Casual => "casual",
            StyleMode::Formal => "formal",
            StyleMode::Persuasive => "persuasive",
            StyleMode::Concise => "concise",
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Connection settings for the correction provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API, without `/chat/completions`.
    ///
    /// - Gemini (default): `https://generativelanguage.googleapis.com/v1beta/openai`
    /// - OpenAI: `https://api.openai.com/v1`
    /// - Ollama: `http://localhost:11434/v1`
    pub base_url: String,
    /// API key; when unset, [`API_KEY_ENV`] is consulted.
    pub api_key: Option<String>,
    /// Model identifiers, tried in order until one succeeds.
    pub models: Vec<String>,
    /// Upper bound on generated tokens per request.
    pub max_tokens: u32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta/openai".into(),
            api_key: None,
            models: vec![
                "gemini-1.5-flash".into(),
                "gemini-1.5-pro".into(),
                "gemini-2.0-flash-lite".into(),
            ],
            max_tokens: 768,
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// CorrectionConfig
// ---------------------------------------------------------------------------

/// Default correction preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    /// Language of the input (`"Auto"` lets the provider decide).
    pub language: String,
    pub domain_mode: DomainMode,
    pub style: StyleMode,
    /// Built-in dictionaries whose terms are preserved.
    pub dictionaries: Vec<Dictionary>,
    /// Comma-separated custom terms to preserve.
    pub custom_terms: String,
    /// Newline-delimited glossary file; falls back to
    /// [`AppPaths::glossary_file`] when that exists.
    pub glossary_file: Option<PathBuf>,
    /// Ask the provider to explain each correction.
    pub explain: bool,
    /// Ask for an English translation of non-English text.
    pub translate: bool,
    /// Number of alternative suggestions (1–3).
    pub suggestions: u8,
    /// Sampling temperature (0.0–1.0).
    pub temperature: f32,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            language: "Auto".into(),
            domain_mode: DomainMode::default(),
            style: StyleMode::default(),
            dictionaries: Vec::new(),
            custom_terms: "TensorFlow, PyTorch, API".into(),
            glossary_file: None,
            explain: true,
            translate: true,
            suggestions: 1,
            temperature: 0.4,
        }
    }
}

impl CorrectionConfig {
    /// Requested suggestion count clamped to `1..=3`.
    pub fn suggestion_count(&self) -> u8 {
        self.suggestions.clamp(1, 3)
    }

    /// Temperature clamped to `0.0..=1.0` (NaN becomes the default 0.4).
    pub fn temperature(&self) -> f32 {
        if self.temperature.is_nan() {
            return 0.4;
        }
        self.temperature.clamp(0.0, 1.0)
    }

    /// One-line description of the active preferences, e.g.
    /// `General English, neutral style, language Auto`.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{}, {} style, language {}",
            self.domain_mode.label(),
            self.style.as_str(),
            self.language.trim()
        );
        if !self.dictionaries.is_empty() {
            let labels: Vec<&str> = self.dictionaries.iter().map(Dictionary::label).collect();
            line.push_str(&format!(", dictionaries {}", labels.join("/")));
        }
        line
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// How suggestions are presented.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Theme for HTML output.
    pub theme: Theme,
    /// Markup used for highlighted diffs.
    pub highlight: HighlightStyle,
    /// Alignment strategy for diffs.
    pub aligner: Aligner,
    /// Show original and highlighted candidate side by side.
    pub show_diff: bool,
    /// Print provider explanations under each suggestion.
    pub show_explanations: bool,
    /// Print the translation when the provider returns one.
    pub show_translation: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            highlight: HighlightStyle::Ansi,
            aligner: Aligner::default(),
            show_diff: true,
            show_explanations: true,
            show_translation: true,
        }
    }
}

impl DisplayConfig {
    /// The theme's stylesheet, when suggestions are rendered as HTML.
    pub fn stylesheet(&self) -> Option<&'static str> {
        match self.highlight {
            HighlightStyle::Html => Some(self.theme.css()),
            HighlightStyle::Plain | HighlightStyle::Ansi => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use autocorrect::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider connection settings.
    pub llm: LlmConfig,
    /// Default correction preferences.
    pub correction: CorrectionConfig,
    /// Presentation settings.
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured API key, or the one in `GOOGLE_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or(&self, env_value: Option<String>) -> Option<String> {
        self.llm
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env_value.filter(|key| !key.trim().is_empty()))
    }

    /// Copy of the config with the API key resolved from the environment.
    pub fn with_resolved_api_key(mut self) -> Self {
        self.llm.api_key = self.resolve_api_key();
        self
    }

    /// Glossary file to read: the configured one, else the default path
    /// when it exists.
    pub fn glossary_path(&self) -> Option<PathBuf> {
        self.correction.glossary_file.clone().or_else(|| {
            let default = AppPaths::new().glossary_file;
            default.exists().then_some(default)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.llm.base_url, loaded.llm.base_url);
        assert_eq!(original.llm.api_key, loaded.llm.api_key);
        assert_eq!(original.llm.models, loaded.llm.models);
        assert_eq!(original.llm.timeout_secs, loaded.llm.timeout_secs);
        assert_eq!(original.llm.max_tokens, loaded.llm.max_tokens);

        assert_eq!(original.correction.language, loaded.correction.language);
        assert_eq!(original.correction.domain_mode, loaded.correction.domain_mode);
        assert_eq!(original.correction.style, loaded.correction.style);
        assert_eq!(original.correction.custom_terms, loaded.correction.custom_terms);
        assert_eq!(original.correction.temperature, loaded.correction.temperature);

        assert_eq!(original.display.theme, loaded.display.theme);
        assert_eq!(original.display.highlight, loaded.display.highlight);
        assert_eq!(original.display.aligner, loaded.display.aligner);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.llm.models, default.llm.models);
        assert_eq!(config.correction.language, default.correction.language);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.llm.base_url.starts_with("https://generativelanguage.googleapis.com"));
        assert_eq!(cfg.llm.models[0], "gemini-1.5-flash");
        assert_eq!(cfg.llm.models.len(), 3);
        assert_eq!(cfg.llm.max_tokens, 768);
        assert!(cfg.llm.api_key.is_none());
        assert_eq!(cfg.correction.language, "Auto");
        assert_eq!(cfg.correction.domain_mode, DomainMode::General);
        assert_eq!(cfg.correction.style, StyleMode::Neutral);
        assert_eq!(cfg.correction.suggestion_count(), 1);
        assert_eq!(cfg.correction.temperature(), 0.4);
        assert!(cfg.correction.explain);
        assert_eq!(cfg.display.highlight, HighlightStyle::Ansi);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.llm.base_url = "http://localhost:11434/v1".into();
        cfg.llm.api_key = Some("sk-test".into());
        cfg.llm.models = vec!["qwen2.5:3b".into()];
        cfg.correction.domain_mode = DomainMode::CodeComments;
        cfg.correction.style = StyleMode::Concise;
        cfg.correction.dictionaries = vec![Dictionary::Medical, Dictionary::Coding];
        cfg.correction.glossary_file = Some(PathBuf::from("/tmp/terms.txt"));
        cfg.display.theme = Theme::Solarized;
        cfg.display.aligner = Aligner::Myers;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.llm.base_url, "http://localhost:11434/v1");
        assert_eq!(loaded.llm.api_key, Some("sk-test".into()));
        assert_eq!(loaded.llm.models, ["qwen2.5:3b"]);
        assert_eq!(loaded.correction.domain_mode, DomainMode::CodeComments);
        assert_eq!(loaded.correction.style, StyleMode::Concise);
        assert_eq!(
            loaded.correction.dictionaries,
            [Dictionary::Medical, Dictionary::Coding]
        );
        assert_eq!(
            loaded.correction.glossary_file,
            Some(PathBuf::from("/tmp/terms.txt"))
        );
        assert_eq!(loaded.display.theme, Theme::Solarized);
        assert_eq!(loaded.display.aligner, Aligner::Myers);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[correction]\nstyle = \"formal\"\ndomain_mode = \"business\"\n")
            .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");
        assert_eq!(cfg.correction.style, StyleMode::Formal);
        assert_eq!(cfg.correction.domain_mode, DomainMode::Business);
        assert_eq!(cfg.correction.language, "Auto");
        assert_eq!(cfg.llm.max_tokens, 768);
    }

    #[test]
    fn out_of_range_preferences_are_clamped() {
        let mut cfg = CorrectionConfig::default();
        cfg.suggestions = 9;
        cfg.temperature = 3.5;
        assert_eq!(cfg.suggestion_count(), 3);
        assert_eq!(cfg.temperature(), 1.0);

        cfg.suggestions = 0;
        cfg.temperature = -1.0;
        assert_eq!(cfg.suggestion_count(), 1);
        assert_eq!(cfg.temperature(), 0.0);
    }

    #[test]
    fn summary_names_domain_style_and_language() {
        let mut cfg = CorrectionConfig::default();
        assert_eq!(cfg.summary(), "General English, neutral style, language Auto");

        cfg.domain_mode = DomainMode::Business;
        cfg.style = StyleMode::Concise;
        cfg.language = " Spanish ".into();
        cfg.dictionaries = vec![Dictionary::Legal, Dictionary::Coding];
        assert_eq!(
            cfg.summary(),
            "Business Emails, concise style, language Spanish, dictionaries Legal/Coding"
        );
    }

    #[test]
    fn stylesheet_only_for_html() {
        let mut display = DisplayConfig::default();
        assert_eq!(display.stylesheet(), None);

        display.highlight = HighlightStyle::Plain;
        assert_eq!(display.stylesheet(), None);

        display.highlight = HighlightStyle::Html;
        display.theme = Theme::Dark;
        let css = display.stylesheet().unwrap();
        assert_eq!(css, Theme::Dark.css());
        assert!(css.contains(".suggest"));
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut cfg = AppConfig::default();
        cfg.llm.api_key = Some("from-config".into());
        assert_eq!(
            cfg.api_key_or(Some("from-env".into())).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn blank_key_falls_back_to_environment() {
        let mut cfg = AppConfig::default();
        cfg.llm.api_key = Some("   ".into());
        assert_eq!(cfg.api_key_or(Some("from-env".into())).as_deref(), Some("from-env"));
        assert_eq!(cfg.api_key_or(Some(String::new())), None);
        assert_eq!(cfg.api_key_or(None), None);
    }
}
