//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir (settings + default glossary):
//!   Windows: %APPDATA%\autocorrect-pro\
//!   macOS:   ~/Library/Application Support/autocorrect-pro/
//!   Linux:   ~/.config/autocorrect-pro/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml` and `glossary.txt`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Glossary picked up when no explicit glossary file is configured.
    pub glossary_file: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "autocorrect-pro";

    /// Resolves all paths using the `dirs` crate, falling back to the
    /// current directory when the platform has no config dir.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let glossary_file = config_dir.join("glossary.txt");

        Self {
            config_dir,
            settings_file,
            glossary_file,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
