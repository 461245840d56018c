//! Layered configuration loading.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `casement.{profile}.{ext}` next to the main file
//! 3. The main file: `casement.{ext}` or `config.{ext}` in the first search
//!    directory that has one, or the file given to [`ConfigLoader::file`]
//! 4. `CASEMENT_*` environment variables
//! 5. Values passed to [`ConfigLoader::merge`]
//!
//! `{ext}` is `toml` with the `toml-config` feature (default) and
//! `yaml`/`yml` with `yaml-config`. When both are enabled TOML is tried first.
//!
//! Environment variables nest with `__`:
//!
//! - `CASEMENT_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `CASEMENT_GATEWAY__CONTENT_FORMAT=json` → `gateway.content_format = "json"`
//! - `CASEMENT_GATEWAY__MENUS__NEWS=news_handler` → `gateway.menus.news = "news_handler"`
//!
//! ```rust,ignore
//! use casement_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .profile("production")
//!     .search_path("/etc/casement")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::CasementConfig;

const ENV_PREFIX: &str = "CASEMENT_";
const PROFILE_ENV: &str = "CASEMENT_PROFILE";

/// File stems searched in each directory, in order.
const FILE_STEMS: [&str; 2] = ["casement", "config"];

/// Deployment profile selecting `casement.{profile}.*` files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Returns the profile name used in file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `CASEMENT_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV)
            .map(|name| Self::from(name.as_str()))
            .unwrap_or_default()
    }
}

impl From<&str> for Profile {
    /// Accepts `dev`/`prod` abbreviations, case-insensitively.
    fn from(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "dev" | "development" => Self::Development,
            "prod" | "production" => Self::Production,
            _ => Self::Custom(name),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration file formats enabled at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl FileFormat {
    const ENABLED: &'static [Self] = &[
        #[cfg(feature = "toml-config")]
        Self::Toml,
        #[cfg(feature = "yaml-config")]
        Self::Yaml,
    ];

    fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ENABLED
            .iter()
            .copied()
            .find(|format| format.extensions().contains(&ext))
    }

    fn merge(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(figment::providers::Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(figment::providers::Yaml::file(path)),
        }
    }
}

/// Builder for loading [`CasementConfig`].
#[derive(Debug)]
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    file: Option<PathBuf>,
    load_env: bool,
    overrides: Vec<CasementConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader using `CASEMENT_PROFILE` and the default search paths.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            file: None,
            load_env: true,
            overrides: Vec::new(),
        }
    }

    /// Sets the profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::from(profile.as_ref());
        self
    }

    /// Adds a directory to search for configuration files.
    ///
    /// Without any, the working directory and the user config directory
    /// (`~/.config/casement` on Linux) are searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Ignores `CASEMENT_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges `config` over every other source.
    pub fn merge(mut self, config: CasementConfig) -> Self {
        self.overrides.push(config);
        self
    }

    /// Loads the configuration.
    pub fn load(self) -> ConfigResult<CasementConfig> {
        let config: CasementConfig = self
            .figment()?
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!(
            profile = %self.profile,
            level = %config.logging.level,
            content_format = %config.gateway.content_format,
            menus = config.gateway.menus.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    fn figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(CasementConfig::default()));

        for path in self.files()? {
            let format = FileFormat::of(&path).ok_or_else(|| {
                ConfigError::ParseError(format!(
                    "Unsupported or disabled configuration file format: {}",
                    path.display()
                ))
            })?;
            info!(path = %path.display(), "Loading configuration file");
            figment = format.merge(figment, &path);
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        for overrides in &self.overrides {
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(figment)
    }

    /// Files to merge, lowest precedence first.
    fn files(&self) -> ConfigResult<Vec<PathBuf>> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            return Ok(vec![path.clone()]);
        }

        let dirs = self.search_dirs();
        match self.find_main_file(&dirs) {
            Some(main) => {
                let mut files: Vec<PathBuf> = self.profile_file(&main).into_iter().collect();
                files.push(main);
                Ok(files)
            }
            None => {
                warn!(paths = ?dirs, "No configuration file found, using defaults");
                Ok(Vec::new())
            }
        }
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("casement")))
            .collect()
    }

    fn find_main_file(&self, dirs: &[PathBuf]) -> Option<PathBuf> {
        dirs.iter().find_map(|dir| {
            FILE_STEMS.iter().find_map(|stem| {
                FileFormat::ENABLED
                    .iter()
                    .flat_map(|format| format.extensions())
                    .map(|ext| dir.join(format!("{stem}.{ext}")))
                    .find(|path| path.is_file())
            })
        })
    }

    /// `casement.toml` → `casement.{profile}.toml`, if present.
    fn profile_file(&self, main: &Path) -> Option<PathBuf> {
        let stem = main.file_stem()?.to_str()?;
        let ext = main.extension()?.to_str()?;
        let path = main.with_file_name(format!("{stem}.{}.{ext}", self.profile));
        path.is_file().then_some(path)
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<CasementConfig> {
    ConfigLoader::new().load()
}

/// Loads configuration from a specific file plus environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<CasementConfig> {
    ConfigLoader::new().file(path).load()
}
