//! Configuration management.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variables, then CLI flags (applied by the binary).
//!
//! | TOML key | Environment variable | Default |
//! |----------|----------------------|---------|
//! | `port` | `DOCCHAT_PORT`, `PORT` | `3001` |
//! | `delay_min_ms` | `DOCCHAT_DELAY_MIN_MS`, `DELAY_MIN` | `500` |
//! | `delay_max_ms` | `DOCCHAT_DELAY_MAX_MS`, `DELAY_MAX` | `2000` |
//! | `default_source_count` | `DOCCHAT_DEFAULT_SOURCE_COUNT`, `DEFAULT_SOURCE_COUNT` | `5` |
//! | `max_source_count` | `DOCCHAT_MAX_SOURCE_COUNT` | `20` |
//! | `catalog_path` | `DOCCHAT_CATALOG_PATH` | embedded catalog |
//! | `static_dir` | `DOCCHAT_STATIC_DIR` | none |
//! | `response_mode` | `DOCCHAT_RESPONSE_MODE` | `catalog` |

mod features;

pub use features::FeatureFlags;

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default HTTP port, matching the viewer's dev proxy.
pub const DEFAULT_PORT: u16 = 3001;

/// Default minimum simulated delay in milliseconds.
pub const DEFAULT_DELAY_MIN_MS: u64 = 500;

/// Default maximum simulated delay in milliseconds.
pub const DEFAULT_DELAY_MAX_MS: u64 = 2000;

/// Default number of sources in synthetic answers.
pub const DEFAULT_SOURCE_COUNT: usize = 5;

/// Upper bound on requested sources.
pub const DEFAULT_MAX_SOURCE_COUNT: usize = 20;

/// Main configuration for docchat.
#[derive(Debug, Clone)]
pub struct DocchatConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Simulated latency bounds.
    pub delay: DelayConfig,
    /// Chat response settings.
    pub chat: ChatSettings,
    /// Catalog file. The embedded catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Directory served under `/test` (sample PDFs).
    pub static_dir: Option<PathBuf>,
    /// Feature flags.
    pub features: FeatureFlags,
    /// Logging and metrics settings.
    pub observability: ObservabilitySettings,
}

/// Bounds for the simulated per-request delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    /// Lower bound in milliseconds.
    pub min_ms: u64,
    /// Upper bound in milliseconds (inclusive).
    pub max_ms: u64,
}

impl DelayConfig {
    /// Creates delay bounds, swapping them if given in the wrong order.
    #[must_use]
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        if min_ms > max_ms {
            Self {
                min_ms: max_ms,
                max_ms: min_ms,
            }
        } else {
            Self { min_ms, max_ms }
        }
    }

    /// Overlays optionally-specified bounds onto these.
    ///
    /// A lone bound drags the other along so that, for example, setting only
    /// the maximum to 0 disables the delay.
    #[must_use]
    pub fn merged(self, min_ms: Option<u64>, max_ms: Option<u64>) -> Self {
        match (min_ms, max_ms) {
            (Some(min), Some(max)) => Self::new(min, max),
            (None, Some(max)) => Self::new(self.min_ms.min(max), max),
            (Some(min), None) => Self::new(min, self.max_ms.max(min)),
            (None, None) => self,
        }
    }

    /// Returns true when no delay should be applied.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_MIN_MS, DEFAULT_DELAY_MAX_MS)
    }
}

/// How chat answers are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Fuzzy-match the catalog, falling back to the default answer.
    #[default]
    Catalog,
    /// Randomized templated answers that ignore the catalog.
    Synthetic,
}

impl ResponseMode {
    /// Parses a mode string (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown modes.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "catalog" | "db" => Ok(Self::Catalog),
            "synthetic" | "random" => Ok(Self::Synthetic),
            other => Err(Error::InvalidInput(format!(
                "unknown response mode '{other}' (expected 'catalog' or 'synthetic')"
            ))),
        }
    }

    /// Returns the mode as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Chat response settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    /// Response mode.
    pub mode: ResponseMode,
    /// Sources per synthetic answer when the request does not say.
    pub default_source_count: usize,
    /// Cap on any requested source count.
    pub max_source_count: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            mode: ResponseMode::default(),
            default_source_count: DEFAULT_SOURCE_COUNT,
            max_source_count: DEFAULT_MAX_SOURCE_COUNT,
        }
    }
}

/// Observability sections of the config file.
#[derive(Debug, Clone, Default)]
pub struct ObservabilitySettings {
    /// Logging settings.
    pub logging: Option<LoggingSettings>,
    /// Metrics settings.
    pub metrics: Option<MetricsSettings>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// `EnvFilter` directive, e.g. `docchat=debug,tower_http=info`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// `[metrics]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsSettings {
    /// Whether the Prometheus exporter is started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Exporter listen port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Configuration file structure.
///
/// Read when loading and written by [`DocchatConfig::to_toml`], so shown
/// configuration can be saved back as a config file.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// HTTP port.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Minimum delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_min_ms: Option<u64>,
    /// Maximum delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_max_ms: Option<u64>,
    /// Default source count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_source_count: Option<usize>,
    /// Maximum source count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_source_count: Option<usize>,
    /// Catalog path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<String>,
    /// Static directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
    /// Response mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mode: Option<String>,
    /// Feature flags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<ConfigFileFeatures>,
    /// Logging section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingSettings>,
    /// Metrics section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSettings>,
}

/// Features section in config file.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct ConfigFileFeatures {
    /// CORS headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<bool>,
    /// Simulated delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_delay: Option<bool>,
}

impl From<&DocchatConfig> for ConfigFile {
    fn from(config: &DocchatConfig) -> Self {
        let path_string = |path: &PathBuf| path.to_string_lossy().into_owned();
        Self {
            port: Some(config.port),
            delay_min_ms: Some(config.delay.min_ms),
            delay_max_ms: Some(config.delay.max_ms),
            default_source_count: Some(config.chat.default_source_count),
            max_source_count: Some(config.chat.max_source_count),
            catalog_path: config.catalog_path.as_ref().map(path_string),
            static_dir: config.static_dir.as_ref().map(path_string),
            response_mode: Some(config.chat.mode.as_str().to_string()),
            features: Some(ConfigFileFeatures {
                cors: Some(config.features.cors),
                simulated_delay: Some(config.features.simulated_delay),
            }),
            logging: config.observability.logging.clone(),
            metrics: config.observability.metrics.clone(),
        }
    }
}

impl Default for DocchatConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            delay: DelayConfig::default(),
            chat: ChatSettings::default(),
            catalog_path: None,
            static_dir: None,
            features: FeatureFlags::default(),
            observability: ObservabilitySettings::default(),
        }
    }
}

impl DocchatConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::from_toml_str(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or names an unknown response mode.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `<platform config dir>/docchat/config.toml`, then
    /// `~/.config/docchat/config.toml`. Returns defaults if neither exists.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("docchat").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("docchat")
                .join("config.toml"),
        ];

        candidates
            .iter()
            .filter(|path| path.exists())
            .find_map(|path| Self::load_from_file(path).ok())
            .unwrap_or_default()
    }

    /// Converts a `ConfigFile` to `DocchatConfig`.
    fn from_config_file(file: ConfigFile) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = file.port {
            config.port = port;
        }
        config.delay = config.delay.merged(file.delay_min_ms, file.delay_max_ms);
        if let Some(count) = file.default_source_count {
            config.chat.default_source_count = count;
        }
        if let Some(count) = file.max_source_count {
            config.chat.max_source_count = count;
        }
        if let Some(mode) = file.response_mode {
            config.chat.mode = ResponseMode::parse(&mode)?;
        }
        config.catalog_path = file.catalog_path.map(PathBuf::from);
        config.static_dir = file.static_dir.map(PathBuf::from);
        if let Some(features) = file.features {
            if let Some(v) = features.cors {
                config.features.cors = v;
            }
            if let Some(v) = features.simulated_delay {
                config.features.simulated_delay = v;
            }
        }
        config.observability = ObservabilitySettings {
            logging: file.logging,
            metrics: file.metrics,
        };

        Ok(config)
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `DOCCHAT_RESPONSE_MODE` names an unknown mode.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored. For each setting the
    /// `DOCCHAT_`-prefixed variable wins over the legacy unprefixed one.
    ///
    /// # Errors
    ///
    /// Returns an error if the response mode variable names an unknown mode.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        };

        if let Some(port) = first(&["DOCCHAT_PORT", "PORT"]).and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }

        let min = first(&["DOCCHAT_DELAY_MIN_MS", "DELAY_MIN"]).and_then(|v| v.trim().parse().ok());
        let max = first(&["DOCCHAT_DELAY_MAX_MS", "DELAY_MAX"]).and_then(|v| v.trim().parse().ok());
        self.delay = self.delay.merged(min, max);

        if let Some(count) = first(&["DOCCHAT_DEFAULT_SOURCE_COUNT", "DEFAULT_SOURCE_COUNT"])
            .and_then(|v| v.trim().parse().ok())
        {
            self.chat.default_source_count = count;
        }
        if let Some(count) =
            first(&["DOCCHAT_MAX_SOURCE_COUNT"]).and_then(|v| v.trim().parse().ok())
        {
            self.chat.max_source_count = count;
        }
        if let Some(path) = first(&["DOCCHAT_CATALOG_PATH"]) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(path) = first(&["DOCCHAT_STATIC_DIR"]) {
            self.static_dir = Some(PathBuf::from(path));
        }
        if let Some(mode) = first(&["DOCCHAT_RESPONSE_MODE"]) {
            self.chat.mode = ResponseMode::parse(&mode)?;
        }

        Ok(())
    }

    /// Sets the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the delay bounds.
    #[must_use]
    pub const fn with_delay(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay = DelayConfig::new(min_ms, max_ms);
        self
    }

    /// Sets the response mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.chat.mode = mode;
        self
    }

    /// Sets the catalog path.
    #[must_use]
    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Sets the static directory.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    /// Sets the feature flags.
    #[must_use]
    pub const fn with_features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    /// Returns true if the latency middleware should run.
    #[must_use]
    pub const fn simulates_delay(&self) -> bool {
        self.features.simulated_delay && !self.delay.is_disabled()
    }

    /// Renders the effective configuration in config file syntax.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(&ConfigFile::from(self))
            .map_err(|e| Error::operation("serialize_config", e))
    }
}
