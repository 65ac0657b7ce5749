//! Layered configuration.
//!
//! Sources, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`lanewise.toml` in the working directory, or an explicit path)
//! 3. Environment variables prefixed `LANEWISE_`, with `__` separating sections
//!
//! ```toml
//! [dispatch]
//! force_scalar = false
//! disabled = ["avx2"]
//!
//! [logging]
//! level = "info"
//! ```
//!
//! The same settings from the environment:
//! `LANEWISE_DISPATCH__FORCE_SCALAR=true`, `LANEWISE_DISPATCH__DISABLED=[avx2]`,
//! `LANEWISE_LOGGING__LEVEL=debug`.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::Isa;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "lanewise.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LANEWISE_";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    /// A value deserialized but is not acceptable.
    #[error("invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The effective configuration could not be rendered as TOML.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Which accelerated paths dispatch may use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Route every call to the scalar engine.
    pub force_scalar: bool,
    /// Instruction sets to ignore even when the processor reports them.
    pub disabled: Vec<Isa>,
}

impl DispatchConfig {
    /// Reads `LANEWISE_DISPATCH__*` variables over the defaults.
    ///
    /// This is what the lazy capability detection uses when
    /// [`crate::capability::configure`] was never called.
    pub fn from_env() -> Result<Self, ConfigError> {
        let prefix = format!("{ENV_PREFIX}DISPATCH__");
        let config = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(&prefix))
            .extract()?;
        Ok(config)
    }

    /// Returns `true` if `isa` may be used.
    #[must_use]
    pub fn allows(&self, isa: Isa) -> bool {
        !self.force_scalar && !self.disabled.contains(&isa)
    }
}

/// Logging settings for binaries embedding the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset (`error`..`trace`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanewiseConfig {
    /// Dispatch settings.
    pub dispatch: DispatchConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl LanewiseConfig {
    /// Loads defaults, then `lanewise.toml` if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(Path::new(DEFAULT_CONFIG_FILE)))
    }

    /// Loads defaults, then the given TOML file, then the environment.
    ///
    /// A missing file is treated as empty, matching [`LanewiseConfig::load`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(path.as_ref()))
    }

    /// Parses a TOML document over the defaults, without consulting the environment.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(toml)),
        )
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values that deserialize but are not usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|err| ConfigError::Invalid {
                field: "logging.level",
                reason: err.to_string(),
            })?;
        Ok(())
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}
