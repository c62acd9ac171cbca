//! Runtime configuration (engine.toml)
//!
//! [`EngineConfig`] is the file-facing form with raw values. It is turned
//! into a validated [`RuntimeConfig`] on activation; out-of-range values
//! fall back to defaults with a warning instead of failing.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_LANGUAGE_VERSION_CODE, DEFAULT_OPTIMIZATION_LEVEL, ECMA_SCRIPT_EXTENSION,
    ESP_SCRIPT_EXTENSION, INTERPRETED_OPTIMIZATION_LEVEL,
};
use crate::error::ConfigError;

/// Script language level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageVersion {
    /// Runtime default
    Default,
    /// 1.0
    V1_0,
    /// 1.1
    V1_1,
    /// 1.2
    V1_2,
    /// 1.3
    V1_3,
    /// 1.4
    V1_4,
    /// 1.5
    V1_5,
    /// 1.6
    V1_6,
    /// 1.7
    V1_7,
    /// 1.8
    V1_8,
    /// ES2015
    Es6,
    /// Latest supported ECMAScript
    EcmaScript,
}

impl LanguageVersion {
    /// Parse a numeric version code
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Default,
            100 => Self::V1_0,
            110 => Self::V1_1,
            120 => Self::V1_2,
            130 => Self::V1_3,
            140 => Self::V1_4,
            150 => Self::V1_5,
            160 => Self::V1_6,
            170 => Self::V1_7,
            180 => Self::V1_8,
            200 => Self::Es6,
            250 => Self::EcmaScript,
            _ => return None,
        })
    }

    /// Parse a code, falling back to [`LanguageVersion::Default`]
    pub fn from_code_or_default(code: i32) -> Self {
        Self::from_code(code).unwrap_or_else(|| {
            log::warn!("invalid language version {}, using the runtime default", code);
            Self::Default
        })
    }

    /// Numeric version code
    pub fn code(self) -> i32 {
        match self {
            Self::Default => 0,
            Self::V1_0 => 100,
            Self::V1_1 => 110,
            Self::V1_2 => 120,
            Self::V1_3 => 130,
            Self::V1_4 => 140,
            Self::V1_5 => 150,
            Self::V1_6 => 160,
            Self::V1_7 => 170,
            Self::V1_8 => 180,
            Self::Es6 => 200,
            Self::EcmaScript => 250,
        }
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compiler optimization level, `-1` (interpreted) through `9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptimizationLevel(i8);

impl OptimizationLevel {
    /// Interpreted mode
    pub const INTERPRETED: Self = Self(INTERPRETED_OPTIMIZATION_LEVEL as i8);

    /// Highest level, used when the configured level is invalid
    pub const DEFAULT: Self = Self(DEFAULT_OPTIMIZATION_LEVEL as i8);

    /// Validate a level
    pub fn new(level: i32) -> Option<Self> {
        (INTERPRETED_OPTIMIZATION_LEVEL..=DEFAULT_OPTIMIZATION_LEVEL)
            .contains(&level)
            .then_some(Self(level as i8))
    }

    /// Validate a level, falling back to [`OptimizationLevel::DEFAULT`]
    pub fn new_or_default(level: i32) -> Self {
        Self::new(level).unwrap_or_else(|| {
            log::warn!(
                "invalid optimization level {}, using {}",
                level,
                DEFAULT_OPTIMIZATION_LEVEL
            );
            Self::DEFAULT
        })
    }

    /// Numeric level
    pub fn get(self) -> i32 {
        i32::from(self.0)
    }

    /// Check if scripts are interpreted rather than compiled
    pub fn is_interpreted(self) -> bool {
        self == Self::INTERPRETED
    }
}

impl Default for OptimizationLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime features a context can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Free variables resolve against the calling scope
    DynamicScope,
    /// Strict mode checks
    StrictMode,
    /// Assignment to undeclared variables is an error
    StrictVars,
}

/// Validated configuration used by the runtime manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Language level of created contexts
    pub language_version: LanguageVersion,
    /// Optimization level of created contexts
    pub optimization_level: OptimizationLevel,
    /// Whether dynamic scope is enabled
    pub dynamic_scope: bool,
    /// Initial debugging flag
    pub debugging: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            language_version: LanguageVersion::Es6,
            optimization_level: OptimizationLevel::DEFAULT,
            dynamic_scope: true,
            debugging: false,
        }
    }
}

impl RuntimeConfig {
    /// Build from raw values, replacing invalid ones with defaults
    pub fn validated(
        language_version: i32,
        optimization_level: i32,
        dynamic_scope: bool,
        debugging: bool,
    ) -> Self {
        Self {
            language_version: LanguageVersion::from_code_or_default(language_version),
            optimization_level: OptimizationLevel::new_or_default(optimization_level),
            dynamic_scope,
            debugging,
        }
    }

    /// Feature value for contexts created with this configuration
    pub fn has_feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::DynamicScope => self.dynamic_scope,
            Feature::StrictMode | Feature::StrictVars => false,
        }
    }
}

/// Engine configuration as read from a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Optimization level, `-1` through `9`
    #[serde(default = "default_optimization_level")]
    pub optimization_level: i32,

    /// Language version code
    #[serde(default = "default_language_version")]
    pub language_version: i32,

    /// Enable dynamic scope
    #[serde(default = "default_true")]
    pub dynamic_scope: bool,

    /// Start with debugging enabled
    #[serde(default)]
    pub debug: bool,

    /// Version of the embedded runtime, reported in the engine name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,

    /// Script engine names
    #[serde(default = "default_names")]
    pub names: Vec<String>,

    /// Script file extensions
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Script MIME types
    #[serde(default = "default_mime_types")]
    pub mime_types: Vec<String>,
}

fn default_optimization_level() -> i32 {
    DEFAULT_OPTIMIZATION_LEVEL
}

fn default_language_version() -> i32 {
    DEFAULT_LANGUAGE_VERSION_CODE
}

fn default_true() -> bool {
    true
}

fn default_names() -> Vec<String> {
    ["javascript", "JavaScript", "ecmascript", "ECMAScript"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_extensions() -> Vec<String> {
    vec![ECMA_SCRIPT_EXTENSION.to_string(), ESP_SCRIPT_EXTENSION.to_string()]
}

fn default_mime_types() -> Vec<String> {
    [
        "text/ecmascript",
        "text/javascript",
        "application/ecmascript",
        "application/javascript",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            optimization_level: default_optimization_level(),
            language_version: default_language_version(),
            dynamic_scope: true,
            debug: false,
            runtime_version: None,
            names: default_names(),
            extensions: default_extensions(),
            mime_types: default_mime_types(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that have no safe fallback
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.names.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one engine name is required".to_string(),
            ));
        }
        let lists = [
            ("names", &self.names),
            ("extensions", &self.extensions),
            ("mime_types", &self.mime_types),
        ];
        for (field, values) in lists {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "{} cannot contain empty entries",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Validated runtime configuration
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig::validated(
            self.language_version,
            self.optimization_level,
            self.dynamic_scope,
            self.debug,
        )
    }
}
