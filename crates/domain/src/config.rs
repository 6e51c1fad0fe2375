//! Earnings configuration loaded from environment variables.

use std::str::FromStr;

use thiserror::Error;

/// Environment variable selecting how deep earnings aggregation descends.
pub const DEPTH_VAR: &str = "CINEMA_EARNINGS_DEPTH";

/// Environment variable enabling the session date filter for earnings.
pub const DATE_FILTER_VAR: &str = "CINEMA_EARNINGS_DATE_FILTER";

/// Errors produced while parsing configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown earnings depth name.
    #[error("Invalid earnings depth: {0} (expected \"direct\" or \"subtree\")")]
    InvalidEarningsDepth(String),

    /// A boolean flag could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    InvalidFlag { var: &'static str, value: String },
}

/// How far below the requested provider earnings are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarningsDepth {
    /// The provider itself plus its direct sub-providers only.
    #[default]
    DirectChildren,

    /// The provider and every descendant in its subtree.
    WholeSubtree,
}

impl EarningsDepth {
    /// Returns the configuration name of this depth.
    pub fn as_str(&self) -> &'static str {
        match self {
            EarningsDepth::DirectChildren => "direct",
            EarningsDepth::WholeSubtree => "subtree",
        }
    }
}

impl std::fmt::Display for EarningsDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EarningsDepth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(EarningsDepth::DirectChildren),
            "subtree" => Ok(EarningsDepth::WholeSubtree),
            _ => Err(ConfigError::InvalidEarningsDepth(s.to_string())),
        }
    }
}

/// Controls how `Cinema::provider_earnings` aggregates.
///
/// The default sums a provider and its direct sub-providers and ignores the
/// requested date range.
///
/// Reads from environment variables:
/// - `CINEMA_EARNINGS_DEPTH`: `direct` or `subtree` (default: `direct`)
/// - `CINEMA_EARNINGS_DATE_FILTER`: `true`/`false`/`1`/`0` (default: `false`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EarningsConfig {
    pub depth: EarningsDepth,
    pub filter_by_date: bool,
}

impl EarningsConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            depth: lookup(DEPTH_VAR)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.depth),
            filter_by_date: lookup(DATE_FILTER_VAR)
                .and_then(|v| parse_flag(DATE_FILTER_VAR, &v).ok())
                .unwrap_or(defaults.filter_by_date),
        }
    }

    /// Builds a configuration from raw values, rejecting anything unparsable.
    ///
    /// `None` keeps the default for that setting.
    pub fn from_vars(
        depth: Option<&str>,
        filter_by_date: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            depth: depth
                .map(str::parse::<EarningsDepth>)
                .transpose()?
                .unwrap_or(defaults.depth),
            filter_by_date: filter_by_date
                .map(|v| parse_flag(DATE_FILTER_VAR, v))
                .transpose()?
                .unwrap_or(defaults.filter_by_date),
        })
    }

    /// Returns a config that walks the whole subtree and honors the date range.
    pub fn full() -> Self {
        Self {
            depth: EarningsDepth::WholeSubtree,
            filter_by_date: true,
        }
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}
