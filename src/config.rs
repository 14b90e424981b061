//! Renderer configuration.

use crate::error::{ConfigError, Result};
use serde::Deserialize;

/// Configuration shared by every rendering entry point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Maximum nesting depth before rendering fails.
    pub max_depth: usize,
    /// How `ARG<i>` placeholders are filled.
    pub arg_substitution: ArgSubstitution,
    /// Promote `\frac` to `\dfrac` outside of scripts.
    pub display_fractions: bool,
    /// How `|` delimiters inside sized groups are treated.
    pub pipe_sizing: PipeSizing,
    /// Delimiters wrapped around the final markup.
    pub math_style: MathStyle,
    /// Header attached to the final answer of a step-by-step solution.
    pub answer_header: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            arg_substitution: ArgSubstitution::default(),
            display_fractions: false,
            pipe_sizing: PipeSizing::default(),
            math_style: MathStyle::default(),
            answer_header: "Ответ".to_string(),
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input)
            .map_err(|e| ConfigError::Toml(e.to_string()).into())
    }
}

/// Placeholder substitution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgSubstitution {
    /// Replace only the first occurrence of each `ARG<i>`. Upstream
    /// templates have always been rendered this way.
    #[default]
    FirstOccurrence,
    /// Replace every occurrence of each `ARG<i>`.
    AllOccurrences,
}

/// Auto-sizing of absolute value pipes inside sized bracket groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipeSizing {
    /// Pair pipes per nesting depth within each sized group.
    #[default]
    Scoped,
    /// Only the first two pipes found in sized groups, anywhere in the string.
    FirstPair,
    /// Leave pipes untouched.
    Off,
}

/// Outer math delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathStyle {
    /// `\(` … `\)`
    #[default]
    Inline,
    /// `\[` … `\]`
    Display,
}

impl MathStyle {
    /// Opening and closing delimiters.
    pub fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Inline => (r"\(", r"\)"),
            Self::Display => (r"\[", r"\]"),
        }
    }
}
