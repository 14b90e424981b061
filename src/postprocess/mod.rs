//! Textual rewrite passes over generated markup.
//!
//! The passes run in a fixed order, see [`PIPELINE`]:
//!
//! 1. [`Stage::Symbols`] replaces Unicode glyphs with commands.
//! 2. [`Stage::ScriptFractions`] renames `\dfrac` to `\frac` inside scripts.
//! 3. [`Stage::Delimiters`] sizes parentheses around fractions.

mod brackets;
mod scripts;
mod symbols;

pub use brackets::size_delimiters;
pub use scripts::rename_script_fractions;
pub use symbols::substitute_symbols;

use crate::config::{MathStyle, RenderConfig};

/// A named rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Symbols,
    ScriptFractions,
    Delimiters,
}

/// The passes in execution order.
pub const PIPELINE: [Stage; 3] = [Stage::Symbols, Stage::ScriptFractions, Stage::Delimiters];

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Symbols => "symbols",
            Self::ScriptFractions => "script-fractions",
            Self::Delimiters => "delimiters",
        }
    }

    /// Run this pass over `input`.
    pub fn apply(self, input: &str, config: &RenderConfig) -> String {
        match self {
            Self::Symbols => substitute_symbols(input, config.display_fractions),
            Self::ScriptFractions => rename_script_fractions(input),
            Self::Delimiters => size_delimiters(input, config.pipe_sizing),
        }
    }
}

/// Run every pass of [`PIPELINE`] in order.
pub fn postprocess(markup: &str, config: &RenderConfig) -> String {
    PIPELINE.iter().fold(markup.to_string(), |acc, stage| {
        let next = stage.apply(&acc, config);
        log::trace!(target: "mathnode_latex::postprocess", "{}: {} -> {}", stage.name(), acc, next);
        next
    })
}

/// Wrap finished markup in math delimiters.
pub fn wrap(markup: &str, style: MathStyle) -> String {
    let (open, close) = style.delimiters();
    format!("{}{}{}", open, markup, close)
}
