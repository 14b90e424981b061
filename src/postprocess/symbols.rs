//! Unicode symbol to command substitution.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Glyphs upstream sends verbatim, with their command equivalents.
const SYMBOLS: &[(&str, &str)] = &[
    ("α", r"\alpha "),
    ("β", r"\beta "),
    ("γ", r"\gamma "),
    ("δ", r"\delta "),
    ("ε", r"\varepsilon "),
    ("η", r"\eta "),
    ("θ", r"\theta "),
    ("λ", r"\lambda "),
    ("µ", r"\mu "),
    ("μ", r"\mu "),
    ("π", r"\pi "),
    ("ρ", r"\rho "),
    ("σ", r"\sigma "),
    ("τ", r"\tau "),
    ("Φ", r"\phi "),
    ("ψ", r"\psi "),
    ("ℕ", r"\mathbb{N} "),
    ("ℤ", r"\mathbb{Z} "),
    ("ℚ", r"\mathbb{Q} "),
    ("ℝ", r"\mathbb{R} "),
    ("∅", r"\varnothing "),
    ("∞", r"\infty "),
];

const TEXT_FRACTION: &str = r"\frac";
const DISPLAY_FRACTION: &str = r"\dfrac";

// One alternation so a replacement is never rescanned by another rule.
static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let mut alternatives: Vec<String> = SYMBOLS.iter().map(|(s, _)| regex::escape(s)).collect();
    alternatives.push(r"\\frac\b".to_string());
    Regex::new(&alternatives.join("|")).expect("valid regex literal")
});

fn lookup(glyph: &str) -> Option<&'static str> {
    SYMBOLS
        .iter()
        .find(|(symbol, _)| *symbol == glyph)
        .map(|(_, command)| *command)
}

/// Replace symbol glyphs with commands in a single scan.
///
/// With `display_fractions`, `\frac` is promoted to `\dfrac` in the same scan.
pub fn substitute_symbols(input: &str, display_fractions: bool) -> String {
    SYMBOL_PATTERN
        .replace_all(input, |caps: &Captures| {
            let matched = &caps[0];
            match lookup(matched) {
                Some(command) => command.to_string(),
                None if display_fractions && matched == TEXT_FRACTION => {
                    DISPLAY_FRACTION.to_string()
                }
                None => matched.to_string(),
            }
        })
        .into_owned()
}
