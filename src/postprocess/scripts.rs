//! Fraction style inside subscripts and superscripts.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_^]\{[^}]*dfrac[^}]*\}").expect("valid regex literal"));

/// Rename `\dfrac` back to `\frac` inside `_{...}` and `^{...}` groups.
pub fn rename_script_fractions(input: &str) -> String {
    SCRIPT_GROUP
        .replace_all(input, |caps: &Captures| caps[0].replace(r"\dfrac", r"\frac"))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_superscript() {
        assert_eq!(
            rename_script_fractions(r"x^{\dfrac{1}{2}}+\dfrac{1}{3}"),
            r"x^{\frac{1}{2}}+\dfrac{1}{3}"
        );
    }

    #[test]
    fn test_subscript() {
        assert_eq!(
            rename_script_fractions(r"\log_{\dfrac{1}{2}}x"),
            r"\log_{\frac{1}{2}}x"
        );
    }

    #[test]
    fn test_outside_scripts_unchanged() {
        assert_eq!(rename_script_fractions(r"\dfrac{a}{b}"), r"\dfrac{a}{b}");
    }
}
