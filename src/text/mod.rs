//! Localized template text: placeholder substitution and text wrapping.

mod args;
pub mod lexer;

pub use args::substitute_args;
pub use lexer::{segments, Segment};

/// Turn substituted localized text into markup.
///
/// Inline math spans lose their own `\(` / `\)` markers and pass through,
/// plain runs become `\text{...}`. Backslashes inside a span, such as the
/// `\\` row breaks of an array, are left alone.
pub fn localize(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);

    for segment in segments(text) {
        match segment {
            Segment::Math(s) => {
                let inner = s
                    .strip_prefix(r"\(")
                    .and_then(|s| s.strip_suffix(r"\)"))
                    .unwrap_or(s);
                out.push_str(inner);
            }
            Segment::Raw(s) => out.push_str(s),
            Segment::Text(s) => {
                out.push_str(r"\text{");
                out.push_str(s);
                out.push('}');
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_localize_wraps_text() {
        assert_eq!(
            localize(r"Solve \(x+1=2\) for x"),
            r"\text{Solve }x+1=2\text{ for x}"
        );
    }

    #[test]
    fn test_localize_plain() {
        assert_eq!(localize("Ответ"), r"\text{Ответ}");
    }

    #[test]
    fn test_localize_adjacent_spans() {
        assert_eq!(localize(r"\(a\)\(b\)"), "ab");
    }

    #[test]
    fn test_localize_keeps_row_breaks_in_spans() {
        assert_eq!(
            localize(r"\(\begin{array}{l}a\\(a, b)\end{array}\) и"),
            r"\begin{array}{l}a\\(a, b)\end{array}\text{ и}"
        );
    }
}
