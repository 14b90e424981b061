//! # mathnode-latex
//!
//! Converts solver expression trees into LaTeX strings for MathJax and KaTeX.
//!
//! An upstream math solver describes expressions as JSON trees of typed nodes
//! (`add`, `frac`, `sin`, `localized_text`, ...). This crate renders such a
//! tree into a single delimited LaTeX string, ready to be embedded in HTML.
//!
//! ## Quick Start
//!
//! ```rust
//! use mathnode_latex::{convert, convert_json, Node, RenderConfig};
//!
//! let node = Node::new(
//!     "negative",
//!     vec![Node::new(
//!         "frac",
//!         vec![Node::leaf("const", "1"), Node::leaf("const", "2")],
//!     )],
//! );
//! assert_eq!(convert(&node).unwrap(), r"\(-\frac{1}{2}\)");
//!
//! let json = r#"{"type": "pow", "children": [
//!     {"type": "var", "value": "π"},
//!     {"type": "const", "value": "2"}
//! ]}"#;
//! assert_eq!(
//!     convert_json(json, &RenderConfig::default()).unwrap(),
//!     r"\(\pi ^{2}\)"
//! );
//! ```
//!
//! ## Pipeline
//!
//! 1. **Render**: each node becomes markup through [`MarkupRenderer`].
//! 2. **Post-process**: Unicode symbols become commands, fractions inside
//!    scripts are normalized and brackets around fractions are sized.
//!    See [`postprocess`].
//! 3. **Wrap**: the result is enclosed in `\(` `\)` (or `\[` `\]`).
//!
//! Nodes with an unrecognized `type` do not fail the conversion: they are
//! rendered as a compact JSON dump and reported through the `log` facade.
//!
//! ## Configuration
//!
//! [`RenderConfig`] can be built in code or read from TOML:
//!
//! ```text
//! max_depth = 256
//! arg_substitution = "first_occurrence"   # or "all_occurrences"
//! display_fractions = false
//! pipe_sizing = "scoped"                  # "first_pair" | "off"
//! math_style = "inline"                   # "display"
//! answer_header = "Ответ"
//! ```
//!
//! ## Solutions
//!
//! The [`solution`] module renders whole solver responses (method previews and
//! step-by-step solutions), isolating failures per entry.
//!
//! ## FFI
//!
//! The library provides a C-compatible FFI. See the `ffi` module
//! documentation for details.

pub mod ast;
pub mod config;
pub mod error;
pub mod postprocess;
pub mod render;
pub mod solution;
pub mod text;

// FFI module (always compiled for cdylib)
pub mod ffi;

// Convenience re-exports
pub use ast::{Literal, Node, Tag};
pub use config::{ArgSubstitution, MathStyle, PipeSizing, RenderConfig};
pub use error::{ConfigError, DecodeError, Error, RenderError, Result};
pub use render::{format_expression, MarkupRenderer};
pub use solution::{previews_from_json, steps_from_json, BatchReport, SolutionPreview, SolutionStep};

/// Convert a tree with the default configuration.
pub fn convert(node: &Node) -> Result<String> {
    convert_with(node, &RenderConfig::default())
}

/// Render, post-process and wrap a tree.
pub fn convert_with(node: &Node, config: &RenderConfig) -> Result<String> {
    MarkupRenderer::new(config).convert(node)
}

/// Decode a JSON tree and convert it.
pub fn convert_json(input: &str, config: &RenderConfig) -> Result<String> {
    let node = Node::from_json(input)?;
    convert_with(&node, config)
}

/// Convert several independent trees. A failing tree does not affect the
/// others.
pub fn render_batch(nodes: &[Node], config: &RenderConfig) -> Vec<Result<String>> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let result = convert_with(node, config);
            if let Err(e) = &result {
                log::debug!(target: "mathnode_latex", "tree {} failed: {}", index, e);
            }
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn c(v: &str) -> Node {
        Node::leaf("const", v)
    }

    #[test]
    fn test_convert_sum() {
        let node = Node::new("add", vec![c("2"), c("3")]);
        assert_eq!(convert(&node).unwrap(), r"\(2+3\)");
    }

    #[test]
    fn test_convert_sized_brackets() {
        let frac = Node::new("frac", vec![c("1"), c("2")]);
        let node = Node::new(
            "bracket",
            vec![Node::new("add", vec![frac, Node::leaf("var", "x")])],
        );
        assert_eq!(
            convert(&node).unwrap(),
            r"\(\left(\frac{1}{2}+x\right)\)"
        );
    }

    #[test]
    fn test_convert_display_style() {
        let config = RenderConfig {
            math_style: MathStyle::Display,
            ..Default::default()
        };
        assert_eq!(convert_with(&c("7"), &config).unwrap(), r"\[7\]");
    }

    #[test]
    fn test_convert_json_rejects_malformed() {
        let input = r#"{"type": "frac", "children": [{"type": "const", "value": "1"}]}"#;
        let err = convert_json(input, &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Render(RenderError::MalformedNode { .. })));

        let err = convert_json("{", &RenderConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::Json(_))));
    }

    #[test]
    fn test_render_batch_isolates_failures() {
        let nodes = vec![
            c("1"),
            Node::new("sin", vec![]),
            Node::new("add", vec![c("1"), c("1")]),
        ];
        let results = render_batch(&nodes, &RenderConfig::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_deref().ok(), Some(r"\(1\)"));
        assert!(results[1].is_err());
        assert_eq!(results[2].as_deref().ok(), Some(r"\(1+1\)"));
    }
}
