//! Rendering layer for converting expression trees to LaTeX.

mod group;
pub mod latex;
mod periodic;

pub use group::{group_operand, needs_grouping};
pub use latex::MarkupRenderer;
pub use periodic::format_periodic;

use crate::ast::Node;
use crate::config::RenderConfig;
use crate::error::Result;

/// Render a node to raw markup, without post-processing or delimiters.
pub fn render_markup(node: &Node, config: &RenderConfig) -> Result<String> {
    MarkupRenderer::new(config).render(node)
}

/// Render a node as the operand of a unary prefix operator: parenthesized
/// when it is a low-precedence expression, bare otherwise.
pub fn format_expression(node: &Node, config: &RenderConfig) -> Result<String> {
    MarkupRenderer::new(config).format_operand(node)
}
