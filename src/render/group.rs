//! Grouping of operands under unary prefix operators.

use crate::ast::{Node, Tag};

/// Whether `node` must be parenthesized as the operand of `sin`, `ln`, `lim`
/// and friends. Powers, fractions, brackets and applications are already
/// unambiguous and stay bare.
pub fn needs_grouping(node: &Node) -> bool {
    node.tag().is_some_and(Tag::is_low_precedence)
}

/// Wrap already rendered operand markup when its node needs grouping.
pub fn group_operand(node: &Node, markup: String) -> String {
    if needs_grouping(node) {
        format!("({})", markup)
    } else {
        markup
    }
}
