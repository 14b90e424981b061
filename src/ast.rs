//! Expression tree definitions as delivered by the upstream solver.

use crate::error::{DecodeError, RenderError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// One node of a math expression tree.
///
/// The wire format is JSON: `{"type": "add", "children": [...]}`. Unknown
/// fields are ignored so newer upstream payloads still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Tag name, e.g. `add`, `frac`, `localized_text`
    #[serde(rename = "type")]
    pub kind: String,
    /// Leaf payload for literal tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
    /// Ordered operands; the minimum count is fixed per tag
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    /// Template arguments, only meaningful on localized text
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Node>,
}

/// A leaf payload: upstream sends both strings and bare numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Text(String),
    Number(serde_json::Number),
}

impl Literal {
    /// The literal as text, numbers printed in their JSON form.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl Node {
    /// Create an operator node.
    pub fn new(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children,
            args: Vec::new(),
        }
    }

    /// Create a literal node carrying a value.
    pub fn leaf(kind: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            children: Vec::new(),
            args: Vec::new(),
        }
    }

    /// Attach template arguments.
    pub fn with_args(mut self, args: Vec<Node>) -> Self {
        self.args = args;
        self
    }

    /// The known tag of this node, if any.
    pub fn tag(&self) -> Option<Tag> {
        Tag::from_name(&self.kind)
    }

    /// Decode a node tree from JSON and validate its shape.
    pub fn from_json(input: &str) -> Result<Self> {
        let node: Node = serde_json::from_str(input).map_err(DecodeError::from)?;
        node.validate()?;
        Ok(node)
    }

    /// Check every known node in the tree for arity and required values.
    ///
    /// Unknown tags are not an error here; the renderer dumps them.
    pub fn validate(&self) -> std::result::Result<(), RenderError> {
        let mut pending = vec![self];

        while let Some(node) = pending.pop() {
            if let Some(tag) = node.tag() {
                tag.check(node)?;
            }
            pending.extend(node.children.iter());
            pending.extend(node.args.iter());
        }

        Ok(())
    }
}

/// Every node tag the renderer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum Tag {
    // Literals
    #[strum(serialize = "string")]
    String,
    #[strum(serialize = "localized_text")]
    LocalizedText,
    #[strum(serialize = "var")]
    Var,
    #[strum(serialize = "unit")]
    Unit,
    #[strum(serialize = "indexed")]
    Indexed,
    #[strum(serialize = "const")]
    Const,
    #[strum(serialize = "periodic_localize")]
    PeriodicLocalize,

    // Arithmetic
    #[strum(serialize = "negative")]
    Negative,
    #[strum(serialize = "positive")]
    Positive,
    #[strum(serialize = "equals")]
    Equals,
    #[strum(serialize = "add")]
    Add,
    #[strum(serialize = "sub")]
    Sub,
    #[strum(serialize = "div")]
    Div,
    #[strum(serialize = "mul")]
    Mul,
    #[strum(serialize = "muli")]
    Muli,
    #[strum(serialize = "add_sub")]
    AddSub,
    #[strum(serialize = "add_sub_sign")]
    AddSubSign,
    #[strum(serialize = "frac")]
    Frac,
    #[strum(serialize = "mixedfrac")]
    MixedFrac,
    #[strum(serialize = "pow")]
    Pow,
    #[strum(serialize = "factorial")]
    Factorial,
    #[strum(serialize = "percentage")]
    Percentage,
    #[strum(serialize = "bracket")]
    Bracket,
    #[strum(serialize = "root2")]
    Root2,
    #[strum(serialize = "root")]
    Root,
    #[strum(serialize = "log")]
    Log,
    #[strum(serialize = "ln")]
    Ln,
    #[strum(serialize = "abs")]
    Abs,

    // Relations
    #[strum(serialize = "not_equals")]
    NotEquals,
    #[strum(serialize = "approx")]
    Approx,
    #[strum(serialize = "approx_sign")]
    ApproxSign,
    #[strum(serialize = "gt")]
    Gt,
    #[strum(serialize = "lt")]
    Lt,
    #[strum(serialize = "gte")]
    Gte,
    #[strum(serialize = "lte")]
    Lte,

    // Lists
    #[strum(serialize = "list")]
    List,
    #[strum(serialize = "alt_form")]
    AltForm,
    #[strum(serialize = "vert_list")]
    VertList,

    // Trigonometry
    #[strum(serialize = "deg")]
    Deg,
    #[strum(serialize = "degmin")]
    DegMin,
    #[strum(serialize = "degminsecond")]
    DegMinSecond,
    #[strum(serialize = "sin")]
    Sin,
    #[strum(serialize = "cos")]
    Cos,
    #[strum(serialize = "tan")]
    Tan,
    #[strum(serialize = "cot")]
    Cot,
    #[strum(serialize = "asin")]
    Asin,
    #[strum(serialize = "acos")]
    Acos,
    #[strum(serialize = "atan")]
    Atan,
    #[strum(serialize = "acot")]
    Acot,
    #[strum(serialize = "sec")]
    Sec,
    #[strum(serialize = "csc")]
    Csc,

    // Sets and intervals
    #[strum(serialize = "elem_of")]
    ElemOf,
    #[strum(serialize = "elem_not_of")]
    ElemNotOf,
    #[strum(serialize = "union")]
    Union,
    #[strum(serialize = "ooint")]
    OpenOpenInterval,
    #[strum(serialize = "coint")]
    ClosedOpenInterval,
    #[strum(serialize = "ocint")]
    OpenClosedInterval,
    #[strum(serialize = "ccint")]
    ClosedClosedInterval,
    #[strum(serialize = "set")]
    Set,
    #[strum(serialize = "order")]
    Order,
    #[strum(serialize = "cond_def")]
    CondDef,
    #[strum(serialize = "cond_expr")]
    CondExpr,

    // Functions
    #[strum(serialize = "system")]
    System,
    #[strum(serialize = "function")]
    Function,
    #[strum(serialize = "function_inverse")]
    FunctionInverse,

    // Calculus
    #[strum(serialize = "derivation")]
    Derivation,
    #[strum(serialize = "derivationprime")]
    DerivationPrime,
    #[strum(serialize = "derivationprime2")]
    DerivationPrime2,
    #[strum(serialize = "nderivationprime")]
    NDerivationPrime,
    #[strum(serialize = "diff")]
    Diff,
    #[strum(serialize = "derivation_diff")]
    DerivationDiff,
    #[strum(serialize = "partial_derivation")]
    PartialDerivation,
    #[strum(serialize = "partial_derivation_diff")]
    PartialDerivationDiff,
    #[strum(serialize = "lim")]
    Lim,
    #[strum(serialize = "definitesigma")]
    DefiniteSigma,
    #[strum(serialize = "integral")]
    Integral,
    #[strum(serialize = "definiteintegral")]
    DefiniteIntegral,
    #[strum(serialize = "differential")]
    Differential,
    #[strum(serialize = "integralrightdash")]
    IntegralRightDash,

    // Misc
    #[strum(serialize = "blank_box_op")]
    BlankBoxOp,
    #[strum(serialize = "filled_box_lt")]
    FilledBoxLt,
    #[strum(serialize = "filled_box_gt")]
    FilledBoxGt,
    #[strum(serialize = "filled_box_equals")]
    FilledBoxEquals,
    #[strum(serialize = "function_operation")]
    FunctionOperation,
    #[strum(serialize = "composition")]
    Composition,
    #[strum(serialize = "piecewise_def")]
    PiecewiseDef,
}

impl Tag {
    /// Look up a tag by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// The wire name of this tag.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Minimum number of children this tag reads.
    pub fn arity(self) -> usize {
        match self {
            Self::String
            | Self::Var
            | Self::Unit
            | Self::Const
            | Self::List
            | Self::AltForm
            | Self::VertList
            | Self::Set
            | Self::Order
            | Self::System
            | Self::PiecewiseDef => 0,

            Self::Negative
            | Self::Positive
            | Self::AddSubSign
            | Self::Factorial
            | Self::Percentage
            | Self::Bracket
            | Self::Root2
            | Self::Ln
            | Self::Abs
            | Self::ApproxSign
            | Self::Deg
            | Self::Sin
            | Self::Cos
            | Self::Tan
            | Self::Cot
            | Self::Asin
            | Self::Acos
            | Self::Atan
            | Self::Acot
            | Self::Sec
            | Self::Csc
            | Self::DerivationPrime
            | Self::DerivationPrime2
            | Self::Differential => 1,

            Self::MixedFrac
            | Self::DegMinSecond
            | Self::LocalizedText
            | Self::Lim
            | Self::IntegralRightDash => 3,

            Self::DefiniteSigma | Self::DefiniteIntegral => 4,

            _ => 2,
        }
    }

    /// Whether the tag takes any number of children.
    pub fn is_variadic(self) -> bool {
        matches!(
            self,
            Self::List
                | Self::AltForm
                | Self::VertList
                | Self::Set
                | Self::Order
                | Self::System
                | Self::PiecewiseDef
        )
    }

    /// Whether the tag renders its own `value` and requires one.
    pub fn needs_value(self) -> bool {
        matches!(self, Self::String | Self::Var | Self::Unit | Self::Const)
    }

    /// Operands of these tags are grouped when they appear under a unary
    /// prefix operator such as `sin` or `ln`.
    pub fn is_low_precedence(self) -> bool {
        matches!(
            self,
            Self::Negative | Self::Add | Self::Sub | Self::Div | Self::Mul
        )
    }

    /// Check the shape of a node carrying this tag.
    pub fn check(self, node: &Node) -> std::result::Result<(), RenderError> {
        if node.children.len() < self.arity() {
            return Err(RenderError::MalformedNode {
                tag: self.name(),
                expected: self.arity(),
                found: node.children.len(),
            });
        }
        if self.needs_value() && node.value.is_none() {
            return Err(RenderError::MissingValue { tag: self.name() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tag_names_round_trip() {
        for tag in Tag::iter() {
            assert_eq!(Tag::from_name(tag.name()), Some(tag));
        }
        assert_eq!(Tag::from_name("det2"), None);
    }

    #[test]
    fn test_decode_node() {
        let json = r#"{"type":"add","children":[{"type":"const","value":"2"},{"type":"const","value":3}],"extra":true}"#;
        let node = Node::from_json(json).unwrap();
        assert_eq!(node.tag(), Some(Tag::Add));
        assert_eq!(node.children[0].value, Some(Literal::from("2")));
        assert_eq!(node.children[1].value.as_ref().unwrap().as_text(), "3");
    }

    #[test]
    fn test_decode_rejects_short_children() {
        let json = r#"{"type":"frac","children":[{"type":"const","value":"1"}]}"#;
        let err = Node::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(RenderError::MalformedNode {
                tag: "frac",
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_validate_finds_nested_missing_value() {
        let node = Node::new("negative", vec![Node::new("var", vec![])]);
        assert_eq!(
            node.validate(),
            Err(RenderError::MissingValue { tag: "var" })
        );
    }

    #[test]
    fn test_validate_ignores_unknown_tags() {
        let node = Node::new("det2", vec![]);
        assert!(node.validate().is_ok());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let node = Node::leaf("const", "1");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"type":"const","value":"1"}"#);
    }
}
