//! LaTeX renderer for expression trees.

use crate::ast::{Node, Tag};
use crate::config::{MathStyle, RenderConfig};
use crate::error::{RenderError, Result};
use crate::postprocess::{postprocess, wrap};
use crate::render::group::group_operand;
use crate::render::periodic::format_periodic;
use crate::text::{localize, substitute_args};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static VAR_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d+)").expect("valid regex literal"));

/// Recursive node renderer.
///
/// Holds only the configuration and the current nesting depth, so a renderer
/// can be created per call.
pub struct MarkupRenderer<'a> {
    config: &'a RenderConfig,
    depth: usize,
}

impl<'a> MarkupRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config, depth: 0 }
    }

    /// Render a node to raw markup, without post-processing.
    pub fn render(&mut self, node: &Node) -> Result<String> {
        if self.depth >= self.config.max_depth {
            return Err(RenderError::DepthExceeded {
                limit: self.config.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let result = self.dispatch(node);
        self.depth -= 1;
        result
    }

    /// Render, post-process and wrap a node in the configured delimiters.
    pub fn convert(&mut self, node: &Node) -> Result<String> {
        let style = self.config.math_style;
        self.convert_as(node, style)
    }

    /// Render a node as an inline fragment, for embedding in text.
    pub fn fragment(&mut self, node: &Node) -> Result<String> {
        self.convert_as(node, MathStyle::Inline)
    }

    fn convert_as(&mut self, node: &Node, style: MathStyle) -> Result<String> {
        let markup = self.render(node)?;
        Ok(wrap(&postprocess(&markup, self.config), style))
    }

    /// Render an operand of a unary prefix operator, grouping it if needed.
    pub fn format_operand(&mut self, node: &Node) -> Result<String> {
        let markup = self.render(node)?;
        Ok(group_operand(node, markup))
    }

    fn dispatch(&mut self, node: &Node) -> Result<String> {
        let Some(tag) = node.tag() else {
            return Ok(self.unknown(node));
        };
        tag.check(node)?;

        // Children below are indexed only up to `tag.arity()`.
        let c = &node.children;

        let markup = match tag {
            // Literals
            Tag::String => format!(r"\text{{{}}}", value(node, tag)?),
            Tag::Var => VAR_INDEX
                .replace_all(&value(node, tag)?, "_{${1}}")
                .into_owned(),
            Tag::Unit => format!(r"\text{{ {}}}", value(node, tag)?),
            Tag::Const => value(node, tag)?.replacen('.', "{,}", 1),
            Tag::PeriodicLocalize => {
                let decimal = value(&c[0], tag)?;
                let raw = value(&c[1], tag)?;
                let repeat = raw
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| RenderError::InvalidLiteral {
                        tag: tag.name(),
                        value: raw.to_string(),
                    })?;
                format_periodic(&decimal, repeat)?
            }
            Tag::LocalizedText => self.localized_text(node)?,
            Tag::Indexed => {
                let [a, b] = self.operands::<2>(node)?;
                format!("{}_{{{}}}", a, b)
            }

            // Arithmetic
            Tag::Negative => format!("-{}", self.render(&c[0])?),
            Tag::Positive => format!("+{}", self.render(&c[0])?),
            Tag::Equals => self.infix(node, "=")?,
            Tag::Add => self.infix(node, "+")?,
            Tag::Sub => self.infix(node, "-")?,
            Tag::Div => self.infix(node, ":")?,
            Tag::Mul => self.infix(node, r"\cdot ")?,
            Tag::Muli => self.infix(node, "")?,
            Tag::AddSub => self.infix(node, r"\pm ")?,
            Tag::AddSubSign => format!(r"\pm{}", self.render(&c[0])?),
            Tag::Frac => {
                let [a, b] = self.operands::<2>(node)?;
                format!(r"\frac{{{}}}{{{}}}", a, b)
            }
            Tag::MixedFrac => {
                let [whole, a, b] = self.operands::<3>(node)?;
                format!(r"{}\frac{{{}}}{{{}}}", whole, a, b)
            }
            Tag::Pow => {
                let [base, exp] = self.operands::<2>(node)?;
                format!("{}^{{{}}}", base, exp)
            }
            Tag::Factorial => format!("{}!", self.render(&c[0])?),
            Tag::Percentage => format!(r"{}\%", self.render(&c[0])?),
            Tag::Bracket => format!("({})", self.render(&c[0])?),
            Tag::Root2 => format!(r"\sqrt{{{}}}", self.render(&c[0])?),
            Tag::Root => {
                let [index, radicand] = self.operands::<2>(node)?;
                format!(r"\sqrt[{}]{{{}}}", index, radicand)
            }
            Tag::Log => {
                let base = self.render(&c[0])?;
                format!(r"\log_{{{}}}{}", base, self.format_operand(&c[1])?)
            }
            Tag::Ln => format!(r"\ln {}", self.format_operand(&c[0])?),
            Tag::Abs => format!("|{}|", self.render(&c[0])?),

            // Relations
            Tag::NotEquals => self.infix(node, r"\neq ")?,
            Tag::Approx => self.infix(node, r"\approx ")?,
            Tag::ApproxSign => format!(r"\approx {}", self.render(&c[0])?),
            Tag::Gt => self.infix(node, " > ")?,
            Tag::Lt => self.infix(node, " < ")?,
            Tag::Gte => self.infix(node, r"\geq ")?,
            Tag::Lte => self.infix(node, r"\leq ")?,

            // Lists
            Tag::List => self.join(node, ", ")?,
            Tag::AltForm => self.join(node, "; ")?,
            Tag::VertList => format!(
                r"\begin{{array}}{{l}}{}\end{{array}}",
                self.join(node, r"\\")?
            ),

            // Trigonometry
            Tag::Deg => format!(r"{}^{{\circ}}", self.render(&c[0])?),
            Tag::DegMin => {
                let [deg, min] = self.operands::<2>(node)?;
                format!(r"{}^{{\circ}} {}'", deg, min)
            }
            Tag::DegMinSecond => {
                let [deg, min, sec] = self.operands::<3>(node)?;
                format!(r"{}^{{\circ}} {}' {}''", deg, min, sec)
            }
            Tag::Sin => self.prefix(node, r"\sin")?,
            Tag::Cos => self.prefix(node, r"\cos")?,
            Tag::Tan => self.prefix(node, r"\operatorname{tg}")?,
            Tag::Cot => self.prefix(node, r"\operatorname{ctg}")?,
            Tag::Asin => self.prefix(node, r"\arcsin")?,
            Tag::Acos => self.prefix(node, r"\arccos")?,
            Tag::Atan => self.prefix(node, r"\operatorname{arctg}")?,
            Tag::Acot => self.prefix(node, r"\operatorname{arcctg}")?,
            Tag::Sec => self.prefix(node, r"\sec")?,
            Tag::Csc => self.prefix(node, r"\csc")?,

            // Sets and intervals
            Tag::ElemOf => self.infix(node, r"\in ")?,
            Tag::ElemNotOf => self.infix(node, r"\notin ")?,
            Tag::Union => self.infix(node, r"\cup ")?,
            Tag::OpenOpenInterval => self.interval(node, '(', ')')?,
            Tag::ClosedOpenInterval => self.interval(node, '[', ')')?,
            Tag::OpenClosedInterval => self.interval(node, '(', ']')?,
            Tag::ClosedClosedInterval => self.interval(node, '[', ']')?,
            Tag::Set => format!(r"\{{{}\}}", self.join(node, ", ")?),
            Tag::Order => format!("({})", self.join(node, ", ")?),
            Tag::CondDef => self.infix(node, "|")?,
            Tag::CondExpr => self.infix(node, ", ")?,

            // Functions
            Tag::System => format!(
                r"\begin{{cases}}{};\end{{cases}}",
                self.join(node, r",\\ ")?
            ),
            Tag::Function => {
                let [f, x] = self.operands::<2>(node)?;
                format!("{}({})", f, x)
            }
            Tag::FunctionInverse => {
                let [f, x] = self.operands::<2>(node)?;
                format!("{}^{{-1}}({})", f, x)
            }

            // Calculus
            Tag::Derivation => {
                let [var, body] = self.operands::<2>(node)?;
                format!(r"\frac{{d}}{{d{}}}({})", var, body)
            }
            Tag::DerivationPrime => format!("{}'", self.render(&c[0])?),
            Tag::DerivationPrime2 => format!("{}''", self.render(&c[0])?),
            Tag::NDerivationPrime => {
                let [order, body] = self.operands::<2>(node)?;
                format!("{}^{{({})}}", body, order)
            }
            Tag::Diff => self.infix(node, r"\backslash ")?,
            Tag::DerivationDiff => {
                let [y, x] = self.operands::<2>(node)?;
                format!(r"\frac{{d{}}}{{d{}}}", y, x)
            }
            Tag::PartialDerivation => {
                let [var, body] = self.operands::<2>(node)?;
                format!(r"\frac{{\partial}}{{\partial {}}}({})", var, body)
            }
            Tag::PartialDerivationDiff => {
                let [y, x] = self.operands::<2>(node)?;
                format!(r"\frac{{\partial {}}}{{\partial {}}}", y, x)
            }
            Tag::Lim => {
                let var = self.render(&c[0])?;
                let target = self.render(&c[1])?;
                let body = self.format_operand(&c[2])?;
                format!(r"\lim\limits_{{{}\to {}}} {}", var, target, body)
            }
            Tag::DefiniteSigma => {
                let [var, from, to, body] = self.operands::<4>(node)?;
                format!(r"\sum\limits_{{{}={}}}^{{{}}} {}", var, from, to, body)
            }
            Tag::Integral => {
                let [body, var] = self.operands::<2>(node)?;
                format!(r"\int ({}) d{}", body, var)
            }
            Tag::DefiniteIntegral => {
                let [from, to, body, var] = self.operands::<4>(node)?;
                format!(r"\int\limits_{{{}}}^{{{}}} ({}) d{}", from, to, body, var)
            }
            Tag::Differential => format!("d{}", self.render(&c[0])?),
            Tag::IntegralRightDash => {
                let [body, upper, lower] = self.operands::<3>(node)?;
                format!(r"{} \Bigg|^{{{}}}_{{{}}}", body, upper, lower)
            }

            // Misc
            Tag::BlankBoxOp => {
                let [a, b] = self.operands::<2>(node)?;
                format!(r"{} \ \fbox{{?}}\ {}", a, b)
            }
            Tag::FilledBoxLt => self.infix(node, " < ")?,
            Tag::FilledBoxGt => self.infix(node, " > ")?,
            Tag::FilledBoxEquals => self.infix(node, " = ")?,
            Tag::FunctionOperation => {
                let [f, g] = self.operands::<2>(node)?;
                format!("({})({})", f, g)
            }
            Tag::Composition => self.infix(node, r"\circ ")?,
            Tag::PiecewiseDef => format!(
                r"\begin{{cases}}{}\end{{cases}}",
                self.join(node, r"\\ ")?
            ),
        };

        Ok(markup)
    }

    /// Render the first `N` children.
    fn operands<const N: usize>(&mut self, node: &Node) -> Result<[String; N]> {
        let mut out: [String; N] = std::array::from_fn(|_| String::new());
        for (slot, child) in out.iter_mut().zip(&node.children) {
            *slot = self.render(child)?;
        }
        Ok(out)
    }

    fn infix(&mut self, node: &Node, op: &str) -> Result<String> {
        let [a, b] = self.operands::<2>(node)?;
        Ok(format!("{}{}{}", a, op, b))
    }

    fn prefix(&mut self, node: &Node, command: &str) -> Result<String> {
        let operand = self.format_operand(&node.children[0])?;
        Ok(format!("{} {}", command, operand))
    }

    fn interval(&mut self, node: &Node, open: char, close: char) -> Result<String> {
        let [a, b] = self.operands::<2>(node)?;
        Ok(format!("{}{};{}{}", open, a, b, close))
    }

    fn join(&mut self, node: &Node, separator: &str) -> Result<String> {
        let parts = node
            .children
            .iter()
            .map(|child| self.render(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join(separator))
    }

    /// Localized text: the template sits in the third child, arguments follow
    /// it (or come from `args` when there are no trailing children).
    fn localized_text(&mut self, node: &Node) -> Result<String> {
        let template = value(&node.children[2], Tag::LocalizedText)?;
        let args = if node.children.len() > 3 {
            &node.children[3..]
        } else {
            &node.args[..]
        };

        let mode = self.config.arg_substitution;
        let text = substitute_args(&template, args, mode, |arg| self.fragment(arg))?;
        Ok(localize(&text))
    }

    fn unknown(&self, node: &Node) -> String {
        log::warn!(
            target: "mathnode_latex::render",
            "unknown node type `{}`, rendering structural dump",
            node.kind
        );
        serde_json::to_string(node).unwrap_or_else(|_| format!("{:?}", node))
    }
}

fn value(node: &Node, tag: Tag) -> Result<Cow<'_, str>> {
    node.value
        .as_ref()
        .map(|v| v.as_text())
        .ok_or_else(|| RenderError::MissingValue { tag: tag.name() }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;
    use pretty_assertions::assert_eq;

    fn render(node: &Node) -> String {
        MarkupRenderer::new(&RenderConfig::default())
            .render(node)
            .unwrap()
    }

    fn c(v: &str) -> Node {
        Node::leaf("const", v)
    }

    fn var(v: &str) -> Node {
        Node::leaf("var", v)
    }

    fn op(kind: &str, children: Vec<Node>) -> Node {
        Node::new(kind, children)
    }

    #[test]
    fn test_literals() {
        assert_eq!(render(&c("2.5")), "2{,}5");
        assert_eq!(render(&c("1.2.3")), "1{,}2.3");
        assert_eq!(render(&var("x_12")), "x_{12}");
        assert_eq!(render(&Node::leaf("unit", "cm")), r"\text{ cm}");
        assert_eq!(render(&Node::leaf("string", "да")), r"\text{да}");
        assert_eq!(render(&Node::leaf("const", 42i64)), "42");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(render(&op("add", vec![c("2"), c("3")])), "2+3");
        assert_eq!(render(&op("div", vec![c("6"), c("3")])), "6:3");
        assert_eq!(render(&op("mul", vec![c("2"), var("x")])), r"2\cdot x");
        assert_eq!(render(&op("muli", vec![c("2"), var("x")])), "2x");
        assert_eq!(render(&op("pow", vec![var("x"), c("2")])), "x^{2}");
        assert_eq!(
            render(&op("root", vec![c("3"), var("x")])),
            r"\sqrt[3]{x}"
        );
        assert_eq!(render(&op("percentage", vec![c("5")])), r"5\%");
    }

    #[test]
    fn test_trig_grouping() {
        let sum = op("add", vec![var("a"), var("b")]);
        assert_eq!(render(&op("sin", vec![sum])), r"\sin (a+b)");

        let square = op("pow", vec![var("x"), c("2")]);
        assert_eq!(render(&op("sin", vec![square])), r"\sin x^{2}");

        let product = op("mul", vec![c("2"), var("x")]);
        assert_eq!(
            render(&op("tan", vec![product])),
            r"\operatorname{tg} (2\cdot x)"
        );
    }

    #[test]
    fn test_log_and_limit() {
        let arg = op("sub", vec![var("x"), c("1")]);
        assert_eq!(
            render(&op("log", vec![c("2"), arg.clone()])),
            r"\log_{2}(x-1)"
        );
        assert_eq!(
            render(&op("lim", vec![var("x"), Node::leaf("const", "∞"), arg])),
            r"\lim\limits_{x\to ∞} (x-1)"
        );
    }

    #[test]
    fn test_calculus() {
        assert_eq!(
            render(&op(
                "definiteintegral",
                vec![c("0"), c("1"), var("x"), var("x")]
            )),
            r"\int\limits_{0}^{1} (x) dx"
        );
        assert_eq!(
            render(&op(
                "definitesigma",
                vec![var("k"), c("1"), var("n"), var("k")]
            )),
            r"\sum\limits_{k=1}^{n} k"
        );
        assert_eq!(
            render(&op("nderivationprime", vec![c("3"), var("f")])),
            "f^{(3)}"
        );
    }

    #[test]
    fn test_lists() {
        let items = vec![var("a"), var("b")];
        assert_eq!(render(&op("set", items.clone())), r"\{a, b\}");
        assert_eq!(
            render(&op("system", items.clone())),
            r"\begin{cases}a,\\ b;\end{cases}"
        );
        assert_eq!(
            render(&op("vert_list", items)),
            r"\begin{array}{l}a\\b\end{array}"
        );
        assert_eq!(render(&op("list", vec![])), "");
    }

    #[test]
    fn test_intervals() {
        assert_eq!(
            render(&op("coint", vec![c("0"), c("1")])),
            "[0;1)"
        );
        assert_eq!(
            render(&op("ocint", vec![c("0"), c("1")])),
            "(0;1]"
        );
    }

    #[test]
    fn test_periodic() {
        let node = op("periodic_localize", vec![c("0.16"), c("1")]);
        assert_eq!(render(&node), "0{,}1(6)");

        let numeric = op(
            "periodic_localize",
            vec![c("0.16"), Node::leaf("const", 1i64)],
        );
        assert_eq!(render(&numeric), "0{,}1(6)");
    }

    #[test]
    fn test_periodic_invalid_length() {
        let node = op("periodic_localize", vec![c("1.2345"), c("6")]);
        let err = MarkupRenderer::new(&RenderConfig::default())
            .render(&node)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(RenderError::InvalidPeriodicLength { length: 6, .. })
        ));

        let node = op("periodic_localize", vec![c("1.2345"), c("two")]);
        let err = MarkupRenderer::new(&RenderConfig::default())
            .render(&node)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(RenderError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_localized_text() {
        let node = op(
            "localized_text",
            vec![
                Node::leaf("string", "key"),
                Node::leaf("string", "ru"),
                Node::leaf("string", "Умножьте ARG1 на ARG2"),
                var("x"),
                op("frac", vec![c("1"), c("2")]),
            ],
        );
        assert_eq!(
            render(&node),
            r"\text{Умножьте }x\text{ на }\frac{1}{2}"
        );
    }

    #[test]
    fn test_localized_text_uses_args_field() {
        let node = op(
            "localized_text",
            vec![
                Node::leaf("string", "key"),
                Node::leaf("string", "ru"),
                Node::leaf("string", "Корень ARG1"),
            ],
        )
        .with_args(vec![Node::leaf("var", "α")]);
        assert_eq!(render(&node), r"\text{Корень }\alpha ");
    }

    #[test]
    fn test_localized_text_keeps_array_rows() {
        let rows = op(
            "vert_list",
            vec![var("a"), op("order", vec![var("a"), var("b")])],
        );
        let node = op(
            "localized_text",
            vec![
                Node::leaf("string", "key"),
                Node::leaf("string", "ru"),
                Node::leaf("string", "Список ARG1"),
                rows,
            ],
        );
        assert_eq!(
            render(&node),
            r"\text{Список }\begin{array}{l}a\\(a, b)\end{array}"
        );
    }

    #[test]
    fn test_localized_text_without_template_value() {
        let node = op(
            "localized_text",
            vec![var("a"), var("b"), op("add", vec![var("x"), var("y")])],
        );
        let err = MarkupRenderer::new(&RenderConfig::default())
            .render(&node)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(RenderError::MissingValue {
                tag: "localized_text"
            })
        ));
    }

    #[test]
    fn test_unknown_tag_dump() {
        let node = Node {
            kind: "det2".to_string(),
            value: Some(Literal::from("x")),
            children: vec![],
            args: vec![],
        };
        assert_eq!(render(&node), r#"{"type":"det2","value":"x"}"#);
    }

    #[test]
    fn test_malformed_node() {
        let err = MarkupRenderer::new(&RenderConfig::default())
            .render(&op("frac", vec![c("1")]))
            .unwrap_err();
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
    fn test_depth_guard() {
        let config = RenderConfig {
            max_depth: 8,
            ..Default::default()
        };
        let mut node = var("x");
        for _ in 0..10 {
            node = op("negative", vec![node]);
        }
        let err = MarkupRenderer::new(&config).render(&node).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Render(RenderError::DepthExceeded { limit: 8 })
        ));

        let mut shallow = var("x");
        for _ in 0..7 {
            shallow = op("negative", vec![shallow]);
        }
        assert_eq!(
            MarkupRenderer::new(&config).render(&shallow).unwrap(),
            "-------x"
        );
    }
}
