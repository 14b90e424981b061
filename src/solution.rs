//! Rendering of solver responses: solution previews and step-by-step
//! solutions.
//!
//! Each entry is decoded and rendered on its own, so one malformed entry is
//! reported in [`BatchReport::failures`] without dropping the others.

use crate::ast::Node;
use crate::config::{ArgSubstitution, RenderConfig};
use crate::error::{DecodeError, Error, Result};
use crate::render::MarkupRenderer;
use crate::text::substitute_args;
use serde::{Deserialize, Serialize, Serializer};

/// Rendered preview of one solution method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionPreview {
    pub title: String,
    pub method: String,
    pub problem: String,
    pub solution: String,
    /// Opaque action the client sends back to request the full solution
    pub node_action: serde_json::Value,
}

/// One rendered step of a detailed solution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionStep {
    pub step: String,
    pub header: String,
}

/// Results of rendering a batch of independent items.
#[derive(Debug, Serialize)]
pub struct BatchReport<T> {
    /// Successfully rendered items, in input order
    pub items: Vec<T>,
    /// Items that failed, by input index
    pub failures: Vec<ItemFailure>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    fn record(&mut self, index: usize, result: Result<T>) {
        match result {
            Ok(item) => self.items.push(item),
            Err(error) => {
                log::debug!(
                    target: "mathnode_latex::solution",
                    "item {} failed: {}",
                    index,
                    error
                );
                self.failures.push(ItemFailure { index, error });
            }
        }
    }

    /// Whether every item rendered.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A failed item in a batch.
#[derive(Debug, Serialize)]
pub struct ItemFailure {
    pub index: usize,
    #[serde(serialize_with = "error_message")]
    pub error: Error,
}

fn error_message<S: Serializer>(error: &Error, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

// Upstream wire format.

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    groups: Vec<PreviewGroup>,
}

#[derive(Debug, Deserialize)]
struct PreviewGroup {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewEntry {
    preview: Preview,
    #[serde(default)]
    node_action: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Preview {
    title: LocalizedTemplate,
    method: LocalizedTemplate,
    content: PreviewContent,
}

#[derive(Debug, Deserialize)]
struct PreviewContent {
    problem: Node,
    solution: Node,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizedTemplate {
    localized_text: TemplateText,
    #[serde(default)]
    args: Vec<Node>,
}

#[derive(Debug, Deserialize)]
struct TemplateText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct StepsResponse {
    result: StepsResult,
}

#[derive(Debug, Deserialize)]
struct StepsResult {
    #[serde(default)]
    steps: Vec<serde_json::Value>,
    solution: Node,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    #[serde(default)]
    substeps: Vec<Substep>,
    #[serde(default)]
    headers: Vec<LocalizedTemplate>,
}

#[derive(Debug, Deserialize)]
struct Substep {
    left: Node,
}

/// Render the previews of every vertical group in a preview response.
pub fn previews_from_json(input: &str, config: &RenderConfig) -> Result<BatchReport<SolutionPreview>> {
    let response: PreviewResponse = serde_json::from_str(input).map_err(DecodeError::from)?;
    let mut report = BatchReport::default();

    let entries = response
        .groups
        .into_iter()
        .filter(|group| group.kind == "vertical")
        .flat_map(|group| group.entries);

    for (index, entry) in entries.enumerate() {
        report.record(index, render_preview(entry, config));
    }

    Ok(report)
}

fn render_preview(entry: serde_json::Value, config: &RenderConfig) -> Result<SolutionPreview> {
    let entry: PreviewEntry = serde_json::from_value(entry).map_err(DecodeError::from)?;
    let preview = entry.preview;
    let mut renderer = MarkupRenderer::new(config);

    Ok(SolutionPreview {
        title: render_template(&mut renderer, &preview.title, config.arg_substitution)?,
        method: render_template(&mut renderer, &preview.method, config.arg_substitution)?,
        problem: renderer.convert(&preview.content.problem)?,
        solution: renderer.convert(&preview.content.solution)?,
        node_action: entry.node_action,
    })
}

/// Render the steps of a detailed solution, followed by the final answer.
pub fn steps_from_json(input: &str, config: &RenderConfig) -> Result<BatchReport<SolutionStep>> {
    let response: StepsResponse = serde_json::from_str(input).map_err(DecodeError::from)?;
    let result = response.result;
    let mut report = BatchReport::default();

    for (index, step) in result.steps.into_iter().enumerate() {
        report.record(index, render_step(step, config));
    }

    let answer = MarkupRenderer::new(config)
        .convert(&result.solution)
        .map(|step| SolutionStep {
            step,
            header: config.answer_header.clone(),
        });
    report.record(report.items.len() + report.failures.len(), answer);

    Ok(report)
}

fn render_step(step: serde_json::Value, config: &RenderConfig) -> Result<SolutionStep> {
    let step: RawStep = serde_json::from_value(step).map_err(DecodeError::from)?;
    let substep = step
        .substeps
        .first()
        .ok_or(DecodeError::MissingField("substeps"))?;
    let header = step
        .headers
        .first()
        .ok_or(DecodeError::MissingField("headers"))?;

    let mut renderer = MarkupRenderer::new(config);
    Ok(SolutionStep {
        step: renderer.convert(&substep.left)?,
        header: render_template(&mut renderer, header, config.arg_substitution)?,
    })
}

fn render_template(
    renderer: &mut MarkupRenderer<'_>,
    template: &LocalizedTemplate,
    mode: ArgSubstitution,
) -> Result<String> {
    substitute_args(&template.localized_text.text, &template.args, mode, |arg| {
        renderer.fragment(arg)
    })
}
