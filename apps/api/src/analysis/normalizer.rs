//! Normalizer — converts untrusted provider JSON into a validated `AnalysisResult`.
//!
//! This is the only place that treats provider output as loosely structured. Missing or
//! out-of-range fields are defaulted or clamped, never rejected:
//! - category: case/format variants map to the canonical values, anything else → Human-Critical
//! - score: clamped to 0 – 100, missing → 50
//! - difficulty: clamped to 1 – 5, missing → 1
//! - id: missing or duplicate → `task-<position>`
//! - tools / risks / safeguards: missing → empty
//!
//! Any provider-supplied summary block is ignored; the summary is always recomputed.
//! Normalizing an already-normalized result is a no-op.

use std::collections::HashSet;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::models::{AnalysisResult, AnalysisSummary, TaskCategory, TaskItem, Tool};

const DEFAULT_SCORE: u8 = 50;
const DEFAULT_DIFFICULTY: u8 = 1;
const TITLE_FROM_SOURCE_CHARS: usize = 80;

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("provider output contained no usable tasks")]
    EmptyTaskSet,
}

impl NormalizeError {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::EmptyTaskSet => "empty_task_set",
        }
    }
}

/// Normalizes a parsed provider reply. The returned result has an empty narrative.
pub fn normalize(value: &Value) -> Result<AnalysisResult, NormalizeError> {
    let (root, raw_tasks) = match value {
        Value::Array(items) => (None, items.as_slice()),
        Value::Object(obj) => (
            Some(obj),
            field(obj, &["tasks", "items"])
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        ),
        _ => (None, &[][..]),
    };

    let mut used_ids = HashSet::new();
    let tasks: Vec<TaskItem> = raw_tasks
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| raw.as_object().map(|obj| (index, obj)))
        .map(|(index, obj)| normalize_task(index, obj, &mut used_ids))
        .collect();

    if tasks.is_empty() {
        return Err(NormalizeError::EmptyTaskSet);
    }

    let summary = AnalysisSummary::from_tasks(&tasks);

    let mut recommendations = root
        .map(|obj| string_list(field(obj, &["recommendations"])))
        .unwrap_or_default();
    if recommendations.is_empty() {
        recommendations = default_recommendations(&summary);
    }

    let mut next_steps = root
        .map(|obj| string_list(field(obj, &["nextSteps", "next_steps"])))
        .unwrap_or_default();
    if next_steps.is_empty() {
        next_steps = default_next_steps();
    }

    Ok(AnalysisResult {
        summary,
        tasks,
        recommendations,
        next_steps,
        narrative_summary: String::new(),
    })
}

/// Maps free-form category labels onto the three canonical buckets.
/// Unrecognized labels land in the conservative `HumanCritical` bucket.
pub fn coerce_category(raw: &str) -> TaskCategory {
    let key: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match key.as_str() {
        "automate" | "automation" | "automatable" | "automated" | "fullyautomate" => {
            TaskCategory::Automate
        }
        "aicopilot" | "copilot" | "aiassisted" | "assist" | "assisted" | "augment"
        | "augmented" => TaskCategory::AiCopilot,
        _ => TaskCategory::HumanCritical,
    }
}

fn normalize_task(index: usize, obj: &Map<String, Value>, used_ids: &mut HashSet<String>) -> TaskItem {
    let position = index + 1;

    let id = match text(obj, &["id", "taskId", "task_id"]) {
        Some(id) if !used_ids.contains(&id) => id,
        _ => unique_id(format!("task-{position}"), used_ids),
    };
    used_ids.insert(id.clone());

    let source_text = text(obj, &["sourceText", "source_text", "source", "originalText"])
        .unwrap_or_default();

    let title = text(obj, &["title", "name", "task"]).unwrap_or_else(|| {
        if source_text.is_empty() {
            format!("Task {position}")
        } else {
            let head: String = source_text.chars().take(TITLE_FROM_SOURCE_CHARS).collect();
            head.trim_end().to_string()
        }
    });

    let category = field(obj, &["category", "automationCategory", "classification"])
        .and_then(Value::as_str)
        .map(coerce_category)
        .unwrap_or(TaskCategory::HumanCritical);

    let score = number(field(obj, &["score", "automationScore", "automation_score"]))
        .map(|n| n.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(DEFAULT_SCORE);

    let difficulty = number(field(obj, &["difficulty"]))
        .map(|n| n.round().clamp(1.0, 5.0) as u8)
        .unwrap_or(DEFAULT_DIFFICULTY);

    let roi_estimate_percent = number(field(
        obj,
        &["roiEstimatePercent", "roi_estimate_percent", "roiEstimate", "roi"],
    ))
    .map(|n| n.round().max(0.0) as u32)
    .unwrap_or(0);

    TaskItem {
        id,
        title,
        source_text,
        category,
        score,
        roi_estimate_percent,
        difficulty,
        reasoning: text(obj, &["reasoning", "rationale", "explanation"]).unwrap_or_default(),
        estimated_time: text(obj, &["estimatedTime", "estimated_time", "timeline"])
            .unwrap_or_default(),
        tools: tools(field(obj, &["tools", "suggestedTools"])),
        risks: string_list(field(obj, &["risks"])),
        safeguards: string_list(field(obj, &["safeguards", "mitigations"])),
    }
}

fn unique_id(base: String, used: &HashSet<String>) -> String {
    if !used.contains(&base) {
        return base;
    }
    let mut suffix = 2;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !used.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// First non-null value among the given key aliases.
fn field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null())
}

/// Trimmed non-empty string; numbers are accepted and rendered as text.
fn text(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    let rendered = match field(obj, names)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!rendered.is_empty()).then_some(rendered)
}

/// Accepts JSON numbers and numeric strings ("85", " 2.5 ").
fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => vec![],
    }
}

/// Tools may arrive as objects or as bare names; entries without a name are dropped.
fn tools(value: Option<&Value>) -> Vec<Tool> {
    let Some(Value::Array(items)) = value else {
        return vec![];
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(obj) => text(obj, &["name", "tool"]).map(|name| Tool {
                name,
                purpose: text(obj, &["purpose", "description"]).unwrap_or_default(),
                alternatives: string_list(field(obj, &["alternatives"])),
            }),
            Value::String(s) if !s.trim().is_empty() => Some(Tool {
                name: s.trim().to_string(),
                purpose: String::new(),
                alternatives: vec![],
            }),
            _ => None,
        })
        .collect()
}

fn default_recommendations(summary: &AnalysisSummary) -> Vec<String> {
    let mut recommendations = Vec::new();
    if summary.automate > 0 {
        recommendations.push(format!(
            "Automate the {} rule-based task(s) first; they carry the quickest payback.",
            summary.automate
        ));
    }
    if summary.copilot > 0 {
        recommendations.push(format!(
            "Pilot AI assistants on the {} task(s) where a person stays in control.",
            summary.copilot
        ));
    }
    if summary.human_critical > 0 {
        recommendations.push(format!(
            "Keep the {} human-critical task(s) with people and reinvest freed-up time there.",
            summary.human_critical
        ));
    }
    recommendations
}

fn default_next_steps() -> Vec<String> {
    vec![
        "Validate the task list with the people who do the work today.".to_string(),
        "Pick one high-scoring task and run a two-week pilot.".to_string(),
        "Measure time saved, then revisit the remaining tasks.".to_string(),
    ]
}
