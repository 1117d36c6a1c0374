//! Domain schema for automation-potential reports.
//!
//! `AnalysisResult` is the only object handed back to callers. Whether it came from a
//! provider or from the fallback dataset, it satisfies the same invariants:
//! `total == automate + copilot + human_critical == tasks.len()`, and every derived
//! percentage is recomputed from the tasks by `AnalysisSummary::from_tasks`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest document (in characters, after trimming) worth sending to a provider.
pub const MIN_CONTENT_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    /// An organisational role, team or process description.
    Enterprise,
    /// An individual's own job description or résumé.
    Personal,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Enterprise => "enterprise",
            DocumentType::Personal => "personal",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("content cannot be empty")]
    EmptyContent,

    #[error("content must be at least {min} characters (got {actual})")]
    ContentTooShort { min: usize, actual: usize },
}

/// One analysis call's input. Validated on construction and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    document_type: DocumentType,
    content: String,
}

impl AnalysisRequest {
    pub fn new(document_type: DocumentType, content: impl Into<String>) -> Result<Self, RequestError> {
        let content = content.into();
        let actual = content.trim().chars().count();
        if actual == 0 {
            return Err(RequestError::EmptyContent);
        }
        if actual < MIN_CONTENT_CHARS {
            return Err(RequestError::ContentTooShort {
                min: MIN_CONTENT_CHARS,
                actual,
            });
        }
        Ok(Self {
            document_type,
            content,
        })
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// How much of a task can be delegated to automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskCategory {
    #[serde(rename = "Automate")]
    Automate,
    #[serde(rename = "AI-Copilot")]
    AiCopilot,
    #[serde(rename = "Human-Critical")]
    HumanCritical,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Automate => "Automate",
            TaskCategory::AiCopilot => "AI-Copilot",
            TaskCategory::HumanCritical => "Human-Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub purpose: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    /// Unique within one result.
    pub id: String,
    pub title: String,
    pub source_text: String,
    pub category: TaskCategory,
    /// 0 – 100
    pub score: u8,
    pub roi_estimate_percent: u32,
    /// 1 – 5
    pub difficulty: u8,
    pub reasoning: String,
    pub estimated_time: String,
    pub tools: Vec<Tool>,
    pub risks: Vec<String>,
    pub safeguards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total: u32,
    pub automate: u32,
    pub copilot: u32,
    pub human_critical: u32,
    pub average_score: u8,
    #[serde(rename = "estimatedROIPercent")]
    pub estimated_roi_percent: u32,
    pub automation_potential_percent: u8,
}

impl AnalysisSummary {
    /// Aggregates tasks into summary statistics. An empty slice yields all zeros.
    pub fn from_tasks(tasks: &[TaskItem]) -> Self {
        let count = |category: TaskCategory| {
            tasks.iter().filter(|t| t.category == category).count() as u32
        };
        let total = tasks.len() as u32;
        let automate = count(TaskCategory::Automate);
        let copilot = count(TaskCategory::AiCopilot);
        let human_critical = count(TaskCategory::HumanCritical);

        if total == 0 {
            return Self {
                total,
                automate,
                copilot,
                human_critical,
                average_score: 0,
                estimated_roi_percent: 0,
                automation_potential_percent: 0,
            };
        }

        let n = f64::from(total);
        let score_sum: f64 = tasks.iter().map(|t| f64::from(t.score)).sum();
        let roi_sum: f64 = tasks.iter().map(|t| f64::from(t.roi_estimate_percent)).sum();

        Self {
            total,
            automate,
            copilot,
            human_critical,
            average_score: (score_sum / n).round() as u8,
            estimated_roi_percent: (roi_sum / n).round() as u32,
            automation_potential_percent: (100.0 * f64::from(total - human_critical) / n).round()
                as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: AnalysisSummary,
    pub tasks: Vec<TaskItem>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
    /// Best-effort prose; empty when enrichment failed or was skipped.
    pub narrative_summary: String,
}

#[cfg(test)]
pub(crate) fn task(id: &str, category: TaskCategory, score: u8, roi: u32) -> TaskItem {
    TaskItem {
        id: id.to_string(),
        title: format!("Task {id}"),
        source_text: String::new(),
        category,
        score,
        roi_estimate_percent: roi,
        difficulty: 3,
        reasoning: String::new(),
        estimated_time: String::new(),
        tools: vec![],
        risks: vec![],
        safeguards: vec![],
    }
}
