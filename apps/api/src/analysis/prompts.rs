// All LLM prompt constants for the Analysis module, plus the builders that fill them.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::analysis::models::{AnalysisRequest, AnalysisResult, DocumentType};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_PROSE_SYSTEM};

/// System prompt for task analysis — enforces JSON-only output.
pub const ANALYSIS_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// System prompt for the narrative summary — plain prose, no structure.
pub const SUMMARY_SYSTEM: &str = PLAIN_PROSE_SYSTEM;

/// Analysis prompt template.
/// Replace: {document_framing}, {content}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"{document_framing}

Break the document into its individual, concrete tasks and assess how much of each task can be delegated to automation.

Return a JSON object with this EXACT schema (no extra fields):
{
  "tasks": [
    {
      "id": "task-1",
      "title": "Short task name",
      "sourceText": "The sentence or phrase from the document this task comes from",
      "category": "Automate",
      "score": 85,
      "roiEstimatePercent": 150,
      "difficulty": 2,
      "reasoning": "Why this category and score",
      "estimatedTime": "2-4 weeks",
      "tools": [
        {"name": "Zapier", "purpose": "Connect the form to the CRM", "alternatives": ["Make", "n8n"]}
      ],
      "risks": ["Data mapping errors"],
      "safeguards": ["Weekly spot-check of synced records"]
    }
  ],
  "recommendations": ["Highest-leverage change to make first"],
  "nextSteps": ["Concrete first action"]
}

Rules:
- "category" MUST be exactly one of: "Automate", "AI-Copilot", "Human-Critical"
  - "Automate": rule-based, repetitive work a system can do end-to-end
  - "AI-Copilot": work a person still owns but an AI assistant materially speeds up
  - "Human-Critical": judgment, relationships, accountability or physical presence
- "score": integer 0-100, the automation potential of the task
- "roiEstimatePercent": integer >= 0, estimated return on automating the task
- "difficulty": integer 1-5, implementation difficulty (1 = trivial, 5 = very hard)
- "id": unique per task, "task-1", "task-2", ...
- "tools", "risks", "safeguards": arrays, empty when nothing applies
- Do NOT include a summary block; totals are computed separately.

DOCUMENT:
{content}"#;

/// Narrative summary prompt template.
/// Replace: {char_budget}, {excerpt}, {summary_json}, {top_tasks}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a short narrative summary of this automation analysis for the person who submitted the document.

Keep it under {char_budget} characters. Mention the overall automation potential and the most promising tasks. Do not invent numbers.

DOCUMENT EXCERPT:
{excerpt}

ANALYSIS TOTALS:
{summary_json}

TOP TASKS:
{top_tasks}"#;

const ENTERPRISE_FRAMING: &str = "You are an operations and automation consultant. \
    The document below describes a role, team or business process inside an organisation.";

const PERSONAL_FRAMING: &str = "You are a career coach who specialises in AI and automation. \
    The document below is an individual's own job description or résumé.";

/// Number of tasks listed in the summary prompt.
const SUMMARY_TOP_TASKS: usize = 5;

/// Builds the analysis prompt. The document is embedded in full, never truncated.
pub fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    let framing = match request.document_type() {
        DocumentType::Enterprise => ENTERPRISE_FRAMING,
        DocumentType::Personal => PERSONAL_FRAMING,
    };

    ANALYSIS_PROMPT_TEMPLATE
        .replace("{document_framing}", framing)
        .replace("{content}", request.content())
}

/// Builds the narrative summary prompt from a document excerpt and the normalized result.
pub fn build_summary_prompt(excerpt: &str, result: &AnalysisResult, char_budget: usize) -> String {
    let summary_json = serde_json::to_string_pretty(&result.summary).unwrap_or_default();

    let mut ranked: Vec<_> = result.tasks.iter().collect();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    let top_tasks = ranked
        .iter()
        .take(SUMMARY_TOP_TASKS)
        .map(|t| format!("- {} ({}, score {})", t.title, t.category.as_str(), t.score))
        .collect::<Vec<_>>()
        .join("\n");

    SUMMARY_PROMPT_TEMPLATE
        .replace("{char_budget}", &char_budget.to_string())
        .replace("{summary_json}", &summary_json)
        .replace("{top_tasks}", &top_tasks)
        .replace("{excerpt}", excerpt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::{task, AnalysisSummary, TaskCategory};

    const LONG_JD: &str = "Accounts Payable Specialist. Process 300+ vendor invoices per week, \
        match purchase orders, chase missing approvals by email, reconcile the AP ledger \
        at month end and prepare an aging report for the finance director.";

    #[test]
    fn test_analysis_prompt_embeds_full_content() {
        let content = LONG_JD.repeat(200);
        let request = AnalysisRequest::new(DocumentType::Enterprise, content.clone()).unwrap();
        let prompt = build_analysis_prompt(&request);
        assert!(prompt.contains(&content));
        assert!(!prompt.contains("{content}"));
        assert!(!prompt.contains("{document_framing}"));
    }

    #[test]
    fn test_analysis_prompt_states_schema_enums_and_ranges() {
        let request = AnalysisRequest::new(DocumentType::Personal, LONG_JD).unwrap();
        let prompt = build_analysis_prompt(&request);
        for needle in [
            "\"Automate\"",
            "\"AI-Copilot\"",
            "\"Human-Critical\"",
            "0-100",
            "1-5",
            "roiEstimatePercent",
            "nextSteps",
        ] {
            assert!(prompt.contains(needle), "prompt missing {needle}");
        }
        assert!(ANALYSIS_SYSTEM.contains("valid JSON only"));
    }

    #[test]
    fn test_analysis_prompt_framing_follows_document_type() {
        let enterprise = AnalysisRequest::new(DocumentType::Enterprise, LONG_JD).unwrap();
        let personal = AnalysisRequest::new(DocumentType::Personal, LONG_JD).unwrap();
        assert!(build_analysis_prompt(&enterprise).contains("inside an organisation"));
        assert!(build_analysis_prompt(&personal).contains("résumé"));
    }

    #[test]
    fn test_summary_prompt_lists_highest_scoring_tasks_first() {
        let tasks = vec![
            task("low", TaskCategory::HumanCritical, 10, 0),
            task("high", TaskCategory::Automate, 95, 200),
        ];
        let result = AnalysisResult {
            summary: AnalysisSummary::from_tasks(&tasks),
            tasks,
            recommendations: vec![],
            next_steps: vec![],
            narrative_summary: String::new(),
        };
        let prompt = build_summary_prompt("excerpt text", &result, 100);
        assert!(prompt.contains("under 100 characters"));
        assert!(prompt.contains("excerpt text"));
        let high = prompt.find("Task high").unwrap();
        let low = prompt.find("Task low").unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_summary_prompt_keeps_placeholder_text_in_excerpt() {
        let tasks = vec![task("only", TaskCategory::Automate, 80, 100)];
        let result = AnalysisResult {
            summary: AnalysisSummary::from_tasks(&tasks),
            tasks,
            recommendations: vec![],
            next_steps: vec![],
            narrative_summary: String::new(),
        };
        let excerpt = "Template notes mention {top_tasks} and {summary_json} literally.";
        let prompt = build_summary_prompt(excerpt, &result, 500);
        assert!(prompt.contains(excerpt));
        assert_eq!(prompt.matches("Task only").count(), 1);
    }
}
