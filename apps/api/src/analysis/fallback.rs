//! Fallback dataset — the fixed result returned when the primary path cannot produce a
//! trustworthy one. It is a plain `AnalysisResult`, structurally indistinguishable from a
//! normalized provider result.

use crate::analysis::models::{AnalysisResult, AnalysisSummary, TaskCategory, TaskItem, Tool};

const FALLBACK_NARRATIVE: &str =
    "Sample analysis: most routine admin and reporting work is automatable or AI-assisted.";

struct FallbackTask {
    title: &'static str,
    source_text: &'static str,
    category: TaskCategory,
    score: u8,
    roi_estimate_percent: u32,
    difficulty: u8,
    reasoning: &'static str,
    estimated_time: &'static str,
    tools: &'static [(&'static str, &'static str, &'static [&'static str])],
    risks: &'static [&'static str],
    safeguards: &'static [&'static str],
}

const TASKS: &[FallbackTask] = &[
    FallbackTask {
        title: "Data entry and record updates",
        source_text: "Enter and update records across internal systems",
        category: TaskCategory::Automate,
        score: 90,
        roi_estimate_percent: 250,
        difficulty: 2,
        reasoning: "Structured, repetitive input with clear rules is well suited to workflow automation.",
        estimated_time: "2-4 weeks",
        tools: &[
            ("Zapier", "Move form and email data into systems of record", &["Make", "n8n"]),
            ("UiPath", "Automate entry into systems without an API", &["Power Automate Desktop"]),
        ],
        risks: &["Field mapping errors propagate silently"],
        safeguards: &["Validation rules on required fields", "Weekly sample audit of synced records"],
    },
    FallbackTask {
        title: "Recurring status reports",
        source_text: "Prepare weekly and monthly status reports",
        category: TaskCategory::Automate,
        score: 80,
        roi_estimate_percent: 180,
        difficulty: 2,
        reasoning: "Reports built from the same sources on a schedule can be generated from live data.",
        estimated_time: "1-3 weeks",
        tools: &[("Looker Studio", "Scheduled dashboards from live data", &["Power BI", "Metabase"])],
        risks: &["Stale or broken data connections"],
        safeguards: &["Alert on failed data refresh"],
    },
    FallbackTask {
        title: "Drafting routine correspondence",
        source_text: "Write emails and follow-ups to clients and colleagues",
        category: TaskCategory::AiCopilot,
        score: 65,
        roi_estimate_percent: 120,
        difficulty: 1,
        reasoning: "An assistant can draft replies quickly, but a person should review tone and commitments.",
        estimated_time: "1 week",
        tools: &[("ChatGPT", "Draft and rephrase messages", &["Claude", "Microsoft Copilot"])],
        risks: &["Inaccurate or off-tone statements sent to clients"],
        safeguards: &["Human review before sending", "Approved templates for sensitive topics"],
    },
    FallbackTask {
        title: "Research and summarisation",
        source_text: "Gather information and summarise findings for decision makers",
        category: TaskCategory::AiCopilot,
        score: 55,
        roi_estimate_percent: 90,
        difficulty: 3,
        reasoning: "AI speeds up collection and first-pass summaries; conclusions still need expert judgment.",
        estimated_time: "2-3 weeks",
        tools: &[("Perplexity", "Source-linked research summaries", &["Elicit", "NotebookLM"])],
        risks: &["Hallucinated facts or missing sources"],
        safeguards: &["Require citations for every claim"],
    },
    FallbackTask {
        title: "Stakeholder relationships and decisions",
        source_text: "Build relationships, negotiate and make final decisions",
        category: TaskCategory::HumanCritical,
        score: 15,
        roi_estimate_percent: 10,
        difficulty: 5,
        reasoning: "Trust, negotiation and accountability depend on human judgment and presence.",
        estimated_time: "Not recommended",
        tools: &[],
        risks: &["Eroded trust if interactions feel automated"],
        safeguards: &["Keep decision ownership with a named person"],
    },
];

const RECOMMENDATIONS: &[&str] = &[
    "Start with data entry and recurring reports; they carry the quickest payback.",
    "Give the team an AI assistant for drafting and research, with review before anything is sent.",
    "Reinvest the time saved into relationship and decision-making work.",
];

const NEXT_STEPS: &[&str] = &[
    "List the systems that receive manual data entry today.",
    "Pilot one automated weekly report for a month.",
    "Agree review rules for AI-drafted correspondence.",
];

/// The fixed fallback result. Every call returns an identical value.
pub fn fallback_result() -> AnalysisResult {
    let tasks: Vec<TaskItem> = TASKS
        .iter()
        .enumerate()
        .map(|(index, task)| TaskItem {
            id: format!("task-{}", index + 1),
            title: task.title.to_string(),
            source_text: task.source_text.to_string(),
            category: task.category,
            score: task.score,
            roi_estimate_percent: task.roi_estimate_percent,
            difficulty: task.difficulty,
            reasoning: task.reasoning.to_string(),
            estimated_time: task.estimated_time.to_string(),
            tools: task
                .tools
                .iter()
                .map(|(name, purpose, alternatives)| Tool {
                    name: name.to_string(),
                    purpose: purpose.to_string(),
                    alternatives: alternatives.iter().map(|a| a.to_string()).collect(),
                })
                .collect(),
            risks: task.risks.iter().map(|r| r.to_string()).collect(),
            safeguards: task.safeguards.iter().map(|s| s.to_string()).collect(),
        })
        .collect();

    AnalysisResult {
        summary: AnalysisSummary::from_tasks(&tasks),
        tasks,
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
        next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        narrative_summary: FALLBACK_NARRATIVE.to_string(),
    }
}
