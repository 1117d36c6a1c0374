// Automation-potential analysis pipeline.
// Implements: prompt building, response parsing, normalization, narrative summary,
// fallback dataset and the orchestrator that ties them together.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod fallback;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod prompts;
pub mod response_parser;
pub mod summary;
