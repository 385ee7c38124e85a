//! Optional natural-language summaries from an external text-generation service.
//!
//! This layer sits entirely outside the evaluation core. It renders the top
//! result, its trace, and the uncertainty report into a free-text prompt and
//! POSTs it to a configured endpoint. Any failure — no endpoint, network
//! error, bad status, malformed body — degrades to a fixed fallback string;
//! nothing here can affect the ranked-results pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ExplainError;
use crate::infer::{DiagnosticResult, UncertaintyReport};
use crate::kb::{KnowledgeBase, SymptomId};

/// Shown whenever the explanation service cannot be used.
pub const FALLBACK_EXPLANATION: &str =
    "Explanation service unavailable. Refer to the logic trace for the reasoning steps.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct ExplainRequest<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExplainResponse {
    text: String,
}

/// Render the evaluation state into the prompt sent to the service.
pub fn build_prompt(
    kb: &KnowledgeBase,
    facts: &[SymptomId],
    results: &[DiagnosticResult],
    report: &UncertaintyReport,
) -> String {
    let selected: Vec<String> = facts.iter().map(|id| kb.symptom_name(id)).collect();

    let (top_line, trace) = match results.first() {
        Some(top) => (
            format!("{} (Confidence: {}%)", top.disease_name, top.confidence),
            top.trace.join("\n"),
        ),
        None => ("(no conclusions)".to_string(), String::new()),
    };

    let noise = if report.noise.is_empty() {
        "None".to_string()
    } else {
        report.noise.join(", ")
    };
    let conflicts = if report.conflicting.is_empty() {
        "None".to_string()
    } else {
        report
            .conflicting
            .iter()
            .map(|r| format!("{} inhibited by {}", r.disease_name, r.conflicting.join(", ")))
            .collect::<Vec<_>>()
            .join("; ")
    };
    let ambiguity = if report.ambiguous.is_empty() {
        "Clear logic path"
    } else {
        "Multiple possibilities detected"
    };

    format!(
        "As a senior clinical diagnostic assistant, explain the current findings.\n\
         \n\
         Selected symptoms: {}\n\
         Top diagnosis: {top_line}\n\
         \n\
         Logic trace for top diagnosis:\n\
         {trace}\n\
         \n\
         Uncertainty report:\n\
         - Noise (irrelevant symptoms): {noise}\n\
         - Conflicts: {conflicts}\n\
         - Ambiguity: {ambiguity}\n\
         \n\
         Provide a concise, professional summary that bridges formal logic \
         with clinical reasoning.",
        selected.join(", ")
    )
}

fn request_explanation(endpoint: &str, prompt: &str) -> Result<String, ExplainError> {
    let response = ureq::post(endpoint)
        .timeout(REQUEST_TIMEOUT)
        .send_json(&ExplainRequest { prompt })
        .map_err(|e| match e {
            ureq::Error::Status(status, _) => ExplainError::Status { status },
            ureq::Error::Transport(t) => ExplainError::Http {
                message: t.to_string(),
            },
        })?;

    let body: ExplainResponse = response.into_json().map_err(|e| ExplainError::Body {
        message: e.to_string(),
    })?;

    Ok(body.text)
}

/// Request a natural-language summary of the evaluation.
///
/// Never fails: with no endpoint configured or on any service failure this
/// returns [`FALLBACK_EXPLANATION`] and logs the cause.
pub fn explain(
    endpoint: Option<&str>,
    kb: &KnowledgeBase,
    facts: &[SymptomId],
    results: &[DiagnosticResult],
    report: &UncertaintyReport,
) -> String {
    let Some(endpoint) = endpoint else {
        tracing::debug!("no explanation endpoint configured, using fallback");
        return FALLBACK_EXPLANATION.to_string();
    };

    let prompt = build_prompt(kb, facts, results, report);
    match request_explanation(endpoint, &prompt) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "explanation request failed, using fallback");
            FALLBACK_EXPLANATION.to_string()
        }
    }
}
