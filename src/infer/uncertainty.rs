//! Uncertainty analysis: classify the quality of a completed evaluation.
//!
//! Post-processes the ranked result list together with the original fact set
//! and sorts the findings into four categories: irrelevant facts (noise),
//! contradicted rules (conflicting), partially-satisfied rules (incomplete),
//! and a near-tied top pair (ambiguous).

use serde::{Deserialize, Serialize};

use crate::kb::{KnowledgeBase, SymptomId};

use super::{AMBIGUITY_GAP, DiagnosticResult};

/// Classified uncertainty conditions for one evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UncertaintyReport {
    /// Rules with some but not all requirements matched and no exclusion
    /// fired. More facts could still confirm these.
    pub incomplete: Vec<DiagnosticResult>,
    /// Rules contradicted by an exclusion while also holding matched
    /// evidence — genuinely conflicting input, not a merely irrelevant rule.
    pub conflicting: Vec<DiagnosticResult>,
    /// Empty, or exactly the top two results when their confidence gap is
    /// below [`AMBIGUITY_GAP`].
    pub ambiguous: Vec<DiagnosticResult>,
    /// Names of observed facts no rule can use.
    pub noise: Vec<String>,
}

impl UncertaintyReport {
    /// True when no uncertainty condition was detected.
    pub fn is_clear(&self) -> bool {
        self.incomplete.is_empty()
            && self.conflicting.is_empty()
            && self.ambiguous.is_empty()
            && self.noise.is_empty()
    }
}

/// Classify noise, conflicts, partial matches, and ambiguity for a completed
/// evaluation. `results` must be the forward chain's output (sorted by
/// confidence descending) for the same `facts`.
pub fn analyze_uncertainty(
    kb: &KnowledgeBase,
    results: &[DiagnosticResult],
    facts: &[SymptomId],
) -> UncertaintyReport {
    // Noise: a fact is relevant only if some rule lists it as required or
    // optional. Exclusion-only appearances do not make a fact relevant.
    let relevant = kb.relevant_symptoms();
    let noise: Vec<String> = facts
        .iter()
        .filter(|id| !relevant.contains(*id))
        .map(|id| kb.symptom_name(id))
        .collect();

    let conflicting: Vec<DiagnosticResult> = results
        .iter()
        .filter(|r| !r.conflicting.is_empty() && r.match_count > 0)
        .cloned()
        .collect();

    // Partial, non-exclusionary matches: match_count + missing_count always
    // equals the rule's requirement total.
    let incomplete: Vec<DiagnosticResult> = results
        .iter()
        .filter(|r| r.match_count > 0 && r.missing_count > 0 && r.conflicting.is_empty())
        .cloned()
        .collect();

    let ambiguous = match results {
        [first, second, ..] if first.confidence.abs_diff(second.confidence) < AMBIGUITY_GAP => {
            vec![first.clone(), second.clone()]
        }
        _ => Vec::new(),
    };

    tracing::debug!(
        noise = noise.len(),
        conflicting = conflicting.len(),
        incomplete = incomplete.len(),
        ambiguous = !ambiguous.is_empty(),
        "uncertainty analysis complete"
    );

    UncertaintyReport {
        incomplete,
        conflicting,
        ambiguous,
        noise,
    }
}
