//! Goal lookup: verify one target conclusion against the observed facts.
//!
//! This is a simplified stand-in for backward chaining. A full backward
//! chainer would recursively attempt to satisfy each requirement as its own
//! sub-goal against the rule base; here every requirement is an observable
//! fact, so goal verification reduces to running the forward pass and
//! selecting the result for the target conclusion.

use crate::kb::{DiseaseId, KnowledgeBase, SymptomId};

use super::{DiagnosticResult, forward_chain};

/// Evaluate the rule concluding `goal` against the observed facts.
///
/// Returns `None` when no rule in the knowledge base concludes `goal`. That
/// is an expected outcome (callers routinely probe ids), not an error.
pub fn goal_lookup(
    kb: &KnowledgeBase,
    goal: &DiseaseId,
    facts: &[SymptomId],
) -> Option<DiagnosticResult> {
    let result = forward_chain(kb, facts)
        .into_iter()
        .find(|r| &r.disease_id == goal);

    if result.is_none() {
        tracing::debug!(goal = %goal, "no rule concludes goal");
    }

    result
}
