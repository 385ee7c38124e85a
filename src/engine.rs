//! Engine facade: top-level API for the sekhmet system.
//!
//! The `Engine` owns the validated knowledge base and exposes the three
//! evaluation operations. It is an explicit value, not a process-wide
//! singleton: construct one per knowledge base and share it freely — every
//! operation is a pure, synchronous function of the knowledge base and the
//! caller's facts, so concurrent calls need no coordination.

use serde::{Deserialize, Serialize};

use crate::infer::{
    DiagnosticResult, UncertaintyReport, analyze_uncertainty, forward_chain, goal_lookup,
};
use crate::kb::{DiseaseId, KnowledgeBase, SymptomId};

/// Summary counts for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineInfo {
    pub kb_id: String,
    pub kb_name: String,
    pub kb_version: String,
    pub symptoms: usize,
    pub diseases: usize,
    pub rules: usize,
}

/// The sekhmet diagnostic engine.
///
/// Holds the sole reference to its knowledge base; the base is read-only for
/// the engine's lifetime.
pub struct Engine {
    kb: KnowledgeBase,
}

impl Engine {
    /// Create an engine over an already-validated knowledge base.
    pub fn new(kb: KnowledgeBase) -> Self {
        tracing::info!(
            kb = %kb.meta().id,
            symptoms = kb.symptoms().len(),
            diseases = kb.diseases().len(),
            rules = kb.rules().len(),
            "initializing sekhmet engine"
        );
        Self { kb }
    }

    /// The knowledge base this engine evaluates against.
    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Evaluate every rule against the observed facts and rank the
    /// conclusions by confidence, descending. One result per rule.
    pub fn evaluate(&self, facts: &[SymptomId]) -> Vec<DiagnosticResult> {
        forward_chain(&self.kb, facts)
    }

    /// Evaluate only the rule concluding `goal`. Returns `None` when no rule
    /// in the knowledge base concludes that disease.
    pub fn evaluate_goal(
        &self,
        goal: &DiseaseId,
        facts: &[SymptomId],
    ) -> Option<DiagnosticResult> {
        goal_lookup(&self.kb, goal, facts)
    }

    /// Classify noise, conflicts, partial matches, and ambiguity for a
    /// completed evaluation. `results` must come from [`Engine::evaluate`]
    /// with the same `facts`.
    pub fn analyze_uncertainty(
        &self,
        results: &[DiagnosticResult],
        facts: &[SymptomId],
    ) -> UncertaintyReport {
        analyze_uncertainty(&self.kb, results, facts)
    }

    /// Summary counts for display.
    pub fn info(&self) -> EngineInfo {
        let meta = self.kb.meta();
        EngineInfo {
            kb_id: meta.id.clone(),
            kb_name: meta.name.clone(),
            kb_version: meta.version.clone(),
            symptoms: self.kb.symptoms().len(),
            diseases: self.kb.diseases().len(),
            rules: self.kb.rules().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_engine() -> Engine {
        Engine::new(KnowledgeBase::bundled().unwrap())
    }

    #[test]
    fn evaluate_returns_one_result_per_rule() {
        let engine = test_engine();
        let results = engine.evaluate(&[]);
        assert_eq!(results.len(), engine.kb().rules().len());
    }

    #[test]
    fn results_are_sorted_descending() {
        let engine = test_engine();
        let results = engine.evaluate(&["S1".into(), "S6".into(), "S4".into()]);
        assert!(
            results
                .windows(2)
                .all(|pair| pair[0].confidence >= pair[1].confidence)
        );
    }

    #[test]
    fn info_reflects_the_bundled_pack() {
        let engine = test_engine();
        let info = engine.info();
        assert_eq!(info.kb_id, "respiratory");
        assert_eq!(info.rules, 5);
    }
}
