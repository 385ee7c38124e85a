//! Forward chaining: evaluate every rule against the observed facts.
//!
//! Single-layer forward chaining — rules never depend on each other's
//! conclusions, so one pass over the rule table is exhaustive. Each rule is
//! scored in two stages: required matches fill up to [`REQUIRED_WEIGHT`] of
//! the score, and optional matches add up to [`OPTIONAL_WEIGHT`] on top, but
//! only once every requirement matched. An observed exclusion multiplies the
//! final score by [`EXCLUSION_PENALTY`].

use std::collections::HashSet;

use crate::kb::{KnowledgeBase, Rule, SymptomId};

use super::{DiagnosticResult, EXCLUSION_PENALTY, OPTIONAL_WEIGHT, REQUIRED_WEIGHT};

/// Evaluate one rule against the observed fact set.
fn evaluate_rule(
    kb: &KnowledgeBase,
    rule: &Rule,
    facts: &HashSet<&SymptomId>,
) -> DiagnosticResult {
    let disease_name = kb
        .disease(&rule.conclusion)
        .map(|d| d.name.clone())
        .unwrap_or_else(|| rule.conclusion.to_string());

    let mut trace = Vec::new();

    // Exclusions: an observed disqualifying symptom contradicts the rule.
    let conflicting: Vec<String> = rule
        .exclusions
        .iter()
        .filter(|id| facts.contains(*id))
        .map(|id| kb.symptom_name(id))
        .collect();
    if !conflicting.is_empty() {
        trace.push(format!(
            "Rule {} invalidated by exclusion: {}",
            rule.id,
            conflicting.join(", ")
        ));
    }

    // Requirements, checked in rule order so the missing list is stable.
    let mut match_count = 0usize;
    let mut missing_required = Vec::new();
    for req in &rule.requirements {
        if facts.contains(req) {
            match_count += 1;
        } else {
            missing_required.push(kb.symptom_name(req));
        }
    }

    // The knowledge base guarantees `requirements` is non-empty, so this
    // division is always defined.
    let total_required = rule.requirements.len();
    let optional_matches = rule
        .optional
        .iter()
        .filter(|id| facts.contains(*id))
        .count();

    let mut confidence = (match_count as f64 / total_required as f64) * REQUIRED_WEIGHT;
    if match_count == total_required {
        // Full requirement match floors the score at REQUIRED_WEIGHT. With no
        // optional symptoms defined the denominator is forced to 1, which
        // leaves the bonus term at zero: the floor is intentional.
        confidence = REQUIRED_WEIGHT
            + (optional_matches as f64 / rule.optional.len().max(1) as f64) * OPTIONAL_WEIGHT;
    }
    if !conflicting.is_empty() {
        confidence *= EXCLUSION_PENALTY;
    }

    trace.push(format!(
        "Checking requirements for {disease_name}: {match_count}/{total_required} found."
    ));
    if !missing_required.is_empty() {
        trace.push(format!("Missing: {}", missing_required.join(", ")));
    }
    if optional_matches > 0 {
        trace.push(format!("Bonus matches (optional): {optional_matches}"));
    }

    DiagnosticResult {
        disease_id: rule.conclusion.clone(),
        disease_name,
        confidence: (confidence * 100.0).round() as u8,
        match_count,
        missing_count: missing_required.len(),
        satisfied: match_count == total_required && conflicting.is_empty(),
        conflicting,
        missing_required,
        trace,
        reason: rule.description.clone(),
    }
}

/// Evaluate every rule in the knowledge base and rank the conclusions.
///
/// No rule is skipped: every conclusion produces exactly one result, even for
/// an empty fact set. Results are sorted by confidence descending; the sort
/// is stable, so ties keep rule declaration order.
pub fn forward_chain(kb: &KnowledgeBase, facts: &[SymptomId]) -> Vec<DiagnosticResult> {
    let fact_set: HashSet<&SymptomId> = facts.iter().collect();

    let mut results: Vec<DiagnosticResult> = kb
        .rules()
        .iter()
        .map(|rule| evaluate_rule(kb, rule, &fact_set))
        .collect();

    results.sort_by(|a, b| b.confidence.cmp(&a.confidence));

    tracing::debug!(
        facts = facts.len(),
        rules = results.len(),
        top = results.first().map(|r| r.confidence).unwrap_or(0),
        "forward chain complete"
    );

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kb::{Disease, KbMeta, Severity, Symptom};

    fn small_kb() -> KnowledgeBase {
        KnowledgeBase::new(
            KbMeta {
                id: "test".into(),
                name: "Test".into(),
                version: "0.0.0".into(),
                description: String::new(),
            },
            vec![
                Symptom {
                    id: "S1".into(),
                    name: "High Fever".into(),
                    category: "General".into(),
                },
                Symptom {
                    id: "S7".into(),
                    name: "Sore Throat".into(),
                    category: "Respiratory".into(),
                },
                Symptom {
                    id: "S8".into(),
                    name: "Runny Nose".into(),
                    category: "Respiratory".into(),
                },
                Symptom {
                    id: "S9".into(),
                    name: "Chest Pain".into(),
                    category: "Cardiovascular".into(),
                },
                Symptom {
                    id: "S12".into(),
                    name: "Sneezing".into(),
                    category: "Allergy".into(),
                },
                Symptom {
                    id: "S13".into(),
                    name: "Headache".into(),
                    category: "General".into(),
                },
            ],
            vec![Disease {
                id: "D1".into(),
                name: "Common Cold".into(),
                description: String::new(),
                severity: Severity::Low,
            }],
            vec![Rule {
                id: "R1".into(),
                conclusion: "D1".into(),
                requirements: vec!["S8".into(), "S12".into()],
                optional: vec!["S7".into(), "S13".into()],
                exclusions: vec!["S1".into(), "S9".into()],
                description: "Cold needs runny nose and sneezing without fever.".into(),
            }],
        )
        .unwrap()
    }

    fn facts(ids: &[&str]) -> Vec<SymptomId> {
        ids.iter().map(|id| SymptomId::new(*id)).collect()
    }

    #[test]
    fn full_match_with_one_optional_scores_90() {
        let kb = small_kb();
        let results = forward_chain(&kb, &facts(&["S8", "S12", "S7"]));

        let r = &results[0];
        assert_eq!(r.match_count, 2);
        assert_eq!(r.missing_count, 0);
        assert_eq!(r.confidence, 90); // 0.8 + (1/2) * 0.2
        assert!(r.satisfied);
        assert!(r.conflicting.is_empty());
    }

    #[test]
    fn exclusion_suppresses_to_a_tenth() {
        let kb = small_kb();
        let results = forward_chain(&kb, &facts(&["S8", "S12", "S1"]));

        let r = &results[0];
        assert_eq!(r.conflicting, vec!["High Fever".to_string()]);
        assert_eq!(r.confidence, 8); // round(0.8 * 0.1 * 100)
        assert!(!r.satisfied);
        assert!(
            r.trace
                .iter()
                .any(|line| line.contains("invalidated by exclusion"))
        );
    }

    #[test]
    fn partial_match_scores_against_required_weight_only() {
        let kb = small_kb();
        let results = forward_chain(&kb, &facts(&["S8"]));

        let r = &results[0];
        assert_eq!(r.match_count, 1);
        assert_eq!(r.missing_count, 1);
        assert_eq!(r.confidence, 40); // (1/2) * 0.8
        assert_eq!(r.missing_required, vec!["Sneezing".to_string()]);
        assert!(!r.satisfied);
    }

    #[test]
    fn optional_matches_do_not_count_before_full_requirement_match() {
        let kb = small_kb();
        let results = forward_chain(&kb, &facts(&["S8", "S7", "S13"]));

        // Both optionals present, but one requirement missing: no bonus.
        assert_eq!(results[0].confidence, 40);
    }

    #[test]
    fn empty_fact_set_scores_zero() {
        let kb = small_kb();
        let results = forward_chain(&kb, &[]);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].confidence, 0);
        assert_eq!(results[0].match_count, 0);
        assert!(!results[0].satisfied);
    }

    #[test]
    fn trace_records_match_summary() {
        let kb = small_kb();
        let results = forward_chain(&kb, &facts(&["S8", "S12", "S7"]));

        let trace = &results[0].trace;
        assert!(
            trace
                .iter()
                .any(|line| line == "Checking requirements for Common Cold: 2/2 found.")
        );
        assert!(trace.iter().any(|line| line == "Bonus matches (optional): 1"));
    }

    #[test]
    fn reason_is_the_rule_description_verbatim() {
        let kb = small_kb();
        let results = forward_chain(&kb, &[]);
        assert_eq!(
            results[0].reason,
            "Cold needs runny nose and sneezing without fever."
        );
    }
}
