//! Rule inference: forward chaining, goal lookup, and uncertainty analysis.
//!
//! The evaluation is a pure function of `(KnowledgeBase, facts)` — no state
//! accumulates across calls, no randomness, no I/O. Every rule in the
//! knowledge base produces exactly one [`DiagnosticResult`] per evaluation.

use serde::{Deserialize, Serialize};

use crate::kb::DiseaseId;

pub mod forward;
pub mod goal;
pub mod uncertainty;

pub use forward::forward_chain;
pub use goal::goal_lookup;
pub use uncertainty::{UncertaintyReport, analyze_uncertainty};

// ---------------------------------------------------------------------------
// Scoring constants
// ---------------------------------------------------------------------------

/// Share of confidence earned by matching required symptoms.
pub const REQUIRED_WEIGHT: f64 = 0.8;

/// Share of confidence earned by matching optional symptoms, awarded only
/// once every requirement matched.
pub const OPTIONAL_WEIGHT: f64 = 0.2;

/// Multiplier applied when any exclusion symptom is observed. Suppresses the
/// score heavily without forcing it to exactly zero.
pub const EXCLUSION_PENALTY: f64 = 0.1;

/// Maximum confidence-point gap between the top two results for them to be
/// reported as ambiguous.
pub const AMBIGUITY_GAP: u8 = 15;

// ---------------------------------------------------------------------------
// Diagnostic result
// ---------------------------------------------------------------------------

/// The outcome of evaluating one rule against one fact set.
///
/// Recomputed on every evaluation, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    /// The disease the evaluated rule concludes.
    pub disease_id: DiseaseId,
    pub disease_name: String,
    /// Integer confidence in `[0, 100]`.
    pub confidence: u8,
    /// Number of required symptoms observed.
    pub match_count: usize,
    /// Number of required symptoms absent.
    pub missing_count: usize,
    /// True iff every requirement matched and no exclusion fired.
    pub satisfied: bool,
    /// Names of observed symptoms that contradict the rule.
    pub conflicting: Vec<String>,
    /// Names of required symptoms that were not observed, in rule order.
    pub missing_required: Vec<String>,
    /// Ordered human-readable record of the reasoning steps taken.
    pub trace: Vec<String>,
    /// The rule's authored description, verbatim.
    pub reason: String,
}
