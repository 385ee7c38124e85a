//! Knowledge packs: the symptom/disease/rule catalogue the engine evaluates.
//!
//! A knowledge pack is a TOML-defined bundle of symptoms, diseases, and
//! weighted implication rules. One pack (`respiratory`) is bundled into the
//! binary; external packs can be loaded from disk. Packs are validated on
//! construction and immutable afterwards — the engine never mutates them and
//! every lookup goes through indexes built once at load time.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::KbError;

pub type KbResult<T> = std::result::Result<T, KbError>;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a symptom (an atomic observed boolean fact).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomId(String);

/// Identifier of a disease (a candidate conclusion).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiseaseId(String);

/// Identifier of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(String);

macro_rules! impl_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }
    };
}

impl_id!(SymptomId);
impl_id!(DiseaseId);
impl_id!(RuleId);

// ---------------------------------------------------------------------------
// Catalogue entries
// ---------------------------------------------------------------------------

/// An atomic observed condition, identified by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub id: SymptomId,
    /// Human-readable name, used in traces and reports.
    pub name: String,
    /// Coarse grouping for display (e.g. "Respiratory").
    pub category: String,
}

/// How serious a disease is if confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A candidate conclusion that rules evaluate evidence toward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: DiseaseId,
    pub name: String,
    pub description: String,
    pub severity: Severity,
}

/// A weighted implication: required evidence, optional supporting evidence,
/// and disqualifying evidence, tied to one conclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    /// The disease this rule concludes.
    pub conclusion: DiseaseId,
    /// Symptoms that must all be present for a full match. Never empty.
    pub requirements: Vec<SymptomId>,
    /// Symptoms that raise confidence above the full-match floor.
    #[serde(default)]
    pub optional: Vec<SymptomId>,
    /// Symptoms that, if present, contradict this rule.
    #[serde(default)]
    pub exclusions: Vec<SymptomId>,
    /// Authored justification, reported verbatim as the result's `reason`.
    pub description: String,
}

/// Metadata block of a knowledge pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbMeta {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// Knowledge base
// ---------------------------------------------------------------------------

/// A validated, immutable knowledge base.
///
/// Construction checks every invariant the confidence math depends on:
/// rule references resolve, requirement lists are non-empty, ids are unique.
/// Lookups by id go through indexes built once here, not linear scans.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    meta: KbMeta,
    symptoms: Vec<Symptom>,
    diseases: Vec<Disease>,
    rules: Vec<Rule>,
    symptom_index: HashMap<SymptomId, usize>,
    disease_index: HashMap<DiseaseId, usize>,
}

/// Raw TOML shape of a knowledge pack.
#[derive(Debug, Deserialize)]
struct PackToml {
    kb: KbMeta,
    #[serde(default)]
    symptoms: Vec<Symptom>,
    #[serde(default)]
    diseases: Vec<Disease>,
    #[serde(default)]
    rules: Vec<Rule>,
}

const RESPIRATORY_TOML: &str = include_str!("../data/kb/respiratory.toml");

impl KnowledgeBase {
    /// Build and validate a knowledge base from its parts.
    pub fn new(
        meta: KbMeta,
        symptoms: Vec<Symptom>,
        diseases: Vec<Disease>,
        rules: Vec<Rule>,
    ) -> KbResult<Self> {
        let mut symptom_index = HashMap::with_capacity(symptoms.len());
        for (i, s) in symptoms.iter().enumerate() {
            if symptom_index.insert(s.id.clone(), i).is_some() {
                return Err(KbError::DuplicateId {
                    kind: "symptom",
                    id: s.id.to_string(),
                });
            }
        }

        let mut disease_index = HashMap::with_capacity(diseases.len());
        for (i, d) in diseases.iter().enumerate() {
            if disease_index.insert(d.id.clone(), i).is_some() {
                return Err(KbError::DuplicateId {
                    kind: "disease",
                    id: d.id.to_string(),
                });
            }
        }

        let mut rule_ids = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !rule_ids.insert(rule.id.clone()) {
                return Err(KbError::DuplicateId {
                    kind: "rule",
                    id: rule.id.to_string(),
                });
            }
            if rule.requirements.is_empty() {
                return Err(KbError::EmptyRequirements {
                    rule_id: rule.id.to_string(),
                });
            }
            if !disease_index.contains_key(&rule.conclusion) {
                return Err(KbError::UnknownDisease {
                    rule_id: rule.id.to_string(),
                    disease_id: rule.conclusion.to_string(),
                });
            }
            for sid in rule
                .requirements
                .iter()
                .chain(&rule.optional)
                .chain(&rule.exclusions)
            {
                if !symptom_index.contains_key(sid) {
                    return Err(KbError::UnknownSymptom {
                        rule_id: rule.id.to_string(),
                        symptom_id: sid.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            meta,
            symptoms,
            diseases,
            rules,
            symptom_index,
            disease_index,
        })
    }

    /// Parse and validate a knowledge pack from a TOML string.
    ///
    /// `origin` is used in error messages (a path, or `"(bundled)"`).
    pub fn from_toml_str(toml_str: &str, origin: &str) -> KbResult<Self> {
        let parsed: PackToml = toml::from_str(toml_str).map_err(|e| KbError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Self::new(parsed.kb, parsed.symptoms, parsed.diseases, parsed.rules)
    }

    /// Load a knowledge pack from a TOML file on disk.
    pub fn from_path(path: &Path) -> KbResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| KbError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// The knowledge pack bundled into the binary.
    pub fn bundled() -> KbResult<Self> {
        Self::from_toml_str(RESPIRATORY_TOML, "(bundled)")
    }

    pub fn meta(&self) -> &KbMeta {
        &self.meta
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn diseases(&self) -> &[Disease] {
        &self.diseases
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Look up a symptom by id.
    pub fn symptom(&self, id: &SymptomId) -> Option<&Symptom> {
        self.symptom_index.get(id).map(|&i| &self.symptoms[i])
    }

    /// Look up a disease by id.
    pub fn disease(&self, id: &DiseaseId) -> Option<&Disease> {
        self.disease_index.get(id).map(|&i| &self.diseases[i])
    }

    /// Resolve a symptom id to its display name, falling back to the raw id
    /// when the symptom is not in the catalogue.
    pub fn symptom_name(&self, id: &SymptomId) -> String {
        self.symptom(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// All symptom ids that appear in any rule's requirements or optional
    /// list. Facts outside this set are noise: no rule can use them.
    /// Exclusion-only appearances do not count as relevant.
    pub fn relevant_symptoms(&self) -> HashSet<&SymptomId> {
        let mut relevant = HashSet::new();
        for rule in &self.rules {
            relevant.extend(rule.requirements.iter());
            relevant.extend(rule.optional.iter());
        }
        relevant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> KbMeta {
        KbMeta {
            id: "test".into(),
            name: "Test".into(),
            version: "0.0.0".into(),
            description: "test pack".into(),
        }
    }

    fn symptom(id: &str, name: &str) -> Symptom {
        Symptom {
            id: id.into(),
            name: name.into(),
            category: "General".into(),
        }
    }

    fn disease(id: &str, name: &str) -> Disease {
        Disease {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            severity: Severity::Low,
        }
    }

    #[test]
    fn bundled_pack_is_valid() {
        let kb = KnowledgeBase::bundled().unwrap();
        assert_eq!(kb.meta().id, "respiratory");
        assert_eq!(kb.symptoms().len(), 14);
        assert_eq!(kb.diseases().len(), 5);
        assert_eq!(kb.rules().len(), 5);
    }

    #[test]
    fn rejects_rule_without_requirements() {
        let err = KnowledgeBase::new(
            meta(),
            vec![symptom("S1", "Fever")],
            vec![disease("D1", "Cold")],
            vec![Rule {
                id: "R1".into(),
                conclusion: "D1".into(),
                requirements: vec![],
                optional: vec![],
                exclusions: vec![],
                description: String::new(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, KbError::EmptyRequirements { .. }));
    }

    #[test]
    fn rejects_unknown_symptom_reference() {
        let err = KnowledgeBase::new(
            meta(),
            vec![symptom("S1", "Fever")],
            vec![disease("D1", "Cold")],
            vec![Rule {
                id: "R1".into(),
                conclusion: "D1".into(),
                requirements: vec!["S1".into()],
                optional: vec![],
                exclusions: vec!["S404".into()],
                description: String::new(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, KbError::UnknownSymptom { .. }));
    }

    #[test]
    fn rejects_unknown_conclusion() {
        let err = KnowledgeBase::new(
            meta(),
            vec![symptom("S1", "Fever")],
            vec![],
            vec![Rule {
                id: "R1".into(),
                conclusion: "D404".into(),
                requirements: vec!["S1".into()],
                optional: vec![],
                exclusions: vec![],
                description: String::new(),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, KbError::UnknownDisease { .. }));
    }

    #[test]
    fn rejects_duplicate_symptom_id() {
        let err = KnowledgeBase::new(
            meta(),
            vec![symptom("S1", "Fever"), symptom("S1", "Fever again")],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, KbError::DuplicateId { kind: "symptom", .. }));
    }

    #[test]
    fn symptom_name_falls_back_to_raw_id() {
        let kb = KnowledgeBase::new(meta(), vec![symptom("S1", "Fever")], vec![], vec![]).unwrap();
        assert_eq!(kb.symptom_name(&"S1".into()), "Fever");
        assert_eq!(kb.symptom_name(&"S404".into()), "S404");
    }

    #[test]
    fn relevant_symptoms_ignores_exclusion_only_entries() {
        let kb = KnowledgeBase::new(
            meta(),
            vec![
                symptom("S1", "Fever"),
                symptom("S2", "Cough"),
                symptom("S3", "Rash"),
            ],
            vec![disease("D1", "Cold")],
            vec![Rule {
                id: "R1".into(),
                conclusion: "D1".into(),
                requirements: vec!["S1".into()],
                optional: vec!["S2".into()],
                exclusions: vec!["S3".into()],
                description: String::new(),
            }],
        )
        .unwrap();

        let relevant = kb.relevant_symptoms();
        assert!(relevant.contains(&SymptomId::new("S1")));
        assert!(relevant.contains(&SymptomId::new("S2")));
        assert!(!relevant.contains(&SymptomId::new("S3")));
    }
}
