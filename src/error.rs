//! Rich diagnostic error types for the sekhmet engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know exactly what went wrong
//! and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the sekhmet engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SekhmetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Kb(#[from] KbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Explain(#[from] ExplainError),
}

// ---------------------------------------------------------------------------
// Knowledge base errors
// ---------------------------------------------------------------------------

/// Errors raised while loading or validating a knowledge base.
///
/// All of these are configuration errors: the engine refuses to construct on
/// a malformed knowledge base rather than produce silently wrong confidence
/// scores later.
#[derive(Debug, Error, Diagnostic)]
pub enum KbError {
    #[error("failed to read knowledge pack: {path}")]
    #[diagnostic(
        code(sekhmet::kb::io),
        help("Ensure the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse knowledge pack \"{path}\": {message}")]
    #[diagnostic(
        code(sekhmet::kb::parse),
        help("Check the pack's TOML syntax against the bundled `respiratory` pack.")
    )]
    Parse { path: String, message: String },

    #[error("rule {rule_id} references unknown symptom {symptom_id}")]
    #[diagnostic(
        code(sekhmet::kb::unknown_symptom),
        help(
            "Every id in a rule's requirements, optional, and exclusions lists \
             must be declared in the pack's [[symptoms]] tables."
        )
    )]
    UnknownSymptom { rule_id: String, symptom_id: String },

    #[error("rule {rule_id} concludes unknown disease {disease_id}")]
    #[diagnostic(
        code(sekhmet::kb::unknown_disease),
        help("A rule's conclusion must be declared in the pack's [[diseases]] tables.")
    )]
    UnknownDisease { rule_id: String, disease_id: String },

    #[error("rule {rule_id} has no requirements")]
    #[diagnostic(
        code(sekhmet::kb::empty_requirements),
        help(
            "Confidence is scored against the requirement count, so a rule must \
             require at least one symptom. Add a requirement or remove the rule."
        )
    )]
    EmptyRequirements { rule_id: String },

    #[error("duplicate {kind} id: {id}")]
    #[diagnostic(
        code(sekhmet::kb::duplicate_id),
        help("Symptom, disease, and rule ids must each be unique within a pack.")
    )]
    DuplicateId { kind: &'static str, id: String },
}

// ---------------------------------------------------------------------------
// Explanation service errors
// ---------------------------------------------------------------------------

/// Errors from the optional external explanation service.
///
/// These never reach the diagnostic pipeline: the explain layer catches them
/// locally and substitutes a fixed fallback message. They exist so failures
/// can still be logged with a precise cause.
#[derive(Debug, Error, Diagnostic)]
pub enum ExplainError {
    #[error("no explanation endpoint configured")]
    #[diagnostic(
        code(sekhmet::explain::no_endpoint),
        help("Set SEKHMET_EXPLAIN_URL or pass --explain-url to enable explanations.")
    )]
    NoEndpoint,

    #[error("explanation request failed: {message}")]
    #[diagnostic(
        code(sekhmet::explain::http),
        help("The explanation service could not be reached. Check the endpoint URL.")
    )]
    Http { message: String },

    #[error("explanation service returned status {status}")]
    #[diagnostic(
        code(sekhmet::explain::status),
        help("The explanation service rejected the request.")
    )]
    Status { status: u16 },

    #[error("malformed explanation response: {message}")]
    #[diagnostic(
        code(sekhmet::explain::body),
        help("Expected a JSON body with a `text` field.")
    )]
    Body { message: String },
}

/// Convenience alias for functions returning sekhmet results.
pub type SekhmetResult<T> = std::result::Result<T, SekhmetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_error_converts_to_sekhmet_error() {
        let err = KbError::EmptyRequirements {
            rule_id: "R9".into(),
        };
        let top: SekhmetError = err.into();
        assert!(matches!(
            top,
            SekhmetError::Kb(KbError::EmptyRequirements { .. })
        ));
    }

    #[test]
    fn explain_error_converts_to_sekhmet_error() {
        let err = ExplainError::Status { status: 502 };
        let top: SekhmetError = err.into();
        assert!(matches!(
            top,
            SekhmetError::Explain(ExplainError::Status { status: 502 })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = KbError::UnknownSymptom {
            rule_id: "R1".into(),
            symptom_id: "S99".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("R1"));
        assert!(msg.contains("S99"));
    }
}
