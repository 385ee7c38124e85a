//! # sekhmet
//!
//! A symbolic diagnostic engine: weighted implication rules evaluated against
//! observed boolean facts, producing ranked conclusions with justification
//! traces and a structured uncertainty report.
//!
//! ## Architecture
//!
//! - **Knowledge packs** (`kb`): TOML-defined symptom/disease/rule catalogues,
//!   validated at load, immutable afterwards
//! - **Inference** (`infer`): forward chaining with a two-stage confidence
//!   formula, goal lookup, and uncertainty classification
//! - **Engine facade** (`engine`): the public evaluate / goal / analyze API
//! - **Explain** (`explain`): optional external text-generation summaries,
//!   degrading to a fixed fallback
//!
//! ## Library usage
//!
//! ```no_run
//! use sekhmet::engine::Engine;
//! use sekhmet::kb::KnowledgeBase;
//!
//! let engine = Engine::new(KnowledgeBase::bundled().unwrap());
//! let facts = vec!["S8".into(), "S12".into()];
//! let results = engine.evaluate(&facts);
//! let report = engine.analyze_uncertainty(&results, &facts);
//! println!("{} ({}%)", results[0].disease_name, results[0].confidence);
//! assert!(report.noise.is_empty());
//! ```

pub mod engine;
pub mod error;
pub mod explain;
pub mod infer;
pub mod kb;
