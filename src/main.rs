//! sekhmet CLI: symbolic diagnostic engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use sekhmet::engine::Engine;
use sekhmet::explain;
use sekhmet::infer::{DiagnosticResult, UncertaintyReport};
use sekhmet::kb::{KnowledgeBase, SymptomId};

#[derive(Parser)]
#[command(name = "sekhmet", version, about = "Symbolic diagnostic engine")]
struct Cli {
    /// Path to a knowledge pack (TOML). Defaults to the bundled pack.
    #[arg(long, global = true)]
    kb: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate observed facts against every rule and rank the conclusions.
    Evaluate {
        /// Observed symptom ids (comma-separated, e.g. "S8,S12,S7").
        #[arg(long, default_value = "")]
        facts: String,

        /// Limit output to the top N conclusions.
        #[arg(long)]
        top: Option<usize>,

        /// Emit results and the uncertainty report as JSON.
        #[arg(long)]
        json: bool,

        /// Request a natural-language summary from the explanation service.
        #[arg(long)]
        explain: bool,

        /// Explanation service endpoint (overrides SEKHMET_EXPLAIN_URL).
        #[arg(long)]
        explain_url: Option<String>,
    },

    /// Evaluate only the rule concluding the given disease.
    Goal {
        /// Target disease id (e.g. "D3").
        disease: String,

        /// Observed symptom ids (comma-separated).
        #[arg(long, default_value = "")]
        facts: String,

        /// Emit the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Inspect the loaded knowledge pack.
    Kb {
        #[command(subcommand)]
        action: KbAction,
    },

    /// Show engine info and statistics.
    Info,
}

#[derive(Subcommand)]
enum KbAction {
    /// List all symptoms.
    Symptoms,
    /// List all diseases.
    Diseases,
    /// List all rules.
    Rules,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let kb = match &cli.kb {
        Some(path) => KnowledgeBase::from_path(path)?,
        None => KnowledgeBase::bundled()?,
    };
    let engine = Engine::new(kb);

    match cli.command {
        Commands::Evaluate {
            facts,
            top,
            json,
            explain: want_explanation,
            explain_url,
        } => {
            let facts = parse_facts(&facts);
            let results = engine.evaluate(&facts);
            let report = engine.analyze_uncertainty(&results, &facts);
            let shown = top.unwrap_or(results.len()).min(results.len());

            if json {
                let payload = serde_json::json!({
                    "results": &results[..shown],
                    "uncertainty": &report,
                });
                println!("{}", serde_json::to_string_pretty(&payload).into_diagnostic()?);
            } else {
                print_results(&results[..shown]);
                print_uncertainty(&report);
            }

            if want_explanation {
                let endpoint = explain_url.or_else(|| std::env::var("SEKHMET_EXPLAIN_URL").ok());
                let summary =
                    explain::explain(endpoint.as_deref(), engine.kb(), &facts, &results, &report);
                println!("\nSummary:\n{summary}");
            }
        }

        Commands::Goal {
            disease,
            facts,
            json,
        } => {
            let facts = parse_facts(&facts);
            match engine.evaluate_goal(&disease.as_str().into(), &facts) {
                Some(result) => {
                    if json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&result).into_diagnostic()?
                        );
                    } else {
                        print_results(std::slice::from_ref(&result));
                    }
                }
                None => println!("No rule concludes disease \"{disease}\"."),
            }
        }

        Commands::Kb { action } => match action {
            KbAction::Symptoms => {
                for s in engine.kb().symptoms() {
                    println!("{:<6} {:<24} [{}]", s.id.as_str(), s.name, s.category);
                }
            }
            KbAction::Diseases => {
                for d in engine.kb().diseases() {
                    println!("{:<6} {:<24} severity: {}", d.id.as_str(), d.name, d.severity);
                }
            }
            KbAction::Rules => {
                for r in engine.kb().rules() {
                    println!("{} -> {}", r.id, r.conclusion);
                    println!("  requires:   {}", join_ids(&r.requirements));
                    if !r.optional.is_empty() {
                        println!("  optional:   {}", join_ids(&r.optional));
                    }
                    if !r.exclusions.is_empty() {
                        println!("  exclusions: {}", join_ids(&r.exclusions));
                    }
                    println!("  {}", r.description);
                }
            }
        },

        Commands::Info => {
            let info = engine.info();
            println!("knowledge pack: {} ({} v{})", info.kb_name, info.kb_id, info.kb_version);
            println!("symptoms: {}", info.symptoms);
            println!("diseases: {}", info.diseases);
            println!("rules:    {}", info.rules);
        }
    }

    Ok(())
}

fn parse_facts(raw: &str) -> Vec<SymptomId> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SymptomId::from)
        .collect()
}

fn join_ids(ids: &[SymptomId]) -> String {
    ids.iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_results(results: &[DiagnosticResult]) {
    for (rank, r) in results.iter().enumerate() {
        let marker = if r.satisfied { "✓" } else { " " };
        println!(
            "{:>2}. {marker} {:<24} {:>3}%  ({}/{} required)",
            rank + 1,
            r.disease_name,
            r.confidence,
            r.match_count,
            r.match_count + r.missing_count,
        );
        for line in &r.trace {
            println!("       {line}");
        }
    }
}

fn print_uncertainty(report: &UncertaintyReport) {
    if report.is_clear() {
        println!("\nNo uncertainty conditions detected.");
        return;
    }

    println!("\nUncertainty:");
    if !report.noise.is_empty() {
        println!("  noise (no rule uses these): {}", report.noise.join(", "));
    }
    if !report.conflicting.is_empty() {
        for r in &report.conflicting {
            println!(
                "  conflict: {} inhibited by {}",
                r.disease_name,
                r.conflicting.join(", ")
            );
        }
    }
    if !report.incomplete.is_empty() {
        for r in &report.incomplete {
            println!(
                "  incomplete: {} missing {}",
                r.disease_name,
                r.missing_required.join(", ")
            );
        }
    }
    if !report.ambiguous.is_empty() {
        println!(
            "  ambiguous: {} ({}%) vs {} ({}%)",
            report.ambiguous[0].disease_name,
            report.ambiguous[0].confidence,
            report.ambiguous[1].disease_name,
            report.ambiguous[1].confidence,
        );
    }
}
