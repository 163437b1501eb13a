mod audit;

use anyhow::Context;
use audit::lifecycle::record_analysis;
use audit::log::AuditLog;
use clap::{Parser, Subcommand, ValueEnum};
use clause_core::clauses::analyzer::{AnalyzerConfig, ClauseAnalyzer};
use clause_core::clauses::catalog::{default_catalog, RuleCatalog};
use clause_core::clauses::detection::SectionHintMode;
use clause_core::clauses::model::{Locale, RiskSeverity};
use clause_core::clauses::samples::{DocumentKind, GENERIC_SAMPLE};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "clause_analyzer", version, about = "Rule-based contract clause risk analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a contract file and print the result as JSON.
    Analyze(AnalyzeArgs),
    /// Print the rule catalog as JSON.
    Rules(RulesArgs),
    /// Check the hash chain of an audit log written by `analyze --audit-log`.
    VerifyAudit(VerifyAuditArgs),
}

#[derive(Debug, clap::Args)]
struct AnalyzeArgs {
    /// Contract file. PDF, word-processor and RTF files are not decoded; a
    /// bundled sample agreement is analyzed in their place.
    file: PathBuf,
    #[arg(long, value_enum)]
    locale: Option<LocaleArg>,
    /// Replacement rule catalog (JSON).
    #[arg(long, env = "CLAUSE_CATALOG")]
    catalog: Option<PathBuf>,
    /// Analyzer config (JSON). Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Report the line of each match instead of a synthetic section label.
    #[arg(long)]
    located_sections: bool,
    /// Seed for synthetic section labels.
    #[arg(long)]
    seed: Option<u64>,
    /// Append hash-chained audit events to this NDJSON file.
    #[arg(long, env = "CLAUSE_AUDIT_LOG")]
    audit_log: Option<PathBuf>,
    /// Print compact JSON.
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, clap::Args)]
struct RulesArgs {
    #[arg(long, env = "CLAUSE_CATALOG")]
    catalog: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "en")]
    locale: LocaleArg,
}

#[derive(Debug, clap::Args)]
struct VerifyAuditArgs {
    audit_log: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LocaleArg {
    En,
    Hi,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Hi => Locale::Hi,
        }
    }
}

#[derive(Debug, Serialize)]
struct RuleListing<'a> {
    severity: RiskSeverity,
    rule_type: &'a str,
    pattern: &'a str,
    description: &'a str,
    recommendation: &'a str,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();
    let outcome = match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Rules(args) => run_rules(args),
        Command::VerifyAudit(args) => run_verify_audit(&args),
    };
    if let Err(e) = outcome {
        eprintln!("clause_analyzer: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let owned_catalog = load_catalog(args.catalog.as_deref())?;
    let catalog = match &owned_catalog {
        Some(c) => c,
        None => default_catalog().context("loading embedded catalog")?,
    };
    let analyzer = ClauseAnalyzer::with_catalog(catalog, config)?;

    let text = load_contract_text(&args.file)?;
    let file_name = display_name(&args.file);
    let result = analyzer.analyze(&text, &file_name);

    if let Some(path) = &args.audit_log {
        let mut audit = AuditLog::open_or_create(path)
            .with_context(|| format!("opening audit log {}", path.display()))?;
        let locale = analyzer.config().locale;
        let analysis_id = record_analysis(&mut audit, catalog, locale, &text, &result)?;
        tracing::info!(
            %analysis_id,
            audit_log = %audit.path().display(),
            chain_head = audit.last_hash(),
            "analysis recorded"
        );
    }

    let json = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", json);
    Ok(())
}

fn run_rules(args: RulesArgs) -> anyhow::Result<()> {
    let owned_catalog = load_catalog(args.catalog.as_deref())?;
    let catalog = match &owned_catalog {
        Some(c) => c,
        None => default_catalog().context("loading embedded catalog")?,
    };
    let locale = Locale::from(args.locale).tag();
    let copy = catalog.copy();
    let listing: Vec<RuleListing> = catalog
        .rules()
        .iter()
        .map(|rule| RuleListing {
            severity: rule.severity(),
            rule_type: rule.rule_type(),
            pattern: rule.pattern(),
            description: copy.description(locale, rule.rule_type()),
            recommendation: copy.recommendation(locale, rule.rule_type()),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

fn run_verify_audit(args: &VerifyAuditArgs) -> anyhow::Result<()> {
    let events = AuditLog::verify_chain(&args.audit_log)
        .with_context(|| format!("verifying {}", args.audit_log.display()))?;
    println!("{}", serde_json::json!({ "auditLog": args.audit_log, "eventsVerified": events }));
    Ok(())
}

fn resolve_config(args: &AnalyzeArgs) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if let Some(locale) = args.locale {
        config.locale = locale.into();
    }
    if args.located_sections {
        config.section_hints = SectionHintMode::Located;
    }
    if args.seed.is_some() {
        config.section_seed = args.seed;
    }
    Ok(config)
}

fn load_catalog(path: Option<&Path>) -> anyhow::Result<Option<RuleCatalog>> {
    path.map(|p| {
        RuleCatalog::from_path(p).with_context(|| format!("loading catalog {}", p.display()))
    })
    .transpose()
}

/// Reads the contract as UTF-8 text, substituting a bundled sample for
/// formats this tool does not decode.
fn load_contract_text(path: &Path) -> anyhow::Result<String> {
    let kind = DocumentKind::from_file_name(&path.to_string_lossy());
    if let Some(sample) = kind.placeholder_text() {
        tracing::warn!(
            file = %path.display(),
            ?kind,
            "binary document not decoded; analyzing bundled sample text"
        );
        return Ok(sample.to_string());
    }
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(_) => {
            tracing::warn!(file = %path.display(), "input is not UTF-8; analyzing generic sample text");
            Ok(GENERIC_SAMPLE.to_string())
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
