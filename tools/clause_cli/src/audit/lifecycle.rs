use crate::audit::digest::{analysis_id_for, sha256_hex};
use crate::audit::event::{Actor, AuditEvent, ANALYSIS_COMPLETED, ANALYSIS_STARTED, CATALOG_LOADED};
use crate::audit::log::AuditLog;
use clause_core::clauses::catalog::RuleCatalog;
use clause_core::clauses::model::{AnalysisResult, Locale};
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

pub fn emit_catalog_loaded(
    audit: &mut AuditLog,
    analysis_id: &str,
    catalog: &RuleCatalog,
    ts_utc: &str,
) -> anyhow::Result<()> {
    append(
        audit,
        CATALOG_LOADED,
        analysis_id,
        Actor::System,
        ts_utc,
        json!({
            "catalog_version": catalog.version(),
            "catalog_sha256": catalog.fingerprint(),
            "rule_count": catalog.len(),
        }),
    )
}

pub fn emit_analysis_started(
    audit: &mut AuditLog,
    analysis_id: &str,
    file_name: &str,
    text: &str,
    locale: Locale,
    ts_utc: &str,
) -> anyhow::Result<()> {
    append(
        audit,
        ANALYSIS_STARTED,
        analysis_id,
        Actor::User,
        ts_utc,
        json!({
            "file_name": file_name,
            "text_sha256": sha256_hex(text.as_bytes()),
            "locale": locale.tag(),
        }),
    )
}

pub fn emit_analysis_completed(
    audit: &mut AuditLog,
    analysis_id: &str,
    result: &AnalysisResult,
    ts_utc: &str,
) -> anyhow::Result<()> {
    let issue_types: Vec<&str> = result.issues.iter().map(|i| i.issue_type.as_str()).collect();
    append(
        audit,
        ANALYSIS_COMPLETED,
        analysis_id,
        Actor::System,
        ts_utc,
        json!({
            "overall_risk": result.overall_risk.as_str(),
            "risk_score": result.risk_score,
            "issue_count": result.issues.len(),
            "issue_types": issue_types,
        }),
    )
}

/// Records one finished analysis as `CATALOG_LOADED`, `ANALYSIS_STARTED`,
/// `ANALYSIS_COMPLETED`, all stamped with the result's analysis date.
/// Returns the analysis id the events were keyed by.
pub fn record_analysis(
    audit: &mut AuditLog,
    catalog: &RuleCatalog,
    locale: Locale,
    text: &str,
    result: &AnalysisResult,
) -> anyhow::Result<String> {
    let analysis_id = analysis_id_for(&result.file_name, text);
    let ts_utc = rfc3339_utc(result.analysis_date)?;
    emit_catalog_loaded(audit, &analysis_id, catalog, &ts_utc)?;
    emit_analysis_started(audit, &analysis_id, &result.file_name, text, locale, &ts_utc)?;
    emit_analysis_completed(audit, &analysis_id, result, &ts_utc)?;
    Ok(analysis_id)
}

pub fn rfc3339_utc(ts: OffsetDateTime) -> anyhow::Result<String> {
    Ok(ts.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

fn append(
    audit: &mut AuditLog,
    event_type: &str,
    analysis_id: &str,
    actor: Actor,
    ts_utc: &str,
    details: Value,
) -> anyhow::Result<()> {
    audit.append(AuditEvent {
        ts_utc: ts_utc.to_string(),
        event_type: event_type.to_string(),
        analysis_id: analysis_id.to_string(),
        actor,
        details,
        prev_event_hash: String::new(),
        event_hash: String::new(),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::event::ZERO_HASH_64;
    use clause_core::clauses::analyzer::{AnalyzerConfig, ClauseAnalyzer};
    use time::macros::datetime;

    fn record(audit: &mut AuditLog, text: &str, file_name: &str, locale: Locale) -> String {
        let analyzer = ClauseAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let result = analyzer.analyze_at(text, file_name, datetime!(2026-02-10 12:00:00 UTC));
        record_analysis(audit, analyzer.catalog(), locale, text, &result).unwrap()
    }

    fn lines(path: &std::path::Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn recorded_analysis_forms_a_verifiable_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("analysis.ndjson");
        let text = "The vendor accepts unlimited liability.";

        let mut audit = AuditLog::open_or_create(&path).unwrap();
        let id = record(&mut audit, text, "vendor.txt", Locale::En);
        assert_eq!(id, analysis_id_for("vendor.txt", text));
        assert_eq!(AuditLog::verify_chain(audit.path()).unwrap(), 3);

        let lines = lines(&path);
        assert_eq!(lines[0]["event_type"], "CATALOG_LOADED");
        assert_eq!(lines[0]["prev_event_hash"], ZERO_HASH_64);
        assert_eq!(lines[0]["details"]["rule_count"], 16);
        assert_eq!(lines[1]["event_type"], "ANALYSIS_STARTED");
        assert_eq!(lines[1]["prev_event_hash"], lines[0]["event_hash"]);
        assert_eq!(lines[1]["actor"], "user");
        assert_eq!(lines[2]["event_type"], "ANALYSIS_COMPLETED");
        assert_eq!(lines[2]["details"]["risk_score"], 17);
        assert_eq!(lines[2]["details"]["issue_types"][0], "Liability Risk");
        assert_eq!(lines[2]["ts_utc"], "2026-02-10T12:00:00Z");
    }

    #[test]
    fn reopened_log_continues_the_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.ndjson");

        let mut audit = AuditLog::open_or_create(&path).unwrap();
        record(&mut audit, "force majeure", "a.txt", Locale::En);
        let tail = audit.last_hash().to_string();
        drop(audit);

        let mut audit = AuditLog::open_or_create(&path).unwrap();
        assert_eq!(audit.last_hash(), tail);
        record(&mut audit, "governing law", "b.txt", Locale::Hi);
        assert_eq!(AuditLog::verify_chain(&path).unwrap(), 6);
        assert_eq!(lines(&path)[3]["prev_event_hash"], tail.as_str());
    }

    #[test]
    fn tampered_log_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.ndjson");
        let mut audit = AuditLog::open_or_create(&path).unwrap();
        record(&mut audit, "unlimited liability", "c.txt", Locale::En);

        let original = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, original.replace("\"risk_score\":17", "\"risk_score\":3")).unwrap();
        let err = AuditLog::verify_chain(&path).unwrap_err();
        assert!(err.to_string().contains("event 2: event_hash mismatch"));
    }

    #[test]
    fn removed_event_breaks_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.ndjson");
        let mut audit = AuditLog::open_or_create(&path).unwrap();
        record(&mut audit, "unlimited liability", "c.txt", Locale::En);

        let original = std::fs::read_to_string(&path).unwrap();
        let kept: Vec<&str> = original
            .lines()
            .enumerate()
            .filter(|(i, _)| *i != 1)
            .map(|(_, l)| l)
            .collect();
        std::fs::write(&path, kept.join("\n")).unwrap();
        let err = AuditLog::verify_chain(&path).unwrap_err();
        assert!(err.to_string().contains("event 1: prev_event_hash mismatch"));
    }
}
