use crate::audit::digest::{canonical_bytes, sha256_hex};
use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
    User,
}

/// One line of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts_utc: String, // RFC3339 UTC
    pub event_type: String,
    pub analysis_id: String,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub prev_event_hash: String,
    pub event_hash: String,
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

pub const CATALOG_LOADED: &str = "CATALOG_LOADED";
pub const ANALYSIS_STARTED: &str = "ANALYSIS_STARTED";
pub const ANALYSIS_COMPLETED: &str = "ANALYSIS_COMPLETED";

impl AuditEvent {
    /// SHA-256 over the canonical envelope with `event_hash` zeroed.
    pub fn compute_hash(&self) -> anyhow::Result<String> {
        let mut unsigned = self.clone();
        unsigned.event_hash = ZERO_HASH_64.to_string();
        Ok(sha256_hex(&canonical_bytes(&unsigned)?))
    }

    /// Checks the link and detail keys, then stamps `event_hash`.
    pub fn seal(mut self) -> anyhow::Result<Self> {
        if !is_hex64(&self.prev_event_hash) {
            bail!("prev_event_hash must be 64 hex chars");
        }
        let required = required_detail_keys(&self.event_type)
            .ok_or_else(|| anyhow!("unknown event_type {}", self.event_type))?;
        if let Some(key) = required.iter().find(|k| self.details.get(**k).is_none()) {
            bail!("event {} missing details.{}", self.event_type, key);
        }
        self.event_hash = self.compute_hash()?;
        Ok(self)
    }
}

pub fn is_hex64(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn required_detail_keys(event_type: &str) -> Option<&'static [&'static str]> {
    match event_type {
        CATALOG_LOADED => Some(&["catalog_version", "catalog_sha256", "rule_count"]),
        ANALYSIS_STARTED => Some(&["file_name", "text_sha256", "locale"]),
        ANALYSIS_COMPLETED => Some(&["overall_risk", "risk_score", "issue_count", "issue_types"]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn started() -> AuditEvent {
        AuditEvent {
            ts_utc: "2026-02-10T00:00:00Z".to_string(),
            event_type: ANALYSIS_STARTED.to_string(),
            analysis_id: "an_aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            actor: Actor::User,
            details: json!({"file_name": "msa.txt", "text_sha256": "ab", "locale": "en"}),
            prev_event_hash: ZERO_HASH_64.to_string(),
            event_hash: String::new(),
        }
    }

    #[test]
    fn sealed_hash_is_stable() {
        let a = started().seal().unwrap().event_hash;
        let b = started().seal().unwrap().event_hash;
        assert_eq!(a, b);
        assert!(is_hex64(&a));
    }

    #[test]
    fn hash_covers_details() {
        let mut other = started();
        other.details["locale"] = json!("hi");
        assert_ne!(
            started().seal().unwrap().event_hash,
            other.seal().unwrap().event_hash
        );
    }

    #[test]
    fn unknown_event_type_is_rejected() {
        let mut ev = started();
        ev.event_type = "RUN_CREATED".to_string();
        let err = ev.seal().unwrap_err();
        assert!(err.to_string().contains("unknown event_type RUN_CREATED"));
    }

    #[test]
    fn missing_detail_key_is_rejected() {
        let mut ev = started();
        ev.details = json!({"file_name": "msa.txt"});
        let err = ev.seal().unwrap_err();
        assert!(err.to_string().contains("missing details.text_sha256"));
    }

    #[test]
    fn malformed_link_is_rejected() {
        let mut ev = started();
        ev.prev_event_hash = "abc".to_string();
        assert!(ev.seal().is_err());
    }

    #[test]
    fn float_details_break_hashing() {
        let mut ev = started();
        ev.details["weight"] = json!(0.5);
        assert!(ev.seal().is_err());
    }
}
