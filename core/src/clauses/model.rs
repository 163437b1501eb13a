use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Severity tier of a clause rule and of the issues it produces.
///
/// Declaration order is the scoring order: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    /// Contribution of one issue of this severity to the raw risk sum.
    pub fn weight(self) -> u32 {
        match self {
            RiskSeverity::High => 30,
            RiskSeverity::Medium => 15,
            RiskSeverity::Low => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskSeverity::High => "High",
            RiskSeverity::Medium => "Medium",
            RiskSeverity::Low => "Low",
        }
    }
}

/// Locales with localized issue copy. `En` is the base locale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Hi,
}

impl Locale {
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Locale> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Locale::En),
            "hi" => Some(Locale::Hi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContractIssue {
    #[serde(rename = "type")]
    pub issue_type: String,
    pub description: String,
    /// Location hint. Synthetic unless the analyzer runs with located hints.
    pub section: String,
    pub recommendation: String,
    pub risk_level: RiskSeverity,
}

/// Best-effort commercial terms. `None` fields are omitted from the JSON form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyTerms {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_notice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub governing_law: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liability: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub file_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub analysis_date: OffsetDateTime,
    pub overall_risk: RiskSeverity,
    pub risk_score: u8,
    pub issues: Vec<ContractIssue>,
    pub key_terms: KeyTerms,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn severity_orders_high_above_low() {
        assert!(RiskSeverity::High > RiskSeverity::Medium);
        assert!(RiskSeverity::Medium > RiskSeverity::Low);
    }

    #[test]
    fn result_serializes_with_stable_field_names() {
        let result = AnalysisResult {
            file_name: "msa.txt".to_string(),
            analysis_date: datetime!(2026-02-10 00:00:00 UTC),
            overall_risk: RiskSeverity::Low,
            risk_score: 6,
            issues: vec![ContractIssue {
                issue_type: "Standard Terms".to_string(),
                description: "d".to_string(),
                section: "General".to_string(),
                recommendation: "r".to_string(),
                risk_level: RiskSeverity::Low,
            }],
            key_terms: KeyTerms {
                duration: Some("Not specified".to_string()),
                ..KeyTerms::default()
            },
        };

        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["fileName"], "msa.txt");
        assert_eq!(v["analysisDate"], "2026-02-10T00:00:00Z");
        assert_eq!(v["overallRisk"], "Low");
        assert_eq!(v["riskScore"], 6);
        assert_eq!(v["issues"][0]["type"], "Standard Terms");
        assert_eq!(v["issues"][0]["riskLevel"], "Low");
        assert_eq!(v["keyTerms"]["duration"], "Not specified");
        assert!(v["keyTerms"].get("paymentTerms").is_none());
    }

    #[test]
    fn locale_tags_parse_case_insensitively() {
        assert_eq!(Locale::from_tag("HI"), Some(Locale::Hi));
        assert_eq!(Locale::from_tag(" en "), Some(Locale::En));
        assert_eq!(Locale::from_tag("fr"), None);
    }
}
