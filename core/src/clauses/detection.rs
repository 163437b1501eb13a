use crate::clauses::catalog::{ClauseRule, RuleCatalog, NOTICE_PERIOD, STANDARD_TERMS};
use crate::clauses::model::{ContractIssue, RiskSeverity};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound on issues returned per analysis.
pub const MAX_ISSUES: usize = 6;

/// How the `section` field of a detected issue is filled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionHintMode {
    /// Random `Section <1-10>.<1-5>` label. Cosmetic only; it does not point
    /// at the matched text.
    #[default]
    Synthetic,
    /// `Line <n>` of the first match in the analyzed text.
    Located,
}

/// Runs every catalog rule against the lower-cased text and returns one issue
/// per matching rule, in catalog order, capped at [`MAX_ISSUES`].
///
/// When nothing matches, the two default Low issues are returned instead.
pub fn detect_issues<R: Rng>(
    catalog: &RuleCatalog,
    locale: &str,
    text: &str,
    hints: SectionHintMode,
    rng: &mut R,
) -> Vec<ContractIssue> {
    let normalized = text.to_lowercase();

    let mut issues: Vec<ContractIssue> = catalog
        .rules()
        .iter()
        .filter(|rule| rule.is_match(&normalized))
        .map(|rule| {
            tracing::debug!(
                rule_type = rule.rule_type(),
                severity = rule.severity().as_str(),
                "clause rule matched"
            );
            let section = section_hint(rule, &normalized, hints, &mut *rng);
            issue(catalog, locale, rule.rule_type(), rule.severity(), section)
        })
        .collect();

    if issues.is_empty() {
        issues.push(issue(
            catalog,
            locale,
            STANDARD_TERMS,
            RiskSeverity::Low,
            "General".to_string(),
        ));
        issues.push(issue(
            catalog,
            locale,
            NOTICE_PERIOD,
            RiskSeverity::Low,
            "Termination Clause".to_string(),
        ));
    }

    issues.truncate(MAX_ISSUES);
    issues
}

fn issue(
    catalog: &RuleCatalog,
    locale: &str,
    issue_type: &str,
    risk_level: RiskSeverity,
    section: String,
) -> ContractIssue {
    let copy = catalog.copy();
    ContractIssue {
        issue_type: issue_type.to_string(),
        description: copy.description(locale, issue_type).to_string(),
        section,
        recommendation: copy.recommendation(locale, issue_type).to_string(),
        risk_level,
    }
}

fn section_hint<R: Rng>(
    rule: &ClauseRule,
    normalized: &str,
    hints: SectionHintMode,
    rng: &mut R,
) -> String {
    match hints {
        SectionHintMode::Synthetic => {
            format!("Section {}.{}", rng.gen_range(1..=10), rng.gen_range(1..=5))
        }
        SectionHintMode::Located => match rule.first_match_offset(normalized) {
            Some(offset) => format!("Line {}", normalized[..offset].matches('\n').count() + 1),
            None => "Not located".to_string(),
        },
    }
}
