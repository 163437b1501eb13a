use crate::clauses::model::{ContractIssue, RiskSeverity};

/// Raw sum of six High-severity issues; the 100-point reference.
pub const MAX_REFERENCE_RISK: u32 = 180;

pub const HIGH_RISK_THRESHOLD: u8 = 70;
pub const MEDIUM_RISK_THRESHOLD: u8 = 40;

pub fn weight_sum(issues: &[ContractIssue]) -> u32 {
    issues.iter().map(|i| i.risk_level.weight()).sum()
}

/// Normalized 0-100 score, rounded half up.
pub fn risk_score(issues: &[ContractIssue]) -> u8 {
    normalize(weight_sum(issues))
}

fn normalize(sum: u32) -> u8 {
    let scaled = (u64::from(sum) * 100 + u64::from(MAX_REFERENCE_RISK) / 2)
        / u64::from(MAX_REFERENCE_RISK);
    scaled.min(100) as u8
}

pub fn classify(score: u8) -> RiskSeverity {
    if score >= HIGH_RISK_THRESHOLD {
        RiskSeverity::High
    } else if score >= MEDIUM_RISK_THRESHOLD {
        RiskSeverity::Medium
    } else {
        RiskSeverity::Low
    }
}
