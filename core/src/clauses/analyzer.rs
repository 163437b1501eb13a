use crate::clauses::catalog::{default_catalog, RuleCatalog};
use crate::clauses::detection::{detect_issues, SectionHintMode};
use crate::clauses::extraction::KeyTermExtractor;
use crate::clauses::model::{AnalysisResult, Locale};
use crate::clauses::scoring::{classify, risk_score};
use crate::error::CoreResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::OffsetDateTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub locale: Locale,
    pub section_hints: SectionHintMode,
    /// Seed for synthetic section hints. `None` draws from OS entropy on
    /// every analysis.
    pub section_seed: Option<u64>,
}

impl AnalyzerConfig {
    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Stateless contract analyzer over a read-only rule catalog.
///
/// All fallible setup happens in the constructors; [`ClauseAnalyzer::analyze`]
/// always produces a result.
#[derive(Debug, Clone)]
pub struct ClauseAnalyzer<'c> {
    catalog: &'c RuleCatalog,
    extractor: KeyTermExtractor,
    config: AnalyzerConfig,
}

impl ClauseAnalyzer<'static> {
    /// Analyzer over the process-wide embedded catalog.
    pub fn new(config: AnalyzerConfig) -> CoreResult<Self> {
        Self::with_catalog(default_catalog()?, config)
    }
}

impl<'c> ClauseAnalyzer<'c> {
    pub fn with_catalog(catalog: &'c RuleCatalog, config: AnalyzerConfig) -> CoreResult<Self> {
        Ok(Self {
            catalog,
            extractor: KeyTermExtractor::new()?,
            config,
        })
    }

    pub fn catalog(&self) -> &RuleCatalog {
        self.catalog
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, text: &str, file_name: &str) -> AnalysisResult {
        self.analyze_at(text, file_name, OffsetDateTime::now_utc())
    }

    pub fn analyze_at(
        &self,
        text: &str,
        file_name: &str,
        analysis_date: OffsetDateTime,
    ) -> AnalysisResult {
        let mut rng = match self.config.section_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let issues = detect_issues(
            self.catalog,
            self.config.locale.tag(),
            text,
            self.config.section_hints,
            &mut rng,
        );
        let key_terms = self.extractor.extract(text);
        let risk_score = risk_score(&issues);
        let overall_risk = classify(risk_score);

        tracing::info!(
            file_name,
            locale = self.config.locale.tag(),
            risk_score,
            overall_risk = overall_risk.as_str(),
            issue_count = issues.len(),
            "contract analyzed"
        );

        AnalysisResult {
            file_name: file_name.to_string(),
            analysis_date,
            overall_risk,
            risk_score,
            issues,
            key_terms,
        }
    }
}
