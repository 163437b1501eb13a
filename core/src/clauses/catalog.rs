use crate::clauses::model::{Locale, RiskSeverity};
use crate::clauses::pattern;
use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

pub const CATALOG_VERSION_V1: &str = "clause_catalog_v1";

/// Issue types emitted when no rule matches. Every catalog must carry
/// base-locale copy for both.
pub const STANDARD_TERMS: &str = "Standard Terms";
pub const NOTICE_PERIOD: &str = "Notice Period";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleDef {
    pub rule_type: String,
    pub severity: RiskSeverity,
    pub pattern: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyEntry {
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogDocument {
    catalog_version: String,
    base_locale: String,
    rules: Vec<RuleDef>,
    copy: BTreeMap<String, BTreeMap<String, CopyEntry>>,
}

/// One compiled catalog entry, matched in the dialect of [`pattern::compile`].
#[derive(Debug, Clone)]
pub struct ClauseRule {
    rule_type: String,
    severity: RiskSeverity,
    pattern: String,
    matcher: Regex,
}

impl ClauseRule {
    pub fn new(rule_type: &str, severity: RiskSeverity, pattern: &str) -> CoreResult<Self> {
        let matcher = pattern::compile(pattern).map_err(|e| {
            CoreError::Catalog(format!("rule {:?} has an invalid pattern: {}", rule_type, e))
        })?;
        Ok(Self {
            rule_type: rule_type.to_string(),
            severity,
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub fn rule_type(&self) -> &str {
        &self.rule_type
    }

    pub fn severity(&self) -> RiskSeverity {
        self.severity
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Byte offset of the first match, if any.
    pub fn first_match_offset(&self, text: &str) -> Option<usize> {
        self.matcher.find(text).map(|m| m.start())
    }
}

/// Description/recommendation text keyed by (locale tag, issue type).
#[derive(Debug, Clone)]
pub struct LocalizedCopy {
    base_locale: String,
    entries: BTreeMap<String, BTreeMap<String, CopyEntry>>,
}

impl LocalizedCopy {
    fn lookup(&self, locale: &str, issue_type: &str) -> Option<&CopyEntry> {
        self.entries.get(locale).and_then(|t| t.get(issue_type))
    }

    /// Localized description. Falls back to the base locale, then to the
    /// issue type itself, so the result is never empty.
    pub fn description<'a>(&'a self, locale: &str, issue_type: &'a str) -> &'a str {
        self.resolve(locale, issue_type, |e| e.description.as_str())
    }

    /// Localized recommendation, with the same fallback as [`Self::description`].
    pub fn recommendation<'a>(&'a self, locale: &str, issue_type: &'a str) -> &'a str {
        self.resolve(locale, issue_type, |e| e.recommendation.as_str())
    }

    fn resolve<'a>(
        &'a self,
        locale: &str,
        issue_type: &'a str,
        pick: impl Fn(&'a CopyEntry) -> &'a str,
    ) -> &'a str {
        [locale, self.base_locale.as_str()]
            .iter()
            .filter_map(|loc| self.lookup(loc, issue_type))
            .map(&pick)
            .find(|s| !s.trim().is_empty())
            .unwrap_or(issue_type)
    }
}

/// Read-only rule catalog, ordered tier-major (High, Medium, Low).
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    version: String,
    fingerprint: String,
    rules: Vec<ClauseRule>,
    copy: LocalizedCopy,
}

impl RuleCatalog {
    /// The reference catalog compiled into the library.
    pub fn embedded() -> CoreResult<Self> {
        Self::from_json_str(include_str!("catalog_v1.json"))
    }

    pub fn from_path(path: impl AsRef<Path>) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        if doc.catalog_version != CATALOG_VERSION_V1 {
            return Err(CoreError::Catalog(format!(
                "expected {}, got {}",
                CATALOG_VERSION_V1, doc.catalog_version
            )));
        }
        if doc.rules.is_empty() {
            return Err(CoreError::Catalog("catalog has no rules".to_string()));
        }

        let mut seen = BTreeSet::new();
        let mut rules = Vec::with_capacity(doc.rules.len());
        for def in &doc.rules {
            if def.rule_type.trim().is_empty() {
                return Err(CoreError::Catalog("rule with empty rule_type".to_string()));
            }
            if !seen.insert(def.rule_type.as_str()) {
                return Err(CoreError::Catalog(format!(
                    "duplicate rule_type {:?}",
                    def.rule_type
                )));
            }
            rules.push(ClauseRule::new(&def.rule_type, def.severity, &def.pattern)?);
        }
        // Stable: document order is kept within a tier.
        rules.sort_by_key(|r| std::cmp::Reverse(r.severity));

        let copy = LocalizedCopy {
            base_locale: doc.base_locale,
            entries: doc.copy,
        };
        validate_base_copy(&copy, rules.iter().map(|r| r.rule_type()))?;

        tracing::debug!(
            catalog_version = %doc.catalog_version,
            rule_count = rules.len(),
            "rule catalog loaded"
        );

        Ok(Self {
            version: doc.catalog_version,
            fingerprint: hex::encode(Sha256::digest(json.as_bytes())),
            rules,
            copy,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// SHA-256 hex of the catalog document this catalog was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn rules(&self) -> &[ClauseRule] {
        &self.rules
    }

    pub fn rules_in_tier(&self, severity: RiskSeverity) -> impl Iterator<Item = &ClauseRule> {
        self.rules.iter().filter(move |r| r.severity == severity)
    }

    pub fn copy(&self) -> &LocalizedCopy {
        &self.copy
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn validate_base_copy<'a>(
    copy: &LocalizedCopy,
    rule_types: impl Iterator<Item = &'a str>,
) -> CoreResult<()> {
    let base = copy.entries.get(&copy.base_locale).ok_or_else(|| {
        CoreError::Catalog(format!("base locale {:?} has no copy", copy.base_locale))
    })?;
    let required = rule_types.chain([STANDARD_TERMS, NOTICE_PERIOD]);
    for issue_type in required {
        let ok = base.get(issue_type).map_or(false, |e| {
            !e.description.trim().is_empty() && !e.recommendation.trim().is_empty()
        });
        if !ok {
            return Err(CoreError::Catalog(format!(
                "base locale {:?} is missing copy for {:?}",
                copy.base_locale, issue_type
            )));
        }
    }
    for locale in copy.entries.keys() {
        if Locale::from_tag(locale).is_none() {
            tracing::warn!(locale = %locale, "catalog carries copy for an unsupported locale");
        }
    }
    Ok(())
}

/// The embedded catalog, built on first use and shared for the life of the
/// process.
pub fn default_catalog() -> CoreResult<&'static RuleCatalog> {
    static DEFAULT: OnceLock<RuleCatalog> = OnceLock::new();
    if let Some(catalog) = DEFAULT.get() {
        return Ok(catalog);
    }
    let catalog = RuleCatalog::embedded()?;
    Ok(DEFAULT.get_or_init(|| catalog))
}
