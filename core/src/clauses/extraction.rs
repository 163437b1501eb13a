use crate::clauses::model::KeyTerms;
use crate::clauses::pattern;
use crate::error::{CoreError, CoreResult};
use regex::Regex;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const ASSUMED_TERMINATION_NOTICE: &str = "30 days (assumed)";

const CURRENCY_SYMBOLS: [char; 5] = ['$', '£', '€', '¥', '₹'];

const CONTRACT_VALUE: &str = r"(?:value|amount|sum|total).*?[$£€¥₹]\s*[\d,]+(?:\.\d{2})?";
const DURATION: &str = r"(?:term|duration|period).*?(\d+)\s*(month|year|day)s?";
const TERMINATION_NOTICE: &str = r"(?:termination|notice).*?(\d+)\s*days?";
const GOVERNING_LAW: &str =
    r"(?:governing law|jurisdiction).*?([\w\s]+)(?:state|country|province)";
const PAYMENT_TERMS: &str = r"(?:payment|due).*?(\d+)\s*days?";
const LIABILITY_CAP: &str =
    r"liability.*?(?:limited to|capped at|maximum).*?[$£€¥₹]\s*[\d,]+";

/// Compiled key-term patterns. Each field takes the first match in the raw
/// text, in the dialect of [`pattern::compile`].
///
/// Fields differ in what they record when nothing matches: `duration` and
/// `governing_law` fall back to [`NOT_SPECIFIED`], `termination_notice` to
/// [`ASSUMED_TERMINATION_NOTICE`], and the other three stay unset.
#[derive(Debug, Clone)]
pub struct KeyTermExtractor {
    contract_value: Regex,
    duration: Regex,
    termination_notice: Regex,
    governing_law: Regex,
    payment_terms: Regex,
    liability: Regex,
}

impl KeyTermExtractor {
    pub fn new() -> CoreResult<Self> {
        Ok(Self {
            contract_value: compile("contract_value", CONTRACT_VALUE)?,
            duration: compile("duration", DURATION)?,
            termination_notice: compile("termination_notice", TERMINATION_NOTICE)?,
            governing_law: compile("governing_law", GOVERNING_LAW)?,
            payment_terms: compile("payment_terms", PAYMENT_TERMS)?,
            liability: compile("liability", LIABILITY_CAP)?,
        })
    }

    pub fn extract(&self, text: &str) -> KeyTerms {
        KeyTerms {
            contract_value: self.contract_value(text),
            duration: Some(self.duration(text)),
            termination_notice: Some(self.termination_notice(text)),
            governing_law: Some(self.governing_law(text)),
            payment_terms: self.payment_terms(text),
            liability: self.liability(text),
        }
    }

    fn contract_value(&self, text: &str) -> Option<String> {
        let phrase = self.contract_value.find(text)?.as_str();
        let amount = amount_after_symbol(phrase).unwrap_or(NOT_SPECIFIED);
        Some(amount.to_string())
    }

    fn duration(&self, text: &str) -> String {
        match self.duration.captures(text) {
            Some(caps) => {
                let count = &caps[1];
                let unit = &caps[2];
                let plural = if count != "1" { "s" } else { "" };
                format!("{} {}{}", count, unit, plural)
            }
            None => NOT_SPECIFIED.to_string(),
        }
    }

    fn termination_notice(&self, text: &str) -> String {
        match self.termination_notice.captures(text) {
            Some(caps) => format!("{} days", &caps[1]),
            None => ASSUMED_TERMINATION_NOTICE.to_string(),
        }
    }

    fn governing_law(&self, text: &str) -> String {
        self.governing_law
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|law| !law.is_empty())
            .unwrap_or(NOT_SPECIFIED)
            .to_string()
    }

    fn payment_terms(&self, text: &str) -> Option<String> {
        let caps = self.payment_terms.captures(text)?;
        Some(format!("{} days", &caps[1]))
    }

    fn liability(&self, text: &str) -> Option<String> {
        self.liability.find(text).map(|m| m.as_str().to_string())
    }
}

fn compile(name: &'static str, source: &str) -> CoreResult<Regex> {
    pattern::compile(source).map_err(|source| CoreError::Pattern { name, source })
}

/// Text between the first currency symbol and the next one.
fn amount_after_symbol(phrase: &str) -> Option<&str> {
    let mut parts = phrase.split(&CURRENCY_SYMBOLS[..]);
    parts.next();
    parts.next().map(str::trim).filter(|s| !s.is_empty())
}
