//! Extraction patterns and the ordered value-emission rules.
//!
//! Emission rules are tried in [`EMISSION_ORDER`]; the first one that yields a
//! record consumes the line. ISIN anchors come first: an `INF...` token right
//! after a number almost never appears outside a holding row, while phrases
//! like `Valuation` do.

use caslens_core::{FundRecord, PlanType, RecordSource};
use chrono::NaiveDate;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::config::{ParserConfig, UnnamedValuePolicy};
use crate::error::Result;
use crate::state::ParserState;
use crate::tables::{
    alternation, EXCLUDED_LINE_PREFIXES, EXCLUDED_PHRASES, FUND_KEYWORDS, HEADER_WORDS,
    NAME_DENYLIST, NAME_TERMINATORS, PLACEHOLDER_NAME, PLAN_KEYWORDS, STALE_NAME_MARKERS,
};

/// Compiled patterns shared by every rule
pub struct RulePatterns {
    pub(crate) excluded: Regex,
    pub(crate) excluded_prefix: Regex,
    pub(crate) plan_word: Regex,
    isin_value: Regex,
    isin_name: Regex,
    keyword_value: Regex,
    scheme_code_name: Regex,
    stale_name: Regex,
    pub(crate) folio: Regex,
    pub(crate) header_word: Regex,
    pub(crate) fund_keyword: Regex,
    pub(crate) plan_keyword: Regex,
    pub(crate) name_denied: Regex,
    pub(crate) name_terminator: Regex,
}

impl RulePatterns {
    pub fn new() -> Result<Self> {
        let plans = alternation(PLAN_KEYWORDS);
        Ok(Self {
            excluded: Regex::new(&format!("(?i){}", alternation(EXCLUDED_PHRASES)))?,
            excluded_prefix: Regex::new(&format!(
                "(?i)^(?:{})",
                alternation(EXCLUDED_LINE_PREFIXES)
            ))?,
            plan_word: Regex::new(&format!(r"(?i)\b({plans})\b"))?,
            isin_value: Regex::new(r"(?P<value>[0-9,]+\.[0-9]+)\s+(?P<isin>INF[A-Z0-9]+)")?,
            isin_name: Regex::new(&format!(
                r"(?i)(?P<run>[A-Za-z0-9\s\-&().]+?)\b(?P<plan>{plans})\b"
            ))?,
            keyword_value: Regex::new(concat!(
                r"(?i)(?:Market Value(?: on (?P<date>\d{2}-[A-Z]{3}-\d{4}))?\s*:?\s*(?:INR|Rs\.?)?",
                r"|Closing Balance\s*\(Rs\)",
                r"|Valuation)",
                r"\s*[:\-]?\s*(?P<value>[0-9,]+\.[0-9]+)",
            ))?,
            scheme_code_name: Regex::new(concat!(
                r"(?i)(?P<name>(?-i:[A-Z0-9]+)-[A-Za-z0-9\s\-&]+(?:Fund|Plan|Option|Scheme)[A-Za-z0-9\s\-&]*?)",
                r"(?:\s*\(Advisor|\s*- ISIN|$)",
            ))?,
            stale_name: Regex::new(&format!("(?i){}", alternation(STALE_NAME_MARKERS)))?,
            folio: Regex::new(r"(?i)Folio\s*No")?,
            header_word: Regex::new(&format!("(?i)^(?:{})", alternation(HEADER_WORDS)))?,
            fund_keyword: Regex::new(&format!("(?i){}", alternation(FUND_KEYWORDS)))?,
            plan_keyword: Regex::new(&format!("(?i){plans}"))?,
            name_denied: Regex::new(&format!("(?i){}", alternation(NAME_DENYLIST)))?,
            name_terminator: Regex::new(&alternation(NAME_TERMINATORS))?,
        })
    }

    /// Standalone `Direct`/`Regular` word on the line, if any.
    pub fn plan_on_line(&self, line: &str) -> Option<PlanType> {
        self.plan_word
            .captures(line)
            .and_then(|caps| PlanType::from_keyword(&caps[1]))
    }
}

/// Parse a statement amount such as `12,34,567.89`.
///
/// Thousands separators are stripped wherever they occur, so Indian lakh
/// grouping parses the same as Western grouping. Zero, negative and
/// non-finite amounts are rejected.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let value: f64 = raw.replace(',', "").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse the `DD-MMM-YYYY` date printed after `Market Value on`.
pub fn parse_valuation_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d-%b-%Y").ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionRule {
    /// `<number> INF...` rows of Summary statements
    IsinAnchor,
    /// `Market Value ...`, `Closing Balance (Rs)` or `Valuation` rows of Detailed statements
    ValueKeyword,
}

pub const EMISSION_ORDER: [EmissionRule; 2] = [EmissionRule::IsinAnchor, EmissionRule::ValueKeyword];

impl EmissionRule {
    /// Try this rule on a line. `None` means the rule does not apply and the
    /// next rule should be tried.
    pub fn apply(
        &self,
        patterns: &RulePatterns,
        config: &ParserConfig,
        state: &ParserState,
        line: &str,
    ) -> Option<FundRecord> {
        match self {
            EmissionRule::IsinAnchor => isin_anchor(patterns, config, state, line),
            EmissionRule::ValueKeyword => value_keyword(patterns, config, state, line),
        }
    }
}

fn isin_anchor(
    patterns: &RulePatterns,
    config: &ParserConfig,
    state: &ParserState,
    line: &str,
) -> Option<FundRecord> {
    let caps = patterns.isin_value.captures(line)?;
    let value = parse_amount(&caps["value"])?;

    let inline = patterns
        .isin_name
        .captures(line)
        .filter(|c| c["run"].trim().chars().count() > config.min_inline_name_len);

    let (name, plan_type) = match inline {
        Some(c) => (
            format!("{}{}", &c["run"], &c["plan"]),
            PlanType::from_keyword(&c["plan"]).unwrap_or(PlanType::Regular),
        ),
        None => {
            let Some(name) = state.pending_name.clone() else {
                debug!(value, isin = &caps["isin"], "ISIN value without a scheme name, dropped");
                return None;
            };
            (name, state.pending_plan.unwrap_or(PlanType::Regular))
        }
    };

    FundRecord::new(name, plan_type, value, RecordSource::IsinAnchor)
}

fn value_keyword(
    patterns: &RulePatterns,
    config: &ParserConfig,
    state: &ParserState,
    line: &str,
) -> Option<FundRecord> {
    let caps = patterns.keyword_value.captures(line)?;
    let value = parse_amount(&caps["value"])?;
    let valued_on = caps.name("date").and_then(|d| parse_valuation_date(d.as_str()));

    if let Some(name) = scheme_code_name(patterns, line) {
        let plan_type = if name.to_ascii_lowercase().contains("direct") {
            PlanType::Direct
        } else if name.to_ascii_lowercase().contains("regular") {
            PlanType::Regular
        } else {
            state.pending_plan.unwrap_or(PlanType::Regular)
        };
        return FundRecord::new(name, plan_type, value, RecordSource::ValueKeyword)
            .map(|r| r.with_valued_on(valued_on));
    }

    let pending = state
        .pending_name
        .as_deref()
        .filter(|name| !patterns.stale_name.is_match(name));
    if let Some(name) = pending {
        let plan_type = state.pending_plan.unwrap_or(PlanType::Regular);
        return FundRecord::new(name, plan_type, value, RecordSource::ValueKeyword)
            .map(|r| r.with_valued_on(valued_on));
    }

    match config.unnamed_value_policy {
        UnnamedValuePolicy::Placeholder => {
            warn!(value, "value without a scheme name, recording placeholder");
            let plan_type = state.pending_plan.unwrap_or(PlanType::Unknown);
            FundRecord::new(placeholder_name(value), plan_type, value, RecordSource::Placeholder)
                .map(|r| r.with_valued_on(valued_on))
        }
        UnnamedValuePolicy::Drop => {
            debug!(value, "value without a scheme name, dropped");
            None
        }
    }
}

/// `CODE-Scheme Name ... Fund` ending before `(Advisor`, `- ISIN` or end of line
fn scheme_code_name(patterns: &RulePatterns, line: &str) -> Option<String> {
    patterns
        .scheme_code_name
        .captures(line)
        .map(|c: Captures<'_>| c["name"].trim().to_string())
        .filter(|name| !name.is_empty())
}

pub fn placeholder_name(value: f64) -> String {
    format!("{PLACEHOLDER_NAME} (Val: {value})")
}
