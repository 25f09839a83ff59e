//! Fund holding records recovered from a consolidated account statement

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether units were bought with or without a distributor commission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlanType {
    #[serde(rename = "DIRECT")]
    Direct,
    #[serde(rename = "REGULAR")]
    Regular,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl PlanType {
    /// Map a `Direct`/`Regular` keyword (any case) to a plan type.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("direct") {
            Some(PlanType::Direct)
        } else if word.eq_ignore_ascii_case("regular") {
            Some(PlanType::Regular)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanType::Direct => "DIRECT",
            PlanType::Regular => "REGULAR",
            PlanType::Unknown => "UNKNOWN",
        }
    }
}

/// Which extraction rule produced a record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordSource {
    /// Value printed immediately before an `INF...` ISIN token
    #[serde(rename = "isin-anchor")]
    IsinAnchor,
    /// Value introduced by `Market Value`, `Closing Balance (Rs)` or `Valuation`
    #[serde(rename = "value-keyword")]
    ValueKeyword,
    /// Keyword value with no recoverable scheme name
    #[serde(rename = "placeholder")]
    Placeholder,
}

/// One fund holding. Immutable once emitted by the scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FundRecord {
    /// Scheme name, trimmed and non-empty
    pub name: String,
    pub plan_type: PlanType,
    /// Current value in statement currency, always > 0
    pub value: f64,
    /// Valuation date when the statement printed one next to the value
    pub valued_on: Option<NaiveDate>,
    pub source: RecordSource,
}

impl FundRecord {
    /// Build a record, returning `None` when the name is blank or the value
    /// is not a finite positive amount.
    pub fn new(
        name: impl Into<String>,
        plan_type: PlanType,
        value: f64,
        source: RecordSource,
    ) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() || !value.is_finite() || value <= 0.0 {
            return None;
        }
        Some(Self {
            name,
            plan_type,
            value,
            valued_on: None,
            source,
        })
    }

    pub fn with_valued_on(mut self, date: Option<NaiveDate>) -> Self {
        self.valued_on = date;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == RecordSource::Placeholder
    }
}
