//! Parser settings. Defaults reproduce the behaviour used for Summary CAS
//! uploads; every heuristic threshold is named here instead of inlined.

use caslens_core::DEFAULT_SAVINGS_RATE;
use serde::{Deserialize, Serialize};

use crate::tables::SUMMARY_HEADER_MARKER;

/// Which statement layout the parser accepts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StatementVariant {
    /// Require the Summary header on page 1 and skip `Page`/`Date`/`Transaction` rows
    #[default]
    #[serde(rename = "summary")]
    Summary,
    /// Accept any layout, no header check
    #[serde(rename = "any")]
    Any,
}

/// What to do with a keyword-anchored value that has no resolvable name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UnnamedValuePolicy {
    /// Emit an `Unidentified Fund` record so totals stay complete
    #[default]
    #[serde(rename = "placeholder")]
    Placeholder,
    /// Discard the value
    #[serde(rename = "drop")]
    Drop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParserConfig {
    pub variant: StatementVariant,
    pub unnamed_value_policy: UnnamedValuePolicy,
    /// Below this many registrar chunks a page is re-split on whitespace runs
    pub min_registrar_chunks: usize,
    /// Trimmed lines shorter than this are noise
    pub min_line_len: usize,
    /// An ISIN-line name run must be longer than this to be trusted
    pub min_inline_name_len: usize,
    /// Characters of page 1 searched for the header marker
    pub header_window_chars: usize,
    pub header_marker: String,
    pub savings_rate: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            variant: StatementVariant::Summary,
            unnamed_value_policy: UnnamedValuePolicy::Placeholder,
            min_registrar_chunks: 5,
            min_line_len: 5,
            min_inline_name_len: 10,
            header_window_chars: 1000,
            header_marker: SUMMARY_HEADER_MARKER.to_string(),
            savings_rate: DEFAULT_SAVINGS_RATE,
        }
    }
}

impl ParserConfig {
    /// Settings for Detailed or unknown layouts: no header check.
    pub fn any_layout() -> Self {
        Self {
            variant: StatementVariant::Any,
            ..Self::default()
        }
    }

    pub fn with_policy(mut self, policy: UnnamedValuePolicy) -> Self {
        self.unnamed_value_policy = policy;
        self
    }

    pub(crate) fn validates_header(&self) -> bool {
        self.variant == StatementVariant::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.variant, StatementVariant::Summary);
        assert_eq!(cfg.unnamed_value_policy, UnnamedValuePolicy::Placeholder);
        assert_eq!(cfg.min_registrar_chunks, 5);
        assert_eq!(cfg.savings_rate, 0.01);
        assert!(cfg.validates_header());
        assert!(!ParserConfig::any_layout().validates_header());
    }
}
