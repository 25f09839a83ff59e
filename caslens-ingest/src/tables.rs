//! Keyword tables driving the line splitter and extraction rules.
//!
//! Supporting a new statement layout should mean editing these lists, not the
//! scanner. Every entry is matched case-insensitively unless noted.

/// Registrar names that start a new record in Summary statements
pub const REGISTRAR_ANCHORS: &[&str] = &["CAMS", "KFINTECH", "FTAMIL", "KARVY", "Franklin India"];

/// Administrative phrases; a line containing one is ignored entirely
pub const EXCLUDED_PHRASES: &[&str] = &[
    "Load Structure",
    "Entry Load",
    "Exit Load",
    "NAV Date",
    "Lock-in Details",
];

/// Line prefixes ignored when validating Summary statements
pub const EXCLUDED_LINE_PREFIXES: &[&str] = &["Page", "Date", "Transaction"];

/// Line prefixes that mark table headers rather than scheme names
pub const HEADER_WORDS: &[&str] = &[
    "Date",
    "Transaction",
    "Units",
    "Balance",
    "Amount",
    "Registrar",
    "Price",
    "Cost",
    "Redemption",
];

/// Substrings suggesting a line names a scheme
pub const FUND_KEYWORDS: &[&str] = &[
    "Fund", "Scheme", "Plan", "Option", "Index", "ETF", "Equity", "Debt", "Hybrid",
];

/// Plan keywords, also accepted as scheme-name evidence
pub const PLAN_KEYWORDS: &[&str] = &["Direct", "Regular"];

/// A scheme-name candidate containing any of these is rejected
pub const NAME_DENYLIST: &[&str] = &[
    "Market Value",
    "Valuation",
    "Load",
    "Statement",
    "Summary",
    "Total",
    "Page",
    "Nominee",
    "Address",
    "Tax",
    "Stamp",
];

/// Metadata that trails a scheme name on the same line (case-sensitive)
pub const NAME_TERMINATORS: &[&str] = &["Folio", "ISIN", "PAN", "KYC", "Advisor"];

/// Pending names matching these came from transaction rows, not scheme headers
pub const STALE_NAME_MARKERS: &[&str] = &[
    "Redemption",
    "Purchase",
    "Switch",
    "Consolidated",
    "Account Statement",
    "Folio",
    "Tax",
    "Stamp",
];

/// Header phrase identifying a Summary statement on page 1
pub const SUMMARY_HEADER_MARKER: &str = "Consolidated Account Summary";

/// Label prefix for values whose scheme name could not be recovered
pub const PLACEHOLDER_NAME: &str = "Unidentified Fund";

/// Build a case-insensitive alternation from a keyword table.
pub(crate) fn alternation(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|")
}
