//! Statement-level parsing: header check, page loop, aggregation.

use caslens_core::PortfolioSummary;
use tracing::{info, info_span, warn};

use crate::config::ParserConfig;
use crate::error::{CasError, Result};
use crate::normalize::{header_window, normalize_page};
use crate::scanner::LineScanner;
use crate::splitter::LineSplitter;
use crate::state::ParserState;
use crate::text_layer::{LopdfTextLayer, TextLayer};

/// Counters describing one document scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub pages: usize,
    pub lines_scanned: usize,
    pub lines_excluded: usize,
}

/// Reusable parser. Holds only immutable compiled rules; every call starts
/// from fresh state, so one parser may serve many documents.
pub struct StatementParser {
    config: ParserConfig,
    splitter: LineSplitter,
    scanner: LineScanner,
}

impl StatementParser {
    pub fn new(config: ParserConfig) -> Result<Self> {
        Ok(Self {
            splitter: LineSplitter::new(&config)?,
            scanner: LineScanner::new(&config)?,
            config,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse_text_layer<L: TextLayer + ?Sized>(&self, layer: &L) -> Result<PortfolioSummary> {
        self.parse_with_report(layer).map(|(summary, _)| summary)
    }

    /// Scan every page in order and aggregate the records found.
    ///
    /// With header validation on, page 1 is checked before any later page is
    /// requested from the text layer, and a failure to read page 1 is returned
    /// as is. Any other unreadable page is scanned as empty.
    pub fn parse_with_report<L: TextLayer + ?Sized>(
        &self,
        layer: &L,
    ) -> Result<(PortfolioSummary, ScanReport)> {
        let span = info_span!("parse_statement", pages = layer.page_count());
        let _guard = span.enter();

        let mut funds = Vec::new();
        let mut state = ParserState::default();
        let mut report = ScanReport::default();

        if self.config.validates_header() && layer.page_count() == 0 {
            return Err(self.unsupported());
        }

        for page in 1..=layer.page_count() {
            // the header check cannot judge a page it could not read
            let checks_header = page == 1 && self.config.validates_header();
            let fragments = if checks_header {
                layer.page_fragments(page)?
            } else {
                self.fragments(layer, page)
            };
            let page_text = normalize_page(&fragments);

            if checks_header {
                self.check_header(&page_text)?;
            }

            let lines = self.splitter.candidate_lines(&page_text);
            let tally = self.scanner.scan_lines(state, lines, &mut funds);
            state = tally.state;
            report.pages += 1;
            report.lines_scanned += tally.lines;
            report.lines_excluded += tally.excluded;
        }

        let summary = PortfolioSummary::aggregate(funds, self.config.savings_rate);
        info!(
            pages = report.pages,
            lines = report.lines_scanned,
            excluded = report.lines_excluded,
            funds = summary.funds.len(),
            placeholders = summary.placeholder_count(),
            total = summary.total_value,
            "statement parsed"
        );
        if summary.is_empty() {
            warn!("no holdings identified in statement");
        }
        Ok((summary, report))
    }

    /// A page that fails extraction is scanned as empty.
    fn fragments<L: TextLayer + ?Sized>(&self, layer: &L, page: usize) -> Vec<String> {
        layer.page_fragments(page).unwrap_or_else(|err| {
            warn!(page, error = %err, "page text unavailable, skipping");
            Vec::new()
        })
    }

    fn check_header(&self, page_text: &str) -> Result<()> {
        let window = header_window(page_text, self.config.header_window_chars).to_lowercase();
        if window.contains(&self.config.header_marker.to_lowercase()) {
            Ok(())
        } else {
            Err(self.unsupported())
        }
    }

    fn unsupported(&self) -> CasError {
        CasError::UnsupportedStatement {
            marker: self.config.header_marker.clone(),
        }
    }
}

/// Decrypt a statement PDF and extract its fund holdings.
///
/// Fails on a rejected password, an unsupported or unreadable file, or (for
/// the Summary variant) an unreadable page 1 or a missing page-1 header. A statement with no recognisable
/// holdings yields an empty summary.
pub fn parse_statement(bytes: &[u8], password: &str, config: &ParserConfig) -> Result<PortfolioSummary> {
    let parser = StatementParser::new(config.clone())?;
    let layer = LopdfTextLayer::open(bytes, password)?;
    parser.parse_text_layer(&layer)
}
