//! Line-by-line extraction state machine.
//!
//! `LineScanner::step` is a pure transition: it takes the carried state and one
//! candidate line and returns the next state plus at most one record. A whole
//! statement is a left fold of `step` over its lines in page order.

use caslens_core::FundRecord;
use tracing::debug;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::rules::{EMISSION_ORDER, RulePatterns};
use crate::state::{ParserState, Step};

pub struct LineScanner {
    patterns: RulePatterns,
    config: ParserConfig,
}

impl LineScanner {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            patterns: RulePatterns::new()?,
            config: config.clone(),
        })
    }

    /// Feed one trimmed candidate line.
    pub fn step(&self, state: ParserState, line: &str) -> Step {
        if self.is_excluded(line) {
            return Step::excluded(state);
        }

        let state = match self.patterns.plan_on_line(line) {
            Some(plan) => state.with_plan(plan),
            None => state,
        };

        let emitted = EMISSION_ORDER
            .iter()
            .find_map(|rule| rule.apply(&self.patterns, &self.config, &state, line));
        if let Some(record) = emitted {
            debug!(
                name = %record.name,
                plan = record.plan_type.label(),
                value = record.value,
                "fund record"
            );
            return Step::emitted(record);
        }

        Step::tracked(self.track_scheme_name(state, line))
    }

    /// Fold `step` over `lines`, appending records to `out`.
    pub fn scan_lines<'a, I>(&self, state: ParserState, lines: I, out: &mut Vec<FundRecord>) -> ScanTally
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines.into_iter().fold(
            ScanTally {
                state,
                ..ScanTally::default()
            },
            |mut tally, line| {
                let step = self.step(tally.state, line);
                tally.lines += 1;
                if step.excluded {
                    tally.excluded += 1;
                }
                if let Some(record) = step.record {
                    out.push(record);
                }
                tally.state = step.state;
                tally
            },
        )
    }

    /// Scan a standalone line sequence from empty state.
    pub fn scan<'a, I>(&self, lines: I) -> Vec<FundRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Vec::new();
        self.scan_lines(ParserState::default(), lines, &mut out);
        out
    }

    fn is_excluded(&self, line: &str) -> bool {
        self.patterns.excluded.is_match(line)
            || (self.config.validates_header() && self.patterns.excluded_prefix.is_match(line))
    }

    /// Update the pending scheme name from a line that emitted nothing.
    fn track_scheme_name(&self, state: ParserState, line: &str) -> ParserState {
        let p = &self.patterns;

        // a new folio starts a new holding
        let state = if p.folio.is_match(line) {
            ParserState {
                pending_name: None,
                pending_plan: p.plan_on_line(line),
            }
        } else {
            state
        };

        if p.header_word.is_match(line) {
            return state;
        }
        if !(p.fund_keyword.is_match(line) || p.plan_keyword.is_match(line)) {
            return state;
        }
        if p.name_denied.is_match(line) {
            return state;
        }

        let candidate = match p.name_terminator.find(line) {
            Some(m) => &line[..m.start()],
            None => line,
        }
        .trim();
        if candidate.is_empty() {
            return state;
        }

        debug!(candidate, "scheme name candidate");
        state.with_name(candidate)
    }
}

/// Running totals of a scan, carrying the parser state between pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTally {
    pub state: ParserState,
    pub lines: usize,
    pub excluded: usize,
}
