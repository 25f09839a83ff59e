//! Registrar-aware line splitting.
//!
//! Summary statements interleave fund blocks from several registrars with no
//! reliable row delimiter, but every row starts with the registrar's name.
//! Detailed statements lack those anchors and rely on wide visual gaps, which
//! survive extraction as runs of whitespace.

use regex::Regex;

use crate::config::ParserConfig;
use crate::error::Result;
use crate::tables::{alternation, REGISTRAR_ANCHORS};

pub struct LineSplitter {
    anchors: Regex,
    gaps: Regex,
    min_registrar_chunks: usize,
    min_line_len: usize,
}

impl LineSplitter {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            anchors: Regex::new(&format!("(?i){}", alternation(REGISTRAR_ANCHORS)))?,
            gaps: Regex::new(r"\s{2,}")?,
            min_registrar_chunks: config.min_registrar_chunks,
            min_line_len: config.min_line_len,
        })
    }

    /// Raw chunks of a page, before trimming and noise filtering.
    pub fn chunks<'a>(&self, page_text: &'a str) -> Vec<&'a str> {
        let by_registrar = split_before(page_text, &self.anchors);
        if by_registrar.len() >= self.min_registrar_chunks {
            return by_registrar;
        }
        self.gaps.split(page_text).collect()
    }

    /// Trimmed candidate lines long enough to be worth matching.
    pub fn candidate_lines<'a>(&self, page_text: &'a str) -> Vec<&'a str> {
        self.chunks(page_text)
            .into_iter()
            .map(str::trim)
            .filter(|line| line.chars().count() >= self.min_line_len)
            .collect()
    }
}

/// Split at the start of every match; the matched text begins the next chunk.
fn split_before<'a>(text: &'a str, re: &Regex) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in re.find_iter(text) {
        if m.start() > start {
            out.push(&text[start..m.start()]);
            start = m.start();
        }
    }
    out.push(&text[start..]);
    out
}
