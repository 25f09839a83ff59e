//! caslens-ingest: Consolidated Account Statement text extraction.
//!
//! Pipeline: decrypt and read page text ([`text_layer`]), join fragments per
//! page ([`normalize`]), split into candidate rows ([`splitter`]), run the
//! extraction state machine over the rows ([`scanner`]), then aggregate the
//! emitted fund records ([`caslens_core::PortfolioSummary`]).

pub mod config;
pub mod error;
pub mod normalize;
pub mod rules;
pub mod scanner;
pub mod splitter;
pub mod state;
pub mod statement;
pub mod tables;
pub mod text_layer;

pub use config::{ParserConfig, StatementVariant, UnnamedValuePolicy};
pub use error::CasError;
pub use scanner::LineScanner;
pub use state::{ParserState, Step};
pub use statement::{parse_statement, ScanReport, StatementParser};
pub use text_layer::{LopdfTextLayer, MemoryTextLayer, TextLayer};
