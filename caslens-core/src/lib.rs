//! caslens-core: Fund holding and portfolio summary types for CAS parsing

pub mod holdings;
pub mod summary;

pub use holdings::{FundRecord, PlanType, RecordSource};
pub use summary::{PortfolioSummary, DEFAULT_SAVINGS_RATE};
