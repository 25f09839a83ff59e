//! Portfolio summary: folds fund records into totals by plan type and
//! estimates the commission avoidable by moving to direct plans.

use serde::{Deserialize, Serialize};

use crate::holdings::{FundRecord, PlanType};

/// Approximate yearly distributor commission charged on regular plans
pub const DEFAULT_SAVINGS_RATE: f64 = 0.01;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub direct_value: f64,
    pub regular_value: f64,
    pub funds: Vec<FundRecord>,
    /// `regular_value * savings_rate`
    pub potential_savings: f64,
}

impl PortfolioSummary {
    /// Aggregate records. Pure: the same input always yields the same summary.
    ///
    /// `Unknown` records count toward `total_value` only.
    pub fn aggregate(funds: Vec<FundRecord>, savings_rate: f64) -> Self {
        let total_value: f64 = funds.iter().map(|f| f.value).sum();
        let direct_value = sum_for(&funds, PlanType::Direct);
        let regular_value = sum_for(&funds, PlanType::Regular);

        Self {
            total_value,
            direct_value,
            regular_value,
            potential_savings: regular_value * savings_rate,
            funds,
        }
    }

    /// True when the scan identified no holdings. Callers should report this
    /// to the user rather than treat it as success.
    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    /// Value held in records whose plan type could not be determined
    pub fn unknown_value(&self) -> f64 {
        sum_for(&self.funds, PlanType::Unknown)
    }

    /// Fraction of the portfolio held in direct plans (0 for an empty portfolio)
    pub fn direct_share(&self) -> f64 {
        if self.total_value > 0.0 {
            self.direct_value / self.total_value
        } else {
            0.0
        }
    }

    pub fn placeholder_count(&self) -> usize {
        self.funds.iter().filter(|f| f.is_placeholder()).count()
    }
}

fn sum_for(funds: &[FundRecord], plan_type: PlanType) -> f64 {
    funds
        .iter()
        .filter(|f| f.plan_type == plan_type)
        .map(|f| f.value)
        .sum()
}
