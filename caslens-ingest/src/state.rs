//! Carry-over state threaded through the line scan.
//!
//! Statements often print a scheme's name and plan on one line and its value
//! several lines (or a page) later, so both are held until a record is emitted.

use caslens_core::{FundRecord, PlanType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub pending_name: Option<String>,
    pub pending_plan: Option<PlanType>,
}

impl ParserState {
    /// Replace the pending plan type; the pending name is kept.
    pub fn with_plan(self, plan: PlanType) -> Self {
        Self {
            pending_plan: Some(plan),
            ..self
        }
    }

    /// Replace the pending name; newest evidence wins.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            pending_name: Some(name.into()),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending_name.is_none() && self.pending_plan.is_none()
    }
}

/// Result of feeding one line to the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: ParserState,
    pub record: Option<FundRecord>,
    /// The line hit an exclusion rule and was ignored
    pub excluded: bool,
}

impl Step {
    pub(crate) fn excluded(state: ParserState) -> Self {
        Self {
            state,
            record: None,
            excluded: true,
        }
    }

    /// Emission clears both pending fields.
    pub(crate) fn emitted(record: FundRecord) -> Self {
        Self {
            state: ParserState::default(),
            record: Some(record),
            excluded: false,
        }
    }

    pub(crate) fn tracked(state: ParserState) -> Self {
        Self {
            state,
            record: None,
            excluded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_seen_wins() {
        let state = ParserState::default()
            .with_name("Axis Bluechip Fund")
            .with_plan(PlanType::Regular)
            .with_plan(PlanType::Direct)
            .with_name("HDFC Index Fund");
        assert_eq!(state.pending_name.as_deref(), Some("HDFC Index Fund"));
        assert_eq!(state.pending_plan, Some(PlanType::Direct));
    }

    #[test]
    fn test_emission_clears_state() {
        let rec = FundRecord::new(
            "Axis Bluechip Fund",
            PlanType::Direct,
            1.0,
            caslens_core::RecordSource::IsinAnchor,
        )
        .unwrap();
        let step = Step::emitted(rec);
        assert!(step.state.is_empty());
        assert!(!step.excluded);
    }
}
