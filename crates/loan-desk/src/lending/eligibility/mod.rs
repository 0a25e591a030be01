//! Client-side eligibility pre-scoring.
//!
//! The preview is a pure projection of the visible form values: four additive
//! risk contributions, a clamped score, an ordered REJECT/REVIEW/ELIGIBLE
//! decision, and an APR derived from the score. It is never authoritative and is
//! never sent to the backend.

mod input;
mod policy;
pub mod presentation;
mod rules;

#[cfg(test)]
mod tests;

pub use input::{
    ApplicantFinancialInput, EmploymentType, FinancialField, FinancialFields, InputGap,
    LoanPurpose, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE,
};
pub use policy::{recommended_apr, EligibilityDecision, MAX_RISK_SCORE};
pub use presentation::{MeterTone, RiskMeter};

pub(crate) use input::parse_number;

use policy::{clamp_risk, decide_outcome};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless evaluator; every call recomputes the assessment from scratch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEngine;

impl EligibilityEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, input: &ApplicantFinancialInput) -> EligibilityAssessment {
        self.explain(input).assessment
    }

    /// Assessment plus the per-factor contributions that produced it.
    pub fn explain(&self, input: &ApplicantFinancialInput) -> ScoreBreakdown {
        let (components, signals) = rules::score_input(input);
        let risk_score = clamp_risk(signals.raw_total);
        let decision = decide_outcome(&signals, risk_score);

        ScoreBreakdown {
            assessment: EligibilityAssessment {
                debt_to_income_ratio: signals.debt_to_income,
                risk_score,
                decision,
                recommended_apr_percent: recommended_apr(risk_score),
            },
            raw_total: signals.raw_total,
            components,
        }
    }

    /// Gate raw form text and score it, or report that no preview is available.
    pub fn preview(&self, fields: &FinancialFields<'_>) -> Option<ScoreBreakdown> {
        match ApplicantFinancialInput::from_fields(fields) {
            Ok(input) => Some(self.explain(&input)),
            Err(gap) => {
                debug!(%gap, "eligibility preview unavailable");
                None
            }
        }
    }
}

pub fn assess(input: &ApplicantFinancialInput) -> EligibilityAssessment {
    EligibilityEngine.assess(input)
}

pub fn preview(fields: &FinancialFields<'_>) -> Option<EligibilityAssessment> {
    EligibilityEngine
        .preview(fields)
        .map(|breakdown| breakdown.assessment)
}

/// Derived preview values. Always replaced wholesale, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityAssessment {
    pub debt_to_income_ratio: f64,
    pub risk_score: u8,
    pub decision: EligibilityDecision,
    pub recommended_apr_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    CreditScore,
    DebtToIncome,
    Employment,
    LoanSize,
}

/// One additive contribution to the risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub points: u32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub assessment: EligibilityAssessment,
    /// Sum of the components before clamping.
    pub raw_total: u32,
    pub components: Vec<RiskComponent>,
}
