use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::RiskSignals;

pub const MAX_RISK_SCORE: u8 = 100;

const REJECT_CREDIT_BELOW: u16 = 600;
const REJECT_DTI_ABOVE: f64 = 0.60;
const REJECT_RISK_FROM: u8 = 80;

const REVIEW_CREDIT_BELOW: u16 = 680;
const REVIEW_DTI_ABOVE: f64 = 0.45;
const REVIEW_RISK_FROM: u8 = 55;

const BASE_APR_PERCENT: f64 = 7.5;
const APR_PER_RISK_POINT: f64 = 0.08;

/// Pre-screening outcome shown beside the risk meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityDecision {
    Eligible,
    Review,
    Reject,
}

impl EligibilityDecision {
    pub const fn as_str(self) -> &'static str {
        match self {
            EligibilityDecision::Eligible => "ELIGIBLE",
            EligibilityDecision::Review => "REVIEW",
            EligibilityDecision::Reject => "REJECT",
        }
    }

    /// Chip text used by the preview panel.
    pub const fn label(self) -> &'static str {
        match self {
            EligibilityDecision::Eligible => "Eligible",
            EligibilityDecision::Review => "Needs review",
            EligibilityDecision::Reject => "High risk",
        }
    }
}

impl fmt::Display for EligibilityDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn clamp_risk(raw_total: u32) -> u8 {
    raw_total.min(u32::from(MAX_RISK_SCORE)) as u8
}

/// REJECT conditions are checked before REVIEW conditions.
pub(crate) fn decide_outcome(signals: &RiskSignals, risk_score: u8) -> EligibilityDecision {
    if signals.credit_score < REJECT_CREDIT_BELOW
        || signals.debt_to_income > REJECT_DTI_ABOVE
        || risk_score >= REJECT_RISK_FROM
    {
        return EligibilityDecision::Reject;
    }

    if signals.credit_score < REVIEW_CREDIT_BELOW
        || signals.debt_to_income > REVIEW_DTI_ABOVE
        || risk_score >= REVIEW_RISK_FROM
    {
        return EligibilityDecision::Review;
    }

    EligibilityDecision::Eligible
}

/// Affine in the risk score, rounded to the nearest tenth of a percent.
pub fn recommended_apr(risk_score: u8) -> f64 {
    let rate = BASE_APR_PERCENT + f64::from(risk_score) * APR_PER_RISK_POINT;
    (rate * 10.0).round() / 10.0
}
