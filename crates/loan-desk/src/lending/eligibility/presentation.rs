use serde::Serialize;

use super::policy::EligibilityDecision;
use super::EligibilityAssessment;

/// Color band for the risk meter, keyed by decision rather than score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterTone {
    Green,
    Yellow,
    Red,
}

impl MeterTone {
    pub const fn for_decision(decision: EligibilityDecision) -> Self {
        match decision {
            EligibilityDecision::Eligible => MeterTone::Green,
            EligibilityDecision::Review => MeterTone::Yellow,
            EligibilityDecision::Reject => MeterTone::Red,
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            MeterTone::Green => "#22C55E",
            MeterTone::Yellow => "#EAB308",
            MeterTone::Red => "#EF4444",
        }
    }
}

/// Render model for the risk meter bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMeter {
    pub fill_percent: u8,
    pub tone: MeterTone,
    pub color: &'static str,
    pub label: &'static str,
}

impl RiskMeter {
    pub fn for_assessment(assessment: &EligibilityAssessment) -> Self {
        let tone = MeterTone::for_decision(assessment.decision);
        Self {
            fill_percent: assessment.risk_score,
            tone,
            color: tone.hex(),
            label: assessment.decision.label(),
        }
    }
}
