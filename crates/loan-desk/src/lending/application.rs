//! Loan application form state: progress, wizard gating, live preview, and the
//! submission payload.

use serde::{Deserialize, Serialize};

use super::eligibility::{
    parse_number, EligibilityEngine, EmploymentType, FinancialField, FinancialFields, LoanPurpose,
    ScoreBreakdown, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE,
};
use super::loans::LoanRequest;

/// Raw text of every form control, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanApplicationForm {
    pub full_name: String,
    pub amount: String,
    pub tenure: String,
    pub monthly_income: String,
    pub monthly_debt: String,
    pub credit_score: String,
    pub employment_type: String,
    pub purpose: String,
}

impl Default for LoanApplicationForm {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            amount: String::new(),
            tenure: String::new(),
            monthly_income: String::new(),
            monthly_debt: String::new(),
            credit_score: String::new(),
            employment_type: EmploymentType::Salaried.as_str().to_string(),
            purpose: LoanPurpose::Personal.as_str().to_string(),
        }
    }
}

/// Three-step wizard used by the application page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    Applicant,
    Financials,
    Review,
}

impl FormStep {
    pub const ALL: [FormStep; 3] = [FormStep::Applicant, FormStep::Financials, FormStep::Review];

    pub const fn label(self) -> &'static str {
        match self {
            FormStep::Applicant => "Applicant",
            FormStep::Financials => "Financials",
            FormStep::Review => "Review",
        }
    }

    pub const fn next(self) -> Option<FormStep> {
        match self {
            FormStep::Applicant => Some(FormStep::Financials),
            FormStep::Financials => Some(FormStep::Review),
            FormStep::Review => None,
        }
    }
}

/// Submission-time validation failure, worded for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter your full name.")]
    MissingName,
    #[error("Please fill all numeric fields correctly.")]
    InvalidNumber,
    #[error("Loan amount and tenure must be greater than 0.")]
    NonPositiveLoanTerms,
    #[error("Monthly income must be greater than 0.")]
    NonPositiveIncome,
    #[error("Credit score must be between 300 and 850.")]
    CreditScoreOutOfRange,
    #[error("Please choose a valid employment type and purpose.")]
    InvalidSelection,
}

const COMPLETION_WEIGHTS: [(FormControl, u8); 8] = [
    (FormControl::FullName, 25),
    (FormControl::Amount, 15),
    (FormControl::Tenure, 15),
    (FormControl::MonthlyIncome, 15),
    (FormControl::MonthlyDebt, 10),
    (FormControl::CreditScore, 10),
    (FormControl::EmploymentType, 5),
    (FormControl::Purpose, 5),
];

#[derive(Debug, Clone, Copy)]
enum FormControl {
    FullName,
    Amount,
    Tenure,
    MonthlyIncome,
    MonthlyDebt,
    CreditScore,
    EmploymentType,
    Purpose,
}

impl LoanApplicationForm {
    fn control(&self, control: FormControl) -> &str {
        match control {
            FormControl::FullName => &self.full_name,
            FormControl::Amount => &self.amount,
            FormControl::Tenure => &self.tenure,
            FormControl::MonthlyIncome => &self.monthly_income,
            FormControl::MonthlyDebt => &self.monthly_debt,
            FormControl::CreditScore => &self.credit_score,
            FormControl::EmploymentType => &self.employment_type,
            FormControl::Purpose => &self.purpose,
        }
    }

    /// Weighted share of filled controls, independent of the risk score.
    pub fn completion(&self) -> u8 {
        let total: u32 = COMPLETION_WEIGHTS
            .iter()
            .filter(|(control, _)| !self.control(*control).trim().is_empty())
            .map(|(_, weight)| u32::from(*weight))
            .sum();
        total.min(100) as u8
    }

    pub fn step_complete(&self, step: FormStep) -> bool {
        match step {
            FormStep::Applicant => self.full_name.trim().chars().count() > 1,
            FormStep::Financials => [
                &self.amount,
                &self.tenure,
                &self.monthly_income,
                &self.monthly_debt,
                &self.credit_score,
            ]
            .iter()
            .all(|value| !value.trim().is_empty()),
            FormStep::Review => true,
        }
    }

    pub fn financial_fields(&self) -> FinancialFields<'_> {
        FinancialFields {
            loan_amount: &self.amount,
            tenure_months: &self.tenure,
            monthly_income: &self.monthly_income,
            monthly_debt: &self.monthly_debt,
            credit_score: &self.credit_score,
            employment_type: &self.employment_type,
            purpose: &self.purpose,
        }
    }

    /// Live preview for the current values; `None` while the form is incomplete.
    pub fn preview(&self) -> Option<ScoreBreakdown> {
        EligibilityEngine::new().preview(&self.financial_fields())
    }

    /// Validate for submission. The payload carries raw inputs only.
    pub fn to_request(&self) -> Result<LoanRequest, FormError> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(FormError::MissingName);
        }

        let number = |field: FinancialField, raw: &str| {
            parse_number(field, raw).map_err(|_| FormError::InvalidNumber)
        };
        let amount = number(FinancialField::LoanAmount, &self.amount)?;
        let tenure = number(FinancialField::TenureMonths, &self.tenure)?;
        let monthly_income = number(FinancialField::MonthlyIncome, &self.monthly_income)?;
        let monthly_debt = number(FinancialField::MonthlyDebt, &self.monthly_debt)?;
        let credit_score = number(FinancialField::CreditScore, &self.credit_score)?;

        if amount <= 0.0 || tenure <= 0.0 {
            return Err(FormError::NonPositiveLoanTerms);
        }
        if monthly_income <= 0.0 {
            return Err(FormError::NonPositiveIncome);
        }
        if credit_score < f64::from(MIN_CREDIT_SCORE) || credit_score > f64::from(MAX_CREDIT_SCORE)
        {
            return Err(FormError::CreditScoreOutOfRange);
        }
        if tenure.fract() != 0.0 || tenure > f64::from(u32::MAX) || credit_score.fract() != 0.0 {
            return Err(FormError::InvalidNumber);
        }

        let employment_type = self
            .employment_type
            .parse::<EmploymentType>()
            .map_err(|_| FormError::InvalidSelection)?;
        let purpose = self
            .purpose
            .parse::<LoanPurpose>()
            .map_err(|_| FormError::InvalidSelection)?;

        Ok(LoanRequest {
            full_name: full_name.to_string(),
            amount,
            tenure: tenure as u32,
            monthly_income,
            monthly_debt,
            credit_score: credit_score as u16,
            employment_type,
            purpose,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
