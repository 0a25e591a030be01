use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const MIN_CREDIT_SCORE: u16 = 300;
pub const MAX_CREDIT_SCORE: u16 = 850;

/// Employment categories offered by the application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    Salaried,
    SelfEmployed,
    Student,
    Unemployed,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 4] = [
        EmploymentType::Salaried,
        EmploymentType::SelfEmployed,
        EmploymentType::Student,
        EmploymentType::Unemployed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EmploymentType::Salaried => "SALARIED",
            EmploymentType::SelfEmployed => "SELF_EMPLOYED",
            EmploymentType::Student => "STUDENT",
            EmploymentType::Unemployed => "UNEMPLOYED",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = InputGap;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| InputGap::UnknownEmploymentType(raw.trim().to_string()))
    }
}

/// Declared reason for the loan. Carried to submission, never scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanPurpose {
    Home,
    Auto,
    Personal,
    Education,
    Medical,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 5] = [
        LoanPurpose::Home,
        LoanPurpose::Auto,
        LoanPurpose::Personal,
        LoanPurpose::Education,
        LoanPurpose::Medical,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LoanPurpose::Home => "HOME",
            LoanPurpose::Auto => "AUTO",
            LoanPurpose::Personal => "PERSONAL",
            LoanPurpose::Education => "EDUCATION",
            LoanPurpose::Medical => "MEDICAL",
        }
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanPurpose {
    type Err = InputGap;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|purpose| purpose.as_str() == normalized)
            .ok_or_else(|| InputGap::UnknownPurpose(raw.trim().to_string()))
    }
}

/// Scored form fields, used to name the field that failed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinancialField {
    LoanAmount,
    TenureMonths,
    MonthlyIncome,
    MonthlyDebt,
    CreditScore,
    EmploymentType,
}

impl FinancialField {
    pub const fn label(self) -> &'static str {
        match self {
            FinancialField::LoanAmount => "loan amount",
            FinancialField::TenureMonths => "tenure",
            FinancialField::MonthlyIncome => "monthly income",
            FinancialField::MonthlyDebt => "monthly debt",
            FinancialField::CreditScore => "credit score",
            FinancialField::EmploymentType => "employment type",
        }
    }
}

impl fmt::Display for FinancialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reason a set of form values cannot be scored yet.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputGap {
    #[error("{0} is empty")]
    Missing(FinancialField),
    #[error("{0} is not a finite number")]
    NotNumeric(FinancialField),
    #[error("{0} must be a whole number")]
    NotWholeNumber(FinancialField),
    #[error("{0} must be greater than zero")]
    NotPositive(FinancialField),
    #[error("{0} must not be negative")]
    Negative(FinancialField),
    #[error("credit score {0} outside {MIN_CREDIT_SCORE}..={MAX_CREDIT_SCORE}")]
    CreditScoreOutOfRange(f64),
    #[error("unknown employment type '{0}'")]
    UnknownEmploymentType(String),
    #[error("unknown loan purpose '{0}'")]
    UnknownPurpose(String),
}

/// Borrowed view over the raw text of the scored form fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinancialFields<'a> {
    pub loan_amount: &'a str,
    pub tenure_months: &'a str,
    pub monthly_income: &'a str,
    pub monthly_debt: &'a str,
    pub credit_score: &'a str,
    pub employment_type: &'a str,
    pub purpose: &'a str,
}

/// Validated applicant inputs. Construction enforces the scoring gate, so every
/// value held here can be scored without producing NaN or infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicantFinancialInput {
    loan_amount: f64,
    tenure_months: u32,
    monthly_income: f64,
    monthly_debt: f64,
    credit_score: u16,
    employment_type: EmploymentType,
    purpose: Option<LoanPurpose>,
}

impl ApplicantFinancialInput {
    pub fn try_new(
        loan_amount: f64,
        tenure_months: u32,
        monthly_income: f64,
        monthly_debt: f64,
        credit_score: u16,
        employment_type: EmploymentType,
        purpose: Option<LoanPurpose>,
    ) -> Result<Self, InputGap> {
        require_positive(FinancialField::LoanAmount, loan_amount)?;
        if tenure_months == 0 {
            return Err(InputGap::NotPositive(FinancialField::TenureMonths));
        }
        require_positive(FinancialField::MonthlyIncome, monthly_income)?;
        if !monthly_debt.is_finite() {
            return Err(InputGap::NotNumeric(FinancialField::MonthlyDebt));
        }
        if monthly_debt < 0.0 {
            return Err(InputGap::Negative(FinancialField::MonthlyDebt));
        }
        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&credit_score) {
            return Err(InputGap::CreditScoreOutOfRange(f64::from(credit_score)));
        }

        let input = Self {
            loan_amount,
            tenure_months,
            monthly_income,
            monthly_debt,
            credit_score,
            employment_type,
            purpose,
        };
        // A positive but vanishingly small income still overflows the ratios.
        if !input.debt_to_income().is_finite() || !input.loan_to_annual_income().is_finite() {
            return Err(InputGap::NotNumeric(FinancialField::MonthlyIncome));
        }
        Ok(input)
    }

    /// Parse raw form text. Every scored field must be present before any of
    /// them is parsed, matching the form's "can analyze" gate.
    pub fn from_fields(fields: &FinancialFields<'_>) -> Result<Self, InputGap> {
        let required = [
            (FinancialField::LoanAmount, fields.loan_amount),
            (FinancialField::TenureMonths, fields.tenure_months),
            (FinancialField::MonthlyIncome, fields.monthly_income),
            (FinancialField::MonthlyDebt, fields.monthly_debt),
            (FinancialField::CreditScore, fields.credit_score),
            (FinancialField::EmploymentType, fields.employment_type),
        ];
        if let Some((field, _)) = required.iter().find(|(_, raw)| raw.trim().is_empty()) {
            return Err(InputGap::Missing(*field));
        }

        let loan_amount = parse_number(FinancialField::LoanAmount, fields.loan_amount)?;
        let tenure = parse_number(FinancialField::TenureMonths, fields.tenure_months)?;
        let monthly_income = parse_number(FinancialField::MonthlyIncome, fields.monthly_income)?;
        let monthly_debt = parse_number(FinancialField::MonthlyDebt, fields.monthly_debt)?;
        let credit = parse_number(FinancialField::CreditScore, fields.credit_score)?;
        let employment_type = fields.employment_type.parse::<EmploymentType>()?;
        let purpose = fields.purpose.parse::<LoanPurpose>().ok();

        if tenure <= 0.0 {
            return Err(InputGap::NotPositive(FinancialField::TenureMonths));
        }
        let tenure_months = whole_number(FinancialField::TenureMonths, tenure, u32::MAX)?;

        if !(f64::from(MIN_CREDIT_SCORE)..=f64::from(MAX_CREDIT_SCORE)).contains(&credit) {
            return Err(InputGap::CreditScoreOutOfRange(credit));
        }
        let credit_score = whole_number(FinancialField::CreditScore, credit, u32::MAX)? as u16;

        Self::try_new(
            loan_amount,
            tenure_months,
            monthly_income,
            monthly_debt,
            credit_score,
            employment_type,
            purpose,
        )
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    pub fn monthly_income(&self) -> f64 {
        self.monthly_income
    }

    pub fn monthly_debt(&self) -> f64 {
        self.monthly_debt
    }

    pub fn credit_score(&self) -> u16 {
        self.credit_score
    }

    pub fn employment_type(&self) -> EmploymentType {
        self.employment_type
    }

    pub fn purpose(&self) -> Option<LoanPurpose> {
        self.purpose
    }

    pub fn debt_to_income(&self) -> f64 {
        self.monthly_debt / self.monthly_income
    }

    pub fn loan_to_annual_income(&self) -> f64 {
        self.loan_amount / (self.monthly_income * 12.0)
    }
}

pub(crate) fn parse_number(field: FinancialField, raw: &str) -> Result<f64, InputGap> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputGap::Missing(field));
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InputGap::NotNumeric(field)),
    }
}

fn require_positive(field: FinancialField, value: f64) -> Result<(), InputGap> {
    if !value.is_finite() {
        return Err(InputGap::NotNumeric(field));
    }
    if value <= 0.0 {
        return Err(InputGap::NotPositive(field));
    }
    Ok(())
}

fn whole_number(field: FinancialField, value: f64, max: u32) -> Result<u32, InputGap> {
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(max) {
        return Err(InputGap::NotWholeNumber(field));
    }
    Ok(value as u32)
}
