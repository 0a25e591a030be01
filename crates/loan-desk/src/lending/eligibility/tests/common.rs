use axum::response::Response;
use serde_json::Value;

use crate::lending::application::LoanApplicationForm;
use crate::lending::eligibility::{ApplicantFinancialInput, EmploymentType, LoanPurpose};

pub(super) fn form(
    amount: &str,
    monthly_income: &str,
    monthly_debt: &str,
    credit_score: &str,
    employment_type: &str,
) -> LoanApplicationForm {
    LoanApplicationForm {
        full_name: "Avery Chen".to_string(),
        amount: amount.to_string(),
        tenure: "36".to_string(),
        monthly_income: monthly_income.to_string(),
        monthly_debt: monthly_debt.to_string(),
        credit_score: credit_score.to_string(),
        employment_type: employment_type.to_string(),
        purpose: "PERSONAL".to_string(),
    }
}

/// Prime salaried borrower with no debt and a small loan.
pub(super) fn prime_form() -> LoanApplicationForm {
    form("5000", "5000", "0", "850", "SALARIED")
}

/// Subprime, over-leveraged, unemployed borrower asking for a large loan.
pub(super) fn distressed_form() -> LoanApplicationForm {
    form("100000", "2000", "1500", "550", "UNEMPLOYED")
}

/// Mid-tier self-employed borrower that lands in manual review.
pub(super) fn review_form() -> LoanApplicationForm {
    form("8000", "4000", "1200", "710", "SELF_EMPLOYED")
}

pub(super) fn input(
    loan_amount: f64,
    monthly_income: f64,
    monthly_debt: f64,
    credit_score: u16,
    employment_type: EmploymentType,
) -> ApplicantFinancialInput {
    ApplicantFinancialInput::try_new(
        loan_amount,
        24,
        monthly_income,
        monthly_debt,
        credit_score,
        employment_type,
        Some(LoanPurpose::Personal),
    )
    .expect("valid applicant input")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
