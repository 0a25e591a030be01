use super::input::{ApplicantFinancialInput, EmploymentType};
use super::{RiskComponent, RiskFactor};

/// Intermediate ratios the decision policy needs alongside the raw total.
pub(crate) struct RiskSignals {
    pub debt_to_income: f64,
    pub credit_score: u16,
    pub raw_total: u32,
}

pub(crate) fn credit_points(credit_score: u16) -> u32 {
    match credit_score {
        780..=u16::MAX => 10,
        740..=779 => 20,
        700..=739 => 35,
        650..=699 => 50,
        _ => 70,
    }
}

pub(crate) fn debt_to_income_points(dti: f64) -> u32 {
    if dti <= 0.20 {
        5
    } else if dti <= 0.35 {
        20
    } else if dti <= 0.50 {
        40
    } else {
        60
    }
}

pub(crate) fn employment_points(employment: EmploymentType) -> u32 {
    match employment {
        EmploymentType::Salaried => 5,
        EmploymentType::SelfEmployed => 15,
        EmploymentType::Student => 25,
        EmploymentType::Unemployed => 35,
    }
}

pub(crate) fn loan_size_points(loan_to_annual_income: f64) -> u32 {
    if loan_to_annual_income <= 1.5 {
        5
    } else if loan_to_annual_income <= 3.0 {
        15
    } else {
        25
    }
}

/// Apply the four additive contributions in their fixed order.
pub(crate) fn score_input(input: &ApplicantFinancialInput) -> (Vec<RiskComponent>, RiskSignals) {
    let debt_to_income = input.debt_to_income();
    let loan_to_annual_income = input.loan_to_annual_income();
    let credit_score = input.credit_score();

    let components = vec![
        RiskComponent {
            factor: RiskFactor::CreditScore,
            points: credit_points(credit_score),
            notes: format!("credit score {credit_score}"),
        },
        RiskComponent {
            factor: RiskFactor::DebtToIncome,
            points: debt_to_income_points(debt_to_income),
            notes: format!("debt-to-income {:.2}", debt_to_income),
        },
        RiskComponent {
            factor: RiskFactor::Employment,
            points: employment_points(input.employment_type()),
            notes: format!("employment {}", input.employment_type()),
        },
        RiskComponent {
            factor: RiskFactor::LoanSize,
            points: loan_size_points(loan_to_annual_income),
            notes: format!("loan is {:.2}x annual income", loan_to_annual_income),
        },
    ];

    let raw_total = components.iter().map(|component| component.points).sum();

    let signals = RiskSignals {
        debt_to_income,
        credit_score,
        raw_total,
    };

    (components, signals)
}
