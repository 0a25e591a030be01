//! Loan application domain: the eligibility preview, the application form, and
//! the payloads exchanged with the loan backend.

pub mod admin;
pub mod application;
pub mod eligibility;
pub mod loans;
pub mod router;

pub use admin::{
    AdminMetrics, AdminUser, UpdateActiveRequest, UpdateRoleRequest, UserCounts,
    UserDirectoryFilter,
};
pub use application::{FormError, FormStep, LoanApplicationForm};
pub use eligibility::{
    assess, preview, ApplicantFinancialInput, EligibilityAssessment, EligibilityDecision,
    EligibilityEngine, EmploymentType, FinancialFields, InputGap, LoanPurpose, RiskComponent,
    RiskFactor, RiskMeter, ScoreBreakdown,
};
pub use loans::{
    LoanApplication, LoanId, LoanListQuery, LoanListing, LoanRequest, LoanStatus, ReviewAction,
    ReviewError, SortDirection, StatusTally,
};
pub use router::{eligibility_router, PreviewResponse};
