//! Loan records as exchanged with the loan backend, plus the review lifecycle
//! and the list helpers the dashboards share.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::eligibility::{EmploymentType, LoanPurpose};

/// Backend-assigned loan identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle tracked by the backend. Must match its enum exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Submitted,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Submitted => "SUBMITTED",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Rejected => "REJECTED",
        }
    }

    /// Display label used by every dashboard.
    pub const fn label(self) -> &'static str {
        match self {
            LoanStatus::Submitted => "Pending",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
        }
    }

    pub const fn is_reviewable(self) -> bool {
        matches!(self, LoanStatus::Submitted)
    }

    /// Status reached by applying `action`; only submitted loans can move.
    pub fn review(self, action: ReviewAction) -> Result<LoanStatus, ReviewError> {
        if !self.is_reviewable() {
            return Err(ReviewError::NotReviewable {
                status: self,
                action,
            });
        }
        Ok(match action {
            ReviewAction::Approve => LoanStatus::Approved,
            ReviewAction::Reject => LoanStatus::Rejected,
        })
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUBMITTED" => Ok(LoanStatus::Submitted),
            "APPROVED" => Ok(LoanStatus::Approved),
            "REJECTED" => Ok(LoanStatus::Rejected),
            other => Err(format!("unknown loan status '{other}'")),
        }
    }
}

/// Analyst or admin decision on a submitted loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub const fn path_segment(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approve",
            ReviewAction::Reject => "reject",
        }
    }

    pub const fn past_tense(self) -> &'static str {
        match self {
            ReviewAction::Approve => "approved",
            ReviewAction::Reject => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("cannot {} a loan that is {}; actions are available only when the status is SUBMITTED", .action.path_segment(), .status.label())]
    NotReviewable {
        status: LoanStatus,
        action: ReviewAction,
    },
    #[error("loan has no status yet")]
    UnknownStatus,
}

/// Submission payload: raw applicant inputs, never the preview output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    pub full_name: String,
    pub amount: f64,
    pub tenure: u32,
    pub monthly_income: f64,
    pub monthly_debt: f64,
    pub credit_score: u16,
    pub employment_type: EmploymentType,
    pub purpose: LoanPurpose,
}

/// Loan record returned by the backend. Only `id` is guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: LoanId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenure: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility_decision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_username: Option<String>,
}

impl LoanApplication {
    pub fn status_label(&self) -> &'static str {
        self.status.map(LoanStatus::label).unwrap_or("-")
    }

    /// Guard used before firing an approve/reject request.
    pub fn check_review(&self, action: ReviewAction) -> Result<LoanStatus, ReviewError> {
        self.status
            .ok_or(ReviewError::UnknownStatus)?
            .review(action)
    }

    pub fn applicant(&self) -> Option<&str> {
        self.applicant_username
            .as_deref()
            .or(self.username.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Paging, sorting, and filtering for the loan collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanListQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub direction: SortDirection,
    pub status: Option<LoanStatus>,
}

impl Default for LoanListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: "createdAt".to_string(),
            direction: SortDirection::Desc,
            status: None,
        }
    }
}

impl LoanListQuery {
    /// Analyst and admin review queues start on the pending filter.
    pub fn review_queue(size: u32) -> Self {
        Self {
            size,
            status: Some(LoanStatus::Submitted),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: Option<LoanStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("direction", self.direction.as_str().to_string()),
        ];
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

/// The loan collection arrives either as a bare array or as a page envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LoanListing {
    Bare(Vec<LoanApplication>),
    Page(LoanPage),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPage {
    #[serde(default)]
    pub content: Vec<LoanApplication>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
}

impl LoanListing {
    pub fn into_loans(self) -> Vec<LoanApplication> {
        match self {
            LoanListing::Bare(loans) => loans,
            LoanListing::Page(page) => page.content,
        }
    }
}

/// Per-status counts shown above each loan table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub total: usize,
    pub submitted: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl StatusTally {
    pub fn from_loans(loans: &[LoanApplication]) -> Self {
        loans.iter().fold(Self::default(), |mut tally, loan| {
            tally.total += 1;
            match loan.status {
                Some(LoanStatus::Submitted) => tally.submitted += 1,
                Some(LoanStatus::Approved) => tally.approved += 1,
                Some(LoanStatus::Rejected) => tally.rejected += 1,
                None => {}
            }
            tally
        })
    }
}

/// Local name/id filter; never affects what the backend returns.
pub fn search<'a>(loans: &'a [LoanApplication], needle: &str) -> Vec<&'a LoanApplication> {
    let needle = needle.trim().to_lowercase();
    loans
        .iter()
        .filter(|loan| {
            needle.is_empty()
                || loan
                    .full_name
                    .as_deref()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&needle)
                || loan.id.to_string().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loan(id: u64, name: &str, status: Option<LoanStatus>) -> LoanApplication {
        LoanApplication {
            id: LoanId(id),
            full_name: Some(name.to_string()),
            amount: Some(5000.0),
            tenure: Some(12),
            interest_rate: None,
            risk_score: None,
            eligibility_decision: None,
            status,
            created_at: None,
            username: None,
            applicant_username: None,
        }
    }

    #[test]
    fn only_submitted_loans_are_reviewable() {
        assert_eq!(
            LoanStatus::Submitted.review(ReviewAction::Approve),
            Ok(LoanStatus::Approved)
        );
        assert_eq!(
            LoanStatus::Submitted.review(ReviewAction::Reject),
            Ok(LoanStatus::Rejected)
        );
        assert!(matches!(
            LoanStatus::Approved.review(ReviewAction::Reject),
            Err(ReviewError::NotReviewable { .. })
        ));
        assert_eq!(
            loan(1, "A", None).check_review(ReviewAction::Approve),
            Err(ReviewError::UnknownStatus)
        );
    }

    #[test]
    fn listing_accepts_bare_arrays_and_envelopes() {
        let bare: LoanListing =
            serde_json::from_value(json!([{ "id": 1, "status": "SUBMITTED" }])).expect("bare");
        let page: LoanListing = serde_json::from_value(json!({
            "content": [{ "id": 2, "status": "APPROVED", "createdAt": "2025-01-04T10:15:30" }],
            "totalElements": 1,
            "totalPages": 1,
            "number": 0
        }))
        .expect("page");

        assert_eq!(bare.into_loans()[0].id, LoanId(1));
        let loans = page.into_loans();
        assert_eq!(loans[0].status, Some(LoanStatus::Approved));
        assert!(loans[0].created_at.is_some());
    }

    #[test]
    fn envelope_without_content_is_empty() {
        let listing: LoanListing = serde_json::from_value(json!({ "totalElements": 0 }))
            .expect("envelope parses");
        assert!(listing.into_loans().is_empty());
    }

    #[test]
    fn query_omits_absent_status() {
        let pairs = LoanListQuery::default().to_pairs();
        assert!(pairs.iter().all(|(key, _)| *key != "status"));
        assert!(pairs.contains(&("sortBy", "createdAt".to_string())));

        let pairs = LoanListQuery::review_queue(25).to_pairs();
        assert!(pairs.contains(&("status", "SUBMITTED".to_string())));
        assert!(pairs.contains(&("size", "25".to_string())));
    }

    #[test]
    fn tally_and_search() {
        let loans = vec![
            loan(7, "Avery Chen", Some(LoanStatus::Submitted)),
            loan(12, "Mina Patel", Some(LoanStatus::Approved)),
            loan(31, "Luis Ortega", Some(LoanStatus::Rejected)),
            loan(44, "Sam Avery", Some(LoanStatus::Submitted)),
        ];

        let tally = StatusTally::from_loans(&loans);
        assert_eq!(
            tally,
            StatusTally {
                total: 4,
                submitted: 2,
                approved: 1,
                rejected: 1
            }
        );

        let hits: Vec<u64> = search(&loans, "AVERY").iter().map(|l| l.id.0).collect();
        assert_eq!(hits, vec![7, 44]);
        let hits: Vec<u64> = search(&loans, "31").iter().map(|l| l.id.0).collect();
        assert_eq!(hits, vec![31]);
        assert_eq!(search(&loans, "  ").len(), 4);
    }

    #[test]
    fn status_labels() {
        assert_eq!(LoanStatus::Submitted.label(), "Pending");
        assert_eq!(loan(1, "A", None).status_label(), "-");
    }
}
