//! Async HTTP client for the loan backend.
//!
//! Every request carries the session's bearer token when one is held. Failed
//! calls leave the session untouched, except `logout`.

mod error;

pub use error::ClientError;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BackendConfig;
use crate::lending::{
    AdminMetrics, AdminUser, LoanApplication, LoanId, LoanListQuery, LoanListing, LoanRequest,
    LoanStatus, ReviewAction, UpdateActiveRequest, UpdateRoleRequest, UserDirectoryFilter,
};
use crate::session::{Role, Session, SessionContext};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LoginResponse {
    token: String,
    username: String,
    role: Role,
}

#[derive(Debug, Clone)]
pub struct LoanDeskClient {
    http: reqwest::Client,
    backend: BackendConfig,
    session: SessionContext,
}

impl LoanDeskClient {
    pub fn new(backend: &BackendConfig, session: SessionContext) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(backend.timeout())
            .build()?;
        Ok(Self {
            http,
            backend: backend.clone(),
            session,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let request = self.request(Method::POST, "/api/auth/register").json(credentials);
        self.send(request, "/api/auth/register").await?;
        info!(username = %credentials.username, "account registered");
        Ok(())
    }

    /// Authenticate and initialise the shared session.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let endpoint = "/api/auth/login";
        let request = self.request(Method::POST, endpoint).json(credentials);
        let response = self.send(request, endpoint).await?;
        let login: LoginResponse = decode(response, endpoint).await?;

        self.session
            .init(login.token, login.role, login.username)?;
        let session = self.session.require()?;
        info!(username = %session.username, role = %session.role, "logged in");
        Ok(session)
    }

    pub fn logout(&self) {
        self.session.teardown();
        info!("logged out");
    }

    /// Submit raw applicant inputs. The backend's decision is not exposed here.
    pub async fn submit_application(
        &self,
        request: &LoanRequest,
    ) -> Result<Option<LoanApplication>, ClientError> {
        let endpoint = "/api/loans/apply";
        let builder = self.request(Method::POST, endpoint).json(request);
        let response = self.send(builder, endpoint).await?;
        let body = response.bytes().await?;
        match serde_json::from_slice::<LoanApplication>(&body) {
            Ok(loan) => Ok(Some(loan)),
            Err(err) => {
                debug!(endpoint, error = %err, "submission response not a loan record");
                Ok(None)
            }
        }
    }

    pub async fn list_loans(
        &self,
        query: &LoanListQuery,
    ) -> Result<Vec<LoanApplication>, ClientError> {
        let endpoint = "/api/loans";
        let request = self.request(Method::GET, endpoint).query(&query.to_pairs());
        let response = self.send(request, endpoint).await?;
        let listing: LoanListing = decode(response, endpoint).await?;
        let loans = listing.into_loans();
        debug!(count = loans.len(), status = ?query.status, "loans loaded");
        Ok(loans)
    }

    pub async fn approve_loan(&self, id: LoanId) -> Result<(), ClientError> {
        self.review_by_id(id, ReviewAction::Approve).await
    }

    pub async fn reject_loan(&self, id: LoanId) -> Result<(), ClientError> {
        self.review_by_id(id, ReviewAction::Reject).await
    }

    /// Guarded review: only loans currently SUBMITTED reach the backend.
    pub async fn review(
        &self,
        loan: &LoanApplication,
        action: ReviewAction,
    ) -> Result<LoanStatus, ClientError> {
        let next = loan.check_review(action)?;
        self.review_by_id(loan.id, action).await?;
        Ok(next)
    }

    async fn review_by_id(&self, id: LoanId, action: ReviewAction) -> Result<(), ClientError> {
        let endpoint = format!("/api/loans/{id}/{}", action.path_segment());
        let request = self.request(Method::PATCH, &endpoint);
        self.send(request, &endpoint).await?;
        info!(loan_id = %id, "loan {}", action.past_tense());
        Ok(())
    }

    pub async fn admin_metrics(&self) -> Result<AdminMetrics, ClientError> {
        let endpoint = "/api/admin/metrics";
        let response = self.send(self.request(Method::GET, endpoint), endpoint).await?;
        decode(response, endpoint).await
    }

    pub async fn list_users(
        &self,
        filter: &UserDirectoryFilter,
    ) -> Result<Vec<AdminUser>, ClientError> {
        let endpoint = "/api/admin/users";
        let request = self.request(Method::GET, endpoint).query(&filter.to_pairs());
        let response = self.send(request, endpoint).await?;
        decode(response, endpoint).await
    }

    pub async fn update_user_role(&self, user_id: u64, role: Role) -> Result<(), ClientError> {
        let endpoint = format!("/api/admin/users/{user_id}/role");
        let request = self
            .request(Method::PUT, &endpoint)
            .json(&UpdateRoleRequest { role });
        self.send(request, &endpoint).await?;
        info!(user_id, %role, "user role updated");
        Ok(())
    }

    pub async fn update_user_active(&self, user_id: u64, active: bool) -> Result<(), ClientError> {
        let endpoint = format!("/api/admin/users/{user_id}/active");
        let request = self
            .request(Method::PUT, &endpoint)
            .json(&UpdateActiveRequest { active });
        self.send(request, &endpoint).await?;
        info!(user_id, active, "user activation updated");
        Ok(())
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let request = self.http.request(method, self.backend.endpoint(endpoint));
        match self.session.bearer() {
            Some(bearer) => request.header(AUTHORIZATION, bearer),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Response, ClientError> {
        debug!(endpoint, "calling loan backend");
        let response = request.send().await.map_err(|err| {
            warn!(endpoint, error = %err, "loan backend unreachable");
            ClientError::Transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = error::extract_message(&body);
        warn!(
            endpoint,
            status = status.as_u16(),
            message = message.as_deref().unwrap_or("-"),
            "loan backend rejected request"
        );
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, ClientError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
