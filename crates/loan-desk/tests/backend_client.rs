//! Client behavior against an in-process stand-in for the loan backend.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, patch, post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use loan_desk::client::LoanDeskClient;
    use loan_desk::config::BackendConfig;
    use loan_desk::session::SessionContext;

    #[derive(Debug, Clone)]
    pub struct Recorded {
        pub call: String,
        pub authorization: Option<String>,
        pub query: HashMap<String, String>,
        pub body: Option<Value>,
    }

    #[derive(Default)]
    pub struct Recorder {
        calls: Mutex<Vec<Recorded>>,
    }

    impl Recorder {
        fn push(
            &self,
            call: String,
            headers: &HeaderMap,
            query: HashMap<String, String>,
            body: Option<Value>,
        ) {
            let authorization = headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            self.calls.lock().expect("recorder lock").push(Recorded {
                call,
                authorization,
                query,
                body,
            });
        }

        pub fn calls(&self) -> Vec<Recorded> {
            self.calls.lock().expect("recorder lock").clone()
        }

        pub fn last(&self, call: &str) -> Option<Recorded> {
            self.calls().into_iter().rev().find(|recorded| recorded.call == call)
        }
    }

    type Shared = Arc<Recorder>;

    fn loan(id: u64, name: &str, status: &str) -> Value {
        json!({
            "id": id,
            "fullName": name,
            "amount": 8000.0,
            "tenure": 24,
            "status": status,
            "createdAt": "2025-03-14T09:30:00"
        })
    }

    async fn login(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        recorder.push("login".into(), &headers, HashMap::new(), Some(body.clone()));
        match (body["username"].as_str(), body["password"].as_str()) {
            (Some("riley"), Some("secret")) => Json(json!({
                "token": "tok-riley",
                "username": "riley",
                "role": "ROLE_ANALYST"
            }))
            .into_response(),
            (Some("owner"), Some("secret")) => Json(json!({
                "token": "tok-owner",
                "username": "owner",
                "role": "OWNER"
            }))
            .into_response(),
            _ => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid username or password" })),
            )
                .into_response(),
        }
    }

    async fn register(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        recorder.push("register".into(), &headers, HashMap::new(), Some(body.clone()));
        if body["username"] == "taken" {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "message": "Username already exists" })),
            )
                .into_response();
        }
        StatusCode::CREATED.into_response()
    }

    async fn list_loans(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        recorder.push("list_loans".into(), &headers, query.clone(), None);
        if query.get("status").map(String::as_str) == Some("SUBMITTED") {
            Json(json!({
                "content": [loan(7, "Avery Chen", "SUBMITTED")],
                "totalElements": 1,
                "totalPages": 1,
                "number": 0
            }))
            .into_response()
        } else {
            Json(json!([
                loan(7, "Avery Chen", "SUBMITTED"),
                loan(12, "Mina Patel", "APPROVED")
            ]))
            .into_response()
        }
    }

    async fn apply(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        let acknowledge_only = body["fullName"] == "Casey Ack";
        recorder.push("apply".into(), &headers, HashMap::new(), Some(body));
        if acknowledge_only {
            return Json(json!({ "message": "Application received" })).into_response();
        }
        Json(loan(501, "Jordan Reyes", "SUBMITTED")).into_response()
    }

    async fn review(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Path((id, action)): Path<(u64, String)>,
    ) -> Response {
        recorder.push(format!("{action}:{id}"), &headers, HashMap::new(), None);
        if id == 99 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Loan already reviewed" })),
            )
                .into_response();
        }
        StatusCode::OK.into_response()
    }

    async fn metrics(State(recorder): State<Shared>, headers: HeaderMap) -> Response {
        recorder.push("metrics".into(), &headers, HashMap::new(), None);
        Json(json!({ "customers": 6, "analysts": 3, "admins": 1, "loans": 42 })).into_response()
    }

    async fn users(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        recorder.push("users".into(), &headers, query.clone(), None);
        let all = vec![
            json!({ "id": 1, "username": "ada", "role": "ROLE_ADMIN", "active": true }),
            json!({ "id": 2, "username": "bo", "role": "CUSTOMER", "active": false }),
            json!({ "id": 3, "username": "riley", "role": "ANALYST", "active": true }),
        ];
        let filtered: Vec<Value> = match query.get("role") {
            Some(role) => all
                .into_iter()
                .filter(|user| {
                    user["role"]
                        .as_str()
                        .is_some_and(|candidate| candidate.ends_with(role.as_str()))
                })
                .collect(),
            None => all,
        };
        Json(Value::Array(filtered)).into_response()
    }

    async fn update_user(
        State(recorder): State<Shared>,
        headers: HeaderMap,
        Path((id, field)): Path<(u64, String)>,
        Json(body): Json<Value>,
    ) -> Response {
        recorder.push(format!("{field}:{id}"), &headers, HashMap::new(), Some(body));
        StatusCode::OK.into_response()
    }

    pub async fn spawn_backend() -> (BackendConfig, Shared) {
        let recorder: Shared = Arc::new(Recorder::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/loans", get(list_loans))
            .route("/api/loans/apply", post(apply))
            .route("/api/loans/:id/:action", patch(review))
            .route("/api/admin/metrics", get(metrics))
            .route("/api/admin/users", get(users))
            .route("/api/admin/users/:id/:field", put(update_user))
            .with_state(recorder.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend");
        });

        let backend = BackendConfig::new(format!("http://{addr}"), 5).expect("stub url");
        (backend, recorder)
    }

    pub async fn client() -> (LoanDeskClient, Shared) {
        let (backend, recorder) = spawn_backend().await;
        let client = LoanDeskClient::new(&backend, SessionContext::new()).expect("client builds");
        (client, recorder)
    }
}

use common::*;
use loan_desk::client::{ClientError, Credentials};
use loan_desk::lending::{
    LoanApplicationForm, LoanId, LoanListQuery, LoanStatus, ReviewAction, StatusTally,
    UserCounts, UserDirectoryFilter,
};
use loan_desk::session::{Role, SessionError};
use serde_json::json;

#[tokio::test]
async fn login_initialises_the_session_and_authorizes_later_calls() {
    let (client, recorder) = client().await;

    let session = client
        .login(&Credentials::new("riley", "secret"))
        .await
        .expect("login succeeds");

    assert_eq!(session.role, Role::Analyst);
    assert_eq!(client.session().username().as_deref(), Some("riley"));
    assert!(recorder.last("login").expect("login recorded").authorization.is_none());

    client
        .list_loans(&LoanListQuery::default())
        .await
        .expect("loans load");
    let listed = recorder.last("list_loans").expect("list recorded");
    assert_eq!(listed.authorization.as_deref(), Some("Bearer tok-riley"));

    client.logout();
    assert!(!client.session().is_logged_in());
    client
        .list_loans(&LoanListQuery::default())
        .await
        .expect("loans load");
    assert!(recorder.last("list_loans").expect("list recorded").authorization.is_none());
}

#[tokio::test]
async fn failed_login_keeps_the_backend_message_and_no_session() {
    let (client, _) = client().await;

    let err = client
        .login(&Credentials::new("riley", "wrong"))
        .await
        .expect_err("bad password");

    assert!(err.is_unauthorized());
    assert_eq!(
        err.user_message("Login failed."),
        "Invalid username or password"
    );
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn unknown_roles_fail_login() {
    let (client, _) = client().await;

    let err = client
        .login(&Credentials::new("owner", "secret"))
        .await
        .expect_err("OWNER is not a role");

    assert!(matches!(err, ClientError::Decode { .. }));
    assert_eq!(err.user_message("Login failed."), "Login failed.");
    assert!(!client.session().is_logged_in());
}

#[tokio::test]
async fn registration_surfaces_conflicts() {
    let (client, recorder) = client().await;

    client
        .register(&Credentials::new("newcomer", "pw"))
        .await
        .expect("registers");
    let err = client
        .register(&Credentials::new("taken", "pw"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message("Signup failed."), "Username already exists");
    assert_eq!(
        recorder.last("register").and_then(|call| call.body),
        Some(json!({ "username": "taken", "password": "pw" }))
    );
}

#[tokio::test]
async fn listing_handles_arrays_and_envelopes() {
    let (client, recorder) = client().await;

    let all = client
        .list_loans(&LoanListQuery::default())
        .await
        .expect("bare array");
    assert_eq!(all.len(), 2);
    assert_eq!(
        StatusTally::from_loans(&all),
        StatusTally {
            total: 2,
            submitted: 1,
            approved: 1,
            rejected: 0
        }
    );
    let query = recorder.last("list_loans").expect("recorded").query;
    assert_eq!(query.get("page").map(String::as_str), Some("0"));
    assert_eq!(query.get("size").map(String::as_str), Some("10"));
    assert_eq!(query.get("sortBy").map(String::as_str), Some("createdAt"));
    assert_eq!(query.get("direction").map(String::as_str), Some("desc"));
    assert!(!query.contains_key("status"));

    let pending = client
        .list_loans(&LoanListQuery::review_queue(20))
        .await
        .expect("envelope");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, Some(LoanStatus::Submitted));
    assert!(pending[0].created_at.is_some());
}

#[tokio::test]
async fn submission_sends_raw_inputs_only() {
    let (client, recorder) = client().await;
    let form = LoanApplicationForm {
        full_name: "Jordan Reyes".to_string(),
        amount: "8000".to_string(),
        tenure: "24".to_string(),
        monthly_income: "4000".to_string(),
        monthly_debt: "1200".to_string(),
        credit_score: "710".to_string(),
        employment_type: "SELF_EMPLOYED".to_string(),
        purpose: "AUTO".to_string(),
    };

    let created = client
        .submit_application(&form.to_request().expect("valid form"))
        .await
        .expect("submitted");

    assert_eq!(created.map(|loan| loan.id), Some(LoanId(501)));
    let body = recorder
        .last("apply")
        .and_then(|call| call.body)
        .expect("body recorded");
    assert_eq!(body["fullName"], "Jordan Reyes");
    assert_eq!(body["creditScore"], 710);
    assert!(body.get("riskScore").is_none());
    assert!(body.get("decision").is_none());
}

#[tokio::test]
async fn submission_tolerates_a_response_without_a_loan_record() {
    let (client, recorder) = client().await;
    let form = LoanApplicationForm {
        full_name: "Casey Ack".to_string(),
        amount: "5000".to_string(),
        tenure: "12".to_string(),
        monthly_income: "5000".to_string(),
        monthly_debt: "0".to_string(),
        credit_score: "850".to_string(),
        employment_type: "SALARIED".to_string(),
        purpose: "HOME".to_string(),
    };

    let created = client
        .submit_application(&form.to_request().expect("valid form"))
        .await
        .expect("accepted by the backend");

    assert!(created.is_none());
    assert!(recorder.last("apply").is_some());
}

#[tokio::test]
async fn review_is_guarded_by_the_current_status() {
    let (client, recorder) = client().await;
    let loans = client
        .list_loans(&LoanListQuery::default())
        .await
        .expect("loans");
    let pending = loans
        .iter()
        .find(|loan| loan.id == LoanId(7))
        .expect("pending loan");
    let approved = loans
        .iter()
        .find(|loan| loan.id == LoanId(12))
        .expect("approved loan");

    let next = client
        .review(pending, ReviewAction::Approve)
        .await
        .expect("pending loans can be approved");
    assert_eq!(next, LoanStatus::Approved);
    assert!(recorder.last("approve:7").is_some());

    let err = client
        .review(approved, ReviewAction::Reject)
        .await
        .expect_err("approved loans are final");
    assert!(matches!(err, ClientError::Review(_)));
    assert!(recorder.last("reject:12").is_none());
}

#[tokio::test]
async fn backend_review_failures_keep_their_message() {
    let (client, _) = client().await;

    let err = client
        .reject_loan(LoanId(99))
        .await
        .expect_err("backend refuses");

    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.user_message("Failed to update loan."),
        "Loan already reviewed"
    );
}

#[tokio::test]
async fn admin_calls_round_trip() {
    let (client, recorder) = client().await;

    let metrics = client.admin_metrics().await.expect("metrics");
    assert_eq!(metrics.total_users(), 10);
    assert_eq!(metrics.share_pct(metrics.customers), 60.0);

    let users = client
        .list_users(&UserDirectoryFilter::default())
        .await
        .expect("users");
    assert_eq!(
        UserCounts::from_users(&users),
        UserCounts {
            total: 3,
            active: 2,
            inactive: 1
        }
    );
    assert_eq!(users[0].role, Role::Admin);

    let analysts = client
        .list_users(&UserDirectoryFilter {
            role: Some(Role::Analyst),
        })
        .await
        .expect("filtered users");
    assert_eq!(analysts.len(), 1);
    assert_eq!(
        recorder
            .last("users")
            .and_then(|call| call.query.get("role").cloned())
            .as_deref(),
        Some("ANALYST")
    );

    client
        .update_user_role(2, Role::Analyst)
        .await
        .expect("role updated");
    client
        .update_user_active(2, true)
        .await
        .expect("activation updated");

    assert_eq!(
        recorder.last("role:2").and_then(|call| call.body),
        Some(json!({ "role": "ANALYST" }))
    );
    assert_eq!(
        recorder.last("active:2").and_then(|call| call.body),
        Some(json!({ "active": true }))
    );
    assert_eq!(recorder.calls().len(), 5);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let backend = loan_desk::config::BackendConfig::new("http://127.0.0.1:9", 1).expect("url");
    let client = loan_desk::client::LoanDeskClient::new(
        &backend,
        loan_desk::session::SessionContext::new(),
    )
    .expect("client builds");

    let err = client
        .admin_metrics()
        .await
        .expect_err("nothing listens on the discard port");

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(
        err.user_message("Failed to load metrics."),
        "Failed to load metrics."
    );
}

#[test]
fn empty_tokens_never_create_a_session() {
    let session = loan_desk::session::SessionContext::new();
    assert_eq!(
        session.init("", Role::Customer, "sam"),
        Err(SessionError::EmptyToken)
    );
}
