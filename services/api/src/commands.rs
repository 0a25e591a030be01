use crate::infra::{connect, parse_role, parse_status, Connection};
use clap::{Args, Subcommand};
use loan_desk::client::{ClientError, Credentials};
use loan_desk::error::AppError;
use loan_desk::lending::loans::search;
use loan_desk::lending::{
    LoanApplication, LoanApplicationForm, LoanId, LoanListQuery, LoanStatus, PreviewResponse,
    ReviewAction, StatusTally, UserCounts, UserDirectoryFilter,
};
use loan_desk::session::{AppRoute, Role};

#[derive(Args, Debug, Clone)]
pub(crate) struct CredentialArgs {
    /// Backend account name
    #[arg(long)]
    pub(crate) username: String,
    /// Backend account password
    #[arg(long)]
    pub(crate) password: String,
}

impl From<CredentialArgs> for Credentials {
    fn from(args: CredentialArgs) -> Self {
        Credentials::new(args.username, args.password)
    }
}

/// Raw application values, passed through the same gate as the web form.
#[derive(Args, Debug, Clone)]
pub(crate) struct AssessArgs {
    /// Applicant full name (required only for submission)
    #[arg(long)]
    pub(crate) full_name: Option<String>,
    /// Requested loan amount
    #[arg(long)]
    pub(crate) amount: Option<String>,
    /// Tenure in months
    #[arg(long)]
    pub(crate) tenure: Option<String>,
    #[arg(long)]
    pub(crate) monthly_income: Option<String>,
    #[arg(long)]
    pub(crate) monthly_debt: Option<String>,
    /// Credit score between 300 and 850
    #[arg(long)]
    pub(crate) credit_score: Option<String>,
    /// SALARIED, SELF_EMPLOYED, STUDENT, or UNEMPLOYED
    #[arg(long, default_value = "SALARIED")]
    pub(crate) employment_type: String,
    /// HOME, AUTO, PERSONAL, EDUCATION, or MEDICAL
    #[arg(long, default_value = "PERSONAL")]
    pub(crate) purpose: String,
    /// Print the preview as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl AssessArgs {
    pub(crate) fn to_form(&self) -> LoanApplicationForm {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        LoanApplicationForm {
            full_name: text(&self.full_name),
            amount: text(&self.amount),
            tenure: text(&self.tenure),
            monthly_income: text(&self.monthly_income),
            monthly_debt: text(&self.monthly_debt),
            credit_score: text(&self.credit_score),
            employment_type: self.employment_type.clone(),
            purpose: self.purpose.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum LoansCommand {
    /// List loans visible to the account
    List(ListArgs),
    /// Submit a new application (customers only)
    Apply(ApplyArgs),
    /// Approve a submitted loan (analysts and admins)
    Approve(ReviewArgs),
    /// Reject a submitted loan (analysts and admins)
    Reject(ReviewArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    /// Only loans in this status (SUBMITTED, APPROVED, REJECTED)
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<LoanStatus>,
    #[arg(long, default_value_t = 0)]
    pub(crate) page: u32,
    #[arg(long, default_value_t = 10)]
    pub(crate) size: u32,
    /// Local filter over applicant name or loan id
    #[arg(long)]
    pub(crate) search: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ApplyArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    #[command(flatten)]
    pub(crate) application: AssessArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ReviewArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    /// Loan identifier
    #[arg(long)]
    pub(crate) id: u64,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    /// Show headcounts by role and the loan total
    Metrics(CredentialArgs),
    /// List users, optionally filtered by role
    Users(UsersArgs),
    /// Change a user's role
    SetRole(SetRoleArgs),
    /// Activate or deactivate a user
    SetActive(SetActiveArgs),
}

#[derive(Args, Debug)]
pub(crate) struct UsersArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Option<Role>,
}

#[derive(Args, Debug)]
pub(crate) struct SetRoleArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    #[arg(long)]
    pub(crate) id: u64,
    #[arg(long, value_parser = parse_role)]
    pub(crate) role: Role,
}

#[derive(Args, Debug)]
pub(crate) struct SetActiveArgs {
    #[command(flatten)]
    pub(crate) credentials: CredentialArgs,
    #[arg(long)]
    pub(crate) id: u64,
    #[arg(long, action = clap::ArgAction::Set)]
    pub(crate) active: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let preview = PreviewResponse::for_form(&args.to_form());
    if args.json {
        match serde_json::to_string_pretty(&preview) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Preview payload unavailable: {err}"),
        }
        return Ok(());
    }
    render_preview(&preview);
    Ok(())
}

pub(crate) async fn run_loans(command: LoansCommand) -> Result<(), AppError> {
    match command {
        LoansCommand::List(args) => list_loans(args).await,
        LoansCommand::Apply(args) => apply(args).await,
        LoansCommand::Approve(args) => review(args, ReviewAction::Approve).await,
        LoansCommand::Reject(args) => review(args, ReviewAction::Reject).await,
    }
}

pub(crate) async fn run_admin(command: AdminCommand) -> Result<(), AppError> {
    match command {
        AdminCommand::Metrics(credentials) => {
            let conn = connect(credentials.into(), Some(AppRoute::AdminDashboard)).await?;
            let metrics = conn
                .client
                .admin_metrics()
                .await
                .map_err(friendly("Failed to load admin metrics."))?;
            println!("Admin metrics");
            println!("- {} users | {} loans", metrics.total_users(), metrics.loans);
            for role in Role::ALL {
                let count = metrics.role_count(role);
                println!(
                    "  - {}: {} ({:.0}%)",
                    role,
                    count,
                    metrics.share_pct(count)
                );
            }
            Ok(())
        }
        AdminCommand::Users(args) => {
            let conn = connect(args.credentials.into(), Some(AppRoute::AdminUsers)).await?;
            let users = conn
                .client
                .list_users(&UserDirectoryFilter { role: args.role })
                .await
                .map_err(friendly("Failed to load users."))?;
            let counts = UserCounts::from_users(&users);
            println!(
                "Users: {} total | {} active | {} inactive",
                counts.total, counts.active, counts.inactive
            );
            for user in &users {
                println!(
                    "  - #{} {} [{}] {}",
                    user.id,
                    user.username,
                    user.role,
                    if user.active { "active" } else { "inactive" }
                );
            }
            Ok(())
        }
        AdminCommand::SetRole(args) => {
            let conn = connect(args.credentials.into(), Some(AppRoute::AdminUsers)).await?;
            conn.client
                .update_user_role(args.id, args.role)
                .await
                .map_err(friendly("Failed to update role."))?;
            println!("User #{} is now {}", args.id, args.role);
            Ok(())
        }
        AdminCommand::SetActive(args) => {
            let conn = connect(args.credentials.into(), Some(AppRoute::AdminUsers)).await?;
            conn.client
                .update_user_active(args.id, args.active)
                .await
                .map_err(friendly("Failed to update status."))?;
            println!(
                "User #{} {}",
                args.id,
                if args.active { "activated" } else { "deactivated" }
            );
            Ok(())
        }
    }
}

async fn list_loans(args: ListArgs) -> Result<(), AppError> {
    let Connection { client, session } = connect(args.credentials.into(), None).await?;
    let query = LoanListQuery {
        page: args.page,
        size: args.size,
        ..LoanListQuery::default()
    }
    .with_status(args.status);

    let loans = client
        .list_loans(&query)
        .await
        .map_err(friendly("Failed to load loans."))?;
    let visible = search(&loans, args.search.as_deref().unwrap_or_default());
    let tally = StatusTally::from_loans(&loans);

    println!(
        "{} ({}) | {} loans: {} pending, {} approved, {} rejected",
        session.username,
        AppRoute::dashboard_for(session.role).path(),
        tally.total,
        tally.submitted,
        tally.approved,
        tally.rejected
    );
    for loan in visible {
        render_loan(loan);
    }
    Ok(())
}

async fn apply(args: ApplyArgs) -> Result<(), AppError> {
    let form = args.application.to_form();
    let request = form.to_request()?;
    let conn = connect(args.credentials.into(), Some(AppRoute::LoanApplication)).await?;

    render_preview(&PreviewResponse::for_form(&form));
    let created = conn
        .client
        .submit_application(&request)
        .await
        .map_err(friendly("Failed to submit application."))?;
    match created {
        Some(loan) => println!("\nApplication submitted (loan #{})", loan.id),
        None => println!("\nApplication submitted"),
    }
    Ok(())
}

async fn review(args: ReviewArgs, action: ReviewAction) -> Result<(), AppError> {
    let conn = connect(args.credentials.into(), Some(AppRoute::AnalystDashboard)).await?;
    let id = LoanId(args.id);
    let fallback = "Failed to update loan.";

    let loans = conn
        .client
        .list_loans(&LoanListQuery {
            size: 100,
            ..LoanListQuery::default()
        })
        .await
        .map_err(friendly("Failed to load loan queue."))?;

    match loans.iter().find(|loan| loan.id == id) {
        Some(loan) => {
            let next = conn
                .client
                .review(loan, action)
                .await
                .map_err(friendly(fallback))?;
            println!("Loan #{id} is now {}", next.label());
        }
        None => {
            let outcome = match action {
                ReviewAction::Approve => conn.client.approve_loan(id).await,
                ReviewAction::Reject => conn.client.reject_loan(id).await,
            };
            outcome.map_err(friendly(fallback))?;
            println!("Loan #{id} {}", action.past_tense());
        }
    }
    Ok(())
}

fn friendly(fallback: &'static str) -> impl FnOnce(ClientError) -> AppError {
    move |err| {
        println!("{}", err.user_message(fallback));
        AppError::from(err)
    }
}

fn render_preview(preview: &PreviewResponse) {
    println!("Eligibility preview ({}% complete)", preview.completion);
    let (Some(assessment), Some(meter)) = (preview.assessment, preview.meter.as_ref()) else {
        println!("- Preview unavailable until every financial field is valid");
        return;
    };
    println!(
        "- {} | risk {}/100 | meter {}",
        meter.label, assessment.risk_score, meter.color
    );
    println!(
        "- DTI {:.2} | recommended APR {:.1}%",
        assessment.debt_to_income_ratio, assessment.recommended_apr_percent
    );
    println!("  Risk components:");
    for component in &preview.components {
        println!(
            "    - {:?}: +{} ({})",
            component.factor, component.points, component.notes
        );
    }
    println!("  Preview only; the backend makes the final decision.");
}

fn render_loan(loan: &LoanApplication) {
    let created = loan
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  - #{} {} | {} over {} months | {} | {}",
        loan.id,
        loan.full_name.as_deref().unwrap_or("-"),
        loan.amount
            .map(|amount| format!("{amount:.2}"))
            .unwrap_or_else(|| "-".to_string()),
        loan.tenure
            .map(|tenure| tenure.to_string())
            .unwrap_or_else(|| "-".to_string()),
        loan.status_label(),
        created
    );
}
