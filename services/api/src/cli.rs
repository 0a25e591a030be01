use crate::commands::{
    run_admin, run_assess, run_loans, AdminCommand, AssessArgs, LoansCommand,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use loan_desk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Loan Desk",
    about = "Preview loan eligibility and work the loan backend from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the eligibility preview service (default command)
    Serve(ServeArgs),
    /// Score an application locally without contacting the backend
    Assess(AssessArgs),
    /// Submit, list, and review loans
    Loans {
        #[command(subcommand)]
        command: LoansCommand,
    },
    /// Admin console: headcounts and user management
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Assess(args) => run_assess(args),
        Command::Loans { command } => run_loans(command).await,
        Command::Admin { command } => run_admin(command).await,
    }
}
