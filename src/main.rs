use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use hostel_match::config::AppConfig;
use hostel_match::demo;
use hostel_match::error::AppError;
use hostel_match::telemetry;
use hostel_match::workflows::allocation::{
    allocation_router, AllocationService, InMemoryHousingStore, MatchingConfig, Term,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "Hostel Match",
    about = "Run the hostel roommate matching and allocation service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run allocation operations against a seeded demo inventory
    Allocation {
        #[command(subcommand)]
        command: AllocationCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum AllocationCommand {
    /// Preview group formation for a term without committing anything
    Preview(TermArgs),
    /// Run the allocation and print the committed outcome and listing
    Run(TermArgs),
    /// Reset committed allocations (requires --confirm)
    Reset(ResetArgs),
}

#[derive(Args, Debug)]
struct TermArgs {
    /// Term label, e.g. "2025 1st Semester" (defaults to the current one)
    #[arg(long)]
    term: Option<String>,
}

#[derive(Args, Debug)]
struct ResetArgs {
    /// Restrict the reset to one term label
    #[arg(long)]
    term: Option<String>,
    /// Acknowledge that the reset is destructive
    #[arg(long)]
    confirm: bool,
}

impl TermArgs {
    fn resolve(&self) -> Term {
        self.term
            .clone()
            .map(Term)
            .unwrap_or_else(|| Term::current_for(Local::now().date_naive()))
    }
}

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    match cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    {
        Command::Serve(args) => serve(args).await,
        Command::Allocation { command } => run_allocation_command(command),
    }
}

fn demo_service(config: &AppConfig) -> AllocationService<InMemoryHousingStore> {
    let store = Arc::new(demo::seeded_store());
    let matching = MatchingConfig {
        max_group_size: config.allocation.max_group_size,
        ..MatchingConfig::default()
    };
    AllocationService::new(store, matching, config.allocation.policy)
}

fn run_allocation_command(command: AllocationCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = demo_service(&config);

    match command {
        AllocationCommand::Preview(args) => {
            let report = service.preview(&args.resolve())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report serializes")
            );
        }
        AllocationCommand::Run(args) => {
            let term = args.resolve();
            let outcome = service.run(&term)?;
            let listing = service.list_allocations(Some(&term), None)?;
            let payload = serde_json::json!({
                "term": term,
                "outcome": outcome,
                "allocations": listing,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).expect("payload serializes")
            );
        }
        AllocationCommand::Reset(args) => {
            let term = args.term.map(Term);
            let outcome = service.reset(term.as_ref(), args.confirm)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).expect("outcome serializes")
            );
        }
    }
    Ok(())
}

async fn serve(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let readiness = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness.clone(),
    };

    let service = Arc::new(demo_service(&config));
    let app = allocation_router(service)
        .merge(
            Router::new()
                .route("/healthz", get(healthz))
                .route("/readyz", get(readyz)),
        )
        .layer(Extension(state));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness.store(true, Ordering::Release);

    info!(?config.environment, %addr, "hostel allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}

async fn readyz(Extension(state): Extension<AppState>) -> impl IntoResponse {
    if state.readiness.load(Ordering::Acquire) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
