use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use retrofit_incentives::assessment::{
    assessment_router, Assessment, AssessmentRequest, AssessmentService, IncentiveAmount,
    Recommendation,
};
use retrofit_incentives::config::AppConfig;
use retrofit_incentives::error::AppError;
use retrofit_incentives::income::IncomeThresholdTable;
use retrofit_incentives::programs::ProgramRules;
use retrofit_incentives::telemetry;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Retrofit Incentive Advisor",
    about = "Compute incentive packages for household energy-retrofit assessments",
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
    /// Run one assessment from a JSON request file and print the report
    Assess(AssessArgs),
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

#[derive(Args, Debug)]
struct AssessArgs {
    /// Assessment request JSON file
    #[arg(long)]
    input: PathBuf,
    /// Override the configured program-rules document path
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Override the configured income-threshold table path
    #[arg(long)]
    thresholds: Option<PathBuf>,
    /// Assessment date for the report header (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Assess(args) => run_assess(args),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn load_service(
    config: &AppConfig,
    rules_override: Option<PathBuf>,
    thresholds_override: Option<PathBuf>,
) -> Result<AssessmentService, AppError> {
    let rules_path = rules_override.unwrap_or_else(|| config.data.rules_path.clone());
    let thresholds_path = thresholds_override.unwrap_or_else(|| config.data.thresholds_path.clone());

    let rules = ProgramRules::from_path(&rules_path)?;
    let thresholds = IncomeThresholdTable::from_csv_path(&thresholds_path)?;
    info!(
        rules = %rules_path.display(),
        version = %rules.version,
        "program rules loaded"
    );

    Ok(AssessmentService::new(rules, thresholds))
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let service = Arc::new(load_service(&config, None, None)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(assessment_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "incentive advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        input,
        rules,
        thresholds,
        date,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry).ok();

    let service = load_service(&config, rules, thresholds)?;

    let raw = fs::read_to_string(&input)?;
    let request: AssessmentRequest =
        serde_json::from_str(&raw).map_err(AppError::InvalidRequest)?;

    let assessed_on = date.unwrap_or_else(|| Local::now().date_naive());
    let assessment = service.assess(request)?;
    render_assessment(&assessment, assessed_on);

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn format_amount(amount: IncentiveAmount) -> String {
    match amount {
        IncentiveAmount::Numeric(value) => format!("${value}"),
        IncentiveAmount::FullCoverage => "Full Coverage".to_string(),
    }
}

fn render_recommendation(recommendation: &Recommendation) {
    println!(
        "\n{} (estimated ${})",
        recommendation.measure, recommendation.estimated_cost
    );

    match &recommendation.chosen {
        Some(package) => {
            println!("  Package: {}", package.name);
            for item in &package.line_items {
                let note = match &item.note {
                    Some(note) => format!(" — {note}"),
                    None => String::new(),
                };
                println!(
                    "  - {}: {}{}",
                    item.program.label(),
                    format_amount(item.amount),
                    note
                );
            }
            println!(
                "  Net cost: ${} ({}% covered)",
                recommendation.net_cost, recommendation.coverage_percent
            );
        }
        None => println!("  No incentive programs available for this measure"),
    }
}

fn render_assessment(assessment: &Assessment, assessed_on: NaiveDate) {
    println!("Incentive assessment ({assessed_on})");
    println!("Eligibility: {}", assessment.tier_label);

    for recommendation in &assessment.recommendations {
        render_recommendation(recommendation);
    }

    let summary = &assessment.summary;
    println!("\nTotals");
    println!("- Estimated cost: ${}", summary.total_estimated_cost);
    println!("- Incentives: ${}", summary.total_incentives);
    println!("- Net cost: ${}", summary.total_net_cost);

    if !summary.program_totals.is_empty() {
        println!("\nProgram rollup");
        for total in &summary.program_totals {
            println!(
                "- {}: ${} across {} measure(s)",
                total.program_label, total.total_amount, total.measure_count
            );
        }
    }

    println!("\nShared pools");
    println!(
        "- {}: ${} of ${} used",
        summary.household_pool.program.label(),
        summary.household_pool.used,
        summary.household_pool.cap
    );
    println!(
        "- {}: ${} of ${} used",
        summary.site_pool.program.label(),
        summary.site_pool.used,
        summary.site_pool.cap
    );
}
