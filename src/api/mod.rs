use anyhow::Context;
use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    DEFAULT_BINS, DEFAULT_INITIAL_INVESTMENT, DEFAULT_SIMULATIONS, DEFAULT_YEARS, Histogram,
    SimulationConfig, Summary, build_histogram, simulate_seeded, summarize,
};
use crate::report::{render_histogram, summary_lines};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BAR_WIDTH: usize = 60;
const MAX_BINS: usize = 1_000;
// Rates are entered in percent on the command line and in API payloads.
const DEFAULT_MEAN_RETURN_PCT: f64 = 7.0;
const DEFAULT_STD_DEV_PCT: f64 = 15.0;

#[derive(Debug, Parser)]
#[command(
    name = "invest-sim",
    about = "Monte Carlo estimator for long-run investment growth"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    run: SimulationArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one simulation and print the summary (default).
    Run(SimulationArgs),
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Debug, Clone, Args)]
struct SimulationArgs {
    #[arg(long, default_value_t = DEFAULT_INITIAL_INVESTMENT)]
    initial_investment: f64,
    #[arg(long, default_value_t = DEFAULT_YEARS, help = "Compounding periods per trial")]
    years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_MEAN_RETURN_PCT,
        allow_negative_numbers = true,
        help = "Expected annual return in percent, e.g. 7"
    )]
    mean_return: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_STD_DEV_PCT,
        allow_negative_numbers = true,
        help = "Annual return volatility in percent, e.g. 15"
    )]
    std_dev: f64,
    #[arg(long, default_value_t = DEFAULT_SIMULATIONS)]
    simulations: u32,
    #[arg(long, help = "Random seed; a fresh one is drawn and reported when omitted")]
    seed: Option<u64>,
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,
    #[arg(long, default_value_t = DEFAULT_BAR_WIDTH)]
    bar_width: usize,
    #[arg(long, help = "Print the JSON response instead of the text report")]
    json: bool,
}

impl Default for SimulationArgs {
    fn default() -> Self {
        Self {
            initial_investment: DEFAULT_INITIAL_INVESTMENT,
            years: DEFAULT_YEARS,
            mean_return: DEFAULT_MEAN_RETURN_PCT,
            std_dev: DEFAULT_STD_DEV_PCT,
            simulations: DEFAULT_SIMULATIONS,
            seed: None,
            bins: DEFAULT_BINS,
            bar_width: DEFAULT_BAR_WIDTH,
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("--{flag} must be a finite number")]
    NotFinite { flag: &'static str },
    #[error("--simulations must be > 0")]
    NoSimulations,
    #[error("--std-dev must be >= 0")]
    NegativeStdDev,
    #[error("--mean-return must be > -100")]
    MeanBelowTotalLoss,
    #[error("--bins must be > 0")]
    NoBins,
    #[error("--bins must be <= {max}")]
    TooManyBins { max: usize },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    initial_investment: Option<f64>,
    years: Option<u32>,
    mean_return: Option<f64>,
    std_dev: Option<f64>,
    simulations: Option<u32>,
    seed: Option<u64>,
    bins: Option<usize>,
    include_values: Option<bool>,
}

#[derive(Debug)]
struct ApiRequest {
    config: SimulationConfig,
    seed: u64,
    bins: usize,
    include_values: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    config: SimulationConfig,
    seed: u64,
    summary: Summary,
    histogram: Histogram,
    #[serde(skip_serializing_if = "Option::is_none")]
    final_values: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Serve { port }) => run_http_server(port)
            .await
            .context("HTTP server stopped"),
        Some(Command::Run(args)) => run_cli(&args),
        None => run_cli(&cli.run),
    }
}

fn run_cli(args: &SimulationArgs) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, simulations = config.simulations, years = config.years, "simulating");

    let response = build_simulate_response(config, seed, args.bins, args.json)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print!("{}", render_histogram(&response.histogram, args.bar_width));
    println!();
    for line in summary_lines(&response.summary) {
        println!("{line}");
    }
    println!("Seed: {seed}");
    Ok(())
}

fn build_config(args: &SimulationArgs) -> Result<SimulationConfig, ConfigError> {
    for (flag, value) in [
        ("initial-investment", args.initial_investment),
        ("mean-return", args.mean_return),
        ("std-dev", args.std_dev),
    ] {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite { flag });
        }
    }

    if args.simulations == 0 {
        return Err(ConfigError::NoSimulations);
    }

    if args.std_dev < 0.0 {
        return Err(ConfigError::NegativeStdDev);
    }

    if args.mean_return <= -100.0 {
        return Err(ConfigError::MeanBelowTotalLoss);
    }

    if args.bins == 0 {
        return Err(ConfigError::NoBins);
    }

    if args.bins > MAX_BINS {
        return Err(ConfigError::TooManyBins { max: MAX_BINS });
    }

    Ok(SimulationConfig {
        initial_investment: args.initial_investment,
        years: args.years,
        mean_return: args.mean_return / 100.0,
        std_dev: args.std_dev / 100.0,
        simulations: args.simulations,
    })
}

fn build_simulate_response(
    config: SimulationConfig,
    seed: u64,
    bins: usize,
    include_values: bool,
) -> anyhow::Result<SimulateResponse> {
    let results = simulate_seeded(&config, seed)?;
    let summary = summarize(&results, config.initial_investment);
    let histogram = build_histogram(&results.final_values, bins);

    Ok(SimulateResponse {
        config,
        seed,
        summary,
        histogram,
        final_values: include_values.then_some(results.final_values),
    })
}

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "invest-sim HTTP API listening");
    info!("local access: http://127.0.0.1:{port}/api/simulate");

    axum::serve(listener, router()).await
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(
    payload: Result<Query<SimulatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable simulate query");
            error_response(rejection.status(), &rejection.body_text())
        }
    }
}

async fn simulate_post_handler(
    payload: Result<Json<SimulatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => simulate_handler_impl(payload).await,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable simulate body");
            error_response(rejection.status(), &rejection.body_text())
        }
    }
}

async fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejected simulate request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    // The engine is CPU bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        build_simulate_response(
            request.config,
            request.seed,
            request.bins,
            request.include_values,
        )
    })
    .await;

    match outcome {
        Ok(Ok(response)) => json_response(StatusCode::OK, response),
        Ok(Err(err)) => {
            warn!(error = %err, "simulation failed");
            error_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            warn!(error = %err, "simulation task did not finish");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Simulation failed")
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> Result<ApiRequest, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload).map_err(|e| e.to_string())
}

fn api_request_from_payload(payload: SimulatePayload) -> Result<ApiRequest, ConfigError> {
    let mut args = SimulationArgs::default();

    if let Some(v) = payload.initial_investment {
        args.initial_investment = v;
    }
    if let Some(v) = payload.years {
        args.years = v;
    }
    if let Some(v) = payload.mean_return {
        args.mean_return = v;
    }
    if let Some(v) = payload.std_dev {
        args.std_dev = v;
    }
    if let Some(v) = payload.simulations {
        args.simulations = v;
    }
    if let Some(v) = payload.bins {
        args.bins = v;
    }

    let config = build_config(&args)?;
    Ok(ApiRequest {
        config,
        seed: payload.seed.unwrap_or_else(rand::random),
        bins: args.bins,
        include_values: payload.include_values.unwrap_or(false),
    })
}
