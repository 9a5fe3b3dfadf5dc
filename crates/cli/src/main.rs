use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::input::load_profile;
use cli::server::{build_router, AppState};
use scheme_core::config;
use scheme_core::config::AppConfig;
use scheme_core::models::Scheme;
use scheme_core::pipeline;
use scheme_core::query::{build_query, IncomeBuckets};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Recommend {
            profile,
            json,
            report,
            top_k,
        } => run_recommend(cfg, &profile, json, report, top_k).await,
        Commands::Query { profile } => run_query(cfg, &profile),
        Commands::Ask { question, json } => run_ask(cfg, &question, json).await,
        Commands::Serve { host, port } => run_serve(cfg, host, port).await,
    }
}

#[derive(Parser)]
#[command(name = "scheme-finder")]
#[command(about = "Government welfare scheme recommendations", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend schemes for a profile
    Recommend {
        /// Profile JSON file, or `-` for stdin
        #[arg(short, long)]
        profile: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Include skipped chunks and their reasons (implies --json)
        #[arg(long, default_value_t = false)]
        report: bool,
        /// Override the number of chunks retrieved
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },
    /// Print the retrieval query built from a profile
    Query {
        /// Profile JSON file, or `-` for stdin
        #[arg(short, long)]
        profile: String,
    },
    /// Ask a free-form question about schemes
    Ask {
        /// Question text
        question: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the HTTP API
    Serve {
        /// Bind address (defaults to server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,
    },
}

async fn run_recommend(
    mut cfg: AppConfig,
    profile_path: &str,
    json: bool,
    report: bool,
    top_k: Option<usize>,
) -> Result<()> {
    let profile = load_profile(profile_path)?;
    if let Some(k) = top_k {
        cfg.recommend.top_k = k;
    }
    let recommender = pipeline::build_recommender(&cfg)?;
    let result = recommender.recommend_with_report(&profile).await?;

    if report {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if json {
        println!("{}", serde_json::to_string_pretty(&result.schemes)?);
    } else {
        println!(
            "recommend: retrieved {}, accepted {}, skipped {}",
            result.retrieved,
            result.schemes.len(),
            result.skipped.len()
        );
        for scheme in &result.schemes {
            print_scheme(scheme);
        }
    }
    Ok(())
}

fn print_scheme(scheme: &Scheme) {
    println!(
        "\n{}. {} [{}] confidence {}",
        scheme.id.unwrap_or_default(),
        scheme.title,
        scheme.category,
        scheme.confidence.unwrap_or_default()
    );
    if let Some(why) = scheme.why_recommended.as_deref().filter(|w| !w.is_empty()) {
        println!("   why: {why}");
    }
    println!("   {}", scheme.description);
    println!("   eligibility: {}", scheme.eligibility);
    if !scheme.documents.is_empty() {
        println!("   documents: {}", scheme.documents.join(", "));
    }
    println!("   apply: {}", scheme.apply_link);
    println!("   source: {}", scheme.source);
}

fn run_query(cfg: AppConfig, profile_path: &str) -> Result<()> {
    let profile = load_profile(profile_path)?;
    let buckets = IncomeBuckets::new(cfg.recommend.income_buckets);
    println!("{}", build_query(&profile, &buckets));
    Ok(())
}

async fn run_ask(cfg: AppConfig, question: &str, json: bool) -> Result<()> {
    let assistant = pipeline::build_assistant(&cfg)?;
    let answer = assistant.ask(question).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}", answer.answer);
        if !answer.sources.is_empty() {
            println!("\nsources: {}", answer.sources.join(", "));
        }
    }
    Ok(())
}

async fn run_serve(cfg: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let state = AppState {
        recommender: Arc::new(pipeline::build_recommender(&cfg)?),
        assistant: Arc::new(pipeline::build_assistant(&cfg)?),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let host = host.unwrap_or(cfg.server.host);
    let port = port.unwrap_or(cfg.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {host}:{port}"))?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
