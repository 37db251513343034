use anyhow::Result;
use clap::Parser;
use jobsearch_core::{EngineConfig, RebuildPolicy};
use server::{router, spawn_rebuild_timer, AppConfig, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Entity corpus (JSON / JSONL file or directory) indexed at startup
    #[arg(long)]
    input: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// When to rebuild after writes: manual, write-through or interval
    #[arg(long, default_value = "manual")]
    rebuild_policy: String,
    /// Seconds between scheduled rebuilds (interval policy)
    #[arg(long, default_value_t = 60)]
    rebuild_interval_secs: u64,
    /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
    #[arg(long, default_value_t = false)]
    smoothed_idf: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let policy = RebuildPolicy::from_name(&args.rebuild_policy, args.rebuild_interval_secs)?;
    let config = AppConfig {
        input: args.input,
        engine: EngineConfig::smoothed(args.smoothed_idf),
        policy,
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
        cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN").ok(),
    };

    let state = AppState::new(&config)?;
    let _rebuilder = spawn_rebuild_timer(&state);
    let app = router(state, config.cors_allow_origin.as_deref());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, %policy, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
