//! Gateway binary: loads config and serves the HTTP/SSE surface, proxying
//! chat turns onto the Agent Service's WebSocket RPC.

use std::sync::Arc;

use clap::Parser;
use wayfarer_config::{init_tracing, load_and_apply, ModelRegistry};

#[derive(Parser, Debug)]
#[command(name = "gateway")]
#[command(about = "Wayfarer Gateway: HTTP/SSE surface over the Agent Service")]
struct Args {
    /// Bind address, e.g. 127.0.0.1:8081. Defaults to WAYFARER_GATEWAY_ADDR or 127.0.0.1:8081.
    #[arg(long)]
    addr: Option<String>,

    /// Path to the model registry TOML file (mirrors the Agent Service's).
    #[arg(long, value_name = "PATH")]
    models: std::path::PathBuf,

    /// WebSocket URL of the Agent Service.
    #[arg(long, default_value = "ws://127.0.0.1:9090")]
    agent_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = load_and_apply("wayfarer", None);
    init_tracing();

    let args = Args::parse();
    let addr = args.addr.or_else(|| std::env::var("WAYFARER_GATEWAY_ADDR").ok());
    let models = Arc::new(ModelRegistry::load(&args.models)?);

    wayfarer_gateway::run_serve(addr.as_deref(), models, &args.agent_url).await?;
    Ok(())
}
