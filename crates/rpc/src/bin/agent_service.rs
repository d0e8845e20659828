//! Agent Service binary: loads config, builds the tool registry, and
//! serves the WebSocket RPC surface.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use wayfarer_config::{init_tracing, load_and_apply, ModelRegistry};
use wayfarer_core::{tool::builtin, ReactConfig, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "agent-service")]
#[command(about = "Wayfarer Agent Service: stateless WebSocket RPC over the ReAct engine")]
struct Args {
    /// Bind address, e.g. 127.0.0.1:9090. Defaults to WAYFARER_AGENT_ADDR or 127.0.0.1:9090.
    #[arg(long)]
    addr: Option<String>,

    /// Path to the model registry TOML file.
    #[arg(long, value_name = "PATH")]
    models: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = load_and_apply("wayfarer", None);
    init_tracing();

    let args = Args::parse();
    let addr = args.addr.or_else(|| std::env::var("WAYFARER_AGENT_ADDR").ok());

    let models = Arc::new(ModelRegistry::load(&args.models)?);

    let mut registry = ToolRegistry::new();
    builtin::register_all(&mut registry);
    let tools = Arc::new(registry);

    wayfarer_rpc::run_serve(addr.as_deref(), tools, models, ReactConfig::default()).await?;
    Ok(())
}
