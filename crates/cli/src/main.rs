//! Wayfarer CLI: run the Agent Service or the Gateway from one binary.
//!
//! Subcommands: `agent` (WebSocket RPC over the ReAct engine), `gateway`
//! (HTTP/SSE surface in front of an Agent Service).

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use wayfarer_config::{init_tracing, load_and_apply, ModelRegistry};
use wayfarer_core::{tool::builtin, ReactConfig, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "wayfarer")]
#[command(about = "Wayfarer — ReAct conversational agent service and gateway")]
struct Args {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the Agent Service: stateless WebSocket RPC over the ReAct engine.
    Agent {
        /// Bind address. Defaults to WAYFARER_AGENT_ADDR or 127.0.0.1:9090.
        #[arg(long)]
        addr: Option<String>,
        /// Path to the model registry TOML file.
        #[arg(long, value_name = "PATH")]
        models: PathBuf,
    },
    /// Run the Gateway: HTTP/SSE surface in front of an Agent Service.
    Gateway {
        /// Bind address. Defaults to WAYFARER_GATEWAY_ADDR or 127.0.0.1:8081.
        #[arg(long)]
        addr: Option<String>,
        /// Path to the model registry TOML file (mirrors the Agent Service's).
        #[arg(long, value_name = "PATH")]
        models: PathBuf,
        /// WebSocket URL of the Agent Service.
        #[arg(long, default_value = "ws://127.0.0.1:9090")]
        agent_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = load_and_apply("wayfarer", None);
    init_tracing();

    match Args::parse().cmd {
        Command::Agent { addr, models } => {
            let addr = addr.or_else(|| std::env::var("WAYFARER_AGENT_ADDR").ok());
            let models = Arc::new(ModelRegistry::load(&models)?);
            let mut registry = ToolRegistry::new();
            builtin::register_all(&mut registry);
            wayfarer_rpc::run_serve(addr.as_deref(), Arc::new(registry), models, ReactConfig::default()).await?;
        }
        Command::Gateway { addr, models, agent_url } => {
            let addr = addr.or_else(|| std::env::var("WAYFARER_GATEWAY_ADDR").ok());
            let models = Arc::new(ModelRegistry::load(&models)?);
            wayfarer_gateway::run_serve(addr.as_deref(), models, &agent_url).await?;
        }
    }
    Ok(())
}
