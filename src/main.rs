//! API Gateway
//!
//! Routes requests by path prefix to backend services, built with Tokio, Axum
//! and reqwest.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────────┐
//!                              │                    API GATEWAY                   │
//!                              │                                                  │
//!     Client Request           │  ┌─────────┐    ┌──────────┐    ┌─────────────┐  │
//!     ─────────────────────────┼─▶│  http   │───▶│ routing  │───▶│    proxy    │──┼──▶ Upstream
//!                              │  │ server  │    │ (prefix) │    │  forwarder  │  │    Service
//!                              │  └─────────┘    └──────────┘    └──────┬──────┘  │
//!                              │       ▲                               │         │
//!     Client Response          │       │        ┌──────────────┐       │         │
//!     ◀────────────────────────┼───────┴────────│  response    │◀──────┘         │
//!                              │                │ (verbatim or │                  │
//!                              │                │  502 / 504)  │                  │
//!                              │                └──────────────┘                  │
//!                              │                                                  │
//!                              │  Cross-cutting: config · health · observability  │
//!                              │                 security · resilience · lifecycle│
//!                              └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_gateway::config::load_config;
use api_gateway::lifecycle::startup;
use api_gateway::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "api-gateway", version, about = "Path-prefix API gateway")]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        api_gateway::config::validation::validate_config(&config)
            .map_err(api_gateway::config::ConfigError::Validation)?;
    }

    if cli.check {
        for route in &config.routes {
            println!("{:<12} {:<16} {}", route.name, route.path_prefix, route.upstream);
        }
        println!("configuration OK");
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;
    Ok(())
}
