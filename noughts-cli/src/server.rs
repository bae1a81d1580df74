//! Server command - start the HTTP API
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to noughts-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use noughts_server::{run_server, ServerConfig, DEFAULT_MAX_SESSIONS};

use crate::search_mode;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// Directory with a browser page to serve next to the API
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Use plain minimax instead of alpha-beta
    #[arg(long)]
    pub plain: bool,

    /// Live game sessions kept before the oldest are evicted
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// This function reads like a table of contents:
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting NOUGHTS server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    if let Some(dir) = &args.static_dir {
        validate_static_dir(dir)?;
    }

    Ok(ServerConfig {
        port: args.port,
        static_dir: args
            .static_dir
            .as_ref()
            .map(|dir| dir.to_string_lossy().to_string()),
        mode: search_mode(args.plain),
        max_sessions: args.max_sessions,
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    // Create tokio runtime for async server
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 4 - CONFIGURATION VALIDATION
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
