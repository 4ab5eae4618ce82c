/// Main entry point for the ADB bridge server
///
/// This file sets up logging, parses command line arguments, and starts the
/// server. The server listens for JSON-RPC requests over stdin/stdout.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use adb_bridge_mcp::{AdbBridgeServer, ServerConfig};

/// Command line arguments for the ADB bridge server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory screenshots are saved to
    #[arg(long, default_value = "screenshots")]
    screenshot_dir: PathBuf,

    /// adb executable to run
    #[arg(long, env = "ADB_PATH", default_value = "adb")]
    adb_path: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("adb_bridge_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries the RPC stream
        .init();

    info!("Starting ADB bridge server");

    let config = ServerConfig {
        screenshot_dir: args.screenshot_dir,
        adb_path: args.adb_path,
    };

    let server = AdbBridgeServer::new(config);
    server.run().await?;

    info!("ADB bridge server shutdown complete");
    Ok(())
}
