//! Climate Observation Query Service - Entry Point
//!
//! Serves a small set of read-only JSON endpoints over a pre-populated
//! climate database (station metadata plus daily precipitation and
//! temperature observations). The process validates the store at startup
//! and refuses to serve without it.
//!
//! Usage:
//!   cargo run --release                        # defaults (port 5000)
//!   cargo run --release -- --port 8080 --debug # custom port, request log
//!
//! Environment:
//!   DATABASE_URL - PostgreSQL connection string for the climate store

use climo_service::config;
use climo_service::db::Store;
use climo_service::endpoint;
use std::env;

fn main() {
    println!("🌦  Climate Observation Query Service");
    println!("=====================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;
    let mut config_path = config::DEFAULT_CONFIG_PATH.to_string();
    let mut debug = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--config" => {
                if i + 1 < args.len() {
                    config_path = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
            }
            "--debug" => {
                debug = true;
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT] [--config PATH] [--debug]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Load service configuration (defaults when climo.toml is absent)
    let service_config = config::load_config(&config_path);
    let port = port_override.unwrap_or(service_config.server.port);

    // Validate the store before serving: connection plus expected tables
    println!("📊 Validating climate store...");
    let store = match Store::from_env() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("\n❌ Startup failed: {}\n", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.connect_and_verify(&["measurement", "station"]) {
        eprintln!("\n❌ Startup failed: {}\n", e);
        std::process::exit(1);
    }
    println!("✓ Store reachable, measurement and station tables present\n");

    if let Err(e) = endpoint::start_endpoint_server(
        &service_config.server.bind,
        port,
        service_config.server.workers,
        store,
        service_config.window,
        debug,
    ) {
        eprintln!("\n❌ Server error: {}\n", e);
        std::process::exit(1);
    }
}
