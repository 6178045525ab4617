//! Veil — PII redaction server and command-line scanner.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod retention;
mod routes;
mod state;

use state::AppState;
use veil_core::VeilConfig;
use veil_redact::Redactor;

fn read_input(source: &str) -> veil_core::Result<String> {
    let mut text = String::new();
    if source == "-" {
        std::io::stdin().read_to_string(&mut text)?;
    } else {
        text = std::fs::read_to_string(Path::new(source))?;
    }
    Ok(text)
}

/// `veil scan <file|->`: print the scan result as JSON.
fn scan_command(config: &VeilConfig, source: &str) -> veil_core::Result<()> {
    let text = read_input(source)?;
    let redactor = Redactor::new(config.engine.clone());
    let result = redactor.scan(&text, &redactor.default_options())?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = VeilConfig::from_env()?;
    let args: Vec<String> = std::env::args().collect();

    // Handle CLI subcommands
    if args.len() > 1 {
        match args[1].as_str() {
            "scan" => {
                if args.len() < 3 {
                    eprintln!("Usage: veil scan <file|->");
                    std::process::exit(1);
                }
                return scan_command(&config, &args[2])
                    .map_err(|e| anyhow::anyhow!("Failed to scan {}: {}", args[2], e));
            }
            "serve" => {}
            "--help" | "-h" | "help" => {
                println!("Veil — PII detection and reversible redaction");
                println!();
                println!("Usage: veil [command]");
                println!();
                println!("Commands:");
                println!("  (none) | serve           Start the server");
                println!("  scan <file|->            Scan a file (or stdin) and print the result as JSON");
                println!("  help                     Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'veil help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let port = config.port;
    info!(
        "Max input {} bytes, maps retained {}h (max {})",
        config.engine.max_input_bytes,
        config.retention.retention_hours,
        config.retention.max_stored_maps
    );

    // Build application state
    let state = Arc::new(AppState::new(config));

    // Start background map purge
    retention::start_sweeper(state.clone());

    // Build router
    let app = routes::build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Veil server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
