//! Document Q&A server binary
//!
//! Run with: cargo run -p doc-qa --bin doc-qa-server -- --config doc-qa.toml

use clap::Parser;
use doc_qa::{config::AppConfig, server::DocQaServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "doc-qa-server", version, about = "Document Q&A server with OCR fallback")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config and DOCQA_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config and DOCQA_PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         Doc Q&A                           ║
║        PDF & Image Text Extraction with Answers           ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Upload dir: {}", config.server.upload_dir.display());
    tracing::info!("  - Max upload size: {} bytes", config.server.max_upload_size);
    tracing::info!("  - OCR page cap: {}", config.extraction.max_pages_ocr);
    tracing::info!("  - Inference backend: {:?}", config.inference.backend);
    tracing::info!("  - Session TTL: {}s", config.session.ttl_secs);

    // Create and start server
    let server = DocQaServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/upload  - Upload a PDF or image");
    println!("  POST /api/chat    - Ask a question");
    println!("  POST /api/cleanup - Discard a session");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
