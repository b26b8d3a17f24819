use std::env;
use std::sync::Arc;

use linkedin_jobs_mcp::backend::JobSearchBackend;
use linkedin_jobs_mcp::config::{Config, ServerMode};
use linkedin_jobs_mcp::error::Result;
use linkedin_jobs_mcp::http::serve_http;
use linkedin_jobs_mcp::linkedin::LinkedInClient;
use linkedin_jobs_mcp::mcp::run_stdio;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries protocol frames; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => Config::load_from_path(std::path::Path::new(path))?,
        None => Config::default(),
    };

    eprintln!(
        "LinkedIn Jobs MCP server starting (mode: {:?})",
        config.server.mode
    );

    let backend: Arc<dyn JobSearchBackend> = Arc::new(LinkedInClient::new(&config.linkedin)?);

    match config.server.mode {
        ServerMode::Stdio => {
            run_stdio(backend).await?;
        }
        ServerMode::Http => {
            serve_http(&config, backend).await?;
        }
        ServerMode::Both => {
            let http_backend = backend.clone();
            let http_config = config.clone();
            let http_task =
                tokio::spawn(async move { serve_http(&http_config, http_backend).await });
            let stdio_task = tokio::spawn(async move { run_stdio(backend).await });
            http_task.await.expect("http task panicked")?;
            stdio_task.await.expect("stdio task panicked")?;
        }
    }

    Ok(())
}
