use anyhow::Result;
use clap::Parser;
use hn_digest::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets for the digest command may come from a local .env file.
    dotenv::dotenv().ok();

    // Logs go to stderr so `comments` output stays pipeable.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    tracing::info!("hn-digest starting");

    run(cli).await.inspect_err(|e| {
        tracing::error!(error = %e, "hn-digest exited with error");
    })
}
