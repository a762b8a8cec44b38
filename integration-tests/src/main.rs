use tracing_subscriber::EnvFilter;

mod common;
mod context;
mod fill_and_break;
mod happy_flow;
mod persistence;
mod settlement;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    happy_flow::run().await?;
    fill_and_break::run().await?;
    settlement::run().await?;
    persistence::run().await?;

    Ok(())
}
