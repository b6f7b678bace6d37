//! filechain-gateway binary — run a dev ledger node on localhost.

use anyhow::Result;

use filechain_gateway::GatewayState;

const DEFAULT_PORT: u16 = 9620;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let port = std::env::args()
        .nth(1)
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(DEFAULT_PORT);

    tracing::info!(port, "gateway starting");
    filechain_gateway::serve(GatewayState::new(), port).await
}
