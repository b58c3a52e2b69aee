use estoque_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    setup_environment();

    print_banner();
    tracing::info!("Estoque server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. Server state (work dir, database, session store)
    let state = ServerState::initialize(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Initialization failed: {e}"))?;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(anyhow::anyhow!("{e}"));
    }

    Ok(())
}
