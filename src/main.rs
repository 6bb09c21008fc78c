use mudecoop_server::{Config, Server, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("MUDECOOP server starting...");

    let config = Config::from_env();
    Server::from_config(config).await
}
