use ticket_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenv::dotenv().ok();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(
        "Starting ticket-server v{} (env: {}, db: {})",
        env!("CARGO_PKG_VERSION"),
        config.environment,
        config.database_path
    );
    if config.jwt_secret_generated {
        tracing::warn!("JWT_SECRET missing or shorter than 32 chars, using a generated secret; tokens will not survive a restart");
    }

    Server::new(config).run().await?;
    Ok(())
}
