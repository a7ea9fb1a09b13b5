use std::sync::Arc;

use botblock::{
    config::Config,
    discord::{ReadySignal, SerenityHost},
    BotListClient, Gateway,
};
use serenity::all::{Client, GatewayIntents};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let token = Config::discord_token_from_env()?;

    // GUILDS is enough to keep the guild cache populated
    let signal = ReadySignal::new();
    let mut discord = Client::builder(&token, GatewayIntents::GUILDS)
        .event_handler(signal.clone())
        .await?;

    let host = Arc::new(SerenityHost::new(
        discord.cache.clone(),
        discord.http.clone(),
        signal.clone(),
    ));

    let gateway = Gateway::new(config.gateway_config())?;
    let client = BotListClient::with_gateway(host, gateway).with_interval(config.post_interval);

    if config.credentials.is_empty() {
        tracing::warn!("No bot list credentials configured, posts will not reach any list");
    }
    for (list_id, list_token) in &config.credentials {
        client.set_credentials(list_id.as_str(), list_token.as_str());
    }

    client.start_loop();

    let shard_manager = discord.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down Discord bot...");
            signal.close();
            shard_manager.shutdown_all().await;
        }
    });

    tracing::info!("Starting Discord bot...");

    // Blocks until every shard has shut down
    discord.start().await?;

    Ok(())
}
