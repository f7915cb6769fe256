use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude::{self as serenity, ClientBuilder, GatewayIntents, Http};
use tracing::{error, info};

mod config;
mod db;
mod discord;
mod error;
mod identity;
mod logging;
mod notify;
mod poller;
mod rank;
mod riot;
mod tracker;

use config::Config;
use db::{Repository, SqliteDocumentStore};
use discord::{Data, create_framework};
use error::AppError;
use poller::{PollingScheduler, RankRefresher};
use riot::RiotClient;
use tracker::Tracker;

const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(e) = run().await {
        error!(error = %e, "💥 Fatal error");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    info!("🐙 Starting rankwatch...");

    let config = Config::from_env()?;

    let store = Arc::new(SqliteDocumentStore::connect(&config.database_url).await?);
    let repo = Repository::new(store.clone());

    let riot = Arc::new(
        RiotClient::new(
            config.riot_api_key.clone(),
            config.platform,
            config.riot_rate_limit_per_second,
            config.riot_request_timeout,
        )?
        .with_max_attempts(config.riot_max_attempts),
    );
    tokio::spawn(riot.metrics().log_loop(METRICS_LOG_INTERVAL));

    let http = Arc::new(Http::new(&config.discord_token));
    let refresher = Arc::new(RankRefresher::new(repo.clone(), riot.clone(), Arc::new(http)));
    let scheduler = Arc::new(PollingScheduler::new(
        repo.clone(),
        refresher.clone(),
        config.polling_interval,
        config.sweep_timeout,
        config.refresh_timeout,
    ));
    let tracker = Arc::new(Tracker::new(repo, riot, refresher));

    let framework = create_framework(Data { tracker });
    let mut client = ClientBuilder::new(&config.discord_token, GatewayIntents::non_privileged())
        .framework(framework)
        .await?;

    scheduler.start();

    info!("🌐 Connecting to Discord gateway");
    let result: Result<(), serenity::Error> = tokio::select! {
        res = client.start() => res,
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutdown signal received");
            Ok(())
        }
    };

    client.shard_manager.shutdown_all().await;
    scheduler.stop().await;
    store.close().await;
    info!("👋 Bye");

    result.map_err(Into::into)
}
