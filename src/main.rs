use anyhow::Result;
use std::sync::Arc;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cardbot::bot::{self, CommandDispatcher};
use cardbot::catalog::MtgApiClient;
use cardbot::config::{load_bot_token, BotConfig};
use cardbot::localization::init_localization;
use cardbot::pricing::GoldfishPrices;
use cardbot::session::SessionState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting card bot");

    // Token comes from the local secrets file, read once
    let bot_token = load_bot_token()?;
    let config = BotConfig::from_env()?;
    init_localization()?;

    let catalog = Arc::new(MtgApiClient::new(&config.services)?);
    let prices = Arc::new(GoldfishPrices::new(&config.services)?);
    let presence = config.presence.clone();
    let dispatcher = Arc::new(CommandDispatcher::new(catalog, prices, config));

    // Initialize the bot
    let bot = Bot::new(bot_token);

    let me = bot.get_me().await?;
    info!(bot_id = %me.id, bot_username = %me.username(), "Logged in");

    if let Err(e) = bot::set_presence(&bot, &presence).await {
        warn!(error = %e, "Failed to set initial presence");
    }

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry().branch(
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<SessionState>, SessionState>()
            .endpoint(bot::message_handler),
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![InMemStorage::<SessionState>::new(), dispatcher])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
