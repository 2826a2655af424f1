//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info};

use crate::session::CardSession;

use super::dispatcher::{CommandDispatcher, Reply};

/// Change the label shown under the bot's name
pub async fn set_presence(bot: &Bot, label: &str) -> Result<()> {
    bot.set_my_short_description()
        .short_description(label.to_string())
        .await?;
    info!(presence = label, "Presence updated");
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    session: CardSession,
    dispatcher: Arc<CommandDispatcher>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message");

    let mut state = session.get_or_default().await?;
    let reply = dispatcher.dispatch(text, &mut state).await;
    session.update(state).await?;

    match reply {
        Reply::Text(text) => {
            bot.send_message(msg.chat.id, text).await?;
        }
        Reply::Presence(label) => set_presence(&bot, &label).await?,
        Reply::Silent => {}
    }

    Ok(())
}
