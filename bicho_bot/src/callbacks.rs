//! Callback query dispatch for bicho_bot.

use anyhow::Result;
use teloxide::{prelude::*, types::CallbackQuery};

use crate::bet::callbacks::{handle_bet_callback, handle_cart_callback};
use crate::dependencies::BotDependencies;

pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    bot_deps: BotDependencies,
) -> Result<()> {
    let data = query.data.clone().unwrap_or_default();

    if data.starts_with("bet_") {
        handle_bet_callback(bot, query, bot_deps).await?;
    } else if data.starts_with("cart_") {
        handle_cart_callback(bot, query, bot_deps).await?;
    } else {
        log::warn!("Unhandled callback data: {}", data);
        bot.answer_callback_query(query.id).await?;
    }

    Ok(())
}
