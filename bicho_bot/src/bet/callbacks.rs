use anyhow::Result;
use bicho_core::helpers::dto::OwnerKey;
use teloxide::{
    prelude::*,
    types::{
        CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, MaybeInaccessibleMessage, Message,
    },
};

use crate::{
    bet::dto::{BetAction, CartAction},
    bet::handler::checkout,
    bet::session::Outcome,
    bet::wizard::{cart_screen, render},
    dependencies::BotDependencies,
};

async fn edit_screen(bot: &Bot, message: &Message, text: String, markup: InlineKeyboardMarkup) {
    // Telegram refuses edits that change nothing; the screen is already right.
    if let Err(e) = bot
        .edit_message_text(message.chat.id, message.id, text)
        .reply_markup(markup)
        .await
    {
        log::warn!("Failed to edit bet message {}: {}", message.id.0, e);
    }
}

pub async fn handle_bet_callback(
    bot: Bot,
    query: CallbackQuery,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(action) = query.data.as_deref().and_then(BetAction::parse) else {
        bot.answer_callback_query(query.id).text("❌ Unknown action").await?;
        return Ok(());
    };
    let message = match &query.message {
        Some(MaybeInaccessibleMessage::Regular(m)) => m,
        _ => {
            bot.answer_callback_query(query.id).text("❌ Invalid context").await?;
            return Ok(());
        }
    };
    let owner = OwnerKey::new(message.chat.id.0, query.from.id.0 as i64);

    let Some(mut session) = bot_deps.sessions.get(owner)? else {
        bot.answer_callback_query(query.id)
            .text("⌛ Aposta expirada. Use /apostar.")
            .await?;
        return Ok(());
    };
    let mut store = bot_deps.carts.load(owner)?;
    let now = bot_deps.config.local_now();

    log::debug!("Bet action {:?} for {:?}", action, owner);
    let outcome = match session.apply(action, &mut store, &bot_deps.catalog, now) {
        Ok(outcome) => outcome,
        Err(e) => {
            bot.answer_callback_query(query.id)
                .text(format!("❌ {}", e))
                .show_alert(true)
                .await?;
            return Ok(());
        }
    };

    match outcome {
        Outcome::Updated | Outcome::Notice(_) => {
            bot_deps.sessions.put(owner, &session)?;
            bot_deps.carts.save(owner, &store)?;
            let mut answer = bot.answer_callback_query(query.id);
            if let Outcome::Notice(notice) = outcome {
                answer = answer.text(notice);
            }
            answer.await?;
            let (text, markup) = render(&session, &store, &bot_deps.catalog, now);
            edit_screen(&bot, message, text, markup).await;
        }
        Outcome::Exit => {
            session.abandon(&mut store);
            bot_deps.sessions.delete(owner)?;
            bot_deps.carts.save(owner, &store)?;
            bot.answer_callback_query(query.id).await?;
            edit_screen(
                &bot,
                message,
                "✖️ Aposta cancelada.".to_string(),
                InlineKeyboardMarkup::new(Vec::<Vec<InlineKeyboardButton>>::new()),
            )
            .await;
        }
        Outcome::Confirmed(created) => {
            bot_deps.sessions.delete(owner)?;
            bot_deps.carts.save(owner, &store)?;
            bot.answer_callback_query(query.id)
                .text(format!("✅ {} aposta(s) no carrinho", created))
                .await?;
            let (text, markup) = cart_screen(&store, &bot_deps.catalog);
            edit_screen(&bot, message, text, markup).await;
        }
    }
    Ok(())
}

pub async fn handle_cart_callback(
    bot: Bot,
    query: CallbackQuery,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(action) = query.data.as_deref().and_then(CartAction::parse) else {
        bot.answer_callback_query(query.id).text("❌ Unknown action").await?;
        return Ok(());
    };
    let message = match &query.message {
        Some(MaybeInaccessibleMessage::Regular(m)) => m,
        _ => {
            bot.answer_callback_query(query.id).text("❌ Invalid context").await?;
            return Ok(());
        }
    };
    let owner = OwnerKey::new(message.chat.id.0, query.from.id.0 as i64);

    if action == CartAction::Checkout {
        bot.answer_callback_query(query.id).text("⏳ Enviando apostas...").await?;
        let report = checkout(&bot_deps, owner).await?;
        let store = bot_deps.carts.load(owner)?;
        let (cart, markup) = cart_screen(&store, &bot_deps.catalog);
        edit_screen(&bot, message, format!("{}\n\n{}", report, cart), markup).await;
        return Ok(());
    }

    let mut store = bot_deps.carts.load(owner)?;
    let notice = match action {
        CartAction::Remove(id) => {
            if store.remove_item(&id) {
                "🗑️ Aposta removida".to_string()
            } else {
                "ℹ️ Aposta não está mais no carrinho".to_string()
            }
        }
        CartAction::RemoveLoteria(id) => {
            let dropped = store.remove_loteria_from_all(&id, bot_deps.catalog.as_ref());
            if dropped > 0 {
                format!("❌ Loteria removida, {} aposta(s) sem loterias saíram", dropped)
            } else {
                "❌ Loteria removida".to_string()
            }
        }
        CartAction::Clear => {
            bot_deps.sessions.delete(owner)?;
            store.clear();
            "🧹 Carrinho esvaziado".to_string()
        }
        CartAction::Checkout => String::new(),
    };
    bot_deps.carts.save(owner, &store)?;

    bot.answer_callback_query(query.id).text(notice).await?;
    let (text, markup) = cart_screen(&store, &bot_deps.catalog);
    edit_screen(&bot, message, text, markup).await;
    Ok(())
}
