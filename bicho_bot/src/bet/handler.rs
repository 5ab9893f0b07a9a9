use anyhow::Result;
use bicho_core::checkout::handler::submit_cart;
use bicho_core::error::CheckoutError;
use bicho_core::helpers::dto::OwnerKey;
use bicho_core::helpers::money::format_brl;
use teloxide::{prelude::*, types::Message};

use crate::{
    bet::session::Outcome,
    bet::wizard::{cart_screen, render},
    dependencies::BotDependencies,
};

pub fn owner_of(msg: &Message) -> Option<OwnerKey> {
    msg.from
        .as_ref()
        .map(|user| OwnerKey::new(msg.chat.id.0, user.id.0 as i64))
}

pub async fn handle_apostar_command(
    bot: Bot,
    msg: Message,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(owner) = owner_of(&msg) else {
        return Ok(());
    };

    // A new bet replaces whatever was in progress, stray pending bets included.
    let mut store = bot_deps.carts.load(owner)?;
    let mut session = bot_deps.sessions.get(owner)?.unwrap_or_default();
    session.abandon(&mut store);
    bot_deps.carts.save(owner, &store)?;
    bot_deps.sessions.put(owner, &session)?;

    let (text, markup) = render(
        &session,
        &store,
        &bot_deps.catalog,
        bot_deps.config.local_now(),
    );
    bot.send_message(msg.chat.id, text)
        .reply_markup(markup)
        .await?;
    Ok(())
}

/// Typed input for an active bet: palpites or a custom value. Messages from
/// users without a session are ignored.
pub async fn handle_bet_text(bot: Bot, msg: Message, bot_deps: BotDependencies) -> Result<()> {
    let (Some(owner), Some(text)) = (owner_of(&msg), msg.text()) else {
        return Ok(());
    };
    let Some(mut session) = bot_deps.sessions.get(owner)? else {
        return Ok(());
    };

    let notice = match session.apply_text(text) {
        Ok(Outcome::Notice(notice)) => Some(notice),
        Ok(_) => None,
        Err(e) => Some(format!("❌ {}", e)),
    };
    bot_deps.sessions.put(owner, &session)?;

    let store = bot_deps.carts.load(owner)?;
    let (screen, markup) = render(
        &session,
        &store,
        &bot_deps.catalog,
        bot_deps.config.local_now(),
    );
    let text = match notice {
        Some(notice) => format!("{}\n\n{}", notice, screen),
        None => screen,
    };
    bot.send_message(msg.chat.id, text)
        .reply_markup(markup)
        .await?;
    Ok(())
}

pub async fn handle_carrinho_command(
    bot: Bot,
    msg: Message,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(owner) = owner_of(&msg) else {
        return Ok(());
    };
    let store = bot_deps.carts.load(owner)?;
    let (text, markup) = cart_screen(&store, &bot_deps.catalog);
    bot.send_message(msg.chat.id, text)
        .reply_markup(markup)
        .await?;
    Ok(())
}

pub async fn handle_finalizar_command(
    bot: Bot,
    msg: Message,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(owner) = owner_of(&msg) else {
        return Ok(());
    };
    let report = checkout(&bot_deps, owner).await?;
    bot.send_message(msg.chat.id, report).await?;
    Ok(())
}

pub async fn handle_limpar_command(
    bot: Bot,
    msg: Message,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(owner) = owner_of(&msg) else {
        return Ok(());
    };
    bot_deps.sessions.delete(owner)?;
    bot_deps.carts.delete(owner)?;
    bot.send_message(msg.chat.id, "🧹 Carrinho esvaziado.").await?;
    Ok(())
}

pub async fn handle_cancelar_command(
    bot: Bot,
    msg: Message,
    bot_deps: BotDependencies,
) -> Result<()> {
    let Some(owner) = owner_of(&msg) else {
        return Ok(());
    };
    let Some(mut session) = bot_deps.sessions.get(owner)? else {
        bot.send_message(msg.chat.id, "ℹ️ Nenhuma aposta em andamento.")
            .await?;
        return Ok(());
    };

    let mut store = bot_deps.carts.load(owner)?;
    session.abandon(&mut store);
    bot_deps.carts.save(owner, &store)?;
    bot_deps.sessions.delete(owner)?;
    bot.send_message(msg.chat.id, "✖️ Aposta cancelada.").await?;
    Ok(())
}

/// Submits the owner's cart and returns the report for the player. The cart
/// is saved either way so accepted bets never get resubmitted.
pub async fn checkout(bot_deps: &BotDependencies, owner: OwnerKey) -> Result<String> {
    let mut store = bot_deps.carts.load(owner)?;
    let result = submit_cart(&mut store, &bot_deps.checkout).await;
    bot_deps.carts.save(owner, &store)?;

    let report = match result {
        Ok(receipt) => {
            let mut text = format!("✅ {} aposta(s) registrada(s).", receipt.pules.len());
            if !receipt.pules.is_empty() {
                text.push_str(&format!("\nPules: {}", receipt.pules.join(", ")));
            }
            if let Some(saldo) = receipt.saldo {
                text.push_str(&format!("\n💰 Saldo: {}", format_brl(saldo)));
            }
            text
        }
        Err(failure) => {
            let reason = match &failure.error {
                CheckoutError::EmptyCart => return Ok("🛒 Seu carrinho está vazio.".to_string()),
                CheckoutError::Rejected(message) => message.clone(),
                other => {
                    log::error!("Checkout failed for {:?}: {}", owner, other);
                    "Não foi possível falar com o servidor. Tente novamente.".to_string()
                }
            };
            let mut text = format!("❌ {}", reason);
            if !failure.accepted.pules.is_empty() {
                text.push_str(&format!(
                    "\n\n✅ Registradas antes do erro: {}",
                    failure.accepted.pules.join(", ")
                ));
            }
            if !store.items().is_empty() {
                text.push_str(&format!(
                    "\n🛒 {} aposta(s) continuam no carrinho.",
                    store.items().len()
                ));
            }
            text
        }
    };
    Ok(report)
}
