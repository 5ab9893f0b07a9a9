mod bet;
mod bot;
mod callbacks;
mod dependencies;

use std::sync::Arc;

use anyhow::Result;
use bicho_core::bet::storage::CartStorage;
use bicho_core::checkout::handler::SupabaseRpc;
use bicho_core::helpers::bot_commands::Command;
use bicho_core::helpers::config::Config;
use bicho_core::lottery::dto::LotteryCatalog;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::bet::storage::SessionStorage;
use crate::bot::handler_tree::handler_tree;
use crate::dependencies::BotDependencies;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    log::info!("Starting bicho_bot...");

    let config = Config::from_env()?;
    let db = sled::open(&config.db_path)?;
    let catalog = LotteryCatalog::from_ron_file(&config.lottery_catalog)?;

    let bot = Bot::from_env();
    bot.set_my_commands(Command::bot_commands()).await?;

    let bot_deps = BotDependencies {
        carts: CartStorage::new(&db)?,
        sessions: SessionStorage::new(&db)?,
        catalog: Arc::new(catalog),
        checkout: SupabaseRpc::from_config(&config),
        config: Arc::new(config),
    };

    Dispatcher::builder(bot, handler_tree())
        .dependencies(dptree::deps![bot_deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    log::info!("Flushing sled before exit");
    db.flush_async().await?;
    Ok(())
}
