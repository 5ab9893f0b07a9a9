use anyhow::Result;
use bicho_core::helpers::bot_commands::Command;
use teloxide::{Bot, types::Message};

use super::handler::handle_help;
use crate::bet::handler::{
    handle_apostar_command, handle_cancelar_command, handle_carrinho_command,
    handle_finalizar_command, handle_limpar_command,
};
use crate::dependencies::BotDependencies;

pub async fn answers(
    bot: Bot,
    msg: Message,
    cmd: Command,
    bot_deps: BotDependencies,
) -> Result<()> {
    match cmd {
        Command::Help => handle_help(bot, msg).await?,
        Command::Apostar => handle_apostar_command(bot, msg, bot_deps).await?,
        Command::Carrinho => handle_carrinho_command(bot, msg, bot_deps).await?,
        Command::Finalizar => handle_finalizar_command(bot, msg, bot_deps).await?,
        Command::Limpar => handle_limpar_command(bot, msg, bot_deps).await?,
        Command::Cancelar => handle_cancelar_command(bot, msg, bot_deps).await?,
    };
    Ok(())
}
