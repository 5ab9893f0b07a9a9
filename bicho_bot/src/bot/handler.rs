use anyhow::Result;
use bicho_core::helpers::bot_commands::Command;
use teloxide::{prelude::*, types::Message, utils::command::BotCommands};

pub async fn handle_help(bot: Bot, msg: Message) -> Result<()> {
    let text = format!(
        "🐾 Jogo do bicho\n\n{}\n\nDurante uma aposta, digite palpites ou valores direto no chat.",
        Command::descriptions()
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}
