use anyhow::Result;
use bicho_core::helpers::bot_commands::Command;
use teloxide::{
    Bot,
    dispatching::{DpHandlerDescription, HandlerExt, UpdateFilterExt},
    dptree::{self, Handler},
    types::{CallbackQuery, Message, Update},
};

use crate::{
    bet::handler::handle_bet_text, bot::answers::answers, bot::handler::handle_help,
    callbacks::handle_callback_query,
    dependencies::BotDependencies,
};

pub fn handler_tree() -> Handler<'static, Result<()>, DpHandlerDescription> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(answers),
                )
                // Plain text feeds the bet in progress (palpites, custom values).
                .branch(
                    dptree::entry()
                        .filter(|msg: Message| {
                            msg.text().is_some_and(|text| !text.starts_with('/'))
                        })
                        .endpoint(handle_bet_text),
                )
                // /start and unknown commands get the help text.
                .branch(
                    dptree::entry()
                        .filter(|msg: Message| msg.text().is_some_and(|text| text.starts_with('/')))
                        .endpoint(|bot: Bot, msg: Message| async move { handle_help(bot, msg).await }),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(
            |bot: Bot, query: CallbackQuery, bot_deps: BotDependencies| async move {
                handle_callback_query(bot, query, bot_deps).await
            },
        ))
}
