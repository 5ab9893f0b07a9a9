use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug)]
#[command(
    rename_rule = "lowercase",
    description = "Comandos disponíveis:"
)]
pub enum Command {
    #[command(description = "Mostra esta ajuda.")]
    Help,
    #[command(description = "Começa uma nova aposta.")]
    Apostar,
    #[command(description = "Mostra o carrinho de apostas.")]
    Carrinho,
    #[command(description = "Envia todas as apostas do carrinho.")]
    Finalizar,
    #[command(description = "Esvazia o carrinho.")]
    Limpar,
    #[command(description = "Cancela a aposta em andamento.")]
    Cancelar,
}
