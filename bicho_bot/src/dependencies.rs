use std::sync::Arc;

use bicho_core::bet::storage::CartStorage;
use bicho_core::checkout::handler::SupabaseRpc;
use bicho_core::helpers::config::Config;
use bicho_core::lottery::dto::LotteryCatalog;

use crate::bet::storage::SessionStorage;

#[derive(Clone)]
pub struct BotDependencies {
    pub carts: CartStorage,
    pub sessions: SessionStorage,
    pub catalog: Arc<LotteryCatalog>,
    pub checkout: SupabaseRpc,
    pub config: Arc<Config>,
}
