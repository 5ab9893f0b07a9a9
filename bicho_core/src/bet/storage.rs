use sled::{Db, Tree};

use super::store::BetStore;
use crate::error::StorageError;
use crate::helpers::dto::OwnerKey;

const BET_CARTS_TREE: &str = "bet_carts";

/// Save/load boundary for carts. Last write wins.
#[derive(Clone)]
pub struct CartStorage {
    carts: Tree,
}

impl CartStorage {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let carts = db.open_tree(BET_CARTS_TREE)?;
        Ok(Self { carts })
    }

    /// Loads the owner's cart, or an empty one when nothing was saved yet.
    /// Unreadable records are dropped so the player can keep betting.
    pub fn load(&self, owner: OwnerKey) -> Result<BetStore, StorageError> {
        match self.carts.get(owner.to_key_bytes())? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(store) => Ok(store),
                Err(e) => {
                    log::warn!("Discarding unreadable cart for {:?}: {}", owner, e);
                    self.carts.remove(owner.to_key_bytes())?;
                    Ok(BetStore::default())
                }
            },
            None => Ok(BetStore::default()),
        }
    }

    pub fn save(&self, owner: OwnerKey, store: &BetStore) -> Result<(), StorageError> {
        let key = owner.to_key_bytes();
        if store.is_empty() {
            self.carts.remove(key)?;
        } else {
            let bytes = serde_json::to_vec(store)?;
            self.carts.insert(key, bytes)?;
        }
        Ok(())
    }

    pub fn delete(&self, owner: OwnerKey) -> Result<(), StorageError> {
        self.carts.remove(owner.to_key_bytes())?;
        Ok(())
    }
}
