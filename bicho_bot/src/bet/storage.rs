use anyhow::Result;
use bicho_core::helpers::dto::OwnerKey;
use sled::{Db, Tree};

use crate::bet::dto::BetSession;

const BET_SESSIONS_TREE: &str = "bet_sessions";

#[derive(Clone)]
pub struct SessionStorage {
    sessions: Tree,
}

impl SessionStorage {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let sessions = db.open_tree(BET_SESSIONS_TREE)?;
        Ok(Self { sessions })
    }

    pub fn get(&self, owner: OwnerKey) -> Result<Option<BetSession>> {
        match self.sessions.get(owner.to_key_bytes())? {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    // Unreadable sessions are dropped; the player starts over.
                    log::warn!("Discarding unreadable bet session for {:?}: {}", owner, e);
                    self.sessions.remove(owner.to_key_bytes())?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub fn put(&self, owner: OwnerKey, session: &BetSession) -> Result<()> {
        let bytes = serde_json::to_vec(session)?;
        self.sessions.insert(owner.to_key_bytes(), bytes)?;
        Ok(())
    }

    pub fn delete(&self, owner: OwnerKey) -> Result<()> {
        self.sessions.remove(owner.to_key_bytes())?;
        Ok(())
    }
}
