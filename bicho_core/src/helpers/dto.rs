use serde::{Deserialize, Serialize};

/// Owner of a cart or a bet session: one per user per chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl OwnerKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }

    pub fn to_key_bytes(self) -> Vec<u8> {
        let mut v = Vec::with_capacity(16);
        v.extend_from_slice(&self.chat_id.to_be_bytes());
        v.extend_from_slice(&self.user_id.to_be_bytes());
        v
    }
}
