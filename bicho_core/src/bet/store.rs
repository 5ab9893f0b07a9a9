use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dto::{BetItem, BetLine, PendingBet};
use crate::error::StoreError;
use crate::lottery::dto::DrawSchedule;

/// Cart of finalized bets plus the bets still waiting for their lotteries.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BetStore {
    items: Vec<BetItem>,
    pending_items: Vec<PendingBet>,
}

impl BetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[BetItem] {
        &self.items
    }

    pub fn pending_items(&self) -> &[PendingBet] {
        &self.pending_items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.pending_items.is_empty()
    }

    /// Queues a bet and returns its generated id.
    pub fn add_pending_item(&mut self, line: BetLine) -> String {
        let id = Uuid::new_v4().to_string();
        self.pending_items.push(PendingBet {
            id: id.clone(),
            line,
        });
        id
    }

    pub fn remove_pending_item(&mut self, id: &str) {
        self.pending_items.retain(|p| p.id != id);
    }

    /// Turns every pending bet into a cart item on the given draws and
    /// returns how many items were created.
    pub fn finalize_pending_items(
        &mut self,
        loterias: &[String],
        horarios: &[String],
    ) -> Result<usize, StoreError> {
        if self.pending_items.is_empty() {
            return Ok(0);
        }
        if loterias.is_empty() {
            return Err(StoreError::NoLotteries);
        }

        let created = self.pending_items.len();
        self.items
            .extend(self.pending_items.drain(..).map(|pending| BetItem {
                id: pending.id,
                line: pending.line,
                horarios: horarios.to_vec(),
                loterias: loterias.to_vec(),
            }));

        log::debug!("Finalized {} pending bets on {} lotteries", created, loterias.len());
        Ok(created)
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        before != self.items.len()
    }

    /// Removes a lottery from every cart item. The lottery's draw time goes
    /// too unless another remaining lottery of the item shares it; items left
    /// without lotteries are dropped. Returns the number of dropped items.
    pub fn remove_loteria_from_all<S>(&mut self, loteria_id: &str, schedule: &S) -> usize
    where
        S: DrawSchedule + ?Sized,
    {
        let removed_horario = schedule.horario_of(loteria_id);

        for item in self.items.iter_mut() {
            if !item.loterias.iter().any(|id| id == loteria_id) {
                continue;
            }
            item.loterias.retain(|id| id != loteria_id);

            if let Some(horario) = removed_horario.as_deref() {
                let still_covered = item
                    .loterias
                    .iter()
                    .any(|id| schedule.horario_of(id).as_deref() == Some(horario));
                if !still_covered {
                    item.horarios.retain(|h| h != horario);
                }
            }
        }

        let before = self.items.len();
        self.items.retain(|item| !item.loterias.is_empty());
        before - self.items.len()
    }

    /// Σ palpites × horarios × valor_unitario over the cart.
    pub fn total(&self) -> f64 {
        self.items.iter().map(BetItem::total).sum()
    }

    /// Stake of the pending bets for a single draw.
    pub fn pending_total(&self) -> f64 {
        self.pending_items.iter().map(|p| p.line.stake_per_draw()).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pending_items.clear();
    }
}
