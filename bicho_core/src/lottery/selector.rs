use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use super::dto::{Banca, Loteria, LotteryCatalog};

/// Bets close this many minutes before the draw.
pub const CUTOFF_MINUTES: i64 = 5;

/// The federal lottery only draws on these weekdays.
pub const FEDERAL_WEEKDAYS: [Weekday; 2] = [Weekday::Wed, Weekday::Sat];

pub fn banca_runs_on(banca: &Banca, target: NaiveDate) -> bool {
    !banca.is_federal() || FEDERAL_WEEKDAYS.contains(&target.weekday())
}

/// Whether a slot still accepts bets for `target`, given the local time `now`.
pub fn is_slot_open(loteria: &Loteria, target: NaiveDate, now: NaiveDateTime) -> bool {
    let today = now.date();
    if target > today {
        return true;
    }
    if target < today {
        return false;
    }
    match loteria.draw_time() {
        Some(draw_time) => {
            let cutoff = target.and_time(draw_time) - Duration::minutes(CUTOFF_MINUTES);
            now < cutoff
        }
        None => false,
    }
}

/// A banca with the slots still open for the target date.
#[derive(Debug, Clone)]
pub struct AvailableBanca<'a> {
    pub banca: &'a Banca,
    pub loterias: Vec<&'a Loteria>,
}

impl AvailableBanca<'_> {
    pub fn contains(&self, loteria_id: &str) -> bool {
        self.loterias.iter().any(|l| l.id == loteria_id)
    }
}

/// Bancas listed for `target`, each with its open slots. Bancas without any
/// open slot are left out.
pub fn available_bancas(
    catalog: &LotteryCatalog,
    target: NaiveDate,
    now: NaiveDateTime,
) -> Vec<AvailableBanca<'_>> {
    catalog
        .bancas
        .iter()
        .filter(|banca| banca_runs_on(banca, target))
        .map(|banca| AvailableBanca {
            banca,
            loterias: banca
                .loterias
                .iter()
                .filter(|l| is_slot_open(l, target, now))
                .collect(),
        })
        .filter(|available| !available.loterias.is_empty())
        .collect()
}

fn is_available(available: &[AvailableBanca<'_>], loteria_id: &str) -> bool {
    available.iter().any(|b| b.contains(loteria_id))
}

/// Multi-select state for the lottery step.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LotterySelection {
    selected: BTreeSet<String>,
}

impl LotterySelection {
    pub fn is_selected(&self, loteria_id: &str) -> bool {
        self.selected.contains(loteria_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Flips one slot. Slots that are not open are ignored; returns whether
    /// the selection changed.
    pub fn toggle(&mut self, loteria_id: &str, available: &[AvailableBanca<'_>]) -> bool {
        if self.selected.remove(loteria_id) {
            return true;
        }
        if !is_available(available, loteria_id) {
            return false;
        }
        self.selected.insert(loteria_id.to_string());
        true
    }

    /// Selects every open slot of the banca, or deselects them all when they
    /// are already all selected.
    pub fn toggle_banca(&mut self, banca_id: &str, available: &[AvailableBanca<'_>]) {
        let Some(banca) = available.iter().find(|b| b.banca.id == banca_id) else {
            return;
        };

        let all_selected = banca.loterias.iter().all(|l| self.selected.contains(&l.id));
        for loteria in &banca.loterias {
            if all_selected {
                self.selected.remove(&loteria.id);
            } else {
                self.selected.insert(loteria.id.clone());
            }
        }
    }

    pub fn is_banca_fully_selected(&self, banca: &AvailableBanca<'_>) -> bool {
        !banca.loterias.is_empty() && banca.loterias.iter().all(|l| self.selected.contains(&l.id))
    }

    /// Drops selections whose slot closed in the meantime.
    pub fn retain_available(&mut self, available: &[AvailableBanca<'_>]) -> usize {
        let before = self.selected.len();
        self.selected.retain(|id| is_available(available, id));
        before - self.selected.len()
    }
}
