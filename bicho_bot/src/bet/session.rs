use bicho_core::bet::dto::{Colocacao, GameType};
use bicho_core::bet::modality;
use bicho_core::bet::palpite::split_input;
use bicho_core::bet::store::BetStore;
use bicho_core::error::FlowError;
use bicho_core::flow::dto::{Back, Step};
use bicho_core::flow::machine::ColocacaoFlow;
use bicho_core::helpers::money::{format_brl, parse_amount};
use bicho_core::lottery::dto::LotteryCatalog;
use bicho_core::lottery::selector::available_bancas;
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::bet::dto::{BetAction, BetSession};

/// How many days ahead a bet can be placed, today included.
pub const BOOKING_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Redraw the current screen.
    Updated,
    /// Redraw and tell the player something.
    Notice(String),
    /// The session ended without a cart change.
    Exit,
    /// Bets moved into the cart.
    Confirmed(usize),
}

pub fn booking_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..BOOKING_DAYS).map(|d| today + Duration::days(d)).collect()
}

fn unavailable() -> Outcome {
    Outcome::Notice("⚠️ Ação indisponível neste passo.".to_string())
}

/// Pending bets belong to a single flow and its date. Whenever that flow
/// ends without confirming, they go too.
fn withdraw_pending(store: &mut BetStore) -> usize {
    let pending: Vec<String> = store.pending_items().iter().map(|p| p.id.clone()).collect();
    for id in &pending {
        store.remove_pending_item(id);
    }
    pending.len()
}

impl BetSession {
    pub fn in_setup(&self) -> bool {
        self.flow.is_none() || self.adding_modality
    }

    /// Withdraws every pending bet and resets the session.
    pub fn abandon(&mut self, store: &mut BetStore) {
        withdraw_pending(store);
        *self = BetSession::default();
    }

    pub fn apply(
        &mut self,
        action: BetAction,
        store: &mut BetStore,
        catalog: &LotteryCatalog,
        now: NaiveDateTime,
    ) -> Result<Outcome, FlowError> {
        match action {
            BetAction::Cancel => {
                self.abandon(store);
                Ok(Outcome::Exit)
            }
            BetAction::Back => self.back(store),
            BetAction::Tipo(tipo) => {
                if self.flow.is_some() {
                    return Ok(unavailable());
                }
                self.setup = Default::default();
                self.setup.tipo = Some(tipo);
                Ok(Outcome::Updated)
            }
            BetAction::Modalidade(code) => self.select_modalidade(code),
            BetAction::Colocacao(colocacao) => self.select_colocacao(colocacao),
            BetAction::Data(data) => self.select_data(data, store, now),
            action => {
                if self.adding_modality {
                    return Ok(unavailable());
                }
                let Some(mut flow) = self.flow.take() else {
                    return Ok(unavailable());
                };
                let outcome = self.apply_flow(&mut flow, action, store, catalog, now);
                self.flow = Some(flow);
                outcome
            }
        }
    }

    fn back(&mut self, store: &mut BetStore) -> Result<Outcome, FlowError> {
        if self.adding_modality {
            if self.setup.modalidade.take().is_none() {
                self.adding_modality = false;
            }
            return Ok(Outcome::Updated);
        }

        if let Some(flow) = self.flow.as_mut() {
            self.valor = None;
            match flow.back(store) {
                Back::Step(_) => return Ok(Outcome::Updated),
                // Leaving the palpite step returns to the date picker.
                Back::Exit => {
                    self.flow = None;
                    self.setup.data = None;
                    self.lotteries.clear();
                    if withdraw_pending(store) > 0 {
                        return Ok(Outcome::Notice(
                            "🗑️ Apostas pendentes descartadas.".to_string(),
                        ));
                    }
                    return Ok(Outcome::Updated);
                }
            }
        }

        let setup = &mut self.setup;
        if setup.data.take().is_some()
            || setup.colocacao.take().is_some()
            || setup.modalidade.take().is_some()
            || setup.tipo.take().is_some()
        {
            Ok(Outcome::Updated)
        } else {
            withdraw_pending(store);
            Ok(Outcome::Exit)
        }
    }

    fn current_tipo(&self) -> Option<GameType> {
        match &self.flow {
            Some(flow) => Some(flow.selection().tipo),
            None => self.setup.tipo,
        }
    }

    fn select_modalidade(&mut self, code: String) -> Result<Outcome, FlowError> {
        if !self.in_setup() {
            return Ok(unavailable());
        }
        let Some(tipo) = self.current_tipo() else {
            return Ok(unavailable());
        };
        let modalidade = modality::find(&code)
            .filter(|m| m.tipo == tipo)
            .ok_or_else(|| FlowError::UnknownModalidade(code.clone()))?;

        self.setup.modalidade = Some(code);
        self.setup.colocacao = None;

        // Skip the colocacao picker when there is nothing to pick.
        if let [only] = modalidade.colocacoes {
            if let Ok(colocacao) = only.parse::<Colocacao>() {
                return self.select_colocacao(colocacao);
            }
        }
        Ok(Outcome::Updated)
    }

    fn select_colocacao(&mut self, colocacao: Colocacao) -> Result<Outcome, FlowError> {
        if !self.in_setup() {
            return Ok(unavailable());
        }
        let Some(code) = self.setup.modalidade.clone() else {
            return Ok(unavailable());
        };

        if self.adding_modality {
            if let Some(flow) = self.flow.as_mut() {
                flow.add_another_modality(&code, colocacao)?;
            }
            self.adding_modality = false;
            self.setup.modalidade = Some(code);
            self.setup.colocacao = Some(colocacao);
            return Ok(Outcome::Updated);
        }

        let modalidade = modality::find(&code)
            .ok_or_else(|| FlowError::UnknownModalidade(code.clone()))?;
        if !modalidade.offers(&colocacao) {
            return Err(FlowError::ColocacaoNotOffered {
                modalidade: code,
                colocacao: colocacao.to_string(),
            });
        }
        self.setup.colocacao = Some(colocacao);
        Ok(Outcome::Updated)
    }

    fn select_data(
        &mut self,
        data: NaiveDate,
        store: &mut BetStore,
        now: NaiveDateTime,
    ) -> Result<Outcome, FlowError> {
        if self.flow.is_some() {
            return Ok(unavailable());
        }
        let (Some(tipo), Some(modalidade), Some(colocacao)) = (
            self.setup.tipo,
            self.setup.modalidade.clone(),
            self.setup.colocacao,
        ) else {
            return Ok(unavailable());
        };
        if !booking_dates(now.date()).contains(&data) {
            return Ok(Outcome::Notice("📅 Data fora do período de apostas.".to_string()));
        }

        let flow = ColocacaoFlow::new(tipo, data, &modalidade, colocacao)?;
        // A new flow starts with an empty pending list.
        withdraw_pending(store);
        self.flow = Some(flow);
        self.setup.data = Some(data);
        self.lotteries.clear();
        self.valor = None;
        Ok(Outcome::Updated)
    }

    fn apply_flow(
        &mut self,
        flow: &mut ColocacaoFlow,
        action: BetAction,
        store: &mut BetStore,
        catalog: &LotteryCatalog,
        now: NaiveDateTime,
    ) -> Result<Outcome, FlowError> {
        match action {
            BetAction::RemovePalpite(p) => {
                flow.remove_palpite(&p)?;
                Ok(Outcome::Updated)
            }
            BetAction::Surpresinha => match flow.surpresinha(&mut rand::thread_rng())? {
                Some(palpite) => Ok(Outcome::Notice(format!("🎲 Surpresinha: {}", palpite))),
                None => Ok(Outcome::Notice("🎲 Saiu um palpite repetido, tente de novo.".to_string())),
            },
            BetAction::Next => {
                flow.advance()?;
                Ok(Outcome::Updated)
            }
            BetAction::Valor(cents) => {
                if flow.step() != Step::Valor {
                    return Ok(unavailable());
                }
                self.valor = Some(cents as f64 / 100.0);
                Ok(Outcome::Updated)
            }
            BetAction::Modo(modo) => {
                let Some(v) = self.valor else {
                    return Ok(Outcome::Notice("💰 Escolha um valor primeiro.".to_string()));
                };
                flow.choose_value(v, modo)?;
                self.valor = None;
                Ok(Outcome::Updated)
            }
            BetAction::Push => {
                flow.advance_to_lotteries(store)?;
                let available = available_bancas(catalog, flow.selection().data, now);
                self.lotteries.retain_available(&available);
                Ok(Outcome::Updated)
            }
            BetAction::ToggleLoteria(id) => {
                if flow.step() != Step::Loterias {
                    return Ok(unavailable());
                }
                let available = available_bancas(catalog, flow.selection().data, now);
                if self.lotteries.toggle(&id, &available) {
                    Ok(Outcome::Updated)
                } else {
                    Ok(Outcome::Notice("⏰ Esta loteria já encerrou.".to_string()))
                }
            }
            BetAction::ToggleBanca(id) => {
                if flow.step() != Step::Loterias {
                    return Ok(unavailable());
                }
                let available = available_bancas(catalog, flow.selection().data, now);
                self.lotteries.toggle_banca(&id, &available);
                Ok(Outcome::Updated)
            }
            BetAction::MoreModality => {
                if flow.step() != Step::Loterias {
                    return Ok(unavailable());
                }
                self.adding_modality = true;
                self.setup.modalidade = None;
                self.setup.colocacao = None;
                Ok(Outcome::Updated)
            }
            BetAction::Confirm => {
                let available = available_bancas(catalog, flow.selection().data, now);
                let closed = self.lotteries.retain_available(&available);
                if closed > 0 && self.lotteries.is_empty() {
                    return Ok(Outcome::Notice(
                        "⏰ As loterias escolhidas encerraram. Escolha outras.".to_string(),
                    ));
                }
                let created = flow.confirm_lotteries(&self.lotteries.selected_ids(), catalog, store)?;
                Ok(Outcome::Confirmed(created))
            }
            _ => Ok(unavailable()),
        }
    }

    /// Handles a typed message: palpites on the palpite step, an amount on
    /// the valor step.
    pub fn apply_text(&mut self, text: &str) -> Result<Outcome, FlowError> {
        if self.adding_modality {
            return Ok(unavailable());
        }
        let Some(flow) = self.flow.as_mut() else {
            return Ok(unavailable());
        };

        match flow.step() {
            Step::Palpite => {
                let mut added = Vec::new();
                let mut repeated = Vec::new();
                let mut invalid = Vec::new();
                for raw in split_input(text) {
                    match flow.add_palpite(raw) {
                        Ok(true) => added.push(raw),
                        Ok(false) => repeated.push(raw),
                        Err(FlowError::InvalidPalpite(e)) => invalid.push(format!("{} ({})", raw, e)),
                        Err(e) => return Err(e),
                    }
                }

                let mut lines = Vec::new();
                if !added.is_empty() {
                    lines.push(format!("✅ {} palpite(s) adicionado(s).", added.len()));
                }
                if !repeated.is_empty() {
                    lines.push(format!("↩️ Já na lista: {}", repeated.join(", ")));
                }
                if !invalid.is_empty() {
                    lines.push(format!("❌ Inválidos: {}", invalid.join("; ")));
                }
                if lines.is_empty() {
                    return Ok(Outcome::Updated);
                }
                Ok(Outcome::Notice(lines.join("\n")))
            }
            Step::Valor => match parse_amount(text) {
                Some(v) => {
                    self.valor = Some(v);
                    Ok(Outcome::Notice(format!("💰 Valor: {}", format_brl(v))))
                }
                None => Ok(Outcome::Notice("❌ Valor inválido. Ex.: 2,50".to_string())),
            },
            _ => Ok(Outcome::Notice("👆 Use os botões abaixo.".to_string())),
        }
    }
}
