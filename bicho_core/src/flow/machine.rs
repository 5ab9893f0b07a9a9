use std::collections::BTreeSet;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::dto::{Back, FlowEvent, Resumo, Step, ValueMode};
use crate::bet::dto::{BetLine, BetSelection, Colocacao, GameType};
use crate::bet::modality::{self, Modalidade};
use crate::bet::palpite;
use crate::bet::store::BetStore;
use crate::bet::surpresinha;
use crate::error::{FlowError, TransitionError};
use crate::lottery::dto::LotteryCatalog;

/// Step controller for composing bets:
/// `palpite → valor → resumo → loterias → finished`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ColocacaoFlow {
    step: Step,
    selection: BetSelection,
    valor: Option<f64>,
    modo: Option<ValueMode>,
    /// Pending item pushed from the current draft, withdrawn when backing out
    /// of the lottery step.
    pushed_id: Option<String>,
}

fn resolve_modalidade(
    tipo: GameType,
    code: &str,
    colocacao: &Colocacao,
) -> Result<&'static Modalidade, FlowError> {
    let modalidade = modality::find(code)
        .filter(|m| m.tipo == tipo)
        .ok_or_else(|| FlowError::UnknownModalidade(code.to_string()))?;
    if !modalidade.offers(colocacao) {
        return Err(FlowError::ColocacaoNotOffered {
            modalidade: code.to_string(),
            colocacao: colocacao.to_string(),
        });
    }
    Ok(modalidade)
}

impl ColocacaoFlow {
    pub fn new(
        tipo: GameType,
        data: NaiveDate,
        modalidade: &str,
        colocacao: Colocacao,
    ) -> Result<Self, FlowError> {
        resolve_modalidade(tipo, modalidade, &colocacao)?;
        Ok(Self {
            step: Step::Palpite,
            selection: BetSelection::new(tipo, data, modalidade, colocacao),
            valor: None,
            modo: None,
            pushed_id: None,
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> &BetSelection {
        &self.selection
    }

    pub fn valor(&self) -> Option<f64> {
        self.valor
    }

    pub fn modo(&self) -> Option<ValueMode> {
        self.modo
    }

    pub fn modalidade(&self) -> Result<&'static Modalidade, FlowError> {
        resolve_modalidade(
            self.selection.tipo,
            &self.selection.modalidade,
            &self.selection.colocacao,
        )
    }

    fn expect_step(&self, step: Step, event: FlowEvent) -> Result<(), FlowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.step,
                event: event.name(),
            }
            .into())
        }
    }

    /// Adds a palpite. Duplicates are ignored and reported as `Ok(false)`.
    pub fn add_palpite(&mut self, raw: &str) -> Result<bool, FlowError> {
        self.expect_step(Step::Palpite, FlowEvent::EditPalpites)?;
        let modalidade = self.modalidade()?;
        let normalized = palpite::normalize(&modalidade.format, raw)?;
        Ok(self.insert_palpite(normalized))
    }

    fn insert_palpite(&mut self, normalized: String) -> bool {
        if self.selection.palpites.contains(&normalized) {
            return false;
        }
        self.selection.palpites.push(normalized);
        // A different palpite count changes any "todos" split.
        self.selection.valor_unitario = None;
        true
    }

    pub fn remove_palpite(&mut self, raw: &str) -> Result<bool, FlowError> {
        self.expect_step(Step::Palpite, FlowEvent::EditPalpites)?;
        let modalidade = self.modalidade()?;
        let target = palpite::normalize(&modalidade.format, raw)
            .unwrap_or_else(|_| raw.trim().to_string());
        let before = self.selection.palpites.len();
        self.selection.palpites.retain(|p| *p != target);
        let removed = before != self.selection.palpites.len();
        if removed {
            self.selection.valor_unitario = None;
        }
        Ok(removed)
    }

    /// Generates a random palpite and adds it. Returns `None` when the draw
    /// collided with an existing palpite.
    pub fn surpresinha<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<String>, FlowError> {
        self.expect_step(Step::Palpite, FlowEvent::EditPalpites)?;
        let modalidade = self.modalidade()?;
        let generated = surpresinha::generate(&modalidade.format, rng);
        if self.insert_palpite(generated.clone()) {
            Ok(Some(generated))
        } else {
            Ok(None)
        }
    }

    /// Guard behind the "next" button of the current step.
    pub fn can_advance(&self) -> bool {
        match self.step {
            Step::Palpite => !self.selection.palpites.is_empty(),
            Step::Valor => self.selection.valor_unitario.is_some(),
            Step::Resumo => self.selection.valor_unitario.is_some() && !self.selection.palpites.is_empty(),
            Step::Loterias => true,
            Step::Finished => false,
        }
    }

    /// palpite → valor.
    pub fn advance(&mut self) -> Result<Step, FlowError> {
        if self.step == Step::Palpite && self.selection.palpites.is_empty() {
            return Err(FlowError::NoPalpites);
        }
        self.expect_step(Step::Palpite, FlowEvent::Advance)?;
        self.step = self.step.next(FlowEvent::Advance)?;
        Ok(self.step)
    }

    /// valor → resumo, applying the value to the palpites.
    pub fn choose_value(&mut self, valor: f64, modo: ValueMode) -> Result<Step, FlowError> {
        self.expect_step(Step::Valor, FlowEvent::ChooseValue)?;
        let unit = modo
            .apportion(valor, self.selection.palpites.len())
            .ok_or(FlowError::InvalidValue(valor))?;

        self.valor = Some(valor);
        self.modo = Some(modo);
        self.selection.valor_unitario = Some(unit);
        self.step = self.step.next(FlowEvent::ChooseValue)?;
        Ok(self.step)
    }

    pub fn resumo(&self) -> Result<Resumo, FlowError> {
        let modalidade = self.modalidade()?;
        let valor_unitario = self.selection.valor_unitario.ok_or(FlowError::NoValue)?;
        let multiplicador = modalidade.multiplicador(&self.selection.colocacao);
        let palpites = self.selection.palpites.len();
        Ok(Resumo {
            palpites,
            valor_unitario,
            multiplicador,
            total: palpites as f64 * valor_unitario,
            premio: valor_unitario * multiplicador,
        })
    }

    fn draft_line(&self) -> Result<BetLine, FlowError> {
        let resumo = self.resumo()?;
        if self.selection.palpites.is_empty() {
            return Err(FlowError::NoPalpites);
        }
        Ok(BetLine {
            tipo: self.selection.tipo,
            data: self.selection.data,
            modalidade: self.selection.modalidade.clone(),
            colocacao: self.selection.colocacao,
            palpites: self.selection.palpites.clone(),
            valor_unitario: resumo.valor_unitario,
            multiplicador: resumo.multiplicador,
        })
    }

    /// resumo → loterias. Pushes the draft into the store's pending list so
    /// several modalidades can share one lottery choice.
    pub fn advance_to_lotteries(&mut self, store: &mut BetStore) -> Result<String, FlowError> {
        self.expect_step(Step::Resumo, FlowEvent::PushPending)?;
        let line = self.draft_line()?;
        let next = self.step.next(FlowEvent::PushPending)?;

        let id = store.add_pending_item(line);
        self.pushed_id = Some(id.clone());
        self.step = next;
        Ok(id)
    }

    /// loterias → palpite with a fresh draft on the same game and date.
    pub fn add_another_modality(
        &mut self,
        modalidade: &str,
        colocacao: Colocacao,
    ) -> Result<Step, FlowError> {
        self.expect_step(Step::Loterias, FlowEvent::AddModality)?;
        resolve_modalidade(self.selection.tipo, modalidade, &colocacao)?;

        self.selection = BetSelection::new(self.selection.tipo, self.selection.data, modalidade, colocacao);
        self.valor = None;
        self.modo = None;
        self.pushed_id = None;
        self.step = self.step.next(FlowEvent::AddModality)?;
        Ok(self.step)
    }

    /// loterias → finished. Resolves the selected lotteries to their draw
    /// times and moves every pending bet into the cart.
    pub fn confirm_lotteries(
        &mut self,
        selected: &[String],
        catalog: &LotteryCatalog,
        store: &mut BetStore,
    ) -> Result<usize, FlowError> {
        self.expect_step(Step::Loterias, FlowEvent::Confirm)?;
        if selected.is_empty() {
            return Err(FlowError::NoLotteriesSelected);
        }

        let mut horarios = BTreeSet::new();
        for id in selected {
            let loteria = catalog
                .loteria(id)
                .ok_or_else(|| FlowError::UnknownLottery(id.clone()))?;
            horarios.insert(loteria.horario.clone());
        }
        let horarios: Vec<String> = horarios.into_iter().collect();

        let created = store.finalize_pending_items(selected, &horarios)?;
        self.selection.loterias = selected.to_vec();
        self.selection.horarios = horarios;
        self.pushed_id = None;
        self.step = self.step.next(FlowEvent::Confirm)?;

        log::info!(
            "Confirmed {} bets on {} lotteries ({} draw times)",
            created,
            self.selection.loterias.len(),
            self.selection.horarios.len()
        );
        Ok(created)
    }

    /// Steps one state back. Leaving the lottery step withdraws the draft
    /// that was pushed on the way in.
    pub fn back(&mut self, store: &mut BetStore) -> Back {
        match self.step.next(FlowEvent::Back) {
            Ok(previous) => {
                if self.step == Step::Loterias {
                    if let Some(id) = self.pushed_id.take() {
                        store.remove_pending_item(&id);
                    }
                }
                self.step = previous;
                Back::Step(previous)
            }
            Err(_) => Back::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lottery::catalog::tests::sample_catalog;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 22).unwrap()
    }

    fn milhar_flow() -> ColocacaoFlow {
        ColocacaoFlow::new(GameType::Loterias, date(), "milhar", "1-5".parse().unwrap()).unwrap()
    }

    fn flow_at_resumo() -> ColocacaoFlow {
        let mut flow = milhar_flow();
        flow.add_palpite("1234").unwrap();
        flow.add_palpite("5678").unwrap();
        flow.advance().unwrap();
        flow.choose_value(1.0, ValueMode::Cada).unwrap();
        flow
    }

    #[test]
    fn test_new_validates_modalidade_and_colocacao() {
        assert!(matches!(
            ColocacaoFlow::new(GameType::Loterias, date(), "nope", "1".parse().unwrap()),
            Err(FlowError::UnknownModalidade(_))
        ));
        assert!(matches!(
            ColocacaoFlow::new(GameType::Quininha, date(), "milhar", "1".parse().unwrap()),
            Err(FlowError::UnknownModalidade(_))
        ));
        assert!(matches!(
            ColocacaoFlow::new(GameType::Loterias, date(), "duque_grupo", "1".parse().unwrap()),
            Err(FlowError::ColocacaoNotOffered { .. })
        ));
        assert_eq!(milhar_flow().step(), Step::Palpite);
    }

    #[test]
    fn test_advance_requires_palpites() {
        let mut flow = milhar_flow();
        assert!(!flow.can_advance());
        assert_eq!(flow.advance(), Err(FlowError::NoPalpites));

        flow.add_palpite("1234").unwrap();
        assert!(flow.can_advance());
        assert_eq!(flow.advance(), Ok(Step::Valor));
    }

    #[test]
    fn test_duplicate_palpites_are_ignored() {
        let mut flow = milhar_flow();
        assert_eq!(flow.add_palpite("1234"), Ok(true));
        assert_eq!(flow.add_palpite(" 1234 "), Ok(false));
        assert_eq!(flow.selection().palpites, vec!["1234"]);

        assert!(matches!(flow.add_palpite("12"), Err(FlowError::InvalidPalpite(_))));
        assert_eq!(flow.remove_palpite("1234"), Ok(true));
        assert_eq!(flow.remove_palpite("1234"), Ok(false));
    }

    #[test]
    fn test_surpresinha_skips_duplicates() {
        let mut flow =
            ColocacaoFlow::new(GameType::Loterias, date(), "grupo", "1".parse().unwrap()).unwrap();
        let mut rng = rand::thread_rng();

        let mut added = 0;
        for _ in 0..200 {
            if flow.surpresinha(&mut rng).unwrap().is_some() {
                added += 1;
            }
        }
        // Only 25 distinct groups exist.
        assert_eq!(added, flow.selection().palpites.len());
        assert!(added <= 25);
        let mut unique = flow.selection().palpites.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), added);
    }

    #[test]
    fn test_choose_value_modes() {
        let mut flow = milhar_flow();
        for p in ["1111", "2222", "3333"] {
            flow.add_palpite(p).unwrap();
        }
        flow.advance().unwrap();

        assert_eq!(flow.choose_value(0.0, ValueMode::Todos), Err(FlowError::InvalidValue(0.0)));
        assert_eq!(flow.step(), Step::Valor);

        assert_eq!(flow.choose_value(3.0, ValueMode::Todos), Ok(Step::Resumo));
        let resumo = flow.resumo().unwrap();
        assert_eq!(resumo.valor_unitario, 1.0);
        assert_eq!(resumo.total, 3.0);
        assert_eq!(resumo.multiplicador, 800.0);
        assert_eq!(resumo.premio, 800.0);

        flow.back(&mut BetStore::new());
        flow.choose_value(3.0, ValueMode::Cada).unwrap();
        assert_eq!(flow.resumo().unwrap().total, 9.0);
    }

    #[test]
    fn test_advance_to_lotteries_pushes_pending() {
        let mut flow = flow_at_resumo();
        let mut store = BetStore::new();

        let id = flow.advance_to_lotteries(&mut store).unwrap();
        assert_eq!(flow.step(), Step::Loterias);
        assert_eq!(store.pending_items().len(), 1);
        assert_eq!(store.pending_items()[0].id, id);
        assert_eq!(store.pending_items()[0].line.multiplicador, 800.0);
    }

    #[test]
    fn test_back_from_lotteries_withdraws_draft() {
        let mut flow = flow_at_resumo();
        let mut store = BetStore::new();
        flow.advance_to_lotteries(&mut store).unwrap();

        assert_eq!(flow.back(&mut store), Back::Step(Step::Resumo));
        assert!(store.pending_items().is_empty());

        // Advancing again does not duplicate the draft.
        flow.advance_to_lotteries(&mut store).unwrap();
        assert_eq!(store.pending_items().len(), 1);
    }

    #[test]
    fn test_back_from_first_step_exits() {
        let mut flow = milhar_flow();
        assert_eq!(flow.back(&mut BetStore::new()), Back::Exit);
        assert_eq!(flow.step(), Step::Palpite);
    }

    #[test]
    fn test_accumulate_modalities_then_confirm() {
        let catalog = sample_catalog();
        let mut store = BetStore::new();
        let mut flow = flow_at_resumo();
        flow.advance_to_lotteries(&mut store).unwrap();

        flow.add_another_modality("grupo", "1".parse().unwrap()).unwrap();
        assert_eq!(flow.step(), Step::Palpite);
        assert!(flow.selection().palpites.is_empty());
        flow.add_palpite("7").unwrap();
        flow.advance().unwrap();
        flow.choose_value(2.0, ValueMode::Cada).unwrap();
        flow.advance_to_lotteries(&mut store).unwrap();
        assert_eq!(store.pending_items().len(), 2);

        let selected = vec![
            "ptrio-1120".to_string(),
            "look-1120".to_string(),
            "ptrio-1420".to_string(),
        ];
        assert_eq!(flow.confirm_lotteries(&selected, &catalog, &mut store), Ok(2));
        assert_eq!(flow.step(), Step::Finished);
        assert!(store.pending_items().is_empty());

        for item in store.items() {
            assert_eq!(item.loterias, selected);
            assert_eq!(item.horarios, vec!["11:20", "14:20"]);
        }
        // milhar: 2 palpites × 2 horarios × 1.0; grupo: 1 × 2 × 2.0
        assert_eq!(store.total(), 8.0);
    }

    #[test]
    fn test_confirm_rejects_empty_and_unknown() {
        let catalog = sample_catalog();
        let mut store = BetStore::new();
        let mut flow = flow_at_resumo();
        flow.advance_to_lotteries(&mut store).unwrap();

        assert_eq!(
            flow.confirm_lotteries(&[], &catalog, &mut store),
            Err(FlowError::NoLotteriesSelected)
        );
        assert_eq!(
            flow.confirm_lotteries(&["ghost".to_string()], &catalog, &mut store),
            Err(FlowError::UnknownLottery("ghost".to_string()))
        );
        assert_eq!(flow.step(), Step::Loterias);
        assert_eq!(store.pending_items().len(), 1);
    }

    #[test]
    fn test_palpites_locked_after_first_step() {
        let mut flow = flow_at_resumo();
        let locked = FlowError::Transition(TransitionError {
            from: Step::Resumo,
            event: "edit palpites",
        });
        assert_eq!(flow.add_palpite("9999"), Err(locked.clone()));
        assert_eq!(flow.remove_palpite("1234"), Err(locked.clone()));
        assert_eq!(flow.surpresinha(&mut rand::thread_rng()), Err(locked));
    }
}
