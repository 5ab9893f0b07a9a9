use serde::{Deserialize, Serialize};

use crate::error::TransitionError;
use crate::helpers::money::{floor_cents, round_cents};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Palpite,
    Valor,
    Resumo,
    Loterias,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowEvent {
    /// palpite → valor
    Advance,
    /// valor → resumo
    ChooseValue,
    /// resumo → loterias, pushing the draft into the pending list
    PushPending,
    /// loterias → palpite with a fresh draft
    AddModality,
    /// loterias → finished
    Confirm,
    Back,
    /// adds, removes or draws palpites without leaving the palpite step
    EditPalpites,
}

impl FlowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlowEvent::Advance => "advance",
            FlowEvent::ChooseValue => "choose a value",
            FlowEvent::PushPending => "push the draft",
            FlowEvent::AddModality => "add another modalidade",
            FlowEvent::Confirm => "confirm lotteries",
            FlowEvent::Back => "go back",
            FlowEvent::EditPalpites => "edit palpites",
        }
    }
}

impl Step {
    pub fn next(self, event: FlowEvent) -> Result<Step, TransitionError> {
        use FlowEvent::*;
        use Step::*;

        match (self, event) {
            (Palpite, Advance) => Ok(Valor),
            (Valor, ChooseValue) => Ok(Resumo),
            (Resumo, Advance) | (Resumo, PushPending) => Ok(Loterias),
            (Loterias, AddModality) => Ok(Palpite),
            (Loterias, Confirm) => Ok(Finished),
            (Valor, Back) => Ok(Palpite),
            (Resumo, Back) => Ok(Valor),
            (Loterias, Back) => Ok(Resumo),
            (from, event) => Err(TransitionError {
                from,
                event: event.name(),
            }),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Step::Palpite => "Palpites",
            Step::Valor => "Valor",
            Step::Resumo => "Resumo",
            Step::Loterias => "Loterias",
            Step::Finished => "Concluído",
        }
    }
}

/// Result of a back action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Back {
    Step(Step),
    /// Backing out of the first step leaves the flow.
    Exit,
}

/// How the chosen value is applied to the palpites.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// The value is split across all palpites.
    Todos,
    /// The value is staked on each palpite.
    Cada,
}

impl ValueMode {
    pub fn code(&self) -> &'static str {
        match self {
            ValueMode::Todos => "todos",
            ValueMode::Cada => "cada",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "todos" => Some(ValueMode::Todos),
            "cada" => Some(ValueMode::Cada),
            _ => None,
        }
    }

    /// Stake per palpite, or `None` when the value is not positive or the
    /// split rounds down to zero.
    pub fn apportion(&self, valor: f64, palpites: usize) -> Option<f64> {
        if !valor.is_finite() || valor <= 0.0 || palpites == 0 {
            return None;
        }
        let unit = match self {
            ValueMode::Cada => round_cents(valor),
            ValueMode::Todos => floor_cents(valor / palpites as f64),
        };
        (unit > 0.0).then_some(unit)
    }
}

/// Figures shown on the summary step.
#[derive(Clone, Debug, PartialEq)]
pub struct Resumo {
    pub palpites: usize,
    pub valor_unitario: f64,
    pub multiplicador: f64,
    /// Stake for a single draw.
    pub total: f64,
    /// Payout if one palpite hits on one draw.
    pub premio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_forward_path() {
        let step = Step::Palpite
            .next(FlowEvent::Advance)
            .and_then(|s| s.next(FlowEvent::ChooseValue))
            .and_then(|s| s.next(FlowEvent::PushPending))
            .and_then(|s| s.next(FlowEvent::Confirm))
            .unwrap();
        assert_eq!(step, Step::Finished);
    }

    #[test]
    fn test_back_steps_one_state() {
        assert_eq!(Step::Loterias.next(FlowEvent::Back), Ok(Step::Resumo));
        assert_eq!(Step::Resumo.next(FlowEvent::Back), Ok(Step::Valor));
        assert_eq!(Step::Valor.next(FlowEvent::Back), Ok(Step::Palpite));
        assert!(Step::Palpite.next(FlowEvent::Back).is_err());
    }

    #[test]
    fn test_illegal_transitions() {
        assert_eq!(
            Step::Palpite.next(FlowEvent::Confirm),
            Err(TransitionError {
                from: Step::Palpite,
                event: "confirm lotteries"
            })
        );
        assert!(Step::Valor.next(FlowEvent::Advance).is_err());
        assert!(Step::Finished.next(FlowEvent::Back).is_err());
    }

    #[test]
    fn test_apportion() {
        assert_eq!(ValueMode::Cada.apportion(2.0, 3), Some(2.0));
        assert_eq!(ValueMode::Todos.apportion(10.0, 3), Some(3.33));
        assert_eq!(ValueMode::Todos.apportion(1.5, 3), Some(0.5));
        assert_eq!(ValueMode::Todos.apportion(0.02, 3), None);
        assert_eq!(ValueMode::Cada.apportion(0.0, 1), None);
        assert_eq!(ValueMode::Cada.apportion(f64::NAN, 1), None);
        assert_eq!(ValueMode::Cada.apportion(1.0, 0), None);
    }
}
