use bicho_core::bet::dto::{Colocacao, GameType};
use bicho_core::flow::dto::ValueMode;
use bicho_core::flow::machine::ColocacaoFlow;
use bicho_core::lottery::selector::LotterySelection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Choices made before the flow starts (game, modalidade, colocacao, date).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SetupDraft {
    pub tipo: Option<GameType>,
    pub modalidade: Option<String>,
    pub colocacao: Option<Colocacao>,
    pub data: Option<NaiveDate>,
}

/// Per-user bet session persisted between updates.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct BetSession {
    pub setup: SetupDraft,
    pub flow: Option<ColocacaoFlow>,
    pub lotteries: LotterySelection,
    /// Value picked on the valor step, waiting for todos/cada.
    pub valor: Option<f64>,
    /// Picking another modalidade from the lottery step.
    pub adding_modality: bool,
}

const BET_PREFIX: &str = "bet_";
const CART_PREFIX: &str = "cart_";

/// Inline-button actions of the bet flow. Encoded as callback data, which
/// Telegram caps at 64 bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum BetAction {
    Tipo(GameType),
    Modalidade(String),
    Colocacao(Colocacao),
    Data(NaiveDate),
    RemovePalpite(String),
    Surpresinha,
    Next,
    Back,
    /// Value in cents.
    Valor(u32),
    Modo(ValueMode),
    Push,
    ToggleLoteria(String),
    ToggleBanca(String),
    MoreModality,
    Confirm,
    Cancel,
}

impl BetAction {
    pub fn to_data(&self) -> String {
        let body = match self {
            BetAction::Tipo(t) => format!("tipo:{}", t.code()),
            BetAction::Modalidade(code) => format!("mod:{}", code),
            BetAction::Colocacao(c) => format!("col:{}", c),
            BetAction::Data(d) => format!("data:{}", d.format("%Y-%m-%d")),
            BetAction::RemovePalpite(p) => format!("rm:{}", p),
            BetAction::Surpresinha => "surp".to_string(),
            BetAction::Next => "next".to_string(),
            BetAction::Back => "back".to_string(),
            BetAction::Valor(cents) => format!("valor:{}", cents),
            BetAction::Modo(m) => format!("modo:{}", m.code()),
            BetAction::Push => "push".to_string(),
            BetAction::ToggleLoteria(id) => format!("lot:{}", id),
            BetAction::ToggleBanca(id) => format!("banca:{}", id),
            BetAction::MoreModality => "more".to_string(),
            BetAction::Confirm => "confirm".to_string(),
            BetAction::Cancel => "cancel".to_string(),
        };
        format!("{}{}", BET_PREFIX, body)
    }

    pub fn parse(data: &str) -> Option<Self> {
        let body = data.strip_prefix(BET_PREFIX)?;
        let (name, arg) = match body.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (body, None),
        };

        let action = match (name, arg) {
            ("tipo", Some(code)) => BetAction::Tipo(GameType::from_code(code)?),
            ("mod", Some(code)) => BetAction::Modalidade(code.to_string()),
            ("col", Some(c)) => BetAction::Colocacao(c.parse().ok()?),
            ("data", Some(d)) => BetAction::Data(NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()?),
            ("rm", Some(p)) => BetAction::RemovePalpite(p.to_string()),
            ("surp", None) => BetAction::Surpresinha,
            ("next", None) => BetAction::Next,
            ("back", None) => BetAction::Back,
            ("valor", Some(cents)) => BetAction::Valor(cents.parse().ok()?),
            ("modo", Some(m)) => BetAction::Modo(ValueMode::from_code(m)?),
            ("push", None) => BetAction::Push,
            ("lot", Some(id)) => BetAction::ToggleLoteria(id.to_string()),
            ("banca", Some(id)) => BetAction::ToggleBanca(id.to_string()),
            ("more", None) => BetAction::MoreModality,
            ("confirm", None) => BetAction::Confirm,
            ("cancel", None) => BetAction::Cancel,
            _ => return None,
        };
        Some(action)
    }
}

/// Inline-button actions of the cart view.
#[derive(Clone, Debug, PartialEq)]
pub enum CartAction {
    Remove(String),
    RemoveLoteria(String),
    Checkout,
    Clear,
}

impl CartAction {
    pub fn to_data(&self) -> String {
        let body = match self {
            CartAction::Remove(id) => format!("rm:{}", id),
            CartAction::RemoveLoteria(id) => format!("rmlot:{}", id),
            CartAction::Checkout => "checkout".to_string(),
            CartAction::Clear => "clear".to_string(),
        };
        format!("{}{}", CART_PREFIX, body)
    }

    pub fn parse(data: &str) -> Option<Self> {
        let body = data.strip_prefix(CART_PREFIX)?;
        if let Some(id) = body.strip_prefix("rmlot:") {
            return Some(CartAction::RemoveLoteria(id.to_string()));
        }
        if let Some(id) = body.strip_prefix("rm:") {
            return Some(CartAction::Remove(id.to_string()));
        }
        match body {
            "checkout" => Some(CartAction::Checkout),
            "clear" => Some(CartAction::Clear),
            _ => None,
        }
    }
}
