use thiserror::Error;

use crate::flow::dto::Step;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PalpiteError {
    #[error("palpite is empty")]
    Empty,
    #[error("palpite {0:?} must contain only digits")]
    NotNumeric(String),
    #[error("palpite must have exactly {expected} digits, got {got:?}")]
    WrongDigits { expected: u8, got: String },
    #[error("expected {expected} numbers separated by '-', got {got}")]
    WrongCount { expected: u8, got: usize },
    #[error("number {value} is outside {min}..={max}")]
    OutOfRange { value: u32, min: u8, max: u8 },
    #[error("numbers in a combination must be distinct")]
    Repeated,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("a bet item needs at least one lottery")]
    NoLotteries,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot {event} from step {from:?}")]
pub struct TransitionError {
    pub from: Step,
    pub event: &'static str,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("invalid palpite: {0}")]
    InvalidPalpite(#[from] PalpiteError),
    #[error("unknown modalidade {0:?}")]
    UnknownModalidade(String),
    #[error("colocacao {colocacao} is not offered for {modalidade}")]
    ColocacaoNotOffered { modalidade: String, colocacao: String },
    #[error("at least one palpite is required")]
    NoPalpites,
    #[error("invalid value {0}")]
    InvalidValue(f64),
    #[error("no value chosen yet")]
    NoValue,
    #[error("no lottery selected")]
    NoLotteriesSelected,
    #[error("unknown lottery {0:?}")]
    UnknownLottery(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read lottery catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse lottery catalog RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("lottery {id} has an invalid draw time {horario:?}")]
    InvalidHorario { id: String, horario: String },
    #[error("lottery id {0:?} is declared more than once")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("place_bet failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[error("failed to (de)serialize stored record: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}
