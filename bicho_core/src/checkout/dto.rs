use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::bet::dto::{BetItem, GameType};
use crate::error::CheckoutError;

/// Arguments of the `place_bet` procedure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceBetRequest {
    #[serde(rename = "p_tipo")]
    pub tipo: GameType,
    #[serde(rename = "p_modalidade")]
    pub modalidade: String,
    #[serde(rename = "p_colocacao")]
    pub colocacao: String,
    #[serde(rename = "p_palpites")]
    pub palpites: Vec<String>,
    #[serde(rename = "p_horarios")]
    pub horarios: Vec<String>,
    #[serde(rename = "p_loterias")]
    pub loterias: Vec<String>,
    #[serde(rename = "p_data")]
    pub data: NaiveDate,
    #[serde(rename = "p_valor_unitario")]
    pub valor_unitario: f64,
    #[serde(rename = "p_multiplicador")]
    pub multiplicador: f64,
}

impl From<&BetItem> for PlaceBetRequest {
    fn from(item: &BetItem) -> Self {
        Self {
            tipo: item.line.tipo,
            modalidade: item.line.modalidade.clone(),
            colocacao: item.line.colocacao.to_string(),
            palpites: item.line.palpites.clone(),
            horarios: item.horarios.clone(),
            loterias: item.loterias.clone(),
            data: item.line.data,
            valor_unitario: item.line.valor_unitario,
            multiplicador: item.line.multiplicador,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlaceBetResponse {
    pub success: bool,
    #[serde(default)]
    pub pule: Option<String>,
    #[serde(default)]
    pub saldo: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body returned by PostgREST when the procedure raises.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutReceipt {
    pub pules: Vec<String>,
    /// Balance reported by the last accepted bet.
    pub saldo: Option<f64>,
}

/// A checkout that stopped early. Items accepted before the failure are
/// already out of the cart and listed in `accepted`.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct CheckoutFailure {
    pub accepted: CheckoutReceipt,
    #[source]
    pub error: CheckoutError,
}
