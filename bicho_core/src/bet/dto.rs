use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_PRIZE_POSITION: u8 = 10;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Loterias,
    Quininha,
    Seninha,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Loterias, GameType::Quininha, GameType::Seninha];

    pub fn code(&self) -> &'static str {
        match self {
            GameType::Loterias => "loterias",
            GameType::Quininha => "quininha",
            GameType::Seninha => "seninha",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameType::Loterias => "Loterias",
            GameType::Quininha => "Quininha",
            GameType::Seninha => "Seninha",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }
}

/// Prize range a bet targets, `1` or `1-5` style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colocacao {
    inicio: u8,
    fim: u8,
}

impl Colocacao {
    pub fn new(inicio: u8, fim: u8) -> Option<Self> {
        if inicio >= 1 && inicio <= fim && fim <= MAX_PRIZE_POSITION {
            Some(Self { inicio, fim })
        } else {
            None
        }
    }

    pub fn inicio(&self) -> u8 {
        self.inicio
    }

    pub fn fim(&self) -> u8 {
        self.fim
    }

    /// Number of prizes covered by the range.
    pub fn positions(&self) -> u8 {
        self.fim - self.inicio + 1
    }

    pub fn label(&self) -> String {
        if self.inicio == self.fim {
            format!("{}º prêmio", self.inicio)
        } else {
            format!("{}º ao {}º prêmio", self.inicio, self.fim)
        }
    }
}

impl fmt::Display for Colocacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inicio == self.fim {
            write!(f, "{}", self.inicio)
        } else {
            write!(f, "{}-{}", self.inicio, self.fim)
        }
    }
}

impl FromStr for Colocacao {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid colocacao {:?}", s);
        let (inicio, fim) = match s.trim().split_once('-') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (s.trim(), s.trim()),
        };
        let inicio: u8 = inicio.parse().map_err(|_| invalid())?;
        let fim: u8 = fim.parse().map_err(|_| invalid())?;
        Colocacao::new(inicio, fim).ok_or_else(invalid)
    }
}

impl TryFrom<String> for Colocacao {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colocacao> for String {
    fn from(value: Colocacao) -> Self {
        value.to_string()
    }
}

/// The body shared by pending bets and cart items.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BetLine {
    pub tipo: GameType,
    pub data: NaiveDate,
    pub modalidade: String,
    pub colocacao: Colocacao,
    pub palpites: Vec<String>,
    pub valor_unitario: f64,
    pub multiplicador: f64,
}

impl BetLine {
    /// Stake for a single draw.
    pub fn stake_per_draw(&self) -> f64 {
        self.palpites.len() as f64 * self.valor_unitario
    }
}

/// A bet waiting for its lotteries to be chosen.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PendingBet {
    pub id: String,
    #[serde(flatten)]
    pub line: BetLine,
}

/// A cart-ready bet line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BetItem {
    pub id: String,
    #[serde(flatten)]
    pub line: BetLine,
    pub horarios: Vec<String>,
    pub loterias: Vec<String>,
}

impl BetItem {
    pub fn total(&self) -> f64 {
        self.line.stake_per_draw() * self.horarios.len() as f64
    }
}

/// The in-progress draft mutated as the player walks the flow.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BetSelection {
    pub tipo: GameType,
    pub data: NaiveDate,
    pub modalidade: String,
    pub colocacao: Colocacao,
    pub palpites: Vec<String>,
    pub horarios: Vec<String>,
    pub loterias: Vec<String>,
    pub valor_unitario: Option<f64>,
}

impl BetSelection {
    pub fn new(tipo: GameType, data: NaiveDate, modalidade: &str, colocacao: Colocacao) -> Self {
        Self {
            tipo,
            data,
            modalidade: modalidade.to_string(),
            colocacao,
            palpites: Vec::new(),
            horarios: Vec::new(),
            loterias: Vec::new(),
            valor_unitario: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colocacao_parse_and_display() {
        let first: Colocacao = "1".parse().unwrap();
        assert_eq!(first.positions(), 1);
        assert_eq!(first.to_string(), "1");

        let range: Colocacao = "1-5".parse().unwrap();
        assert_eq!(range.positions(), 5);
        assert_eq!(range.to_string(), "1-5");
        assert_eq!(range.label(), "1º ao 5º prêmio");
    }

    #[test]
    fn test_colocacao_rejects_bad_ranges() {
        assert!("0".parse::<Colocacao>().is_err());
        assert!("5-1".parse::<Colocacao>().is_err());
        assert!("1-11".parse::<Colocacao>().is_err());
        assert!("x".parse::<Colocacao>().is_err());
    }

    #[test]
    fn test_pending_bet_serializes_flat() {
        let bet = PendingBet {
            id: "abc".to_string(),
            line: BetLine {
                tipo: GameType::Loterias,
                data: NaiveDate::from_ymd_opt(2026, 10, 21).unwrap(),
                modalidade: "milhar".to_string(),
                colocacao: "1-5".parse().unwrap(),
                palpites: vec!["1234".to_string()],
                valor_unitario: 1.0,
                multiplicador: 800.0,
            },
        };

        let json = serde_json::to_value(&bet).unwrap();
        assert_eq!(json["tipo"], "loterias");
        assert_eq!(json["colocacao"], "1-5");
        assert_eq!(json["data"], "2026-10-21");

        let back: PendingBet = serde_json::from_value(json).unwrap();
        assert_eq!(back, bet);
    }
}
