use super::dto::{Colocacao, GameType};
use crate::helpers::money::round_cents;

/// Shape of a palpite for a given modalidade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PalpiteFormat {
    /// Exactly `n` decimal digits.
    Digits(u8),
    /// `k` distinct animal groups, `01..=25`.
    Grupos(u8),
    /// `count` distinct two-digit numbers in `min..=max`.
    Dezenas { count: u8, min: u8, max: u8 },
}

pub const GRUPO_MIN: u8 = 1;
pub const GRUPO_MAX: u8 = 25;

#[derive(Debug, PartialEq)]
pub struct Modalidade {
    pub code: &'static str,
    pub label: &'static str,
    pub tipo: GameType,
    pub format: PalpiteFormat,
    /// Payout for a single prize position; spread over the colocacao range.
    pub multiplier: f64,
    pub colocacoes: &'static [&'static str],
}

const SINGLE_OR_FIVE: &[&str] = &["1", "1-5"];
const FIRST_FIVE: &[&str] = &["1-5"];
const FIRST_SIX: &[&str] = &["1-6"];

pub const MODALIDADES: &[Modalidade] = &[
    Modalidade {
        code: "milhar",
        label: "Milhar",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Digits(4),
        multiplier: 4000.0,
        colocacoes: SINGLE_OR_FIVE,
    },
    Modalidade {
        code: "centena",
        label: "Centena",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Digits(3),
        multiplier: 600.0,
        colocacoes: SINGLE_OR_FIVE,
    },
    Modalidade {
        code: "dezena",
        label: "Dezena",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Digits(2),
        multiplier: 60.0,
        colocacoes: SINGLE_OR_FIVE,
    },
    Modalidade {
        code: "grupo",
        label: "Grupo",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Grupos(1),
        multiplier: 18.0,
        colocacoes: SINGLE_OR_FIVE,
    },
    Modalidade {
        code: "duque_grupo",
        label: "Duque de grupo",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Grupos(2),
        multiplier: 900.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "terno_grupo",
        label: "Terno de grupo",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Grupos(3),
        multiplier: 7500.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "duque_dezena",
        label: "Duque de dezena",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Dezenas { count: 2, min: 0, max: 99 },
        multiplier: 1500.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "terno_dezena",
        label: "Terno de dezena",
        tipo: GameType::Loterias,
        format: PalpiteFormat::Dezenas { count: 3, min: 0, max: 99 },
        multiplier: 25000.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "quininha_duque",
        label: "Quininha duque",
        tipo: GameType::Quininha,
        format: PalpiteFormat::Dezenas { count: 2, min: 1, max: 80 },
        multiplier: 1500.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "quininha_terno",
        label: "Quininha terno",
        tipo: GameType::Quininha,
        format: PalpiteFormat::Dezenas { count: 3, min: 1, max: 80 },
        multiplier: 25000.0,
        colocacoes: FIRST_FIVE,
    },
    Modalidade {
        code: "seninha_duque",
        label: "Seninha duque",
        tipo: GameType::Seninha,
        format: PalpiteFormat::Dezenas { count: 2, min: 1, max: 60 },
        multiplier: 1200.0,
        colocacoes: FIRST_SIX,
    },
    Modalidade {
        code: "seninha_terno",
        label: "Seninha terno",
        tipo: GameType::Seninha,
        format: PalpiteFormat::Dezenas { count: 3, min: 1, max: 60 },
        multiplier: 18000.0,
        colocacoes: FIRST_SIX,
    },
];

pub fn find(code: &str) -> Option<&'static Modalidade> {
    MODALIDADES.iter().find(|m| m.code == code)
}

pub fn for_game(tipo: GameType) -> impl Iterator<Item = &'static Modalidade> {
    MODALIDADES.iter().filter(move |m| m.tipo == tipo)
}

impl Modalidade {
    pub fn offers(&self, colocacao: &Colocacao) -> bool {
        let code = colocacao.to_string();
        self.colocacoes.iter().any(|c| *c == code)
    }

    /// Payout multiplier once the stake is spread over the prize range.
    pub fn multiplicador(&self, colocacao: &Colocacao) -> f64 {
        round_cents(self.multiplier / colocacao.positions() as f64)
    }

    /// Human hint for the expected palpite shape.
    pub fn hint(&self) -> String {
        match self.format {
            PalpiteFormat::Digits(n) => format!("{} dígitos, ex.: {}", n, "1234".get(..n as usize).unwrap_or("1234")),
            PalpiteFormat::Grupos(1) => "grupo de 01 a 25, ex.: 07".to_string(),
            PalpiteFormat::Grupos(k) => format!("{} grupos de 01 a 25 separados por '-', ex.: 03-07", k),
            PalpiteFormat::Dezenas { count, min, max } => format!(
                "{} números de {:02} a {:02} separados por '-', ex.: {:02}-{:02}",
                count,
                min,
                max,
                min.max(1),
                min.max(1) + 9
            ),
        }
    }
}
