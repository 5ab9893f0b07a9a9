use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub const HORARIO_FORMAT: &str = "%H:%M";

/// One timed draw of a banca.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Loteria {
    pub id: String,
    pub nome: String,
    /// Draw time, `HH:MM` local time.
    pub horario: String,
}

impl Loteria {
    pub fn draw_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.horario, HORARIO_FORMAT).ok()
    }
}

/// A lottery operator grouping several draws.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Banca {
    pub id: String,
    pub nome: String,
    pub loterias: Vec<Loteria>,
}

impl Banca {
    pub fn is_federal(&self) -> bool {
        self.nome.to_lowercase().contains("federal")
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LotteryCatalog {
    pub bancas: Vec<Banca>,
}

/// Resolves a lottery id to its draw time.
pub trait DrawSchedule {
    fn horario_of(&self, loteria_id: &str) -> Option<String>;
}
