use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::dto::{Banca, DrawSchedule, Loteria, LotteryCatalog};
use crate::error::CatalogError;

impl LotteryCatalog {
    pub fn from_ron_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_ron_str(&content)?;

        log::info!(
            "Loaded {} bancas / {} loterias from {:?}",
            catalog.bancas.len(),
            catalog.loterias().count(),
            path.as_ref()
        );

        Ok(catalog)
    }

    pub fn from_ron_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: LotteryCatalog = ron::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for loteria in self.loterias() {
            if !seen.insert(loteria.id.as_str()) {
                return Err(CatalogError::DuplicateId(loteria.id.clone()));
            }
            if loteria.draw_time().is_none() {
                return Err(CatalogError::InvalidHorario {
                    id: loteria.id.clone(),
                    horario: loteria.horario.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn loterias(&self) -> impl Iterator<Item = &Loteria> {
        self.bancas.iter().flat_map(|b| b.loterias.iter())
    }

    pub fn loteria(&self, id: &str) -> Option<&Loteria> {
        self.loterias().find(|l| l.id == id)
    }

    pub fn banca(&self, id: &str) -> Option<&Banca> {
        self.bancas.iter().find(|b| b.id == id)
    }

    pub fn banca_of(&self, loteria_id: &str) -> Option<&Banca> {
        self.bancas
            .iter()
            .find(|b| b.loterias.iter().any(|l| l.id == loteria_id))
    }
}

impl DrawSchedule for LotteryCatalog {
    fn horario_of(&self, loteria_id: &str) -> Option<String> {
        self.loteria(loteria_id).map(|l| l.horario.clone())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const SAMPLE: &str = r#"
(
    bancas: [
        (
            id: "ptrio",
            nome: "PT Rio",
            loterias: [
                (id: "ptrio-1120", nome: "PT 11:20", horario: "11:20"),
                (id: "ptrio-1420", nome: "PT 14:20", horario: "14:20"),
                (id: "ptrio-1820", nome: "PT 18:20", horario: "18:20"),
            ],
        ),
        (
            id: "look",
            nome: "Look Goiás",
            loterias: [
                (id: "look-1120", nome: "Look 11:20", horario: "11:20"),
                (id: "look-1620", nome: "Look 16:20", horario: "16:20"),
            ],
        ),
        (
            id: "federal",
            nome: "Loteria Federal",
            loterias: [
                (id: "federal-1900", nome: "Federal 19:00", horario: "19:00"),
            ],
        ),
    ],
)
"#;

    pub(crate) fn sample_catalog() -> LotteryCatalog {
        LotteryCatalog::from_ron_str(SAMPLE).unwrap()
    }

    #[test]
    fn test_parse_sample() {
        let catalog = sample_catalog();
        assert_eq!(catalog.bancas.len(), 3);
        assert_eq!(catalog.loterias().count(), 6);
        assert_eq!(catalog.horario_of("look-1620").as_deref(), Some("16:20"));
        assert_eq!(catalog.banca_of("ptrio-1420").map(|b| b.id.as_str()), Some("ptrio"));
        assert!(catalog.horario_of("missing").is_none());
        assert!(catalog.banca("federal").unwrap().is_federal());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let ron = r#"(bancas: [
            (id: "a", nome: "A", loterias: [(id: "x", nome: "X", horario: "10:00")]),
            (id: "b", nome: "B", loterias: [(id: "x", nome: "X2", horario: "11:00")]),
        ])"#;
        assert!(matches!(
            LotteryCatalog::from_ron_str(ron),
            Err(CatalogError::DuplicateId(id)) if id == "x"
        ));
    }

    #[test]
    fn test_rejects_bad_horario() {
        let ron = r#"(bancas: [
            (id: "a", nome: "A", loterias: [(id: "x", nome: "X", horario: "25:00")]),
        ])"#;
        assert!(matches!(
            LotteryCatalog::from_ron_str(ron),
            Err(CatalogError::InvalidHorario { .. })
        ));
    }

    #[test]
    fn test_shipped_catalog_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/loterias.ron");
        let catalog = LotteryCatalog::from_ron_file(path).unwrap();
        assert!(catalog.banca("federal").unwrap().is_federal());
        assert!(catalog.loterias().all(|l| l.draw_time().is_some()));
    }
}
