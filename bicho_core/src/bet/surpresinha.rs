//! Random palpites ("surpresinha").
//!
//! Uses a non-cryptographic generator: these are convenience guesses with no
//! security requirement.

use rand::{seq::index, Rng};

use super::modality::{PalpiteFormat, GRUPO_MAX, GRUPO_MIN};
use super::palpite::join_numbers;

pub fn generate<R: Rng + ?Sized>(format: &PalpiteFormat, rng: &mut R) -> String {
    match *format {
        PalpiteFormat::Digits(n) => (0..n)
            .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
            .collect(),
        PalpiteFormat::Grupos(k) => pick_distinct(rng, k, GRUPO_MIN, GRUPO_MAX),
        PalpiteFormat::Dezenas { count, min, max } => pick_distinct(rng, count, min, max),
    }
}

fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, count: u8, min: u8, max: u8) -> String {
    let span = (max - min) as usize + 1;
    let mut numbers: Vec<u32> = index::sample(rng, span, count as usize)
        .into_iter()
        .map(|i| i as u32 + min as u32)
        .collect();
    numbers.sort_unstable();
    join_numbers(&numbers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::modality::MODALIDADES;
    use crate::bet::palpite::normalize;

    #[test]
    fn test_generated_palpites_are_valid_for_every_modalidade() {
        let mut rng = rand::thread_rng();
        for modalidade in MODALIDADES {
            for _ in 0..50 {
                let palpite = generate(&modalidade.format, &mut rng);
                let normalized = normalize(&modalidade.format, &palpite)
                    .unwrap_or_else(|e| panic!("{}: {} ({})", modalidade.code, palpite, e));
                assert_eq!(normalized, palpite);
            }
        }
    }
}
