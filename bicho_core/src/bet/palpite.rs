use super::modality::{PalpiteFormat, GRUPO_MAX, GRUPO_MIN};
use crate::error::PalpiteError;

/// Validates a raw palpite and returns its canonical form.
///
/// Digit palpites keep their leading zeros. Combinations are zero padded and
/// sorted, so `7-3` and `03-07` normalize to the same palpite.
pub fn normalize(format: &PalpiteFormat, raw: &str) -> Result<String, PalpiteError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PalpiteError::Empty);
    }

    match *format {
        PalpiteFormat::Digits(n) => {
            if !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(PalpiteError::NotNumeric(raw.to_string()));
            }
            if raw.len() != n as usize {
                return Err(PalpiteError::WrongDigits {
                    expected: n,
                    got: raw.to_string(),
                });
            }
            Ok(raw.to_string())
        }
        PalpiteFormat::Grupos(k) => combination(raw, k, GRUPO_MIN, GRUPO_MAX),
        PalpiteFormat::Dezenas { count, min, max } => combination(raw, count, min, max),
    }
}

fn combination(raw: &str, count: u8, min: u8, max: u8) -> Result<String, PalpiteError> {
    let parts: Vec<&str> = raw.split('-').map(str::trim).collect();
    if parts.len() != count as usize {
        return Err(PalpiteError::WrongCount {
            expected: count,
            got: parts.len(),
        });
    }

    let mut numbers = Vec::with_capacity(parts.len());
    for part in parts {
        if part.is_empty() || part.len() > 2 || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(PalpiteError::NotNumeric(part.to_string()));
        }
        let value: u32 = part
            .parse()
            .map_err(|_| PalpiteError::NotNumeric(part.to_string()))?;
        if value < min as u32 || value > max as u32 {
            return Err(PalpiteError::OutOfRange { value, min, max });
        }
        numbers.push(value);
    }

    numbers.sort_unstable();
    if numbers.windows(2).any(|w| w[0] == w[1]) {
        return Err(PalpiteError::Repeated);
    }

    Ok(join_numbers(&numbers))
}

pub(crate) fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join("-")
}

/// Splits a typed message into candidate palpites (whitespace, commas or
/// semicolons between them).
pub fn split_input(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_keep_leading_zeros() {
        let milhar = PalpiteFormat::Digits(4);
        assert_eq!(normalize(&milhar, " 0042 ").unwrap(), "0042");
        assert!(matches!(
            normalize(&milhar, "042"),
            Err(PalpiteError::WrongDigits { expected: 4, .. })
        ));
        assert!(matches!(normalize(&milhar, "12a4"), Err(PalpiteError::NotNumeric(_))));
        assert_eq!(normalize(&milhar, "   "), Err(PalpiteError::Empty));
    }

    #[test]
    fn test_grupo_is_padded() {
        let grupo = PalpiteFormat::Grupos(1);
        assert_eq!(normalize(&grupo, "7").unwrap(), "07");
        assert_eq!(normalize(&grupo, "25").unwrap(), "25");
        assert_eq!(
            normalize(&grupo, "26"),
            Err(PalpiteError::OutOfRange { value: 26, min: 1, max: 25 })
        );
        assert!(normalize(&grupo, "0").is_err());
    }

    #[test]
    fn test_combination_is_sorted_and_distinct() {
        let duque = PalpiteFormat::Grupos(2);
        assert_eq!(normalize(&duque, "07-3").unwrap(), "03-07");
        assert_eq!(normalize(&duque, "3-3"), Err(PalpiteError::Repeated));
        assert_eq!(
            normalize(&duque, "3"),
            Err(PalpiteError::WrongCount { expected: 2, got: 1 })
        );
    }

    #[test]
    fn test_dezenas_range() {
        let terno = PalpiteFormat::Dezenas { count: 3, min: 0, max: 99 };
        assert_eq!(normalize(&terno, "99-00-45").unwrap(), "00-45-99");

        let quininha = PalpiteFormat::Dezenas { count: 2, min: 1, max: 80 };
        assert!(normalize(&quininha, "00-10").is_err());
        assert!(normalize(&quininha, "81-10").is_err());
        assert!(normalize(&quininha, "100-10").is_err());
    }

    #[test]
    fn test_split_input() {
        assert_eq!(split_input("1234, 5678;0001\n 4321"), vec!["1234", "5678", "0001", "4321"]);
        assert!(split_input(" , ").is_empty());
    }
}
