//! Order number allocation
//!
//! Codes look like `A123`: one letter A-Z and three digits, 26 000 in all.
//! Allocation is a pure function of the taken set and a random source; the
//! UNIQUE index on `orders.order_number` is the final guard against races.

use rand::Rng;
use std::collections::HashSet;

const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Sentinel letter of the timestamp fallback
pub const FALLBACK_PREFIX: char = 'T';

fn candidate<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letter = LETTERS[rng.gen_range(0..LETTERS.len())] as char;
    let digits: u16 = rng.gen_range(0..1000);
    format!("{letter}{digits:03}")
}

/// `T` + last four digits of the Unix time in seconds
///
/// May collide; the storage constraint rejects it and creation retries.
pub fn fallback_number(now_secs: i64) -> String {
    format!("{FALLBACK_PREFIX}{:04}", now_secs.rem_euclid(10_000))
}

/// Draw up to `max_attempts` random codes not in `taken`, else fall back.
pub fn generate_order_number<R: Rng + ?Sized>(
    taken: &HashSet<String>,
    rng: &mut R,
    max_attempts: u32,
    now_secs: i64,
) -> String {
    for _ in 0..max_attempts {
        let code = candidate(rng);
        if !taken.contains(&code) {
            return code;
        }
    }
    tracing::warn!(
        taken = taken.len(),
        max_attempts,
        "Order number space congested, using timestamp fallback"
    );
    fallback_number(now_secs)
}

/// True for codes of the random form (`[A-Z][0-9]{3}`)
pub fn is_standard_number(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 4 && bytes[0].is_ascii_uppercase() && bytes[1..].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_generates_standard_codes() {
        let mut rng = StdRng::seed_from_u64(7);
        let taken = HashSet::new();
        for _ in 0..500 {
            let code = generate_order_number(&taken, &mut rng, 100, 0);
            assert!(is_standard_number(&code), "bad code {code}");
        }
    }

    #[test]
    fn test_never_returns_a_taken_code() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut taken = HashSet::new();
        for _ in 0..2000 {
            let code = generate_order_number(&taken, &mut rng, 100, 0);
            assert!(taken.insert(code), "duplicate code allocated");
        }
    }

    #[test]
    fn test_exhausted_space_falls_back_to_timestamp() {
        let taken: HashSet<String> = (b'A'..=b'Z')
            .flat_map(|l| (0..1000).map(move |d| format!("{}{d:03}", l as char)))
            .collect();
        assert_eq!(taken.len(), 26_000);

        let mut rng = StdRng::seed_from_u64(1);
        let code = generate_order_number(&taken, &mut rng, 100, 1_700_000_123);
        assert_eq!(code, "T0123");
    }

    #[test]
    fn test_zero_attempts_uses_fallback() {
        let mut rng = StdRng::seed_from_u64(3);
        let code = generate_order_number(&HashSet::new(), &mut rng, 0, 45);
        assert_eq!(code, "T0045");
    }

    #[test]
    fn test_is_standard_number() {
        assert!(is_standard_number("A001"));
        assert!(is_standard_number("Z999"));
        assert!(!is_standard_number("a001"));
        assert!(!is_standard_number("AB01"));
        assert!(!is_standard_number("T01234"));
    }
}
