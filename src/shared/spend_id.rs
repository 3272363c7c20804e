//! Idempotency tokens for transfers.
//!
//! The API accepts at most one transfer per `(app, spend_id)` pair, so retrying
//! a timed-out `transfer` with the same `spend_id` never pays twice.

use rand::Rng;

/// Maximum `spend_id` length accepted by the API.
pub const MAX_SPEND_ID_LEN: usize = 64;

/// Default generated `spend_id` length.
pub const DEFAULT_SPEND_ID_LEN: usize = MAX_SPEND_ID_LEN;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random `spend_id` of `len` characters from `[A-Za-z0-9]`.
///
/// Each character is sampled uniformly. Lengths above
/// [`MAX_SPEND_ID_LEN`] are produced as asked but will be rejected by
/// `transfer`.
pub fn generate_spend_id(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Check that a `spend_id` is non-empty and at most 64 characters.
pub fn is_valid_spend_id(spend_id: &str) -> bool {
    let len = spend_id.chars().count();
    len > 0 && len <= MAX_SPEND_ID_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_length_and_alphabet() {
        let id = generate_spend_id(DEFAULT_SPEND_ID_LEN);
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_custom_lengths() {
        for len in [0, 1, 16, 100] {
            let id = generate_spend_id(len);
            assert_eq!(id.len(), len);
            assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_two_ids_differ() {
        assert_ne!(generate_spend_id(64), generate_spend_id(64));
    }

    #[test]
    fn test_validation() {
        assert!(is_valid_spend_id("a"));
        assert!(is_valid_spend_id(&"x".repeat(64)));
        assert!(!is_valid_spend_id(""));
        assert!(!is_valid_spend_id(&"x".repeat(65)));
    }
}
