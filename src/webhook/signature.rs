//! HMAC-SHA256 verification of webhook deliveries.
//!
//! The signing secret is the SHA-256 digest of the app token; the signature
//! header carries the hex-encoded HMAC of the raw request body.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Derive the signing secret from an app token.
pub fn derive_secret(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

/// Verifies webhook signatures for one app token.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: [u8; 32],
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier").finish_non_exhaustive()
    }
}

impl SignatureVerifier {
    pub fn new(token: &str) -> Self {
        Self {
            secret: derive_secret(token),
        }
    }

    fn mac(&self) -> HmacSha256 {
        match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC accepts keys of any length"),
        }
    }

    /// Hex-encoded signature of `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        let mut mac = self.mac();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Check `signature` against `body` in constant time.
    ///
    /// Hex case is ignored. Anything that is not a 64-digit hex string fails.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(expected) = hex::decode(signature.trim()) else {
            return false;
        };
        let mut mac = self.mac();
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }
}

/// Sign `body` with the secret derived from `token`.
pub fn sign_body(token: &str, body: &[u8]) -> String {
    SignatureVerifier::new(token).sign(body)
}

/// Verify `signature` for `body` with the secret derived from `token`.
pub fn verify_signature(token: &str, body: &[u8], signature: &str) -> bool {
    SignatureVerifier::new(token).verify(body, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC";
    const BODY: &[u8] = br#"{"update_id":1,"update_type":"invoice_paid"}"#;

    #[test]
    fn test_sign_and_verify() {
        let sig = sign_body(TOKEN, BODY);
        assert_eq!(sig.len(), 64);
        assert!(verify_signature(TOKEN, BODY, &sig));
        assert!(verify_signature(TOKEN, BODY, &sig.to_uppercase()));
    }

    #[test]
    fn test_wrong_token_rejected() {
        let sig = sign_body(TOKEN, BODY);
        assert!(!verify_signature("other-token", BODY, &sig));
    }

    #[test]
    fn test_single_bit_change_rejected() {
        let sig = sign_body(TOKEN, BODY);
        let mut body = BODY.to_vec();
        body[5] ^= 0x01;
        assert!(!verify_signature(TOKEN, &body, &sig));

        let mut bytes = hex::decode(&sig).unwrap();
        bytes[0] ^= 0x01;
        assert!(!verify_signature(TOKEN, BODY, &hex::encode(bytes)));
    }

    #[test]
    fn test_malformed_signature_rejected() {
        assert!(!verify_signature(TOKEN, BODY, ""));
        assert!(!verify_signature(TOKEN, BODY, "not-hex"));
        let sig = sign_body(TOKEN, BODY);
        assert!(!verify_signature(TOKEN, BODY, &sig[..62]));
    }

    #[test]
    fn test_secret_is_token_digest() {
        // sha256("abc")
        assert_eq!(
            hex::encode(derive_secret("abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let verifier = SignatureVerifier::new(TOKEN);
        assert_eq!(format!("{:?}", verifier), "SignatureVerifier { .. }");
    }
}
