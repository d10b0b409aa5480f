//! Password hashing
//!
//! Hashes are stored as `sha256$<salt-hex>$<digest-hex>`, where the digest is
//! SHA-256 over the salt followed by the password. Bare 64-character hex
//! digests (unsalted SHA-256) written by older deployments still verify.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!(
        "{}${}${}",
        SCHEME,
        hex::encode(salt),
        hex::encode(digest(&salt, password))
    )
}

/// Check `password` against a stored hash. A missing hash never matches.
pub fn verify_password(password: &str, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        return false;
    };

    let mut parts = stored.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(salt_hex), Some(digest_hex)) => {
            let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
                return false;
            };
            constant_time_eq(&digest(&salt, password), &expected)
        }
        (Some(legacy), None, None) => match hex::decode(legacy) {
            Ok(expected) => constant_time_eq(&digest(&[], password), &expected),
            Err(_) => false,
        },
        _ => false,
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("nimda123");
        assert!(hash.starts_with("sha256$"));
        assert!(verify_password("nimda123", Some(&hash)));
        assert!(!verify_password("nimda124", Some(&hash)));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_legacy_unsalted_digest_verifies() {
        // sha256("password")
        let legacy = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        assert!(verify_password("password", Some(legacy)));
        assert!(!verify_password("Password", Some(legacy)));
    }

    #[test]
    fn test_missing_or_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", None));
        assert!(!verify_password("anything", Some("")));
        assert!(!verify_password("anything", Some("sha256$zz$zz")));
        assert!(!verify_password("anything", Some("md5$00$00")));
    }
}
