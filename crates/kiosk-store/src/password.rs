//! Salted password hashing.
//!
//! A stored hash is the base64 encoding of `salt || key`: a 16-byte random
//! salt followed by a 20-byte PBKDF2-HMAC-SHA-256 key derived with 10 000
//! iterations. The encoding carries no algorithm tag or iteration count, so
//! changing any of these constants makes every stored hash unverifiable.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Length of the random salt prefix in bytes.
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes.
pub const KEY_LEN: usize = 20;

/// PBKDF2 iteration count.
pub const ITERATIONS: u32 = 10_000;

const ENCODED_LEN: usize = SALT_LEN + KEY_LEN;

/// Hashes `password` with a fresh random salt.
///
/// Two calls with the same password return different strings.
///
/// # Examples
///
/// ```
/// use kiosk_store::password::{hash_password, verify_password};
///
/// let stored = hash_password("admin123");
/// assert!(verify_password("admin123", &stored));
/// assert!(!verify_password("admin124", &stored));
/// ```
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0_u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    let key = derive_key(password, &salt);

    let mut encoded = Zeroizing::new([0_u8; ENCODED_LEN]);
    let (salt_part, key_part) = encoded.split_at_mut(SALT_LEN);
    salt_part.copy_from_slice(&salt);
    key_part.copy_from_slice(key.as_slice());
    STANDARD.encode(encoded.as_slice())
}

/// Checks `password` against a hash produced by [`hash_password`].
///
/// Malformed input of any kind (bad base64, fewer than 36 bytes) verifies as
/// `false`; this function never fails. Bytes past the first 36 are ignored.
#[must_use]
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Ok(raw) = STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let decoded = Zeroizing::new(raw);
    let (Some(salt), Some(stored_key)) = (
        decoded.get(..SALT_LEN),
        decoded.get(SALT_LEN..ENCODED_LEN),
    ) else {
        return false;
    };

    let derived = derive_key(password, salt);
    derived.as_slice().ct_eq(stored_key).into()
}

fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0_u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ITERATIONS, key.as_mut_slice());
    key
}
