//! Password hashing for patient credentials.
//!
//! PBKDF2-HMAC-SHA256 with a fresh random salt per password. Salt and hash
//! are stored hex-encoded in separate columns. Verification compares in
//! constant time, and the login path burns an equivalent derivation when the
//! email does not resolve, so the two failure modes cost the same.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Derive a `(salt, hash)` pair for storage, both hex-encoded.
pub fn hash_password(password: &str, iterations: u32) -> (String, String) {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);

    let mut hash = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut hash);

    (hex::encode(salt), hex::encode(hash))
}

/// Check a candidate password against a stored hex salt and hash.
///
/// Malformed stored values read as a failed login rather than an error, so a
/// corrupt row cannot be told apart from a wrong password by the caller.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str, iterations: u32) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(hash_hex) else {
        return false;
    };

    let mut candidate = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut candidate);
    candidate.as_slice().ct_eq(expected.as_slice()).into()
}

/// Run one derivation against fixed inputs and discard the result. Called on
/// the unknown-email login path so it costs one PBKDF2 run, the same as a
/// wrong-password attempt.
pub fn burn_verification(password: &str, iterations: u32) {
    let salt = [0u8; SALT_LEN];
    let mut sink = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut sink);
}
