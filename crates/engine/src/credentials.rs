//! Password and PIN hashing.
//!
//! Passwords are stored as `base64(sha256(salt || password))`; PINs as
//! `base64(hmac_sha256(salt, pin))`. The salt is generated once per user.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

type HmacSha256 = Hmac<Sha256>;

pub(crate) const MIN_PASSWORD_LEN: usize = 6;
pub(crate) const PIN_LEN: usize = 6;

pub(crate) fn new_salt() -> String {
    Uuid::new_v4().to_string()
}

pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    STANDARD.encode(hasher.finalize())
}

pub(crate) fn verify_password(salt: &str, password: &str, expected: &str) -> bool {
    constant_time_eq(hash_password(salt, password).as_bytes(), expected.as_bytes())
}

pub(crate) fn validate_password(password: &str) -> ResultEngine<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(EngineError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_pin(pin: &str) -> ResultEngine<()> {
    if pin.len() != PIN_LEN || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidInput(format!(
            "PIN must be exactly {PIN_LEN} digits"
        )));
    }
    Ok(())
}

pub(crate) fn hash_pin(salt: &str, pin: &str) -> ResultEngine<String> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|_| EngineError::InvalidInput("invalid PIN key".to_string()))?;
    mac.update(pin.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

pub(crate) fn verify_pin(salt: &str, pin: &str, expected: &str) -> ResultEngine<bool> {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes())
        .map_err(|_| EngineError::InvalidInput("invalid PIN key".to_string()))?;
    mac.update(pin.as_bytes());
    let Ok(expected) = STANDARD.decode(expected) else {
        return Ok(false);
    };
    Ok(mac.verify_slice(&expected).is_ok())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
