//! PIN lock
//!
//! Only a digest of the PIN is stored, under its own key so that it never
//! travels in a backup. This is a lock against casual access, the data
//! itself is not encrypted.
//!
//! Digests are SHA-256 in lowercase hex. Data files written where no
//! cryptographic digest was available hold a djb2 digest instead, which
//! is recognized by its length and still accepted.

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::load::{Store, StoreError};

pub const PIN_KEY: &str = "appPinHash";

const MIN_LEN: usize = 4;
const MAX_LEN: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum PinError {
    #[error("the two PINs do not match")]
    Mismatch,
    #[error("a PIN has 4 to 12 characters, not {0}")]
    Length(usize),
    #[error("no PIN is set")]
    NotSet,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn sha256(pin: &str) -> String {
    Sha256::digest(pin.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

/// Legacy non-cryptographic digest
///
/// Reproduces the arithmetic of the JavaScript it was computed with:
/// the shift wraps to 32 bits while the running sum does not, and the
/// result is finally read as an unsigned 32-bit integer. Characters are
/// UTF-16 code units.
pub fn djb2(pin: &str) -> String {
    let mut h: i64 = 5381;
    for c in pin.encode_utf16() {
        let shifted = (h as i32).wrapping_shl(5) as i64;
        h = shifted + h + c as i64;
    }
    format!("{:x}", h as u32)
}

/// Whether `pin` matches a stored digest of either kind
pub fn verify(pin: &str, digest: &str) -> bool {
    if digest.len() == 64 {
        sha256(pin) == digest
    } else {
        djb2(pin) == digest
    }
}

pub fn is_set<S>(store: &S) -> bool
where
    S: Store + ?Sized,
{
    matches!(store.get(PIN_KEY), Some(Value::String(_)))
}

/// First-time setup, or replacement of the PIN
pub fn set<S>(store: &mut S, pin: &str, confirm: &str) -> Result<(), PinError>
where
    S: Store + ?Sized,
{
    let len = pin.chars().count();
    if !(MIN_LEN..=MAX_LEN).contains(&len) {
        return Err(PinError::Length(len));
    }
    if pin != confirm {
        return Err(PinError::Mismatch);
    }
    store.set(PIN_KEY, Value::String(sha256(pin)))?;
    tracing::info!("PIN set");
    Ok(())
}

/// Whether `pin` unlocks the store
pub fn check<S>(store: &S, pin: &str) -> Result<bool, PinError>
where
    S: Store + ?Sized,
{
    match store.get(PIN_KEY) {
        Some(Value::String(digest)) => Ok(verify(pin, &digest)),
        _ => Err(PinError::NotSet),
    }
}

pub fn clear<S>(store: &mut S) -> Result<(), PinError>
where
    S: Store + ?Sized,
{
    store.remove(PIN_KEY)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::load::MemoryStore;

    #[test]
    fn known_digests() {
        assert_eq!(
            sha256("1234"),
            "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4"
        );
        assert_eq!(djb2(""), "1505");
        // 5381 * 33 + '1'
        assert_eq!(djb2("1"), format!("{:x}", 5381 * 33 + 49));
    }

    #[test]
    fn djb2_wraps_like_javascript() {
        let digest = djb2("12345678");
        assert!(verify("12345678", &digest));
        assert!(!verify("12345679", &digest));
        assert!(digest.len() <= 8);
    }

    #[test]
    fn set_then_check() {
        let mut store = MemoryStore::new();
        assert!(!is_set(&store));
        assert!(matches!(check(&store, "1234"), Err(PinError::NotSet)));
        assert!(matches!(set(&mut store, "12", "12"), Err(PinError::Length(2))));
        assert!(matches!(set(&mut store, "1234", "4321"), Err(PinError::Mismatch)));
        assert!(!is_set(&store));
        set(&mut store, "1234", "1234").unwrap();
        assert!(is_set(&store));
        assert!(check(&store, "1234").unwrap());
        assert!(!check(&store, "0000").unwrap());
        clear(&mut store).unwrap();
        assert!(!is_set(&store));
    }

    #[test]
    fn legacy_digest_accepted() {
        let mut store = MemoryStore::new();
        store.set(PIN_KEY, Value::String(djb2("2468"))).unwrap();
        assert!(check(&store, "2468").unwrap());
        assert!(!check(&store, "1357").unwrap());
    }
}
