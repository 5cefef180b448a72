use std::collections::HashSet;

use super::*;
use crate::ValidationError;

#[test]
fn test_generate_produces_unique_hex_ids() {
    let mut seen = HashSet::new();
    for _ in 0..1000 {
        let id = CryptoId::generate();
        let hex = id.to_hex();
        assert_eq!(hex.len(), CRYPTO_ID_HEX_LEN);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert!(seen.insert(id));
    }
}

#[test]
fn test_parse_round_trips_display() {
    let id = CryptoId::generate();
    assert_eq!(CryptoId::parse(&id.to_hex()).unwrap(), id);
}

#[test]
fn test_parse_accepts_all_zero_id() {
    let id = CryptoId::parse("000000000000000000000000").unwrap();
    assert_eq!(id.as_bytes(), &[0u8; 12]);
}

#[test]
fn test_parse_accepts_upper_case() {
    let id = CryptoId::parse("64A1F0C2B3D4E5F60718293A").unwrap();
    assert_eq!(id.to_hex(), "64a1f0c2b3d4e5f60718293a");
}

#[test]
fn test_parse_rejects_malformed_ids() {
    for bad in ["", "not-an-id", "00000000000000000000000", "0000000000000000000000000", "zz0000000000000000000000", "ééééééééééé0"] {
        assert_eq!(
            CryptoId::parse(bad),
            Err(ValidationError::InvalidId(bad.to_string())),
            "{bad} should be rejected"
        );
    }
}

#[test]
fn test_serde_uses_hex_string() {
    let id = CryptoId::parse("64a1f0c2b3d4e5f60718293a").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"64a1f0c2b3d4e5f60718293a\"");
    let back: CryptoId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
