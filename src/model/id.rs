use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use lazy_static::lazy_static;
use rand::Rng;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::time::get_now_as_u32;
use crate::ValidationError;

/// Length of the hex representation
pub const CRYPTO_ID_HEX_LEN: usize = 24;

lazy_static! {
    static ref PROCESS_UNIQUE: [u8; 5] = rand::thread_rng().gen();
    static ref COUNTER: AtomicU32 = AtomicU32::new(rand::thread_rng().gen_range(0..0x00ff_ffff));
}

/// Record identifier: 12 bytes, rendered as 24 lowercase hex characters.
///
/// Layout: 4 bytes creation seconds (big endian), 5 bytes per-process
/// random value, 3 bytes wrapping counter. Ids generated by one process
/// are therefore unique and roughly ordered by creation time.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CryptoId([u8; 12]);

impl CryptoId {
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&get_now_as_u32().to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        let count = COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        bytes[9..12].copy_from_slice(&count.to_be_bytes()[1..4]);
        CryptoId(bytes)
    }

    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        CryptoId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Parses the 24-character hex form, upper or lower case
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ValidationError::InvalidId(s.to_string()))?;
        Ok(CryptoId(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CryptoId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CryptoId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "CryptoId({})", self)
    }
}

impl FromStr for CryptoId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CryptoId::parse(s)
    }
}

impl Serialize for CryptoId {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CryptoId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CryptoId::parse(&s).map_err(serde::de::Error::custom)
    }
}
