//! Twelve-byte document identifiers and their 24-character hex form.

use std::{
  fmt,
  str::FromStr,
  sync::{
    OnceLock,
    atomic::{AtomicU32, Ordering},
  },
};

use chrono::Utc;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{Error, Result};

/// Width of an identifier in raw bytes.
pub const ID_LEN: usize = 12;

/// A fixed-width document identifier.
///
/// Layout of generated ids: 4-byte big-endian creation second, 5 bytes that
/// are random per process, and a 3-byte big-endian counter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; ID_LEN]);

impl ObjectId {
  /// Generate a fresh identifier.
  pub fn generate() -> Self {
    let mut bytes = [0u8; ID_LEN];
    let secs = Utc::now().timestamp() as u32;
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(process_unique());
    bytes[9..].copy_from_slice(&next_count().to_be_bytes()[1..]);
    Self(bytes)
  }

  pub const fn bytes(&self) -> [u8; ID_LEN] { self.0 }

  /// Decode the external 24-character hex form.
  pub fn parse_str(s: &str) -> Result<Self> {
    let mut bytes = [0u8; ID_LEN];
    hex::decode_to_slice(s, &mut bytes)
      .map_err(|_| Error::InvalidIdentifier(s.to_owned()))?;
    Ok(Self(bytes))
  }

  pub fn to_hex(&self) -> String { hex::encode(self.0) }
}

fn process_unique() -> &'static [u8; 5] {
  static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
  PROCESS_UNIQUE.get_or_init(|| {
    let mut buf = [0u8; 5];
    OsRng.fill_bytes(&mut buf);
    buf
  })
}

fn next_count() -> u32 {
  static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
  let counter =
    COUNTER.get_or_init(|| AtomicU32::new(OsRng.next_u32() & 0x00ff_ffff));
  counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff
}

impl FromStr for ObjectId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse_str(s) }
}

impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl fmt::Debug for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ObjectId({})", self.to_hex())
  }
}

impl Serialize for ObjectId {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.to_hex())
  }
}

impl<'de> Deserialize<'de> for ObjectId {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    Self::parse_str(&s).map_err(de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_24_hex_characters() {
    let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
    assert_eq!(id.bytes()[0], 0x65);
    assert_eq!(id.bytes()[11], 0xf6);
    assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
  }

  #[test]
  fn uppercase_hex_is_accepted_and_normalised() {
    let id = ObjectId::parse_str("65A1F0C2E4B0A1B2C3D4E5F6").unwrap();
    assert_eq!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");
  }

  #[test]
  fn rejects_malformed_input() {
    for bad in [
      "",
      "65a1f0c2e4b0a1b2c3d4e5f",
      "65a1f0c2e4b0a1b2c3d4e5f6a",
      "65a1f0c2e4b0a1b2c3d4e5f60000",
      "zza1f0c2e4b0a1b2c3d4e5f6",
      "65a1f0c2-4b0a1b2c3d4e5f6",
    ] {
      match ObjectId::parse_str(bad) {
        Err(Error::InvalidIdentifier(s)) => assert_eq!(s, bad),
        other => panic!("{bad:?} should be rejected, got {other:?}"),
      }
    }
  }

  #[test]
  fn generated_ids_are_distinct() {
    let a = ObjectId::generate();
    let b = ObjectId::generate();
    assert_ne!(a, b);
    assert_eq!(a.bytes()[4..9], b.bytes()[4..9]);
  }

  #[test]
  fn serde_uses_hex_string() {
    let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"65a1f0c2e4b0a1b2c3d4e5f6\"");
    assert!(serde_json::from_str::<ObjectId>("\"nope\"").is_err());
  }
}
