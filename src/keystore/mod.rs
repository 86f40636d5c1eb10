//! Device key registry.
//!
//! Maps device ids to their manufacturer id and 32-byte secret key. The
//! registry is persisted as a single JSON object by [`store::KeyFile`].

pub mod store;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::KEY_LEN;

pub use store::{KeyFile, KeyStoreError};

/// A device's symmetric key.
///
/// Serialized as lowercase hex. `Debug` output never contains key material.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceKey([u8; KEY_LEN]);

impl DeviceKey {
    /// Draw a fresh key from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lowercase hex encoding (`2 * KEY_LEN` characters).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DeviceKey([REDACTED])")
    }
}

impl FromStr for DeviceKey {
    type Err = hex::FromHexError;

    /// Parse a hex string of exactly `2 * KEY_LEN` characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; KEY_LEN];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for DeviceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DeviceKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e| {
            serde::de::Error::custom(format!(
                "invalid key (expected {} hex characters): {e}",
                KEY_LEN * 2
            ))
        })
    }
}

/// One entry in the key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    pub manufacturer_id: String,
    pub key: DeviceKey,
}

impl KeyRecord {
    /// Create a record with a freshly generated key.
    pub fn generate(manufacturer_id: impl Into<String>) -> Self {
        Self {
            manufacturer_id: manufacturer_id.into(),
            key: DeviceKey::generate(),
        }
    }
}

/// The full registry, keyed by device id.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending byte order of
/// the device id regardless of insertion order or on-disk order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyStore {
    records: BTreeMap<String, KeyRecord>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, device_id: &str) -> Option<&KeyRecord> {
        self.records.get(device_id)
    }

    /// Insert or replace the record for `device_id`, returning the previous one.
    pub fn insert(&mut self, device_id: impl Into<String>, record: KeyRecord) -> Option<KeyRecord> {
        self.records.insert(device_id.into(), record)
    }

    /// Iterate over `(device_id, record)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeyRecord)> {
        self.records.iter().map(|(id, rec)| (id.as_str(), rec))
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl FromIterator<(String, KeyRecord)> for KeyStore {
    fn from_iter<I: IntoIterator<Item = (String, KeyRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
