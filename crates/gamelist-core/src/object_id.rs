use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of an object id rendered as hex.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// A 12-byte document identifier: 4-byte big-endian creation time in
/// seconds, 5 bytes fixed per process, 3-byte wrapping counter.
///
/// The counter starts at zero, so ids generated by one process sort in
/// creation order unless the counter wraps (every 2^24 ids) within a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

/// Returned when text is not a 24-character hex object id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedObjectId(pub String);

impl std::fmt::Display for MalformedObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed object id: {:?}", self.0)
    }
}

impl std::error::Error for MalformedObjectId {}

fn process_unique() -> [u8; 5] {
    static UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
    *UNIQUE.get_or_init(rand::random::<[u8; 5]>)
}

fn next_counter() -> u32 {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF
}

impl ObjectId {
    /// Generate a fresh id stamped with the current time.
    pub fn generate() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as u32;
        Self::from_parts(secs, process_unique(), next_counter())
    }

    fn from_parts(timestamp: u32, unique: [u8; 5], counter: u32) -> Self {
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(&unique);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    /// Cheap format check used before touching a store.
    pub fn is_valid(text: &str) -> bool {
        text.len() == OBJECT_ID_HEX_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl FromStr for ObjectId {
    type Err = MalformedObjectId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(MalformedObjectId(s.to_string()));
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| MalformedObjectId(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        let text = "65a1f0c2e4b0a1b2c3d4e5f6";
        let oid: ObjectId = text.parse().unwrap();
        assert_eq!(oid.to_string(), text);
        assert_eq!(oid.timestamp(), 0x65a1_f0c2);
    }

    #[test]
    fn uppercase_hex_is_accepted_and_normalized() {
        let oid: ObjectId = "65A1F0C2E4B0A1B2C3D4E5F6".parse().unwrap();
        assert_eq!(oid.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        for bad in [
            "",
            "123",
            "65a1f0c2e4b0a1b2c3d4e5f",
            "65a1f0c2e4b0a1b2c3d4e5f6a",
            "zza1f0c2e4b0a1b2c3d4e5f6",
            "1",
        ] {
            assert!(!ObjectId::is_valid(bad), "{bad:?} should be invalid");
            assert_eq!(
                bad.parse::<ObjectId>().unwrap_err(),
                MalformedObjectId(bad.to_string())
            );
        }
    }

    #[test]
    fn generated_ids_are_unique_and_ordered() {
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        assert_ne!(a, b);
        assert!(ObjectId::is_valid(&a.to_string()));
        // Same process bytes in both ids
        assert_eq!(a.bytes()[4..9], b.bytes()[4..9]);
        assert!(a.timestamp() <= b.timestamp());
    }

    #[test]
    fn ids_from_one_process_sort_in_creation_order() {
        let ids: Vec<ObjectId> = (0..1000).map(|_| ObjectId::generate()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn counter_occupies_low_three_bytes() {
        let oid = ObjectId::from_parts(1, [9; 5], 0x0102_0304);
        assert_eq!(oid.bytes()[9..], [0x02, 0x03, 0x04]);
        assert_eq!(oid.timestamp(), 1);
    }
}
