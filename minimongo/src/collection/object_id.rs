use crate::common::Value;
use crate::errors::{ErrorKind, MongoError, MongoResult};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Write};
use std::str::FromStr;

const ID_LENGTH: usize = 12;
const HEX_LENGTH: usize = ID_LENGTH * 2;

/// A unique identifier for documents in a collection.
///
/// An `ObjectId` is 12 opaque bytes. The [crate::collection::DocumentFactory]
/// lays them out as a 4-byte random tag followed by an 8-byte big-endian
/// sequence number, but the engine only relies on equality and on the total
/// order, which is lexicographic on the bytes. The lowercase hex form orders
/// the same way, so an id compares against its raw hex representation
/// consistently with how it compares against other ids.
///
/// # Examples
///
/// ```rust,ignore
/// use minimongo::collection::ObjectId;
///
/// let id: ObjectId = "0000000a0000000000000001".parse()?;
/// assert_eq!(id, "0000000a0000000000000001");
/// assert_eq!(id.sequence(), 1);
/// ```
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy, serde::Deserialize, serde::Serialize)]
pub struct ObjectId {
    bytes: [u8; ID_LENGTH],
}

impl ObjectId {
    /// Creates an id from its raw bytes.
    pub fn from_bytes(bytes: [u8; ID_LENGTH]) -> Self {
        ObjectId { bytes }
    }

    /// Creates an id from a generator tag and a sequence number.
    pub fn from_parts(tag: u32, sequence: u64) -> Self {
        let mut bytes = [0u8; ID_LENGTH];
        bytes[..4].copy_from_slice(&tag.to_be_bytes());
        bytes[4..].copy_from_slice(&sequence.to_be_bytes());
        ObjectId { bytes }
    }

    /// Parses an id from its 24 character hex form.
    pub fn parse_str(hex: &str) -> MongoResult<ObjectId> {
        if hex.len() != HEX_LENGTH || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            log::error!("Invalid ObjectId representation: {}", hex);
            return Err(MongoError::new(
                &format!("ObjectId must be {} hex characters, got '{}'", HEX_LENGTH, hex),
                ErrorKind::InvalidArgument,
            ));
        }

        let mut bytes = [0u8; ID_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| {
                MongoError::new(
                    &format!("ObjectId contains a non-hex character: '{}'", hex),
                    ErrorKind::InvalidArgument,
                )
            })?;
        }
        Ok(ObjectId { bytes })
    }

    pub fn bytes(&self) -> &[u8; ID_LENGTH] {
        &self.bytes
    }

    /// The generator tag stored in the first four bytes.
    pub fn tag(&self) -> u32 {
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.bytes[..4]);
        u32::from_be_bytes(tag)
    }

    /// The sequence number stored in the last eight bytes.
    pub fn sequence(&self) -> u64 {
        let mut sequence = [0u8; 8];
        sequence.copy_from_slice(&self.bytes[4..]);
        u64::from_be_bytes(sequence)
    }

    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(HEX_LENGTH);
        for byte in self.bytes.iter() {
            // writing into a String never fails
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    }
}

impl FromStr for ObjectId {
    type Err = MongoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
    }
}

impl TryFrom<&Value> for ObjectId {
    type Error = MongoError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::ObjectId(id) => Ok(*id),
            other => {
                log::error!("Expected an ObjectId, found {}", other.kind_name());
                Err(MongoError::new(
                    &format!("Expected an ObjectId, found a {} value", other.kind_name()),
                    ErrorKind::TypeMismatch,
                ))
            }
        }
    }
}

impl TryFrom<Value> for ObjectId {
    type Error = MongoError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        ObjectId::try_from(&value)
    }
}

impl PartialEq<str> for ObjectId {
    fn eq(&self, other: &str) -> bool {
        self.to_hex().eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for ObjectId {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<[u8; ID_LENGTH]> for ObjectId {
    fn eq(&self, other: &[u8; ID_LENGTH]) -> bool {
        &self.bytes == other
    }
}

impl PartialOrd<str> for ObjectId {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.to_hex().as_str().cmp(other.to_ascii_lowercase().as_str()))
    }
}

impl PartialOrd<&str> for ObjectId {
    fn partial_cmp(&self, other: &&str) -> Option<Ordering> {
        self.partial_cmp(*other)
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId(\"{}\")", self.to_hex())
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
