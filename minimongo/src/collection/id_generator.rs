use crate::collection::ObjectId;
use crate::errors::{ErrorKind, MongoError, MongoResult};
use log::info;
use rand::rngs::OsRng;
use rand::Rng;

/// Mints [ObjectId]s as a random 4-byte tag followed by a strictly
/// increasing 8-byte sequence.
///
/// Two ids from the same generator never collide: the sequence is never
/// reused and running out of it is an error rather than a wrap-around. The
/// generator is serialized together with the collection that owns it, so a
/// restored collection continues its sequence instead of restarting it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct IdGenerator {
    tag: u32,
    next_sequence: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let tag = OsRng.gen::<u32>();
        info!("Initialized id generator with tag: {:08x}", tag);
        IdGenerator::with_tag(tag)
    }

    pub fn with_tag(tag: u32) -> Self {
        IdGenerator {
            tag,
            next_sequence: 0,
        }
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn next_id(&mut self) -> MongoResult<ObjectId> {
        if self.next_sequence == u64::MAX {
            log::error!("Id sequence exhausted for tag {:08x}", self.tag);
            return Err(MongoError::new(
                "Id sequence exhausted",
                ErrorKind::InternalError,
            ));
        }

        let id = ObjectId::from_parts(self.tag, self.next_sequence);
        self.next_sequence += 1;
        Ok(id)
    }

    /// Moves the sequence past an id minted elsewhere with this generator's
    /// tag, so it will never be handed out again.
    pub fn advance_past(&mut self, id: &ObjectId) {
        if id.tag() == self.tag && id.sequence() >= self.next_sequence {
            self.next_sequence = id.sequence().saturating_add(1);
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        IdGenerator::new()
    }
}
