use crate::collection::MongoCollection;
use crate::common::{SNAPSHOT_FORMAT_VERSION, SNAPSHOT_MAGIC};
use crate::errors::{ErrorKind, MongoError, MongoResult};
use log::{debug, error};
use std::collections::BTreeMap;
use std::io::{Read, Write};

#[derive(serde::Serialize)]
struct SnapshotRef<'a> {
    name: &'a str,
    collections: &'a BTreeMap<String, MongoCollection>,
}

/// The decoded content of a snapshot.
#[derive(serde::Deserialize)]
pub(crate) struct Snapshot {
    pub(crate) name: String,
    pub(crate) collections: BTreeMap<String, MongoCollection>,
}

pub(crate) fn write_snapshot<W: Write>(
    writer: &mut W,
    name: &str,
    collections: &BTreeMap<String, MongoCollection>,
) -> MongoResult<()> {
    let body = bincode::serde::encode_to_vec(
        SnapshotRef { name, collections },
        bincode::config::legacy(),
    )
    .map_err(|err| {
        error!("Failed to encode snapshot of '{}': {}", name, err);
        MongoError::from(err)
    })?;

    writer.write_all(SNAPSHOT_MAGIC)?;
    writer.write_all(&SNAPSHOT_FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&body)?;
    debug!("Wrote snapshot of '{}' ({} bytes)", name, body.len());
    Ok(())
}

pub(crate) fn read_snapshot<R: Read>(reader: &mut R) -> MongoResult<Snapshot> {
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|err| {
        error!("Failed to read snapshot header: {}", err);
        encoding_error("Not a minimongo snapshot: header is truncated")
    })?;
    if &magic != SNAPSHOT_MAGIC {
        error!("Snapshot header does not start with the minimongo magic");
        return Err(encoding_error("Not a minimongo snapshot: bad magic"));
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version).map_err(|err| {
        error!("Failed to read snapshot version: {}", err);
        encoding_error("Not a minimongo snapshot: version is truncated")
    })?;
    let version = u32::from_le_bytes(version);
    if version != SNAPSHOT_FORMAT_VERSION {
        error!("Unsupported snapshot format version {}", version);
        return Err(encoding_error(&format!(
            "Unsupported snapshot format version {}, expected {}",
            version, SNAPSHOT_FORMAT_VERSION
        )));
    }

    let mut body = Vec::new();
    reader.read_to_end(&mut body)?;
    let (mut snapshot, read): (Snapshot, usize) =
        bincode::serde::decode_from_slice(&body, bincode::config::legacy()).map_err(|err| {
            error!("Failed to decode snapshot: {}", err);
            MongoError::from(err)
        })?;
    if read != body.len() {
        error!("Snapshot has {} trailing bytes", body.len() - read);
        return Err(encoding_error("Snapshot has trailing bytes"));
    }

    // documents edited through `get_mut` may be saved out of order or with
    // stale indices; both are rebuilt here
    for collection in snapshot.collections.values_mut() {
        if let Err(err) = collection.repair() {
            error!("Snapshot collection '{}' is inconsistent", collection.name());
            return Err(MongoError::new_with_cause(
                &format!("Snapshot collection '{}' is inconsistent", collection.name()),
                ErrorKind::EncodingError,
                err,
            ));
        }
    }

    debug!(
        "Read snapshot of '{}' with {} collections",
        snapshot.name,
        snapshot.collections.len()
    );
    Ok(snapshot)
}

fn encoding_error(message: &str) -> MongoError {
    MongoError::new(message, ErrorKind::EncodingError)
}
