use crate::collection::MongoCollection;
use crate::common::RESERVED_NAME_PREFIX;
use crate::database_builder::DatabaseBuilder;
use crate::database_config::DatabaseConfig;
use crate::errors::{ErrorKind, MongoError, MongoResult};
use crate::store::{read_snapshot, write_snapshot};
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// An in-process database: a registry of named [MongoCollection]s.
///
/// Collections are created the first time they are asked for and are kept
/// in name order. The whole database can be written to a snapshot file with
/// [MongoDatabase::save] and restored with [MongoDatabase::load].
///
/// # Examples
///
/// ```rust,ignore
/// use minimongo::{body, MongoDatabase};
///
/// let mut db = MongoDatabase::builder().name("blog").open()?;
/// db.collection("posts")?.insert_one(body!{ author: "Mike" })?;
/// assert_eq!(db.list_collections(), vec!["posts"]);
///
/// let path = db.save()?;
/// let restored = MongoDatabase::load(&path)?;
/// assert_eq!(restored.name(), "blog");
/// ```
#[derive(Debug, Clone)]
pub struct MongoDatabase {
    config: DatabaseConfig,
    collections: BTreeMap<String, MongoCollection>,
}

impl MongoDatabase {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::new()
    }

    pub(crate) fn new(config: DatabaseConfig) -> Self {
        info!("Opened new database '{}'", config.name());
        MongoDatabase {
            config,
            collections: BTreeMap::new(),
        }
    }

    pub(crate) fn open_snapshot(mut config: DatabaseConfig, path: &Path) -> MongoResult<Self> {
        let file = File::open(path).map_err(|err| io_error("open", path, err))?;
        let snapshot = read_snapshot(&mut BufReader::new(file))?;
        config.set_name(&snapshot.name)?;
        info!(
            "Loaded database '{}' with {} collections from {}",
            snapshot.name,
            snapshot.collections.len(),
            path.display()
        );
        Ok(MongoDatabase {
            config,
            collections: snapshot.collections,
        })
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Number of collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Returns the named collection, creating it if it does not exist.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the name is empty or starts with `__`.
    pub fn collection(&mut self, name: &str) -> MongoResult<&mut MongoCollection> {
        validate_collection_name(name)?;
        let database = self.config.name();
        let collection = self.collections.entry(name.to_string()).or_insert_with(|| {
            debug!("Created collection '{}' in database '{}'", name, database);
            MongoCollection::new(name)
        });
        Ok(collection)
    }

    /// Returns the named collection without creating it.
    pub fn get_collection(&self, name: &str) -> Option<&MongoCollection> {
        self.collections.get(name)
    }

    pub fn get_collection_mut(&mut self, name: &str) -> Option<&mut MongoCollection> {
        self.collections.get_mut(name)
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Removes a collection with all its documents and indices, returning it.
    pub fn drop_collection(&mut self, name: &str) -> MongoResult<MongoCollection> {
        match self.collections.remove(name) {
            Some(collection) => {
                debug!("Dropped collection '{}'", name);
                Ok(collection)
            }
            None => {
                error!("Collection '{}' does not exist", name);
                Err(MongoError::new(
                    &format!("Collection '{}' does not exist", name),
                    ErrorKind::NotFound,
                ))
            }
        }
    }

    /// Collection names in sorted order.
    pub fn list_collections(&self) -> Vec<String> {
        self.collections.keys().cloned().collect()
    }

    /// Writes a snapshot to the configured path and returns that path.
    ///
    /// The path is `db_path`, or the database name when no path is set, with
    /// the configured extension. Fails with `FileAlreadyExists` if the file
    /// exists and the configuration does not allow overwriting.
    pub fn save(&self) -> MongoResult<PathBuf> {
        self.write_file(self.config.snapshot_path(), self.config.overwrite())
    }

    /// Writes a snapshot to `path` with the configured extension and returns
    /// the path written.
    pub fn save_as<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> MongoResult<PathBuf> {
        self.write_file(self.config.normalize_path(path.as_ref()), overwrite)
    }

    /// Writes a snapshot to any writer.
    pub fn save_to<W: Write>(&self, writer: &mut W) -> MongoResult<()> {
        write_snapshot(writer, self.name(), &self.collections)
    }

    /// Restores a database from the snapshot file at `path`.
    ///
    /// The path is used as given. The restored database has the default
    /// configuration with the stored name and `path` as its `db_path`.
    pub fn load<P: AsRef<Path>>(path: P) -> MongoResult<MongoDatabase> {
        let path = path.as_ref();
        let mut config = DatabaseConfig::new();
        config.set_db_path(path)?;
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            config.set_file_extension(extension)?;
        }
        MongoDatabase::open_snapshot(config, path)
    }

    /// Restores a database from a snapshot read from `reader`.
    pub fn load_from<R: Read>(reader: &mut R) -> MongoResult<MongoDatabase> {
        let snapshot = read_snapshot(reader)?;
        let mut config = DatabaseConfig::new();
        config.set_name(&snapshot.name)?;
        info!(
            "Loaded database '{}' with {} collections",
            snapshot.name,
            snapshot.collections.len()
        );
        Ok(MongoDatabase {
            config,
            collections: snapshot.collections,
        })
    }

    fn write_file(&self, path: PathBuf, overwrite: bool) -> MongoResult<PathBuf> {
        // write next to the target and rename into place, so a failed save
        // never leaves a partial snapshot at `path`
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|err| io_error("create", &path, err))?;
        {
            let mut writer = BufWriter::new(file.as_file_mut());
            self.save_to(&mut writer)?;
            writer.flush().map_err(|err| io_error("write", &path, err))?;
        }

        let persisted = if overwrite {
            file.persist(&path)
        } else {
            file.persist_noclobber(&path)
        };
        persisted.map_err(|err| io_error("create", &path, err.error))?;
        info!("Saved database '{}' to {}", self.name(), path.display());
        Ok(path)
    }
}

fn validate_collection_name(name: &str) -> MongoResult<()> {
    if name.is_empty() {
        error!("Collection name cannot be empty");
        return Err(MongoError::new(
            "Collection name cannot be empty",
            ErrorKind::InvalidArgument,
        ));
    }
    if name.starts_with(RESERVED_NAME_PREFIX) {
        error!("Collection name '{}' uses the reserved prefix '{}'", name, RESERVED_NAME_PREFIX);
        return Err(MongoError::new(
            &format!(
                "Collection name '{}' uses the reserved prefix '{}'",
                name, RESERVED_NAME_PREFIX
            ),
            ErrorKind::InvalidArgument,
        ));
    }
    Ok(())
}

fn io_error(action: &str, path: &Path, err: std::io::Error) -> MongoError {
    error!("Failed to {} {}: {}", action, path.display(), err);
    let cause = MongoError::from(err);
    MongoError::new_with_cause(
        &format!("Failed to {} {}", action, path.display()),
        cause.kind().clone(),
        cause,
    )
}
