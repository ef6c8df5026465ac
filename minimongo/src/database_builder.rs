use crate::database::MongoDatabase;
use crate::database_config::DatabaseConfig;
use crate::errors::{MongoError, MongoResult};
use std::path::Path;

/// Builder for [MongoDatabase].
///
/// Setter errors are captured and returned by [DatabaseBuilder::open], so
/// the calls can be chained without handling each one.
///
/// ```rust,ignore
/// let db = MongoDatabase::builder()
///     .name("blog")
///     .db_path("/var/lib/blog")
///     .overwrite(true)
///     .open()?;
/// ```
#[derive(Default)]
pub struct DatabaseBuilder {
    error: Option<MongoError>,
    config: DatabaseConfig,
}

impl DatabaseBuilder {
    pub fn new() -> Self {
        DatabaseBuilder {
            error: None,
            config: DatabaseConfig::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_name(name) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn db_path<P: AsRef<Path>>(mut self, db_path: P) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_db_path(db_path) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn file_extension(mut self, extension: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_file_extension(extension) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.set_overwrite(overwrite);
        self
    }

    /// Opens the database.
    ///
    /// If a `db_path` is set and its snapshot file exists, the database is
    /// loaded from it and takes the stored name. Otherwise an empty database
    /// is created; nothing is written until [MongoDatabase::save].
    pub fn open(self) -> MongoResult<MongoDatabase> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.config.db_path().is_some() {
            let snapshot_path = self.config.snapshot_path();
            if snapshot_path.is_file() {
                return MongoDatabase::open_snapshot(self.config, &snapshot_path);
            }
        }
        Ok(MongoDatabase::new(self.config))
    }
}
