//! Configuration of a [crate::MongoDatabase].

use crate::common::{DEFAULT_DATABASE_NAME, DEFAULT_FILE_EXTENSION};
use crate::errors::{ErrorKind, MongoError, MongoResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Settings of a database: its name and how snapshots are written.
///
/// * `name` - the database name, also the default snapshot file name.
/// * `db_path` - where [crate::MongoDatabase::save] writes; when unset the
///   name is used as a path relative to the working directory.
/// * `file_extension` - appended to snapshot file names (default `mongodb`).
/// * `overwrite` - whether `save` may replace an existing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    name: String,
    db_path: Option<PathBuf>,
    file_extension: String,
    overwrite: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseConfig {
    pub fn new() -> Self {
        DatabaseConfig {
            name: DEFAULT_DATABASE_NAME.to_string(),
            db_path: None,
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            overwrite: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    pub fn set_name(&mut self, name: &str) -> MongoResult<()> {
        if name.is_empty() {
            log::error!("Database name cannot be empty");
            return Err(MongoError::new(
                "Database name cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        self.name = name.to_string();
        Ok(())
    }

    pub fn set_db_path<P: AsRef<Path>>(&mut self, db_path: P) -> MongoResult<()> {
        let db_path = db_path.as_ref();
        if db_path.as_os_str().is_empty() {
            log::error!("Database path cannot be empty");
            return Err(MongoError::new(
                "Database path cannot be empty",
                ErrorKind::InvalidArgument,
            ));
        }
        self.db_path = Some(db_path.to_path_buf());
        Ok(())
    }

    /// Sets the snapshot file extension. A leading dot is ignored.
    pub fn set_file_extension(&mut self, extension: &str) -> MongoResult<()> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(&['/', '\\'][..]) {
            log::error!("Invalid snapshot file extension: '{}'", extension);
            return Err(MongoError::new(
                &format!("Invalid snapshot file extension: '{}'", extension),
                ErrorKind::InvalidArgument,
            ));
        }
        self.file_extension = extension.to_string();
        Ok(())
    }

    pub fn set_overwrite(&mut self, overwrite: bool) {
        self.overwrite = overwrite;
    }

    /// The file [crate::MongoDatabase::save] writes to.
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.db_path {
            Some(db_path) => self.normalize_path(db_path),
            None => self.normalize_path(Path::new(&self.name)),
        }
    }

    /// Appends the snapshot extension unless the path already ends with it.
    pub fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.extension().is_some_and(|ext| ext == self.file_extension.as_str()) {
            return path.to_path_buf();
        }

        let mut file_name = OsString::from(path.as_os_str());
        file_name.push(".");
        file_name.push(&self.file_extension);
        PathBuf::from(file_name)
    }
}
