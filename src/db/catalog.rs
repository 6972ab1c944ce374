//! Database directory scanning.
//!
//! Lists the `.db` files in the configured folder. A database name coming from a
//! request is only ever turned into a path after it matched a listing entry.

use crate::error::{PlaygroundError, PlaygroundResult};
use crate::models::DatabaseFile;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File suffix recognised as a SQLite database.
pub const DATABASE_FILE_SUFFIX: &str = ".db";

/// Check whether a file name carries the database suffix.
pub fn is_database_file_name(name: &str) -> bool {
    name.ends_with(DATABASE_FILE_SUFFIX)
}

#[derive(Debug, Clone)]
pub struct DatabaseDirectory {
    root: PathBuf,
}

impl DatabaseDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the folder (and parents) if it does not exist yet.
    pub async fn ensure_exists(&self) -> PlaygroundResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PlaygroundError::io(self.root.display().to_string(), e))?;
        info!(path = %self.root.display(), "Databases folder ready");
        Ok(())
    }

    /// List the database files in the folder, sorted by name.
    ///
    /// Directories and files without the `.db` suffix are skipped. Symlinks are
    /// followed.
    pub async fn list(&self) -> PlaygroundResult<Vec<DatabaseFile>> {
        let root_display = self.root.display().to_string();
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| PlaygroundError::io(root_display.clone(), e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PlaygroundError::io(root_display.clone(), e))?
        {
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            if !is_database_file_name(&name) {
                continue;
            }

            let metadata = match tokio::fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(file = %name, error = %e, "Skipping unreadable database file");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);
            files.push(
                DatabaseFile::new(name)
                    .with_size(metadata.len())
                    .with_modified(modified),
            );
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(path = %root_display, count = files.len(), "Listed database files");
        Ok(files)
    }

    /// Full path of a listed database file.
    pub fn path_of(&self, file: &DatabaseFile) -> PathBuf {
        self.root.join(&file.name)
    }

    /// Resolve a database name to its path, provided it is part of the current
    /// listing.
    pub async fn resolve(&self, name: &str) -> PlaygroundResult<PathBuf> {
        let files = self.list().await?;
        find_database(&files, name).map(|file| self.path_of(file))
    }
}

/// Look a database up by name in a listing.
pub fn find_database<'a>(files: &'a [DatabaseFile], name: &str) -> PlaygroundResult<&'a DatabaseFile> {
    files
        .iter()
        .find(|file| file.name == name)
        .ok_or_else(|| PlaygroundError::database_not_found(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_match() {
        assert!(is_database_file_name("shop.db"));
        assert!(is_database_file_name(".db"));
        assert!(!is_database_file_name("shop.sqlite"));
        assert!(!is_database_file_name("shop.db-journal"));
        assert!(!is_database_file_name("shop.DB"));
    }

    #[test]
    fn test_find_database() {
        let files = vec![DatabaseFile::new("a.db"), DatabaseFile::new("b.db")];
        assert_eq!(find_database(&files, "b.db").unwrap().name, "b.db");
        let err = find_database(&files, "../etc/passwd").unwrap_err();
        assert!(matches!(err, PlaygroundError::DatabaseNotFound { .. }));
    }

    #[test]
    fn test_path_of() {
        let dir = DatabaseDirectory::new("databases");
        let path = dir.path_of(&DatabaseFile::new("shop.db"));
        assert_eq!(path, PathBuf::from("databases").join("shop.db"));
    }
}
