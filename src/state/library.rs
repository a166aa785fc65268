use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::data::Photo;
use super::index::OrderedItemIndex;
use crate::error::LibraryError;

/// The Library manages the SQLite photo catalog.
/// It stores where each photo lives and when it was created, which is
/// all the ordered index needs.
pub struct Library {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open the catalog in the user's data directory:
    /// - Linux: ~/.local/share/photo-preheat/catalog.db
    /// - macOS: ~/Library/Application Support/photo-preheat/catalog.db
    /// - Windows: %APPDATA%\photo-preheat\catalog.db
    pub fn new() -> Result<Self, LibraryError> {
        Self::open(&Self::default_db_path()?)
    }

    /// Open or create the catalog at `path`
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "catalog opened");

        let library = Library {
            conn,
            db_path: Some(path.to_path_buf()),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// A throwaway catalog, mostly for tests
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the catalog should be stored
    pub fn default_db_path() -> Result<PathBuf, LibraryError> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(LibraryError::NoDataDir)?;
        path.push("photo-preheat");
        path.push("catalog.db");
        Ok(path)
    }

    /// Create tables and indexes if they don't exist
    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS photos (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                identifier      TEXT NOT NULL UNIQUE,
                path            TEXT NOT NULL,
                filename        TEXT NOT NULL,
                created_at      INTEGER NOT NULL,
                imported_at     INTEGER NOT NULL,
                file_status     TEXT NOT NULL DEFAULT 'exists'
            )",
            [],
        )?;

        // Index ordering is by creation time, oldest first
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_photos_created_at
             ON photos(created_at ASC)",
            [],
        )?;

        Ok(())
    }

    /// Get the path to the database file, if it has one
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Number of photos whose files still exist
    pub fn photo_count(&self) -> Result<usize, LibraryError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM photos WHERE file_status = 'exists'",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Add a photo to the catalog.
    /// A photo previously marked 'deleted' is restored in place.
    /// Returns `false` if the photo is already there and still exists.
    pub fn insert_photo(
        &self,
        identifier: &str,
        path: &str,
        filename: &str,
        created_at: DateTime<Utc>,
    ) -> Result<bool, LibraryError> {
        let changed = self.conn.execute(
            "INSERT INTO photos (identifier, path, filename, created_at, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(identifier) DO UPDATE SET
                 path = excluded.path,
                 filename = excluded.filename,
                 created_at = excluded.created_at,
                 imported_at = excluded.imported_at,
                 file_status = 'exists'
             WHERE file_status = 'deleted'",
            params![
                identifier,
                path,
                filename,
                created_at.timestamp(),
                Utc::now().timestamp()
            ],
        )?;

        Ok(changed > 0)
    }

    /// Get all existing photos ordered by creation time (oldest first)
    pub fn all_photos(&self) -> Result<Vec<Photo>, LibraryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, identifier, path, filename, created_at, file_status
             FROM photos
             WHERE file_status = 'exists'
             ORDER BY created_at ASC, identifier ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut photos = Vec::new();
        for row in rows {
            let (id, identifier, path, filename, created_at, file_status) = row?;
            let created_at = DateTime::<Utc>::from_timestamp(created_at, 0)
                .ok_or_else(|| LibraryError::InvalidTimestamp(created_at, identifier.clone()))?;
            photos.push(Photo {
                id,
                identifier,
                path,
                filename,
                created_at,
                file_status,
            });
        }

        Ok(photos)
    }

    /// Snapshot the catalog as an ordered index
    pub fn load_index(&self) -> Result<OrderedItemIndex, LibraryError> {
        let photos = self.all_photos()?;
        Ok(OrderedItemIndex::from_items(
            photos.into_iter().map(|p| (p.identifier, p.created_at)),
        ))
    }

    /// Verify that photo files still exist on disk.
    /// Mark as 'deleted' if the file is missing.
    pub fn verify_files(&self) -> Result<usize, LibraryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, path FROM photos WHERE file_status = 'exists'")?;

        let existing: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        let mut deleted_count = 0;
        for (id, file_path) in existing {
            if !Path::new(&file_path).exists() {
                self.conn.execute(
                    "UPDATE photos SET file_status = 'deleted' WHERE id = ?1",
                    params![id],
                )?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            warn!(deleted_count, "marked missing photos as deleted");
        }

        Ok(deleted_count)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}
