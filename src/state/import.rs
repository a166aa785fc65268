/// Folder import into the photo catalog
///
/// Walks a folder tree, picks out photo files by extension and records
/// each one with its creation time. The file path doubles as the photo's
/// identifier.
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::library::Library;
use crate::error::LibraryError;

/// Supported photo extensions (common compressed and RAW formats)
const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "heic", "heif", "tif", "tiff", "webp", "nef", "dng", "cr2", "cr3", "arw",
    "raf", "orf", "rw2", "pef", "srw",
];

/// Result of a folder import operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
}

/// True if `path` looks like a photo we can index
pub fn is_photo(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| PHOTO_EXTENSIONS.contains(&ext.as_str()))
}

/// Import all photos under `folder` into `library`.
/// Photos already in the catalog are counted as skipped; photos that were
/// marked deleted come back as imported. Unreadable entries are skipped.
pub fn import_folder(library: &Library, folder: &Path) -> Result<ImportResult, LibraryError> {
    let mut result = ImportResult::default();
    info!(folder = %folder.display(), "scanning folder");

    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_photo(path) {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                warn!(path = %path.display(), %err, "skipping photo with unreadable metadata");
                continue;
            }
        };
        let created_at: DateTime<Utc> = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map(DateTime::from)
            .unwrap_or_else(|_| Utc::now());

        let identifier = path.to_string_lossy();
        let filename = entry.file_name().to_string_lossy();
        if library.insert_photo(&identifier, &identifier, &filename, created_at)? {
            result.imported += 1;
            if result.imported % 100 == 0 {
                debug!(imported = result.imported, "import progress");
            }
        } else {
            result.skipped += 1;
        }
    }

    info!(
        imported = result.imported,
        skipped = result.skipped,
        "import complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_photo() {
        assert!(is_photo(Path::new("a/IMG_0001.JPG")));
        assert!(is_photo(Path::new("b.dng")));
        assert!(!is_photo(Path::new("notes.txt")));
        assert!(!is_photo(Path::new("no_extension")));
    }

    #[test]
    fn test_import_walks_tree_and_skips_duplicates() {
        let dir = tempfile::TempDir::new().unwrap();
        let nested = dir.path().join("2016").join("june");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.jpg"), b"a").unwrap();
        fs::write(nested.join("b.HEIC"), b"b").unwrap();
        fs::write(nested.join("readme.md"), b"c").unwrap();

        let library = Library::open_in_memory().unwrap();

        let first = import_folder(&library, dir.path()).unwrap();
        assert_eq!(first, ImportResult { imported: 2, skipped: 0 });

        let second = import_folder(&library, dir.path()).unwrap();
        assert_eq!(second, ImportResult { imported: 0, skipped: 2 });

        assert_eq!(library.load_index().unwrap().count(), 2);
    }

    #[test]
    fn test_reimport_restores_deleted_photo() {
        let dir = tempfile::TempDir::new().unwrap();
        let photo = dir.path().join("a.jpg");
        fs::write(&photo, b"a").unwrap();

        let library = Library::open_in_memory().unwrap();
        import_folder(&library, dir.path()).unwrap();

        fs::remove_file(&photo).unwrap();
        assert_eq!(library.verify_files().unwrap(), 1);
        assert_eq!(library.photo_count().unwrap(), 0);

        fs::write(&photo, b"a").unwrap();
        let result = import_folder(&library, dir.path()).unwrap();
        assert_eq!(result, ImportResult { imported: 1, skipped: 0 });
        assert_eq!(library.photo_count().unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_does_not_abort_import() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("good.jpg"), b"a").unwrap();
        std::os::unix::fs::symlink(dir.path().join("missing.jpg"), dir.path().join("broken.jpg"))
            .unwrap();

        let library = Library::open_in_memory().unwrap();
        let result = import_folder(&library, dir.path()).unwrap();

        assert_eq!(result.imported, 1);
        assert_eq!(library.photo_count().unwrap(), 1);
    }
}
