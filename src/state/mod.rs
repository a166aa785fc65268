/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The ordered item index (index.rs)
/// - The SQLite photo catalog and folder import (library.rs, import.rs)
/// - Persisted grid and preheat settings (settings.rs)
/// - Detail-view navigation (cursor.rs)

pub mod cursor;
pub mod data;
pub mod import;
pub mod index;
pub mod library;
pub mod settings;
