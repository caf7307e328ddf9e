use serde::Serialize;

use crate::store::{ConfigStore, StoreKeys};
use crate::Result;

/// Filename values the Appearance dialog writes for "no picture".
const EMPTY_FILENAMES: [&str; 2] = ["", "(none)"];

/// One selectable wallpaper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WallpaperEntry {
    pub display_name: Option<String>,
    pub file_path: String,
    pub display_option: String,
}

impl WallpaperEntry {
    pub fn new(file_path: impl Into<String>, display_option: impl Into<String>) -> Self {
        Self {
            display_name: None,
            file_path: file_path.into(),
            display_option: display_option.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

impl std::fmt::Display for WallpaperEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wallpaper [{}, {}]", self.file_path, self.display_option)
    }
}

/// The `deleted` marker of a catalog record.
///
/// Catalogs in the wild carry this either as a real boolean or as the text
/// `"true"`/`"false"`, so both are kept as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletedFlag {
    Bool(bool),
    Text(String),
}

impl DeletedFlag {
    /// Only `true` and the exact text `"true"` count as deleted.
    pub fn is_set(&self) -> bool {
        match self {
            DeletedFlag::Bool(value) => *value,
            DeletedFlag::Text(text) => text == "true",
        }
    }
}

impl Default for DeletedFlag {
    fn default() -> Self {
        DeletedFlag::Bool(false)
    }
}

impl From<bool> for DeletedFlag {
    fn from(value: bool) -> Self {
        DeletedFlag::Bool(value)
    }
}

impl From<&str> for DeletedFlag {
    fn from(value: &str) -> Self {
        DeletedFlag::Text(value.to_string())
    }
}

/// One `<wallpaper>` record exactly as it appears in the catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRecord {
    pub deleted: DeletedFlag,
    pub name: Option<String>,
    pub filename: String,
    pub options: String,
}

impl CatalogRecord {
    pub fn is_selectable(&self) -> bool {
        !self.deleted.is_set() && !EMPTY_FILENAMES.contains(&self.filename.as_str())
    }
}

/// Builds an entry from a catalog record, or `None` if the record is deleted
/// or has no picture.
pub fn from_catalog_record(record: &CatalogRecord) -> Option<WallpaperEntry> {
    if !record.is_selectable() {
        return None;
    }

    Some(WallpaperEntry {
        display_name: record.name.clone(),
        file_path: record.filename.clone(),
        display_option: record.options.clone(),
    })
}

/// Builds an entry from the wallpaper currently held by the store.
pub fn from_store<S: ConfigStore + ?Sized>(store: &S, keys: &StoreKeys) -> Result<WallpaperEntry> {
    let raw_path = store.get(&keys.filename_key)?;
    let options = store.get(&keys.options_key)?;

    Ok(WallpaperEntry::new(
        keys.path_encoding.decode(&raw_path),
        options,
    ))
}
