use crate::entry::{from_store, WallpaperEntry};
use crate::store::{ConfigStore, StoreKeys};
use crate::Result;

/// Makes `entry` the active wallpaper: path first, then the scaling option.
///
/// The dark-style path key is not known to every shell version, so a failed
/// write there is only logged.
pub fn apply_wallpaper<S: ConfigStore + ?Sized>(
    store: &mut S,
    keys: &StoreKeys,
    entry: &WallpaperEntry,
) -> Result<()> {
    let path_value = keys.path_encoding.encode(&entry.file_path);

    store.set(&keys.filename_key, &path_value)?;
    if let Some(dark_key) = &keys.dark_filename_key {
        if let Err(e) = store.set(dark_key, &path_value) {
            log::warn!("Could not set {}: {}", dark_key, e);
        }
    }
    store.set(&keys.options_key, &entry.display_option)?;

    log::info!("Switched to {}", entry);
    Ok(())
}

/// The wallpaper the store currently holds.
pub fn read_active<S: ConfigStore + ?Sized>(store: &S, keys: &StoreKeys) -> Result<WallpaperEntry> {
    from_store(store, keys)
}
