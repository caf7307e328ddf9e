use std::path::Path;

use rand::Rng;

use crate::entry::WallpaperEntry;
use crate::store::{ConfigStore, StoreKeys};
use crate::{catalog, selector, wallpaper, Result};

/// Valid entries of the catalog at `catalog_path`.
pub fn candidates(catalog_path: &Path) -> Result<Vec<WallpaperEntry>> {
    let records = catalog::parse(catalog_path)?;
    Ok(selector::filter_valid(&records))
}

/// Applies a random wallpaper and returns it.
///
/// `explicit` replaces the catalog as the candidate list when given. The
/// currently active wallpaper may be picked again.
pub fn run<S, R>(
    explicit: Option<Vec<WallpaperEntry>>,
    catalog_path: &Path,
    store: &mut S,
    keys: &StoreKeys,
    rng: &mut R,
) -> Result<WallpaperEntry>
where
    S: ConfigStore + ?Sized,
    R: Rng + ?Sized,
{
    let entries = match explicit {
        Some(entries) => entries,
        None => candidates(catalog_path)?,
    };

    println!("Selecting random wallpaper from {} choices.", entries.len());
    log::info!("{} wallpaper candidates", entries.len());

    let chosen = selector::choose_random(&entries, rng)?.clone();
    wallpaper::apply_wallpaper(store, keys, &chosen)?;
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, SelectionError, StoreError};
    use crate::store::{Backend, CommandStore, MemoryStore};
    use crate::WallshufError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use tempfile::tempdir;

    const SCENARIO: &str = r#"<wallpapers>
  <wallpaper deleted="true">
    <name>A</name>
    <filename>a.jpg</filename>
    <options>centered</options>
  </wallpaper>
  <wallpaper deleted="false">
    <name>None</name>
    <filename>(none)</filename>
    <options>wallpaper</options>
  </wallpaper>
  <wallpaper deleted="false">
    <name>B</name>
    <filename>b.jpg</filename>
    <options>zoom</options>
  </wallpaper>
</wallpapers>"#;

    fn keys() -> StoreKeys {
        StoreKeys::for_backend(Backend::Gconf)
    }

    #[test]
    fn test_run_scenario_catalog() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("backgrounds.xml");
        fs::write(&path, SCENARIO).unwrap();

        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);
        let chosen = run(None, &path, &mut store, &keys(), &mut rng).unwrap();

        assert_eq!(chosen.file_path, "b.jpg");
        assert_eq!(chosen.display_option, "zoom");
        assert_eq!(store.get("picture_filename").unwrap(), "b.jpg");
        assert_eq!(store.get("picture_options").unwrap(), "zoom");
    }

    #[test]
    fn test_run_empty_catalog_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("backgrounds.xml");
        fs::write(&path, "<wallpapers></wallpapers>").unwrap();

        let mut store = MemoryStore::new();
        let result = run(None, &path, &mut store, &keys(), &mut rand::thread_rng());

        assert!(matches!(
            result,
            Err(WallshufError::Selection(SelectionError::Empty))
        ));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_run_missing_catalog() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("backgrounds.xml");

        let mut store = MemoryStore::new();
        let result = run(None, &path, &mut store, &keys(), &mut rand::thread_rng());

        assert!(matches!(
            result,
            Err(WallshufError::Catalog(CatalogError::NotFound { .. }))
        ));
        assert!(store.writes().is_empty());
    }

    fn unreachable_store() -> CommandStore {
        CommandStore::with_tool_path(
            Backend::Gsettings,
            "org.gnome.desktop.background",
            "/nonexistent/bin/gsettings".into(),
        )
    }

    #[test]
    fn test_catalog_errors_win_over_unreachable_store() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("backgrounds.xml");
        let keys = StoreKeys::for_backend(Backend::Gsettings);

        let result = run(None, &missing, &mut unreachable_store(), &keys, &mut rand::thread_rng());
        assert!(matches!(
            result,
            Err(WallshufError::Catalog(CatalogError::NotFound { .. }))
        ));

        let empty = temp_dir.path().join("empty.xml");
        fs::write(&empty, "<wallpapers></wallpapers>").unwrap();

        let result = run(None, &empty, &mut unreachable_store(), &keys, &mut rand::thread_rng());
        assert!(matches!(
            result,
            Err(WallshufError::Selection(SelectionError::Empty))
        ));
    }

    #[test]
    fn test_unreachable_store_fails_after_selection() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("backgrounds.xml");
        fs::write(&path, SCENARIO).unwrap();
        let keys = StoreKeys::for_backend(Backend::Gsettings);

        let result = run(None, &path, &mut unreachable_store(), &keys, &mut rand::thread_rng());

        assert!(matches!(
            result,
            Err(WallshufError::Store(StoreError::Unavailable { .. }))
        ));
    }

    #[test]
    fn test_run_explicit_entries_skip_catalog() {
        let missing = Path::new("/nonexistent/backgrounds.xml");
        let explicit = vec![
            WallpaperEntry::new("/pics/1.jpg", "zoom"),
            WallpaperEntry::new("/pics/2.jpg", "scaled"),
        ];

        let mut store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(99);
        let chosen = run(Some(explicit.clone()), missing, &mut store, &keys(), &mut rng).unwrap();

        assert!(explicit.contains(&chosen));
        assert_eq!(store.writes().len(), 2);
    }

    #[test]
    fn test_run_explicit_empty_is_empty_selection() {
        let mut store = MemoryStore::new();
        let result = run(
            Some(Vec::new()),
            Path::new("/nonexistent/backgrounds.xml"),
            &mut store,
            &keys(),
            &mut rand::thread_rng(),
        );

        assert!(matches!(
            result,
            Err(WallshufError::Selection(SelectionError::Empty))
        ));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn test_candidates_malformed_catalog() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("backgrounds.xml");
        fs::write(&path, "<wallpapers><wallpaper>").unwrap();

        assert!(matches!(
            candidates(&path),
            Err(WallshufError::Catalog(CatalogError::Parse { .. }))
        ));
    }
}
