use rand::seq::SliceRandom;
use rand::Rng;

use crate::entry::{from_catalog_record, CatalogRecord, WallpaperEntry};
use crate::error::SelectionError;
use crate::Result;

/// Keeps the records that can be applied, in catalog order.
pub fn filter_valid(records: &[CatalogRecord]) -> Vec<WallpaperEntry> {
    let entries: Vec<WallpaperEntry> = records.iter().filter_map(from_catalog_record).collect();

    let skipped = records.len() - entries.len();
    if skipped > 0 {
        log::debug!("Skipped {} deleted or empty catalog records", skipped);
    }
    entries
}

/// Picks one entry with equal probability for each.
pub fn choose_random<'a, R: Rng + ?Sized>(
    entries: &'a [WallpaperEntry],
    rng: &mut R,
) -> Result<&'a WallpaperEntry> {
    let entry = entries.choose(rng).ok_or(SelectionError::Empty)?;
    log::debug!("Chose {} out of {} entries", entry, entries.len());
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DeletedFlag;
    use crate::WallshufError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(deleted: impl Into<DeletedFlag>, filename: &str, options: &str) -> CatalogRecord {
        CatalogRecord {
            deleted: deleted.into(),
            name: None,
            filename: filename.to_string(),
            options: options.to_string(),
        }
    }

    fn entries(n: usize) -> Vec<WallpaperEntry> {
        (0..n)
            .map(|i| WallpaperEntry::new(format!("/pics/{}.jpg", i), "zoom"))
            .collect()
    }

    #[test]
    fn test_filter_valid_scenario() {
        let records = vec![
            record(true, "a.jpg", ""),
            record(false, "(none)", ""),
            record(false, "b.jpg", "zoom"),
        ];

        let valid = filter_valid(&records);
        assert_eq!(valid, vec![WallpaperEntry::new("b.jpg", "zoom")]);

        // A single candidate is always the one chosen
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            assert_eq!(choose_random(&valid, &mut rng).unwrap(), &valid[0]);
        }
    }

    #[test]
    fn test_filter_valid_keeps_order_and_invariants() {
        let records = vec![
            record("false", "/pics/1.jpg", "zoom"),
            record("true", "/pics/2.jpg", "zoom"),
            record(false, "", "zoom"),
            record("no", "/pics/3.jpg", "centered"),
            record(DeletedFlag::default(), "/pics/4.jpg", "scaled"),
        ];

        let valid = filter_valid(&records);
        let paths: Vec<&str> = valid.iter().map(|e| e.file_path.as_str()).collect();
        assert_eq!(paths, ["/pics/1.jpg", "/pics/3.jpg", "/pics/4.jpg"]);

        for entry in &valid {
            assert!(!entry.file_path.is_empty());
            assert_ne!(entry.file_path, "(none)");
        }
    }

    #[test]
    fn test_filter_valid_nothing_valid() {
        assert!(filter_valid(&[]).is_empty());
        assert!(filter_valid(&[record(true, "a.jpg", "zoom"), record(false, "(none)", "")]).is_empty());
    }

    #[test]
    fn test_choose_random_empty() {
        let mut rng = StdRng::seed_from_u64(7);

        match choose_random(&[], &mut rng) {
            Err(WallshufError::Selection(SelectionError::Empty)) => {}
            other => panic!("Expected SelectionError::Empty, got {:?}", other),
        }
    }

    #[test]
    fn test_choose_random_seeded_is_deterministic() {
        let candidates = entries(10);

        let picks = |seed: u64| -> Vec<WallpaperEntry> {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..25)
                .map(|_| choose_random(&candidates, &mut rng).unwrap().clone())
                .collect()
        };

        assert_eq!(picks(42), picks(42));
    }

    #[test]
    fn test_choose_random_is_uniform() {
        let candidates = entries(3);
        let draws = 3000;
        let mut counts = [0usize; 3];

        let mut rng = rand::thread_rng();
        for _ in 0..draws {
            let entry = choose_random(&candidates, &mut rng).unwrap();
            let index = candidates.iter().position(|c| c == entry).unwrap();
            counts[index] += 1;
        }

        let expected = draws as f64 / 3.0;
        let chi_squared: f64 = counts
            .iter()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();

        // Critical value for 2 degrees of freedom at p = 0.001
        assert!(
            chi_squared < 13.816,
            "distribution {:?} rejected as non-uniform (chi^2 = {})",
            counts,
            chi_squared
        );
    }
}
