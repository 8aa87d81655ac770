//! Bulk-fill timing.
//!
//! Every synthetic key is unique, so once the store is full each touch is a
//! miss followed by an eviction. The lookup timing is a single index probe
//! for a key that is guaranteed to still be resident.

use anyhow::{bail, Result};
use lru_store::LruStore;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::debug;

/// Timings gathered by [`run`].
#[derive(Debug, Clone)]
pub struct BenchReport {
    /// Number of keys touched.
    pub size: usize,
    /// Wall time spent touching every key.
    pub fill: Duration,
    /// Wall time of one membership check.
    pub lookup: Duration,
}

/// Builds `size` keys of the form `Element{i}`.
pub fn generate_data_set(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("Element{i}")).collect()
}

/// Fills a store of `capacity` entries with `size` unique keys, then times a
/// lookup of a randomly chosen resident key.
pub fn run<R: Rng>(capacity: usize, size: usize, rng: &mut R) -> Result<BenchReport> {
    if size == 0 {
        bail!("data set is empty, nothing to benchmark");
    }
    // The store borrows its keys from the data set, so it must be dropped first.
    let data_set = generate_data_set(size);
    debug!(size, "generated data set");
    let mut store = LruStore::new(capacity)?;

    let start = Instant::now();
    for element in &data_set {
        store.touch(element.as_str(), ());
    }
    let fill = start.elapsed();

    // Only the most recent `capacity` keys survive the fill.
    let resident = store.len();
    let search = &data_set[size - 1 - rng.gen_range(0..resident)];

    let start = Instant::now();
    let found = store.contains(search.as_str());
    let lookup = start.elapsed();

    if !found {
        bail!("{search} should be resident after the fill but is missing");
    }

    Ok(BenchReport { size, fill, lookup })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_data_set() {
        assert_eq!(
            generate_data_set(3),
            ["Element0", "Element1", "Element2"]
        );
    }

    #[test]
    fn test_run_finds_resident_key() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let report = run(5, 100, &mut rng).unwrap();
            assert_eq!(report.size, 100);
        }
    }

    #[test]
    fn test_run_with_fewer_keys_than_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run(10, 3, &mut rng).is_ok());
    }

    #[test]
    fn test_run_rejects_empty_data_set() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run(5, 0, &mut rng).is_err());
    }

    #[test]
    fn test_run_rejects_zero_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(run(0, 10, &mut rng).is_err());
    }
}
