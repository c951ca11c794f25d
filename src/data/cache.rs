use std::time::{Duration, Instant};

use super::loader::{self, DataSource};
use super::model::Dataset;
use super::normalize::normalize_columns;
use crate::error::Result;

/// A loaded snapshot and when it was taken.
struct Snapshot {
    dataset: Dataset,
    loaded_at: Instant,
}

/// Owner of the single in-memory dataset snapshot.
///
/// The first `get` loads from the configured source; later calls return the
/// same snapshot until `refresh` or `set_source` invalidates it. Failed loads
/// are not remembered, so the next `get` tries again.
pub struct DatasetCache {
    source: DataSource,
    timeout: Duration,
    snapshot: Option<Snapshot>,
    loader: Box<dyn Fn(&DataSource, Duration) -> Result<Dataset>>,
}

impl DatasetCache {
    pub fn new(source: DataSource, timeout: Duration) -> Self {
        Self::with_loader(source, timeout, loader::load)
    }

    /// Build a cache around a custom load function.
    pub fn with_loader(
        source: DataSource,
        timeout: Duration,
        load: impl Fn(&DataSource, Duration) -> Result<Dataset> + 'static,
    ) -> Self {
        Self {
            source,
            timeout,
            snapshot: None,
            loader: Box::new(load),
        }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Return the cached snapshot, loading it first if needed.
    ///
    /// The snapshot carries normalized column names.
    pub fn get(&mut self) -> Result<&Dataset> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => {
                log::debug!("Using cached dataset from {}", self.source);
                snapshot
            }
            None => {
                let raw = (self.loader)(&self.source, self.timeout)?;
                Snapshot {
                    dataset: normalize_columns(&raw),
                    loaded_at: Instant::now(),
                }
            }
        };
        Ok(&self.snapshot.insert(snapshot).dataset)
    }

    /// The snapshot, if one is loaded. Never triggers a load.
    pub fn peek(&self) -> Option<&Dataset> {
        self.snapshot.as_ref().map(|s| &s.dataset)
    }

    /// Drop the snapshot and load again from the current source.
    pub fn refresh(&mut self) -> Result<&Dataset> {
        log::info!("Refreshing dataset from {}", self.source);
        self.snapshot = None;
        self.get()
    }

    /// Point the cache at a new source. The old snapshot is discarded.
    pub fn set_source(&mut self, source: DataSource) {
        self.source = source;
        self.snapshot = None;
    }

    /// When the current snapshot was loaded.
    pub fn loaded_at(&self) -> Option<Instant> {
        self.snapshot.as_ref().map(|s| s.loaded_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;
    use crate::error::DataError;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_cache(fail: bool) -> (DatasetCache, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let cache = DatasetCache::with_loader(
            DataSource::Url("https://example.invalid/sleep.csv".into()),
            Duration::from_secs(1),
            move |source, _| {
                counter.set(counter.get() + 1);
                if fail {
                    return Err(DataError::DataUnavailable {
                        locator: source.to_string(),
                        reason: "offline".into(),
                    });
                }
                Ok(Dataset::new(vec![" Age ".into()], vec![vec![Value::Integer(30)]]).unwrap())
            },
        );
        (cache, calls)
    }

    #[test]
    fn loads_once_and_normalizes() {
        let (mut cache, calls) = counting_cache(false);
        assert!(cache.peek().is_none());
        assert_eq!(cache.get().unwrap().columns(), ["age"]);
        cache.get().unwrap();
        assert_eq!(calls.get(), 1);
        assert!(cache.loaded_at().is_some());
    }

    #[test]
    fn refresh_reloads() {
        let (mut cache, calls) = counting_cache(false);
        cache.get().unwrap();
        cache.refresh().unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn failures_are_not_cached() {
        let (mut cache, calls) = counting_cache(true);
        assert!(cache.get().is_err());
        assert!(cache.get().is_err());
        assert_eq!(calls.get(), 2);
        assert!(cache.peek().is_none());
    }

    #[test]
    fn set_source_invalidates() {
        let (mut cache, calls) = counting_cache(false);
        cache.get().unwrap();
        cache.set_source(DataSource::parse("local.csv"));
        assert!(cache.peek().is_none());
        cache.get().unwrap();
        assert_eq!(calls.get(), 2);
    }
}
