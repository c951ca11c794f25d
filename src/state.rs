use std::path::PathBuf;

use sleep_dash::config::DashboardConfig;
use sleep_dash::{DataError, DataSource, Dataset, DatasetCache};

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Demographics,
    Comparison,
    Correlation,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Demographics, Page::Comparison, Page::Correlation];

    pub fn title(self) -> &'static str {
        match self {
            Page::Demographics => "Objective 1",
            Page::Comparison => "Objective 2",
            Page::Correlation => "Objective 3",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Page::Demographics => "Population by gender, age and occupation",
            Page::Comparison => "Quality of sleep across attributes",
            Page::Correlation => "Correlation and distributions",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Owner of the loaded dataset snapshot.
    pub cache: DatasetCache,

    /// Page shown in the central panel.
    pub page: Page,

    /// Failure of the most recent load, shown instead of the data views.
    pub load_error: Option<DataError>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let cache = DatasetCache::new(config.source.clone(), config.fetch_timeout);
        Self {
            config,
            cache,
            page: Page::Demographics,
            load_error: None,
        }
    }

    /// The loaded dataset, if any. Never triggers a load.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.cache.peek()
    }

    /// Load the dataset if it is not loaded yet.
    pub fn ensure_loaded(&mut self) {
        let result = self.cache.get().map(|_| ());
        self.record(result);
    }

    /// Reload from the current source.
    pub fn reload(&mut self) {
        let result = self.cache.refresh().map(|_| ());
        self.record(result);
    }

    /// Switch to a local file and load it.
    pub fn open_path(&mut self, path: PathBuf) {
        self.cache.set_source(DataSource::Path(path));
        self.ensure_loaded();
    }

    fn record(&mut self, result: Result<(), DataError>) {
        match result {
            Ok(()) => {
                if let Some(ds) = self.cache.peek() {
                    log::info!(
                        "Dataset ready: {} rows, columns {:?}",
                        ds.len(),
                        ds.columns()
                    );
                }
                self.load_error = None;
            }
            Err(e) => {
                log::error!("{e}");
                self.load_error = Some(e);
            }
        }
    }
}
