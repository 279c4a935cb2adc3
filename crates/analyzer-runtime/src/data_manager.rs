//! Lazily-loaded canonical dataset with raw-data fallback.
//!
//! [`DataManager`] owns the single in-memory copy of the canonical dataset.
//! The first query loads it from the canonical file, or, when that file is
//! missing, runs the raw processing pipeline and persists the result. The
//! loaded dataset is then shared read-only by every later query until
//! [`DataManager::reset`] or [`DataManager::reprocess`] is called.
//!
//! Loading happens while the state mutex is held, so concurrent first
//! queries trigger exactly one load.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{ActivityRecord, Dataset};
use analyzer_core::settings::StorePaths;
use analyzer_data::aggregator::{
    ActivityAggregator, ActivityStats, CadenceData, EfficiencyData, MonthlyVolume, PaceSeries,
    WeeklyVolume,
};
use analyzer_data::pipeline::{process_raw_data, ProcessingReport};
use analyzer_data::store;

// ── Load state ────────────────────────────────────────────────────────────────

/// Cache contents guarded by the state mutex.
#[derive(Debug)]
enum LoadState {
    Unloaded,
    Loaded(Arc<Dataset>),
    /// Last load failed; the next query retries.
    Failed,
}

/// Observable lifecycle of the cached dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Unloaded,
    /// A lazy load or reprocess is running.
    Loading,
    Loaded,
    Failed,
}

// ── DataManager ───────────────────────────────────────────────────────────────

/// Owner of the canonical dataset and entry point for every view.
///
/// # Example
/// ```no_run
/// use analyzer_core::settings::StorePaths;
/// use analyzer_runtime::data_manager::DataManager;
///
/// let mgr = DataManager::new(StorePaths::default());
/// let stats = mgr.get_stats().expect("data available");
/// println!("total runs: {}", stats.total_runs);
/// ```
#[derive(Debug)]
pub struct DataManager {
    paths: StorePaths,
    /// Held for the whole duration of a load or reprocess.
    state: Mutex<LoadState>,
    /// Only ever held briefly, so readers never wait on a load.
    phase: Mutex<LoadPhase>,
    last_error: Mutex<Option<String>>,
}

impl DataManager {
    pub fn new(paths: StorePaths) -> Self {
        Self {
            paths,
            state: Mutex::new(LoadState::Unloaded),
            phase: Mutex::new(LoadPhase::Unloaded),
            last_error: Mutex::new(None),
        }
    }

    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Current phase without blocking on an in-flight load.
    ///
    /// `Loading` is reported only while a lazy load or a reprocess runs,
    /// not while another thread merely reads the cached dataset.
    pub fn phase(&self) -> LoadPhase {
        *lock(&self.phase)
    }

    /// Message of the last failed load or reprocess, cleared by a
    /// successful one.
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    /// Return the cached dataset, loading it first if needed.
    ///
    /// Canonical-file errors are returned unchanged. When the canonical file
    /// is missing and the raw fallback fails too, the cause is wrapped in
    /// [`AnalyzerError::DataUnavailable`].
    pub fn dataset(&self) -> Result<Arc<Dataset>> {
        let mut state = lock(&self.state);
        if let LoadState::Loaded(dataset) = &*state {
            return Ok(Arc::clone(dataset));
        }

        tracing::debug!("canonical dataset not cached; loading");
        self.set_phase(LoadPhase::Loading);
        match self.load_or_process() {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                tracing::debug!(runs = dataset.len(), "dataset cached");
                *state = LoadState::Loaded(Arc::clone(&dataset));
                self.finish(LoadPhase::Loaded, None);
                Ok(dataset)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dataset load failed");
                *state = LoadState::Failed;
                self.finish(LoadPhase::Failed, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Rebuild the canonical file from the raw export and replace the cache.
    ///
    /// On failure the previous cache, if any, is kept and the error is
    /// recorded in [`DataManager::last_error`].
    pub fn reprocess(&self) -> Result<ProcessingReport> {
        let mut state = lock(&self.state);
        let previous = Self::phase_of(&state);
        self.set_phase(LoadPhase::Loading);

        match process_raw_data(&self.paths.raw, &self.paths.canonical) {
            Ok(result) => {
                *state = LoadState::Loaded(Arc::new(result.dataset));
                self.finish(LoadPhase::Loaded, None);
                Ok(result.report)
            }
            Err(e) => {
                tracing::warn!(error = %e, "reprocess failed; keeping cached data");
                self.finish(previous, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Drop the cached dataset and any recorded error; the next query loads
    /// again.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        *state = LoadState::Unloaded;
        self.finish(LoadPhase::Unloaded, None);
        tracing::debug!("dataset cache reset");
    }

    // ── Views ─────────────────────────────────────────────────────────────

    pub fn get_stats(&self) -> Result<ActivityStats> {
        Ok(ActivityAggregator::stats(&*self.dataset()?))
    }

    pub fn get_latest_activities(&self, limit: usize) -> Result<Vec<ActivityRecord>> {
        Ok(ActivityAggregator::latest_activities(&*self.dataset()?, limit))
    }

    pub fn get_pace_data(&self) -> Result<PaceSeries> {
        Ok(ActivityAggregator::pace_series(&*self.dataset()?))
    }

    pub fn get_volume_data(&self) -> Result<WeeklyVolume> {
        Ok(ActivityAggregator::weekly_volume(&*self.dataset()?))
    }

    pub fn get_monthly_volume(&self) -> Result<MonthlyVolume> {
        Ok(ActivityAggregator::monthly_volume(&*self.dataset()?))
    }

    pub fn get_efficiency_data(&self) -> Result<EfficiencyData> {
        Ok(ActivityAggregator::efficiency(&*self.dataset()?))
    }

    pub fn get_cadence_data(&self) -> Result<CadenceData> {
        Ok(ActivityAggregator::cadence(&*self.dataset()?))
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn set_phase(&self, phase: LoadPhase) {
        *lock(&self.phase) = phase;
    }

    fn finish(&self, phase: LoadPhase, error: Option<String>) {
        *lock(&self.last_error) = error;
        self.set_phase(phase);
    }

    fn phase_of(state: &LoadState) -> LoadPhase {
        match state {
            LoadState::Unloaded => LoadPhase::Unloaded,
            LoadState::Loaded(_) => LoadPhase::Loaded,
            LoadState::Failed => LoadPhase::Failed,
        }
    }

    fn load_or_process(&self) -> Result<Dataset> {
        let canonical = &self.paths.canonical;
        if canonical.exists() {
            return store::load(canonical);
        }

        tracing::warn!(
            "processed file not found at {}; running raw data processing",
            canonical.display()
        );
        process_raw_data(&self.paths.raw, canonical)
            .map(|result| result.dataset)
            .map_err(|source| AnalyzerError::DataUnavailable {
                path: canonical.clone(),
                source: Box::new(source),
            })
    }
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
