//! Conformance browsing session
//!
//! Wires the pieces together the way the results page does: the current
//! state is whatever the history points at, every action goes through the
//! [`Navigator`] into the history, and every new state is handed to the
//! [`Reconciler`], which fetches or re-resolves as needed.

mod render;

pub use render::render_view;

use crate::config::ExplorerConfig;
use crate::error::{Error, Result};
use crate::navigation::{
    ConformanceState, FilterOption, HistoryEntry, MemoryHistory, NavigationSink, Navigator, SortOption,
};
use crate::reconcile::{CurrentSuite, Reconciler};
use crate::results::ResultFetcher;

/// A navigation history plus the results it points into
pub struct Session<F> {
    config: ExplorerConfig,
    navigator: Navigator<MemoryHistory>,
    reconciler: Reconciler,
    fetcher: F,
}

impl<F: ResultFetcher> Session<F> {
    pub fn new(config: ExplorerConfig, fetcher: F) -> Self {
        Self {
            config,
            navigator: Navigator::new(MemoryHistory::new()),
            reconciler: Reconciler::new(),
            fetcher,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn history(&self) -> &MemoryHistory {
        self.navigator.sink()
    }

    /// State under the history cursor
    pub fn state(&self) -> Option<&ConformanceState> {
        self.history().current().map(|entry| &entry.state)
    }

    /// Most recently published suite view
    pub fn current(&self) -> Option<&CurrentSuite> {
        self.reconciler.current()
    }

    /// Link into the upstream test262 tree for the current location
    pub fn source_url(&self) -> Option<String> {
        self.reconciler.source_url(&self.config.test262_repo_url)
    }

    /// Start from `state` as the first history entry
    pub async fn open(&mut self, state: ConformanceState) -> Result<Option<CurrentSuite>> {
        let entry = HistoryEntry::new(state.search(), state.clone());
        self.navigator.sink_mut().push(entry);
        self.sync(state).await
    }

    /// Start at the configured initial version
    pub async fn open_default(&mut self) -> Result<Option<CurrentSuite>> {
        let version = self.config.initial_version()?.clone();
        let state = self.config.initial_state(&version);
        self.open(state).await
    }

    fn require_state(&self) -> Result<ConformanceState> {
        self.state().cloned().ok_or(Error::NotLoaded)
    }

    async fn sync(&mut self, state: ConformanceState) -> Result<Option<CurrentSuite>> {
        self.reconciler.reconcile(&state, &self.fetcher).await
    }

    pub async fn navigate_to_suite(&mut self, suite_name: &str) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.navigate_to_suite(&current, suite_name);
        self.sync(next).await
    }

    pub async fn slice_nav_to_index(&mut self, non_inclusive_index: usize) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.slice_nav_to_index(&current, non_inclusive_index);
        self.sync(next).await
    }

    /// Go up `levels` suites, never above the root. An empty path goes back
    /// to the root of the current version.
    pub async fn ascend(&mut self, levels: usize) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        if current.test_path.is_empty() {
            let next = self.navigator.switch_version(&current, current.version.clone());
            return self.sync(next).await;
        }
        let depth = current.test_path.len();
        self.slice_nav_to_index(depth.saturating_sub(levels).max(1)).await
    }

    pub async fn set_ecmascript_flag(&mut self, flag: Option<&str>) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.set_ecmascript_flag(&current, flag);
        self.sync(next).await
    }

    pub async fn set_sort_option(&mut self, option: SortOption) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.set_sort_option(&current, option);
        self.sync(next).await
    }

    pub async fn set_filter_option(&mut self, option: FilterOption) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.set_filter_option(&current, option);
        self.sync(next).await
    }

    pub async fn set_selected_test(&mut self, test: Option<&str>) -> Result<Option<CurrentSuite>> {
        let current = self.require_state()?;
        let next = self.navigator.set_selected_test(&current, test);
        self.sync(next).await
    }

    pub async fn switch_version(&mut self, tag: &str) -> Result<Option<CurrentSuite>> {
        let version = self.config.version(tag)?.clone();
        let current = self.require_state()?;
        let next = self.navigator.switch_version(&current, version);
        self.sync(next).await
    }

    /// Step back in history; `Ok(None)` at the first entry
    pub async fn back(&mut self) -> Result<Option<CurrentSuite>> {
        match self.navigator.sink_mut().back() {
            Some(entry) => {
                let state = entry.state.clone();
                self.sync(state).await
            }
            None => Ok(None),
        }
    }

    /// Step forward in history; `Ok(None)` at the last entry
    pub async fn forward(&mut self) -> Result<Option<CurrentSuite>> {
        match self.navigator.sink_mut().forward() {
            Some(entry) => {
                let state = entry.state.clone();
                self.sync(state).await
            }
            None => Ok(None),
        }
    }
}
