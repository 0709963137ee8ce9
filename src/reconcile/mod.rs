//! Reconciliation of navigation state with loaded results
//!
//! The [`Reconciler`] is the single owner of the loaded [`ResultInfo`] and of
//! the suite currently published to the presentation layer. It is told
//! about every state change and decides between two paths:
//!
//! - the state's version is the cached one: re-resolve the path against the
//!   cache synchronously and publish the result;
//! - the version differs: hand out a [`FetchTicket`]; the caller performs
//!   the fetch and reports back through [`Reconciler::complete`].
//!
//! Tickets carry a generation number. Only the newest ticket may replace
//! the cache, so a slow fetch for a version the user already left can never
//! overwrite the results of a later switch. While a fetch is in flight the
//! previously published suite stays current.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::navigation::ConformanceState;
use crate::resolver::{self, PathError, ResolvedPath};
use crate::results::{load_result_info, ResultFetcher, ResultInfo, SuiteResult, VersionItem};

/// The loaded results, or the explicit absence of them
#[derive(Debug, Clone, Default)]
pub enum ResultCache {
    #[default]
    Unloaded,
    Loaded(Arc<ResultInfo>),
}

impl ResultCache {
    pub fn get(&self) -> Option<&Arc<ResultInfo>> {
        match self {
            ResultCache::Unloaded => None,
            ResultCache::Loaded(info) => Some(info),
        }
    }

    /// Tag of the cached results
    pub fn version(&self) -> Option<&str> {
        self.get().map(|info| info.version.as_str())
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ResultCache::Loaded(_))
    }
}

/// The suite view published for one state
#[derive(Debug, Clone)]
pub struct CurrentSuite {
    results: Arc<ResultInfo>,
    resolution: std::result::Result<ResolvedPath, PathError>,
    state: ConformanceState,
}

impl CurrentSuite {
    fn new(results: Arc<ResultInfo>, state: ConformanceState) -> Self {
        let resolution = resolver::locate(&results, &state.test_path);
        if let Err(ref err) = resolution {
            tracing::warn!(path = ?state.test_path, error = %err, "test path does not resolve");
        }
        Self {
            results,
            resolution,
            state,
        }
    }

    /// The resolved suite; `None` means no suite is selected
    pub fn suite(&self) -> Option<&SuiteResult> {
        self.resolution.as_ref().ok().and_then(|p| p.suite(&self.results))
    }

    /// The resolved suite, or why the path does not name one
    pub fn require_suite(&self) -> Result<&SuiteResult> {
        let resolved = self.resolution.as_ref().map_err(|err| Error::Path(err.clone()))?;
        // locate only records indices it has just walked
        Ok(resolved.suite(&self.results).unwrap_or(&self.results.results))
    }

    pub fn resolution(&self) -> std::result::Result<&ResolvedPath, &PathError> {
        self.resolution.as_ref()
    }

    pub fn results(&self) -> &ResultInfo {
        &self.results
    }

    /// State this view was resolved for
    pub fn state(&self) -> &ConformanceState {
        &self.state
    }

    /// Upstream source path of the resolved location
    pub fn source_path(&self) -> String {
        resolver::source_path(&self.results, &self.state.test_path)
    }
}

/// Permission to replace the cache with the results of one fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    version: VersionItem,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Version to fetch
    pub fn version(&self) -> &VersionItem {
        &self.version
    }
}

/// What the reconciler decided for an observed state
#[derive(Debug, Clone)]
pub enum Reconciliation {
    /// Resolved against the cached results and published
    Resolved(CurrentSuite),
    /// The version changed; fetch it and call [`Reconciler::complete`]
    Fetch(FetchTicket),
    /// A fetch for this version is already in flight; its completion will
    /// resolve the latest observed state
    Pending,
}

/// Single owner of the result cache and the published suite
#[derive(Debug, Default)]
pub struct Reconciler {
    cache: ResultCache,
    latest: Option<ConformanceState>,
    current: Option<CurrentSuite>,
    generation: u64,
    pending: Option<FetchTicket>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Most recently published suite view
    pub fn current(&self) -> Option<&CurrentSuite> {
        self.current.as_ref()
    }

    /// Most recently observed state
    pub fn latest_state(&self) -> Option<&ConformanceState> {
        self.latest.as_ref()
    }

    /// Whether a fetch is in flight
    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    /// React to a state change
    pub fn observe(&mut self, state: &ConformanceState) -> Reconciliation {
        self.latest = Some(state.clone());
        let tag = state.version.tag_name.as_str();

        if let Some(info) = self.cache.get().filter(|info| info.version == tag).cloned() {
            if let Some(stale) = self.pending.take() {
                tracing::debug!(
                    generation = stale.generation,
                    version = %stale.version.tag_name,
                    "cached version selected again, abandoning in-flight fetch"
                );
            }
            tracing::debug!(version = tag, path = ?state.test_path, "re-resolving against cached results");
            return Reconciliation::Resolved(self.publish(info, state.clone()));
        }

        if let Some(ref pending) = self.pending {
            if pending.version.tag_name == tag {
                tracing::debug!(generation = pending.generation, version = tag, "fetch already in flight");
                return Reconciliation::Pending;
            }
        }

        self.generation += 1;
        let ticket = FetchTicket {
            generation: self.generation,
            version: state.version.clone(),
        };
        tracing::debug!(
            generation = ticket.generation,
            from = self.cache.version().unwrap_or("<unloaded>"),
            to = tag,
            "version switch, fetching results"
        );
        self.pending = Some(ticket.clone());
        Reconciliation::Fetch(ticket)
    }

    /// Report the outcome of the fetch for `ticket`.
    ///
    /// Returns `Ok(None)` when the ticket has been superseded; its outcome is
    /// dropped, errors included. A failed current fetch is returned as the
    /// error and leaves the cache and the published suite untouched.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ResultInfo>,
    ) -> Result<Option<CurrentSuite>> {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == ticket.generation);
        if !is_current {
            tracing::warn!(
                generation = ticket.generation,
                version = %ticket.version.tag_name,
                ok = outcome.is_ok(),
                "discarding stale fetch result"
            );
            return Ok(None);
        }
        self.pending = None;

        let info = outcome.inspect_err(|err| {
            tracing::error!(version = %ticket.version.tag_name, error = %err, "failed to load results");
        })?;
        let info = Arc::new(info);
        self.cache = ResultCache::Loaded(Arc::clone(&info));

        let Some(state) = self.latest.clone() else {
            return Ok(None);
        };
        Ok(Some(self.publish(info, state)))
    }

    /// Observe `state` and, on a version switch, fetch through `fetcher`.
    ///
    /// Returns the published view, or `None` when nothing was published
    /// (fetch already in flight, or superseded while awaiting).
    pub async fn reconcile<F>(
        &mut self,
        state: &ConformanceState,
        fetcher: &F,
    ) -> Result<Option<CurrentSuite>>
    where
        F: ResultFetcher + ?Sized,
    {
        match self.observe(state) {
            Reconciliation::Resolved(view) => Ok(Some(view)),
            Reconciliation::Pending => Ok(None),
            Reconciliation::Fetch(ticket) => {
                let outcome = load_result_info(fetcher, &ticket.version).await;
                self.complete(ticket, outcome)
            }
        }
    }

    /// Cached results paired with the latest state, only while both are for
    /// the same version
    fn linked(&self) -> Option<(&ResultInfo, &ConformanceState)> {
        let info = self.cache.get()?;
        let state = self.latest.as_ref()?;
        (info.version == state.version.tag_name).then_some((info.as_ref(), state))
    }

    /// Upstream source path for the latest state; `None` until that state's
    /// version is loaded
    pub fn source_path(&self) -> Option<String> {
        let (info, state) = self.linked()?;
        Some(resolver::source_path(info, &state.test_path))
    }

    /// Full upstream link for the latest state, including the selected test
    pub fn source_url(&self, repo_base: &str) -> Option<String> {
        let (info, state) = self.linked()?;
        Some(resolver::source_url(
            repo_base,
            info,
            &state.test_path,
            state.selected_test.as_deref(),
        ))
    }

    fn publish(&mut self, results: Arc<ResultInfo>, state: ConformanceState) -> CurrentSuite {
        let view = CurrentSuite::new(results, state);
        self.current = Some(view.clone());
        view
    }
}
