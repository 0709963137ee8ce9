//! Navigation State Machine
//!
//! [`ConformanceState`] is the full navigable state: selected version, test
//! path, edition flag, sort and filter options and the selected test. It is
//! never mutated. Every user action derives a new state from the current
//! one and the [`Navigator`] pushes that state, together with its URL
//! query, to a [`NavigationSink`] as a single history entry.
//!
//! # Example
//!
//! ```no_run
//! use conformance_explorer::navigation::{ConformanceState, MemoryHistory, Navigator};
//! use conformance_explorer::results::VersionItem;
//!
//! let state = ConformanceState::initial(VersionItem::new("v0.19", "results/v0.19.json"));
//! let mut navigator = Navigator::new(MemoryHistory::new());
//! let state = navigator.navigate_to_suite(&state, "built-ins");
//! let state = navigator.navigate_to_suite(&state, "Array");
//! assert_eq!(navigator.sink().current().unwrap().search, "version=v0.19&path=built-ins%2FArray");
//! let _root = navigator.slice_nav_to_index(&state, 1);
//! ```

mod history;
mod options;
mod query;

pub use history::MemoryHistory;
pub use options::{FilterOption, SortOption};
pub use query::{create_search_params, parse_search_params};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::results::{SpecEdition, VersionItem};

/// Logical location every conformance history entry is pushed to
pub const CONFORMANCE_PATHNAME: &str = "/conformance";

// ============================================================================
// State
// ============================================================================

/// The full navigable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConformanceState {
    pub version: VersionItem,
    /// Element 0 is the version tag; the rest are nested suite names
    pub test_path: Vec<String>,
    /// Edition flag; `None` means unset, never an empty string
    pub ecmascript_version: Option<String>,
    pub sort_option: SortOption,
    pub filter_option: FilterOption,
    pub selected_test: Option<String>,
}

impl ConformanceState {
    pub fn new(
        version: VersionItem,
        test_path: Vec<String>,
        ecmascript_version: Option<String>,
        sort_option: SortOption,
        filter_option: FilterOption,
        selected_test: Option<String>,
    ) -> Self {
        Self {
            version,
            test_path,
            ecmascript_version: normalize_flag(ecmascript_version.as_deref()),
            sort_option,
            filter_option,
            selected_test,
        }
    }

    /// State at the root of `version` with default options
    pub fn initial(version: VersionItem) -> Self {
        let test_path = vec![version.tag_name.clone()];
        Self::new(
            version,
            test_path,
            None,
            SortOption::default(),
            FilterOption::default(),
            None,
        )
    }

    /// Parsed edition flag; an unrecognized flag is treated as unset
    pub fn edition(&self) -> Option<SpecEdition> {
        self.ecmascript_version.as_deref().and_then(|f| f.parse().ok())
    }

    /// Suite names below the root
    pub fn breadcrumbs(&self) -> &[String] {
        self.test_path.get(1..).unwrap_or(&[])
    }

    /// Query string for this state
    pub fn search(&self) -> String {
        create_search_params(&self.version, &self.test_path, self.selected_test.as_deref())
    }

    /// Path extended by `suite_name`; the selected test is cleared
    pub fn descended(&self, suite_name: &str) -> Self {
        let mut test_path = self.test_path.clone();
        test_path.push(suite_name.to_string());
        Self {
            test_path,
            selected_test: None,
            ..self.clone()
        }
    }

    /// Path truncated to its first `non_inclusive_index` elements; the
    /// selected test is cleared
    pub fn sliced(&self, non_inclusive_index: usize) -> Self {
        let keep = non_inclusive_index.min(self.test_path.len());
        Self {
            test_path: self.test_path[..keep].to_vec(),
            selected_test: None,
            ..self.clone()
        }
    }

    pub fn with_flag(&self, flag: Option<&str>) -> Self {
        Self {
            ecmascript_version: normalize_flag(flag),
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort_option: SortOption) -> Self {
        Self {
            sort_option,
            ..self.clone()
        }
    }

    pub fn with_filter(&self, filter_option: FilterOption) -> Self {
        Self {
            filter_option,
            ..self.clone()
        }
    }

    pub fn with_selected_test(&self, test: Option<&str>) -> Self {
        Self {
            selected_test: test.map(str::to_string),
            ..self.clone()
        }
    }

    /// Root of another version, keeping the display options
    pub fn with_version(&self, version: VersionItem) -> Self {
        Self {
            test_path: vec![version.tag_name.clone()],
            version,
            selected_test: None,
            ..self.clone()
        }
    }
}

fn normalize_flag(flag: Option<&str>) -> Option<String> {
    flag.filter(|f| !f.is_empty()).map(str::to_string)
}

// ============================================================================
// History sink
// ============================================================================

/// One navigable history entry: location, query and state, pushed together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub pathname: String,
    pub search: String,
    pub state: ConformanceState,
}

impl HistoryEntry {
    pub fn new(search: String, state: ConformanceState) -> Self {
        Self {
            pathname: CONFORMANCE_PATHNAME.to_string(),
            search,
            state,
        }
    }
}

/// Receives history transitions
pub trait NavigationSink {
    fn push(&mut self, entry: HistoryEntry);
}

impl<S: NavigationSink + ?Sized> NavigationSink for &mut S {
    fn push(&mut self, entry: HistoryEntry) {
        (**self).push(entry)
    }
}

impl NavigationSink for Vec<HistoryEntry> {
    fn push(&mut self, entry: HistoryEntry) {
        Vec::push(self, entry)
    }
}

// ============================================================================
// Navigator
// ============================================================================

/// Turns user actions into history transitions.
///
/// Each operation takes the current state, derives the next one, pushes it
/// with its query as exactly one [`HistoryEntry`] and returns it.
#[derive(Debug, Default)]
pub struct Navigator<S> {
    sink: S,
}

impl<S: NavigationSink> Navigator<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    fn push_state(&mut self, search: String, state: ConformanceState) -> ConformanceState {
        tracing::trace!(search = %search, path = ?state.test_path, "pushing history entry");
        self.sink.push(HistoryEntry::new(search, state.clone()));
        state
    }

    /// Descend into a child suite of the current one
    pub fn navigate_to_suite(&mut self, current: &ConformanceState, suite_name: &str) -> ConformanceState {
        let next = current.descended(suite_name);
        let search = create_search_params(&next.version, &next.test_path, None);
        self.push_state(search, next)
    }

    /// Jump back to an ancestor, as a breadcrumb does
    pub fn slice_nav_to_index(&mut self, current: &ConformanceState, non_inclusive_index: usize) -> ConformanceState {
        let next = current.sliced(non_inclusive_index);
        let search = create_search_params(&next.version, &next.test_path, None);
        self.push_state(search, next)
    }

    /// Set or clear the edition flag; an empty flag clears it
    pub fn set_ecmascript_flag(&mut self, current: &ConformanceState, flag: Option<&str>) -> ConformanceState {
        let next = current.with_flag(flag);
        self.push_state(next.search(), next)
    }

    pub fn set_sort_option(&mut self, current: &ConformanceState, option: SortOption) -> ConformanceState {
        let next = current.with_sort(option);
        self.push_state(next.search(), next)
    }

    /// Parse and set the sort option; nothing is pushed if `option` is not a known value
    pub fn set_sort_str(&mut self, current: &ConformanceState, option: &str) -> Result<ConformanceState> {
        Ok(self.set_sort_option(current, option.parse()?))
    }

    pub fn set_filter_option(&mut self, current: &ConformanceState, option: FilterOption) -> ConformanceState {
        let next = current.with_filter(option);
        self.push_state(next.search(), next)
    }

    /// Parse and set the filter option; nothing is pushed if `option` is not a known value
    pub fn set_filter_str(&mut self, current: &ConformanceState, option: &str) -> Result<ConformanceState> {
        Ok(self.set_filter_option(current, option.parse()?))
    }

    /// Select a single test, or clear the selection with `None`
    pub fn set_selected_test(&mut self, current: &ConformanceState, test: Option<&str>) -> ConformanceState {
        let next = current.with_selected_test(test);
        self.push_state(next.search(), next)
    }

    /// Switch to another version's root
    pub fn switch_version(&mut self, current: &ConformanceState, version: VersionItem) -> ConformanceState {
        let next = current.with_version(version);
        self.push_state(next.search(), next)
    }
}
