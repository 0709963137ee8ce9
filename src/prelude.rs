//! Prelude module for convenient imports
//!
//! ```no_run
//! use conformance_explorer::prelude::*;
//!
//! let state = ConformanceState::initial(VersionItem::new("v0.19", "results/v0.19.json"));
//! let mut navigator = Navigator::new(MemoryHistory::new());
//! let _next = navigator.navigate_to_suite(&state, "language");
//! ```

// Result tree and loading
pub use crate::results::{
    load_result_info, map_to_result_info, DefaultFetcher, FileFetcher, HttpFetcher, ResultFetcher,
    ResultInfo, SpecEdition, Statistics, SuiteResult, TestOutcome, TestResult, VersionItem,
};

// Path resolution
pub use crate::resolver::{locate, resolve, source_path, PathError, ResolvedPath};

// Navigation state
pub use crate::navigation::{
    create_search_params, parse_search_params, ConformanceState, FilterOption, HistoryEntry,
    MemoryHistory, NavigationSink, Navigator, SortOption,
};

// Reconciliation
pub use crate::reconcile::{CurrentSuite, FetchTicket, Reconciler, Reconciliation, ResultCache};

// Sessions and configuration
pub use crate::config::ExplorerConfig;
pub use crate::session::Session;

// Error handling
pub use crate::error::{Error, Result};

// Version constant
pub use crate::VERSION;
