//! Conformance Explorer: navigate Test262 conformance results
//!
//! A conformance run produces a tree of nested test suites. This crate
//! loads such a tree for a published version, resolves a navigation path
//! (a list of suite names) to the suite it names, and keeps that resolution
//! in step with a shareable, history-backed navigation state.
//!
//! # Quick Start
//!
//! ```no_run
//! use conformance_explorer::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> conformance_explorer::Result<()> {
//!     let version = VersionItem::new("v0.19", "https://example.test/v0.19.json");
//!     let mut navigator = Navigator::new(MemoryHistory::new());
//!     let mut reconciler = Reconciler::new();
//!
//!     let state = ConformanceState::initial(version);
//!     let state = navigator.navigate_to_suite(&state, "built-ins");
//!     if let Some(view) = reconciler.reconcile(&state, &DefaultFetcher::new()).await? {
//!         println!("{:?}", view.suite().map(|s| &s.name));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! State flows: user action → [`navigation`] → history → [`reconcile`] →
//! [`results`] loader (on version switch) → [`resolver`] → published suite.
//!
//! | Category | Modules |
//! |----------|---------|
//! | **Core** | [`results`], [`resolver`], [`navigation`], [`reconcile`] |
//! | **Tooling** | [`session`], [`repl`], [`config`], [`error`](Error) |

pub mod config;
pub mod navigation;
pub mod prelude;
pub mod reconcile;
pub mod repl;
pub mod resolver;
pub mod results;
pub mod session;

mod error;

pub use error::{Error, OptionKind, Result};

/// Conformance Explorer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
