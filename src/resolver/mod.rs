//! Test path resolution
//!
//! A test path is an ordered list of suite names. Element 0 is the version
//! tag, which anchors the walk at the root suite; each following element
//! names a child of the suite reached so far. Resolution is a pure function
//! of the result tree and the path.
//!
//! A step that names no existing child is reported as
//! [`PathError::NoSuchSuite`] rather than skipped, so a stale or mistyped
//! path never silently displays some ancestor as if it were the target.
//! The error still carries the deepest suite that did match, for callers
//! that want to fall back to it.

use std::fmt;
use thiserror::Error;

use crate::results::{ResultInfo, SuiteResult};

/// A resolved position in the result tree, as child indices from the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    indices: Vec<usize>,
}

impl ResolvedPath {
    /// The root suite
    pub fn root() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of steps below the root
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    /// The suite this position points at in `info`
    pub fn suite<'a>(&self, info: &'a ResultInfo) -> Option<&'a SuiteResult> {
        info.suite_at(&self.indices)
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<root>")?;
        for i in &self.indices {
            write!(f, "/{}", i)?;
        }
        Ok(())
    }
}

/// Why a test path does not name a suite in the loaded tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("test path is empty")]
    Empty,

    #[error("test path starts at '{found}' but the loaded results are for '{expected}'")]
    RootMismatch { expected: String, found: String },

    #[error("no suite named '{name}' at step {index} (deepest match: {nearest})")]
    NoSuchSuite {
        index: usize,
        name: String,
        nearest: ResolvedPath,
    },
}

impl PathError {
    /// Deepest suite matched before the failing step, if the root was reached
    pub fn nearest(&self) -> Option<&ResolvedPath> {
        match self {
            PathError::NoSuchSuite { nearest, .. } => Some(nearest),
            _ => None,
        }
    }
}

/// Walk `test_path` through `info` and return the position it names.
///
/// An element equal to `info.version` (re)anchors the cursor at the root.
/// Any other element must match the name of a child of the current cursor;
/// duplicate names resolve to the first occurrence.
pub fn locate<S: AsRef<str>>(info: &ResultInfo, test_path: &[S]) -> Result<ResolvedPath, PathError> {
    let first = test_path.first().ok_or(PathError::Empty)?.as_ref();
    if first != info.version {
        return Err(PathError::RootMismatch {
            expected: info.version.clone(),
            found: first.to_string(),
        });
    }

    let mut cursor = ResolvedPath::root();
    let mut suite = &info.results;
    for (index, element) in test_path.iter().enumerate().skip(1) {
        let name = element.as_ref();
        if name == info.version {
            cursor = ResolvedPath::root();
            suite = &info.results;
            continue;
        }

        match suite.child_index(name) {
            Some(child) => {
                cursor.indices.push(child);
                suite = &suite.suites[child];
            }
            None => {
                return Err(PathError::NoSuchSuite {
                    index,
                    name: name.to_string(),
                    nearest: cursor,
                })
            }
        }
    }
    Ok(cursor)
}

/// Resolve `test_path` to the suite it names
pub fn resolve<'a, S: AsRef<str>>(
    info: &'a ResultInfo,
    test_path: &[S],
) -> Result<&'a SuiteResult, PathError> {
    let resolved = locate(info, test_path)?;
    // locate only records indices it has just walked
    Ok(resolved.suite(info).unwrap_or(&info.results))
}

/// Path of the suite inside the upstream test262 repository at the exact
/// commit the results were generated from: `<commit>/test/<path[1..]>`
pub fn source_path<S: AsRef<str>>(info: &ResultInfo, test_path: &[S]) -> String {
    let mut parts: Vec<&str> = vec![info.test262_commit.as_str(), "test"];
    parts.extend(test_path.iter().skip(1).map(AsRef::as_ref));
    parts.join("/")
}

/// Full link into the upstream repository, optionally pointing at one test file
pub fn source_url<S: AsRef<str>>(
    repo_base: &str,
    info: &ResultInfo,
    test_path: &[S],
    selected_test: Option<&str>,
) -> String {
    let mut url = format!("{}/{}", repo_base.trim_end_matches('/'), source_path(info, test_path));
    if let Some(test) = selected_test {
        url.push('/');
        url.push_str(test);
    }
    url
}
