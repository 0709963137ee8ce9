//! Display options carried in the navigation state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, OptionKind, Result};
use crate::results::TestOutcome;

/// Which test outcomes are shown in the selection cards and test grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterOption {
    #[default]
    None,
    Passed,
    Ignored,
    Failed,
    Panic,
}

impl FilterOption {
    pub const ALL: [FilterOption; 5] = [
        FilterOption::None,
        FilterOption::Passed,
        FilterOption::Ignored,
        FilterOption::Failed,
        FilterOption::Panic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOption::None => "none",
            FilterOption::Passed => "passed",
            FilterOption::Ignored => "ignored",
            FilterOption::Failed => "failed",
            FilterOption::Panic => "panic",
        }
    }

    /// Whether a test with `outcome` passes this filter
    pub fn matches(self, outcome: TestOutcome) -> bool {
        match self {
            FilterOption::None => true,
            FilterOption::Passed => outcome == TestOutcome::Passed,
            FilterOption::Ignored => outcome == TestOutcome::Ignored,
            FilterOption::Failed => outcome == TestOutcome::Failed,
            FilterOption::Panic => outcome == TestOutcome::Panic,
        }
    }
}

impl FromStr for FilterOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FilterOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| Error::invalid_option(OptionKind::Filter, s))
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of child suites
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Alpha,
    ReverseAlpha,
    MostPassed,
    LeastPassed,
    MostFailed,
    MostIgnored,
    MostPanics,
}

impl SortOption {
    pub const ALL: [SortOption; 7] = [
        SortOption::Alpha,
        SortOption::ReverseAlpha,
        SortOption::MostPassed,
        SortOption::LeastPassed,
        SortOption::MostFailed,
        SortOption::MostIgnored,
        SortOption::MostPanics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Alpha => "alpha",
            SortOption::ReverseAlpha => "reverse-alpha",
            SortOption::MostPassed => "most-passed",
            SortOption::LeastPassed => "least-passed",
            SortOption::MostFailed => "most-failed",
            SortOption::MostIgnored => "most-ignored",
            SortOption::MostPanics => "most-panics",
        }
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| Error::invalid_option(OptionKind::Sort, s))
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
