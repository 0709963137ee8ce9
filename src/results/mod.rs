//! Test262 Conformance Result Tree
//!
//! The normalized shape of a published conformance run: a [`ResultInfo`]
//! wrapping a root [`SuiteResult`], where every suite carries aggregate
//! [`Statistics`], per-edition statistics, nested child suites and the
//! individual [`TestResult`] outcomes of its own directory.
//!
//! Payloads are produced by the result generator in a compact JSON form
//! (single-letter keys) and mapped into these types by
//! [`map_to_result_info`].

pub mod loader;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, OptionKind, Result};
use crate::navigation::{FilterOption, SortOption};

pub use loader::{load_result_info, DefaultFetcher, FileFetcher, HttpFetcher, ResultFetcher};

// ============================================================================
// Versions
// ============================================================================

/// One published, fetchable set of conformance results
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionItem {
    /// Version identifier, also the root marker of every test path
    pub tag_name: String,
    /// Location of the raw result payload
    pub fetch_url: String,
}

impl VersionItem {
    pub fn new(tag_name: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            fetch_url: fetch_url.into(),
        }
    }
}

// ============================================================================
// Outcomes and editions
// ============================================================================

/// Outcome of a single test, encoded on the wire as one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum TestOutcome {
    Passed,
    Ignored,
    Failed,
    Panic,
}

impl TestOutcome {
    /// Wire code of this outcome
    pub fn code(self) -> char {
        match self {
            TestOutcome::Passed => 'O',
            TestOutcome::Ignored => '-',
            TestOutcome::Failed => 'F',
            TestOutcome::Panic => 'P',
        }
    }
}

impl TryFrom<char> for TestOutcome {
    type Error = Error;

    fn try_from(code: char) -> Result<Self> {
        match code {
            'O' => Ok(TestOutcome::Passed),
            '-' => Ok(TestOutcome::Ignored),
            'F' => Ok(TestOutcome::Failed),
            'P' => Ok(TestOutcome::Panic),
            other => Err(Error::invalid_option(OptionKind::Outcome, other)),
        }
    }
}

impl From<TestOutcome> for char {
    fn from(outcome: TestOutcome) -> char {
        outcome.code()
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestOutcome::Passed => "PASS",
            TestOutcome::Ignored => "IGNORED",
            TestOutcome::Failed => "FAIL",
            TestOutcome::Panic => "PANIC",
        };
        f.pad(label)
    }
}

/// ECMAScript edition a test was written against.
///
/// Stored as the numeric edition code (5 for ES5, 7 for ES2016, ...), with
/// 255 reserved for proposals that are not yet part of a published edition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SpecEdition {
    Es5,
    Es6,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    Es2024,
    Es2025,
    EsNext,
}

impl SpecEdition {
    /// All editions, oldest first
    pub const ALL: [SpecEdition; 13] = [
        SpecEdition::Es5,
        SpecEdition::Es6,
        SpecEdition::Es2016,
        SpecEdition::Es2017,
        SpecEdition::Es2018,
        SpecEdition::Es2019,
        SpecEdition::Es2020,
        SpecEdition::Es2021,
        SpecEdition::Es2022,
        SpecEdition::Es2023,
        SpecEdition::Es2024,
        SpecEdition::Es2025,
        SpecEdition::EsNext,
    ];

    /// Numeric edition code used in payloads
    pub fn code(self) -> u8 {
        match self {
            SpecEdition::Es5 => 5,
            SpecEdition::Es6 => 6,
            SpecEdition::Es2016 => 7,
            SpecEdition::Es2017 => 8,
            SpecEdition::Es2018 => 9,
            SpecEdition::Es2019 => 10,
            SpecEdition::Es2020 => 11,
            SpecEdition::Es2021 => 12,
            SpecEdition::Es2022 => 13,
            SpecEdition::Es2023 => 14,
            SpecEdition::Es2024 => 15,
            SpecEdition::Es2025 => 16,
            SpecEdition::EsNext => 255,
        }
    }

    /// Lowercase flag value, as carried in `ConformanceState::ecmascript_version`
    pub fn flag(self) -> &'static str {
        match self {
            SpecEdition::Es5 => "es5",
            SpecEdition::Es6 => "es6",
            SpecEdition::Es2016 => "es2016",
            SpecEdition::Es2017 => "es2017",
            SpecEdition::Es2018 => "es2018",
            SpecEdition::Es2019 => "es2019",
            SpecEdition::Es2020 => "es2020",
            SpecEdition::Es2021 => "es2021",
            SpecEdition::Es2022 => "es2022",
            SpecEdition::Es2023 => "es2023",
            SpecEdition::Es2024 => "es2024",
            SpecEdition::Es2025 => "es2025",
            SpecEdition::EsNext => "esnext",
        }
    }
}

impl TryFrom<u8> for SpecEdition {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        SpecEdition::ALL
            .into_iter()
            .find(|edition| edition.code() == code)
            .ok_or_else(|| format!("unknown edition code {}", code))
    }
}

impl From<SpecEdition> for u8 {
    fn from(edition: SpecEdition) -> u8 {
        edition.code()
    }
}

impl FromStr for SpecEdition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        SpecEdition::ALL
            .into_iter()
            .find(|edition| edition.flag() == lower)
            .ok_or_else(|| Error::invalid_option(OptionKind::Edition, s))
    }
}

impl fmt::Display for SpecEdition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecEdition::EsNext => write!(f, "ESNext"),
            other => write!(f, "{}", other.flag().to_ascii_uppercase()),
        }
    }
}

// ============================================================================
// Result tree
// ============================================================================

/// Aggregate outcome counts for a suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(rename = "t", default)]
    pub total: usize,
    #[serde(rename = "o", default)]
    pub passed: usize,
    #[serde(rename = "i", default)]
    pub ignored: usize,
    /// Panics are counted as failures too
    #[serde(rename = "p", default)]
    pub panic: usize,
}

impl Statistics {
    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.passed + self.ignored)
    }

    /// Pass rate as a percentage of the tests that were not ignored
    pub fn pass_rate(&self) -> f64 {
        let runnable = self.total.saturating_sub(self.ignored);
        if runnable == 0 {
            0.0
        } else {
            self.passed as f64 / runnable as f64 * 100.0
        }
    }

    fn record(&mut self, outcome: TestOutcome) {
        self.total += 1;
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Ignored => self.ignored += 1,
            TestOutcome::Failed => {}
            TestOutcome::Panic => self.panic += 1,
        }
    }

    fn merge(&mut self, other: Statistics) {
        self.total += other.total;
        self.passed += other.passed;
        self.ignored += other.ignored;
        self.panic += other.panic;
    }
}

/// Outcome of a single test file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "v", default = "default_edition")]
    pub edition: SpecEdition,
    /// Whether the test ran in strict mode
    #[serde(rename = "s", default)]
    pub strict: bool,
    #[serde(rename = "r")]
    pub result: TestOutcome,
}

fn default_edition() -> SpecEdition {
    SpecEdition::Es5
}

/// A named node in the result tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResult {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "a", default)]
    pub stats: Statistics,
    /// Statistics restricted to tests up to and including each edition
    #[serde(rename = "av", default, skip_serializing_if = "HashMap::is_empty")]
    pub edition_stats: HashMap<SpecEdition, Statistics>,
    #[serde(rename = "s", default, skip_serializing_if = "Vec::is_empty")]
    pub suites: Vec<SuiteResult>,
    #[serde(rename = "t", default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<TestResult>,
    #[serde(rename = "f", default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl SuiteResult {
    /// First child suite named `name`
    pub fn child(&self, name: &str) -> Option<&SuiteResult> {
        self.suites.iter().find(|suite| suite.name == name)
    }

    /// Index of the first child suite named `name`
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.suites.iter().position(|suite| suite.name == name)
    }

    /// Number of suites below this one, at any depth
    pub fn suite_count(&self) -> usize {
        self.suites.iter().map(|s| 1 + s.suite_count()).sum()
    }

    /// Number of tests in this suite and all of its descendants
    pub fn test_count(&self) -> usize {
        self.tests.len() + self.suites.iter().map(SuiteResult::test_count).sum::<usize>()
    }

    /// Statistics for the given edition flag, or the overall statistics.
    ///
    /// Uses the payload's per-edition table when present and otherwise
    /// counts the tests in the subtree directly.
    pub fn stats_for(&self, edition: Option<SpecEdition>) -> Statistics {
        match edition {
            None => self.stats,
            Some(edition) => self
                .edition_stats
                .get(&edition)
                .copied()
                .unwrap_or_else(|| self.count_up_to(edition)),
        }
    }

    fn count_up_to(&self, edition: SpecEdition) -> Statistics {
        let mut stats = Statistics::default();
        for test in self.tests.iter().filter(|t| t.edition <= edition) {
            stats.record(test.result);
        }
        for suite in &self.suites {
            stats.merge(suite.count_up_to(edition));
        }
        stats
    }

    /// This suite's own tests matching the filter and edition flag
    pub fn filtered_tests(
        &self,
        filter: FilterOption,
        edition: Option<SpecEdition>,
    ) -> Vec<&TestResult> {
        self.tests
            .iter()
            .filter(|t| edition.map_or(true, |e| t.edition <= e))
            .filter(|t| filter.matches(t.result))
            .collect()
    }

    /// Child suites ordered by the sort option; ties fall back to name order
    pub fn sorted_suites(
        &self,
        sort: SortOption,
        edition: Option<SpecEdition>,
    ) -> Vec<&SuiteResult> {
        let mut suites: Vec<(&SuiteResult, Statistics)> = self
            .suites
            .iter()
            .map(|s| (s, s.stats_for(edition)))
            .collect();
        suites.sort_by(|(a, sa), (b, sb)| {
            let by_key = match sort {
                SortOption::Alpha => Ordering::Equal,
                SortOption::ReverseAlpha => b.name.cmp(&a.name),
                SortOption::MostPassed => sb.passed.cmp(&sa.passed),
                SortOption::LeastPassed => sa.passed.cmp(&sb.passed),
                SortOption::MostFailed => sb.failed().cmp(&sa.failed()),
                SortOption::MostIgnored => sb.ignored.cmp(&sa.ignored),
                SortOption::MostPanics => sb.panic.cmp(&sa.panic),
            };
            by_key.then_with(|| a.name.cmp(&b.name))
        });
        suites.into_iter().map(|(s, _)| s).collect()
    }

    fn validate(&self, location: &mut Vec<String>) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::default();
        location.push(self.name.clone());
        for suite in &self.suites {
            if !seen.insert(suite.name.as_str()) {
                return Err(Error::Payload(format!(
                    "duplicate suite '{}' under '{}'",
                    suite.name,
                    location.join("/")
                )));
            }
            suite.validate(location)?;
        }
        location.pop();
        Ok(())
    }
}

/// A fetched and normalized result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultInfo {
    /// Tag of the version these results were fetched for
    pub version: String,
    /// Commit of the engine that produced the results
    pub engine_commit: String,
    /// Commit of the test262 suite the results were generated from
    pub test262_commit: String,
    pub results: SuiteResult,
}

impl ResultInfo {
    /// Suite reached by following child indices from the root
    pub fn suite_at(&self, indices: &[usize]) -> Option<&SuiteResult> {
        indices
            .iter()
            .try_fold(&self.results, |suite, &i| suite.suites.get(i))
    }
}

#[derive(Debug, Deserialize)]
struct RawResultPayload {
    #[serde(rename = "c", default)]
    engine_commit: String,
    #[serde(rename = "u", default)]
    test262_commit: String,
    #[serde(rename = "r")]
    results: SuiteResult,
}

/// Map a raw result payload into a [`ResultInfo`] tagged with `tag_name`.
///
/// Child suite names must be unique within each parent; a payload that
/// breaks this is rejected rather than resolved ambiguously.
pub fn map_to_result_info(tag_name: &str, raw: serde_json::Value) -> Result<ResultInfo> {
    let payload: RawResultPayload = serde_json::from_value(raw)?;
    payload.results.validate(&mut Vec::new())?;

    Ok(ResultInfo {
        version: tag_name.to_string(),
        engine_commit: payload.engine_commit,
        test262_commit: payload.test262_commit,
        results: payload.results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!({
            "c": "abc123",
            "u": "def456",
            "r": {
                "n": "test",
                "a": { "t": 4, "o": 2, "i": 1, "p": 0 },
                "s": [
                    {
                        "n": "built-ins",
                        "a": { "t": 3, "o": 2, "i": 0, "p": 0 },
                        "t": [
                            { "n": "a.js", "v": 5, "s": true, "r": "O" },
                            { "n": "b.js", "v": 11, "r": "O" },
                            { "n": "c.js", "v": 255, "r": "F" }
                        ]
                    },
                    {
                        "n": "language",
                        "a": { "t": 1, "o": 0, "i": 1, "p": 0 },
                        "t": [ { "n": "d.js", "v": 6, "r": "-" } ]
                    }
                ]
            }
        })
    }

    #[test]
    fn test_map_payload() {
        let info = map_to_result_info("v0.19", sample_payload()).unwrap();
        assert_eq!(info.version, "v0.19");
        assert_eq!(info.engine_commit, "abc123");
        assert_eq!(info.test262_commit, "def456");
        assert_eq!(info.results.name, "test");
        assert_eq!(info.results.suites.len(), 2);
        assert_eq!(info.results.test_count(), 4);
        assert_eq!(info.results.suite_count(), 2);
        let builtins = info.results.child("built-ins").unwrap();
        assert_eq!(builtins.tests[1].edition, SpecEdition::Es2020);
        assert_eq!(builtins.tests[2].edition, SpecEdition::EsNext);
        assert!(builtins.tests[0].strict);
        assert!(!builtins.tests[1].strict);
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let raw = json!({
            "u": "x",
            "r": { "n": "test", "s": [ { "n": "a" }, { "n": "a" } ] }
        });
        let err = map_to_result_info("v1", raw).unwrap_err();
        assert!(matches!(err, Error::Payload(ref m) if m.contains("duplicate suite 'a'")));
    }

    #[test]
    fn test_unknown_outcome_code_rejected() {
        let raw = json!({
            "u": "x",
            "r": { "n": "test", "t": [ { "n": "a.js", "v": 5, "r": "X" } ] }
        });
        let err = map_to_result_info("v1", raw).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
        assert!(err.to_string().contains("'X' is not a valid outcome option"));
        assert_eq!(TestOutcome::try_from('P').unwrap(), TestOutcome::Panic);
        assert_eq!(char::from(TestOutcome::Ignored), '-');
    }

    #[test]
    fn test_malformed_payload() {
        let err = map_to_result_info("v1", json!({ "u": "x" })).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_edition_parsing() {
        assert_eq!("es2020".parse::<SpecEdition>().unwrap(), SpecEdition::Es2020);
        assert_eq!("ES5".parse::<SpecEdition>().unwrap(), SpecEdition::Es5);
        assert!("es1999".parse::<SpecEdition>().is_err());
        assert_eq!(SpecEdition::Es2016.to_string(), "ES2016");
        assert_eq!(SpecEdition::EsNext.to_string(), "ESNext");
        assert!(SpecEdition::try_from(4).is_err());
    }

    #[test]
    fn test_stats_for_edition_counts_subtree() {
        let info = map_to_result_info("v1", sample_payload()).unwrap();
        let es2020 = info.results.stats_for(Some(SpecEdition::Es2020));
        assert_eq!(es2020, Statistics { total: 3, passed: 2, ignored: 1, panic: 0 });
        assert_eq!(info.results.stats_for(None).total, 4);
    }

    #[test]
    fn test_stats_for_prefers_payload_table() {
        let mut suite = SuiteResult::default();
        let table = Statistics { total: 9, passed: 9, ignored: 0, panic: 0 };
        suite.edition_stats.insert(SpecEdition::Es6, table);
        assert_eq!(suite.stats_for(Some(SpecEdition::Es6)), table);
    }

    #[test]
    fn test_filtered_tests() {
        let info = map_to_result_info("v1", sample_payload()).unwrap();
        let builtins = info.results.child("built-ins").unwrap();
        assert_eq!(builtins.filtered_tests(FilterOption::None, None).len(), 3);
        assert_eq!(builtins.filtered_tests(FilterOption::Passed, None).len(), 2);
        assert_eq!(builtins.filtered_tests(FilterOption::Failed, None).len(), 1);
        assert_eq!(
            builtins
                .filtered_tests(FilterOption::None, Some(SpecEdition::Es6))
                .len(),
            1
        );
    }

    #[test]
    fn test_sorted_suites() {
        let info = map_to_result_info("v1", sample_payload()).unwrap();
        let names = |sort| {
            info.results
                .sorted_suites(sort, None)
                .iter()
                .map(|s| s.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(SortOption::Alpha), vec!["built-ins", "language"]);
        assert_eq!(names(SortOption::ReverseAlpha), vec!["language", "built-ins"]);
        assert_eq!(names(SortOption::LeastPassed), vec!["language", "built-ins"]);
        assert_eq!(names(SortOption::MostIgnored), vec!["language", "built-ins"]);
    }

    #[test]
    fn test_suite_at() {
        let info = map_to_result_info("v1", sample_payload()).unwrap();
        assert_eq!(info.suite_at(&[]).unwrap().name, "test");
        assert_eq!(info.suite_at(&[1]).unwrap().name, "language");
        assert!(info.suite_at(&[5]).is_none());
    }

    #[test]
    fn test_statistics_rates() {
        let stats = Statistics { total: 10, passed: 6, ignored: 2, panic: 1 };
        assert_eq!(stats.failed(), 2);
        assert_eq!(stats.pass_rate(), 75.0);
        assert_eq!(Statistics::default().pass_rate(), 0.0);
    }
}
