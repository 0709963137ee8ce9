//! URL query encoding of the navigation state
//!
//! Only the version, the path below the root and the selected test are
//! carried in the query: `version=<tag>&path=<a/b/c>&test=<id>`. Display
//! options live in the history state alone.

use url::form_urlencoded;

use super::{ConformanceState, FilterOption, SortOption};
use crate::error::{Error, Result};
use crate::results::VersionItem;

const VERSION_KEY: &str = "version";
const PATH_KEY: &str = "path";
const TEST_KEY: &str = "test";

/// Encode the shareable part of a state as a form-urlencoded query (no leading `?`)
pub fn create_search_params<S: AsRef<str>>(
    version: &VersionItem,
    test_path: &[S],
    selected_test: Option<&str>,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair(VERSION_KEY, &version.tag_name);

    // Element 0 is the version tag, which is already carried above
    let below_root: Vec<&str> = test_path.iter().skip(1).map(AsRef::as_ref).collect();
    if !below_root.is_empty() {
        query.append_pair(PATH_KEY, &below_root.join("/"));
    }
    if let Some(test) = selected_test {
        query.append_pair(TEST_KEY, test);
    }
    query.finish()
}

/// Rebuild a state from a deep-link query.
///
/// A missing `version` selects the last of `versions`. Sort and filter are
/// not part of the query and come from the caller.
pub fn parse_search_params(
    query: &str,
    versions: &[VersionItem],
    sort: SortOption,
    filter: FilterOption,
) -> Result<ConformanceState> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut tag = None;
    let mut path = None;
    let mut test = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            VERSION_KEY => tag = Some(value.into_owned()),
            PATH_KEY => path = Some(value.into_owned()),
            TEST_KEY => test = Some(value.into_owned()),
            other => tracing::debug!(key = other, "ignoring unknown query parameter"),
        }
    }

    let version = match tag {
        Some(tag) => versions
            .iter()
            .find(|v| v.tag_name == tag)
            .ok_or(Error::UnknownVersion(tag))?,
        None => versions
            .last()
            .ok_or_else(|| Error::Query("no versions available".to_string()))?,
    };

    let mut test_path = vec![version.tag_name.clone()];
    if let Some(path) = path {
        test_path.extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_string));
    }

    Ok(ConformanceState::new(
        version.clone(),
        test_path,
        None,
        sort,
        filter,
        test.filter(|t| !t.is_empty()),
    ))
}
