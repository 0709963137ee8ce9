//! Plain-text rendering of a published suite view

use crate::reconcile::CurrentSuite;
use crate::resolver;

/// Render `view` as a text report, with upstream links under `repo_url`
pub fn render_view(view: &CurrentSuite, repo_url: &str) -> String {
    let state = view.state();
    let mut s = String::new();

    s.push_str(&format!("\n=== {} ===\n", state.test_path.join(" / ")));

    let Some(suite) = view.suite() else {
        match view.resolution() {
            Err(err) => s.push_str(&format!("No suite at this path: {}\n", err)),
            Ok(_) => s.push_str("No suite at this path\n"),
        }
        return s;
    };

    let edition = state.edition();
    let stats = suite.stats_for(edition);
    s.push_str(&format!(
        "Total: {} | Pass: {} | Ignored: {} | Fail: {} | Panic: {}\n",
        stats.total,
        stats.passed,
        stats.ignored,
        stats.failed(),
        stats.panic
    ));
    s.push_str(&format!("Pass Rate: {:.1}%", stats.pass_rate()));
    match edition {
        Some(edition) => s.push_str(&format!(" (up to {})\n", edition)),
        None => s.push('\n'),
    }

    let suites = suite.sorted_suites(state.sort_option, edition);
    if !suites.is_empty() {
        s.push_str(&format!("\nSuites (sort: {}):\n", state.sort_option));
        s.push_str(&format!(
            "{:<40} {:>6} {:>6} {:>6} {:>7}\n",
            "Suite", "Total", "Pass", "Fail", "Rate"
        ));
        s.push_str(&"-".repeat(69));
        s.push('\n');
        for child in suites {
            let child_stats = child.stats_for(edition);
            s.push_str(&format!(
                "{:<40} {:>6} {:>6} {:>6} {:>6.1}%\n",
                child.name,
                child_stats.total,
                child_stats.passed,
                child_stats.failed(),
                child_stats.pass_rate()
            ));
        }
    }

    let tests = suite.filtered_tests(state.filter_option, edition);
    if !tests.is_empty() {
        s.push_str(&format!("\nTests (filter: {}):\n", state.filter_option));
        for test in tests {
            let marker = if state.selected_test.as_deref() == Some(test.name.as_str()) {
                ">"
            } else {
                " "
            };
            let strict = if test.strict { " [strict]" } else { "" };
            s.push_str(&format!(
                "{} {:<8} {} ({}){}\n",
                marker, test.result, test.name, test.edition, strict
            ));
        }
    }

    let link = resolver::source_url(
        repo_url,
        view.results(),
        &state.test_path,
        state.selected_test.as_deref(),
    );
    s.push_str(&format!("\nSource: {}\n", link));
    s
}
