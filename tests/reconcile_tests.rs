//! Integration tests for reconciliation and browsing sessions

mod common;

use common::{config, versions, StaticFetcher};
use conformance_explorer::navigation::{ConformanceState, FilterOption, SortOption};
use conformance_explorer::reconcile::{Reconciler, Reconciliation};
use conformance_explorer::resolver::PathError;
use conformance_explorer::results::load_result_info;
use conformance_explorer::session::{render_view, Session};
use conformance_explorer::Error;

fn state(tag: &str, path: &[&str]) -> ConformanceState {
    let version = versions().into_iter().find(|v| v.tag_name == tag).unwrap();
    let mut state = ConformanceState::initial(version);
    state.test_path.extend(path.iter().map(|p| p.to_string()));
    state
}

mod reconciler {
    use super::*;

    #[tokio::test]
    async fn test_reconcile_fetches_once_per_version() {
        let fetcher = StaticFetcher::new();
        let mut reconciler = Reconciler::new();

        let view = reconciler
            .reconcile(&state("v1", &["built-ins"]), &fetcher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.suite().unwrap().name, "built-ins");

        let view = reconciler
            .reconcile(&state("v1", &["built-ins", "Array"]), &fetcher)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(view.suite().unwrap().name, "Array");
        assert_eq!(fetcher.requests(), 1);

        reconciler.reconcile(&state("v2", &[]), &fetcher).await.unwrap();
        assert_eq!(fetcher.requests(), 2);
        assert_eq!(reconciler.cache().version(), Some("v2"));
    }

    #[tokio::test]
    async fn test_older_fetch_finishing_last_is_discarded() {
        let fetcher = StaticFetcher::new();
        let mut reconciler = Reconciler::new();

        let first = match reconciler.observe(&state("v1", &[])) {
            Reconciliation::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        };
        let second = match reconciler.observe(&state("v2", &["intl402"])) {
            Reconciliation::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        };

        let (v1, v2) = tokio::join!(
            load_result_info(&fetcher, first.version()),
            load_result_info(&fetcher, second.version())
        );

        let published = reconciler.complete(second, v2).unwrap().unwrap();
        assert_eq!(published.suite().unwrap().name, "intl402");

        // v1 resolves after v2 was cached: its result must not replace v2
        assert!(reconciler.complete(first, v1).unwrap().is_none());
        assert_eq!(reconciler.cache().version(), Some("v2"));
        assert_eq!(reconciler.source_path().unwrap(), "t262-v2/test/intl402");
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_keeps_view() {
        let fetcher = StaticFetcher::new();
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&state("v1", &["language"]), &fetcher).await.unwrap();

        let err = reconciler
            .reconcile(&state("broken", &[]), &fetcher)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
        assert_eq!(reconciler.current().unwrap().suite().unwrap().name, "language");
        assert_eq!(reconciler.cache().version(), Some("v1"));
    }

    #[tokio::test]
    async fn test_source_path_withheld_while_switch_in_flight() {
        let fetcher = StaticFetcher::new();
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&state("v1", &["built-ins"]), &fetcher).await.unwrap();
        assert_eq!(reconciler.source_path().unwrap(), "t262-v1/test/built-ins");

        let ticket = match reconciler.observe(&state("v2", &["intl402"])) {
            Reconciliation::Fetch(ticket) => ticket,
            other => panic!("expected fetch, got {:?}", other),
        };
        assert!(reconciler.source_path().is_none());
        assert!(reconciler.source_url("https://example.test").is_none());

        let outcome = load_result_info(&fetcher, ticket.version()).await;
        reconciler.complete(ticket, outcome).unwrap();
        assert_eq!(reconciler.source_path().unwrap(), "t262-v2/test/intl402");
    }

    #[test]
    fn test_source_path_unavailable_before_load() {
        let mut reconciler = Reconciler::new();
        reconciler.observe(&state("v1", &["built-ins"]));
        assert!(reconciler.source_path().is_none());
        assert!(!reconciler.cache().is_loaded());
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn test_open_default_and_descend() {
        let mut session = Session::new(config(), StaticFetcher::new());
        let root = session.open_default().await.unwrap().unwrap();
        assert_eq!(root.suite().unwrap().name, "test");

        session.navigate_to_suite("built-ins").await.unwrap();
        let array = session.navigate_to_suite("Array").await.unwrap().unwrap();
        assert_eq!(array.suite().unwrap().name, "Array");
        assert_eq!(session.history().len(), 3);
        assert_eq!(
            session.state().unwrap().test_path,
            vec!["v1", "built-ins", "Array"]
        );
    }

    #[tokio::test]
    async fn test_breadcrumb_and_ascend() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open(state("v1", &["built-ins", "Array", "from"])).await.unwrap();

        let view = session.slice_nav_to_index(2).await.unwrap().unwrap();
        assert_eq!(view.suite().unwrap().name, "built-ins");

        let view = session.ascend(10).await.unwrap().unwrap();
        assert_eq!(view.suite().unwrap().name, "test");
        assert_eq!(session.state().unwrap().test_path, vec!["v1"]);
    }

    #[tokio::test]
    async fn test_back_and_forward_re_resolve() {
        let fetcher = StaticFetcher::new();
        let mut session = Session::new(config(), fetcher);
        session.open_default().await.unwrap();
        session.navigate_to_suite("language").await.unwrap();
        session.switch_version("v2").await.unwrap();

        let back = session.back().await.unwrap().unwrap();
        assert_eq!(back.results().version, "v1");
        assert_eq!(back.suite().unwrap().name, "language");

        let forward = session.forward().await.unwrap().unwrap();
        assert_eq!(forward.results().version, "v2");
        assert!(session.forward().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_options_are_kept_across_navigation() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open_default().await.unwrap();
        session.set_filter_option(FilterOption::Failed).await.unwrap();
        session.set_sort_option(SortOption::MostPassed).await.unwrap();
        session.set_ecmascript_flag(Some("es2020")).await.unwrap();
        session.navigate_to_suite("built-ins").await.unwrap();

        let state = session.state().unwrap();
        assert_eq!(state.filter_option, FilterOption::Failed);
        assert_eq!(state.sort_option, SortOption::MostPassed);
        assert_eq!(state.ecmascript_version.as_deref(), Some("es2020"));
    }

    #[tokio::test]
    async fn test_unknown_version_pushes_nothing() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open_default().await.unwrap();
        let err = session.switch_version("v9").await.unwrap_err();
        assert!(matches!(err, Error::UnknownVersion(_)));
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn test_no_source_link_after_failed_switch() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open_default().await.unwrap();
        assert!(session.switch_version("broken").await.is_err());
        assert!(session.navigate_to_suite("built-ins").await.is_err());

        assert_eq!(session.state().unwrap().version.tag_name, "broken");
        assert_eq!(session.current().unwrap().results().version, "v1");
        assert_eq!(session.source_url(), None);

        session.switch_version("v1").await.unwrap();
        assert_eq!(
            session.source_url().unwrap(),
            "https://github.com/tc39/test262/tree/t262-v1/test"
        );
    }

    #[tokio::test]
    async fn test_ascend_from_empty_path_returns_to_root() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open(state("v1", &["built-ins"])).await.unwrap();

        let view = session.slice_nav_to_index(0).await.unwrap().unwrap();
        assert!(view.suite().is_none());
        assert!(matches!(view.require_suite(), Err(Error::Path(PathError::Empty))));

        let view = session.ascend(1).await.unwrap().unwrap();
        assert_eq!(view.require_suite().unwrap().name, "test");
        assert_eq!(session.state().unwrap().test_path, vec!["v1"]);
    }

    #[tokio::test]
    async fn test_actions_before_open_fail() {
        let mut session = Session::new(config(), StaticFetcher::new());
        assert!(matches!(
            session.navigate_to_suite("built-ins").await,
            Err(Error::NotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_render_view_report() {
        let mut session = Session::new(config(), StaticFetcher::new());
        session.open(state("v1", &["built-ins", "Array"])).await.unwrap();
        session.set_filter_option(FilterOption::Failed).await.unwrap();
        let view = session.set_selected_test(Some("proto-from-ctor-realm.js")).await.unwrap().unwrap();

        let report = render_view(&view, "https://github.com/tc39/test262/tree");
        assert!(report.contains("=== v1 / built-ins / Array ==="));
        assert!(report.contains("Total: 4 | Pass: 3"));
        assert!(report.contains("from"));
        assert!(report.contains("> FAIL"));
        assert!(!report.contains("length.js"));
        assert!(report.contains(
            "Source: https://github.com/tc39/test262/tree/t262-v1/test/built-ins/Array/proto-from-ctor-realm.js"
        ));
        assert_eq!(
            session.source_url().unwrap(),
            "https://github.com/tc39/test262/tree/t262-v1/test/built-ins/Array/proto-from-ctor-realm.js"
        );
    }

    #[tokio::test]
    async fn test_render_invalid_path() {
        let mut session = Session::new(config(), StaticFetcher::new());
        let view = session.open(state("v1", &["nope"])).await.unwrap().unwrap();
        let report = render_view(&view, "https://example.test");
        assert!(report.contains("No suite at this path"));
        assert!(report.contains("'nope'"));
    }
}
