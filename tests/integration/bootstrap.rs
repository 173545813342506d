//! Bootstrap ordering, gating and event emission across many providers.

use super::common::{entries, hook_log, init_tracing, Recording};
use async_trait::async_trait;
use gantry::{
    Application, Context, Environment, Event, GantryError, GantryResult, Gate, Provider,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_dependency_order_with_numeric_tiebreak() {
    // A (order 0), B (order 10, depends on A), C (order 5, depends on A):
    // register and boot order must be A, C, B.
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Recording::new("a", 0, &[], &log))
        .provider(Recording::new("b", 10, &["a"], &log))
        .provider(Recording::new("c", 5, &["a"], &log))
        .build();

    app.bootstrap().await.unwrap();

    assert_eq!(app.boot_order(), vec!["a", "c", "b"]);
    assert_eq!(
        entries(&log),
        vec![
            "register:a",
            "register:c",
            "register:b",
            "boot:a",
            "boot:c",
            "boot:b",
        ]
    );
}

#[tokio::test]
async fn test_all_registers_complete_before_first_boot() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Recording::new("one", 1, &[], &log))
        .provider(Recording::new("two", 2, &[], &log))
        .build();

    app.bootstrap().await.unwrap();

    let recorded = entries(&log);
    let first_boot = recorded.iter().position(|e| e.starts_with("boot:")).unwrap();
    let last_register = recorded
        .iter()
        .rposition(|e| e.starts_with("register:"))
        .unwrap();
    assert!(last_register < first_boot);
}

#[tokio::test]
async fn test_tiebreak_is_deterministic_across_runs() {
    init_tracing();
    for _ in 0..5 {
        let log = hook_log();
        let app = Application::builder()
            .provider(Recording::new("first", 50, &[], &log))
            .provider(Recording::new("second", 50, &[], &log))
            .build();
        app.bootstrap().await.unwrap();
        assert_eq!(app.boot_order(), vec!["first", "second"]);
    }
}

#[tokio::test]
async fn test_gated_out_provider_never_runs() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .environment(Environment::Development)
        .context(Context::Web)
        .provider(
            Recording::new("prod_only", 1, &[], &log)
                .with_environments(Gate::only([Environment::Production])),
        )
        .provider(Recording::new("always", 2, &[], &log))
        .build();

    app.bootstrap().await.unwrap();

    assert_eq!(app.boot_order(), vec!["always"]);
    // The skipped provider still occupies a slot in the index.
    assert_eq!(app.provider_names(), vec!["prod_only", "always"]);
    assert_eq!(entries(&log), vec!["register:always", "boot:always"]);
}

#[tokio::test]
async fn test_context_gating() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .context(Context::Cli)
        .provider(
            Recording::new("web_only", 1, &[], &log).with_contexts(Gate::only([Context::Web])),
        )
        .provider(
            Recording::new("cli_tool", 2, &[], &log).with_contexts(Gate::only([Context::Cli])),
        )
        .build();

    app.bootstrap().await.unwrap();
    assert_eq!(app.boot_order(), vec!["cli_tool"]);
}

#[tokio::test]
async fn test_missing_dependency_aborts_before_any_boot() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Recording::new("healthy", 1, &[], &log))
        .provider(Recording::new("needy", 2, &["phantom"], &log))
        .build();

    let err = app.bootstrap().await.unwrap_err();
    assert!(matches!(err, GantryError::MissingDependency { .. }));

    // Order resolution failed before the first register, so no hook ran.
    assert!(entries(&log).is_empty());
    assert!(!app.is_booted());
}

#[tokio::test]
async fn test_dependency_on_gated_out_provider_is_fatal() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .environment(Environment::Local)
        .provider(
            Recording::new("prod_only", 1, &[], &log)
                .with_environments(Gate::only([Environment::Production])),
        )
        .provider(Recording::new("needy", 2, &["prod_only"], &log))
        .build();

    let err = app.bootstrap().await.unwrap_err();
    match err {
        GantryError::MissingDependency {
            provider,
            dependency,
            ..
        } => {
            assert_eq!(provider, "needy");
            assert_eq!(dependency, "prod_only");
        }
        other => panic!("expected MissingDependency, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cyclic_dependency_is_fatal() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Recording::new("ouro", 1, &["boros"], &log))
        .provider(Recording::new("boros", 2, &["ouro"], &log))
        .build();

    let err = app.bootstrap().await.unwrap_err();
    assert!(matches!(err, GantryError::CyclicDependency { .. }));
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_register_failure_propagates_and_stops() {
    struct Failing;

    #[async_trait]
    impl Provider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn order(&self) -> i32 {
            1
        }

        async fn register(&self, _app: &Arc<Application>) -> GantryResult<()> {
            Err(GantryError::Config("refused to start".to_string()))
        }
    }

    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Failing)
        .provider(Recording::new("after", 2, &[], &log))
        .build();

    let err = app.bootstrap().await.unwrap_err();
    assert!(matches!(err, GantryError::Config(_)));
    // Nothing after the failure registered or booted.
    assert!(entries(&log).is_empty());
}

#[tokio::test]
async fn test_lifecycle_events_emitted_in_sequence() {
    init_tracing();
    let log = hook_log();
    let app = Application::builder()
        .provider(Recording::new("solo", 1, &[], &log))
        .build();

    let mut rx = app.events().subscribe();
    app.bootstrap().await.unwrap();

    let mut observed = Vec::new();
    while let Ok(event) = rx.try_recv() {
        observed.push(event);
    }

    assert_eq!(
        observed,
        vec![
            Event::ProviderLoading {
                provider: "solo".to_string()
            },
            Event::ProviderLoaded {
                provider: "solo".to_string()
            },
            Event::ProvidersRegistered { count: 1 },
            Event::ProviderBooted {
                provider: "solo".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_async_setup_coordinates_through_custom_event() {
    // A provider whose setup is asynchronous spawns the work during `boot`
    // and announces completion on the bus; boot order alone does not imply
    // the work has finished.
    struct Database;

    #[async_trait]
    impl Provider for Database {
        fn name(&self) -> &str {
            "database"
        }

        async fn boot(&self, app: &Arc<Application>) -> GantryResult<()> {
            let events = app.events().clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                events.emit(Event::Custom {
                    name: "database.connected".to_string(),
                });
            });
            Ok(())
        }
    }

    init_tracing();
    let app = Application::builder().provider(Database).build();
    let mut rx = app.events().subscribe();
    app.bootstrap().await.unwrap();

    // Bootstrap returned before the spawned work completed; the dependent
    // side waits for the explicit notification instead.
    let connected = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match rx.recv().await {
                Ok(Event::Custom { name }) if name == "database.connected" => break true,
                Ok(_) => continue,
                Err(_) => break false,
            }
        }
    })
    .await
    .unwrap();
    assert!(connected);
}
