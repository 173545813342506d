//! Service registration and argument injection across provider boundaries.

use async_trait::async_trait;
use gantry::{
    Application, Config, GantryError, GantryResult, Injection, Methods, Provider, ServiceValue,
    Target,
};
use std::sync::Arc;

struct LogProvider;

#[async_trait]
impl Provider for LogProvider {
    fn name(&self) -> &str {
        "log"
    }

    fn order(&self) -> i32 {
        1
    }

    async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
        app.services()
            .register_value("log.level", "debug".to_string())
    }
}

struct MailProvider;

#[async_trait]
impl Provider for MailProvider {
    fn name(&self) -> &str {
        "mail"
    }

    fn order(&self) -> i32 {
        2
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["log".to_string()]
    }

    async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
        // A factory service: computed from other services at resolution time.
        app.services().register_factory(
            "mailer.banner",
            Injection::function("make_banner", ["log.level"], |args| {
                let level = args.get::<String>(0)?;
                Ok(Arc::new(format!("mailer[{level}]")) as ServiceValue)
            }),
        )
    }
}

#[tokio::test]
async fn test_provider_registered_services_injectable_elsewhere() {
    let app = Application::builder()
        .provider(LogProvider)
        .provider(MailProvider)
        .build();
    app.bootstrap().await.unwrap();

    let banner: Arc<String> = app.get("mailer.banner").unwrap();
    assert_eq!(banner.as_str(), "mailer[debug]");
}

#[tokio::test]
async fn test_call_with_manifest_and_overrides() {
    let app = Application::builder().provider(LogProvider).build();
    app.bootstrap().await.unwrap();

    let target = Target::function(Injection::function(
        "handler",
        ["greeting", "log.level"],
        |args| {
            let greeting = args.get::<String>(0)?;
            let level = args.get::<String>(1)?;
            Ok(Arc::new(format!("{greeting} at {level}")) as ServiceValue)
        },
    ));

    // "greeting" is not registered: supplied positionally instead.
    let greeting: ServiceValue = Arc::new("hello".to_string());
    let result = app.call(&target, &[greeting]).unwrap();
    assert_eq!(
        result.downcast::<String>().unwrap().as_str(),
        "hello at debug"
    );
}

#[tokio::test]
async fn test_method_dispatch_through_app() {
    let app = Application::builder().provider(LogProvider).build();
    app.bootstrap().await.unwrap();

    let controller = Methods::new("StatusController").with_method(
        "show",
        Injection::bound_method("StatusController", "show", ["log.level"], |args| {
            Ok(Arc::new(format!("status: {}", args.get::<String>(0)?)) as ServiceValue)
        }),
    );

    let target = Target::method(Arc::new(controller), "show");
    let result = app.call(&target, &[]).unwrap();
    assert_eq!(
        result.downcast::<String>().unwrap().as_str(),
        "status: debug"
    );
}

#[tokio::test]
async fn test_duplicate_registration_across_providers_fails_bootstrap() {
    struct Clash(&'static str, i32);

    #[async_trait]
    impl Provider for Clash {
        fn name(&self) -> &str {
            self.0
        }

        fn order(&self) -> i32 {
            self.1
        }

        async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
            app.services().register_value("shared.name", 1u8)
        }
    }

    let app = Application::builder()
        .provider(Clash("one", 1))
        .provider(Clash("two", 2))
        .build();

    let err = app.bootstrap().await.unwrap_err();
    assert!(matches!(
        err,
        GantryError::DuplicateService { ref name } if name == "shared.name"
    ));
}

#[tokio::test]
async fn test_config_flows_into_providers() {
    struct Reads;

    #[async_trait]
    impl Provider for Reads {
        fn name(&self) -> &str {
            "reads_config"
        }

        async fn register(&self, app: &Arc<Application>) -> GantryResult<()> {
            let config: Arc<Config> = app.get("config")?;
            let port = config.get_i64("server.port").unwrap_or(0);
            app.services().register_value("server.port", port)
        }
    }

    let config = Config::from_yaml_str("server:\n  port: 9090\n").unwrap();
    let app = Application::builder().config(config).provider(Reads).build();
    app.bootstrap().await.unwrap();

    let port: Arc<i64> = app.get("server.port").unwrap();
    assert_eq!(*port, 9090);
}
