use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hr_events_service::app_state::AppState;
use hr_events_service::config::Config;
use hr_events_service::db::{self, PgEventLedger, PgHistoryStore, PgProfileStore};
use hr_events_service::kafka::processors::{
    HistoryProcessor, PersonalProcessor, PositionProcessor,
};
use hr_events_service::kafka::{
    ConsumerRunner, ConsumerRunnerConfig, HrEventPublisher, KindProcessor, ValidationRules,
};
use hr_events_service::routes::configure_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        error!("failed to load configuration: {}", e);
        std::process::exit(1);
    });

    let pool = db::create_pool(&config.database.url, config.database.max_connections)
        .await
        .unwrap_or_else(|e| {
            error!("failed to connect to database: {}", e);
            std::process::exit(1);
        });

    if let Err(e) = db::run_migrations(&pool).await {
        error!("failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let ledger = Arc::new(PgEventLedger::new(pool.clone()));
    let profiles = Arc::new(PgProfileStore::new(pool.clone()));
    let history = Arc::new(PgHistoryStore::new(pool.clone()));
    let rules = Arc::new(ValidationRules::default());

    let publisher = Arc::new(HrEventPublisher::new(&config.kafka).unwrap_or_else(|e| {
        error!("failed to create kafka producer: {}", e);
        std::process::exit(1);
    }));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let consumers = &config.consumers;
    let runners: Vec<ConsumerRunner> = vec![
        ConsumerRunner::new(
            ConsumerRunnerConfig {
                brokers: config.kafka.brokers.clone(),
                group_id: consumers.group_personal.clone(),
                topic: config.kafka.topics.personal.clone(),
                retry_interval: Duration::from_millis(consumers.retry_interval_ms),
            },
            Arc::new(PersonalProcessor::new(
                ledger.clone(),
                profiles.clone(),
                rules.clone(),
                consumers.commit_on_dlq_personal,
            )) as Arc<dyn KindProcessor>,
        ),
        ConsumerRunner::new(
            ConsumerRunnerConfig {
                brokers: config.kafka.brokers.clone(),
                group_id: consumers.group_position.clone(),
                topic: config.kafka.topics.position.clone(),
                retry_interval: Duration::from_millis(consumers.retry_interval_ms),
            },
            Arc::new(PositionProcessor::new(
                ledger.clone(),
                profiles.clone(),
                rules.clone(),
                consumers.commit_on_dlq_position,
            )) as Arc<dyn KindProcessor>,
        ),
        ConsumerRunner::new(
            ConsumerRunnerConfig {
                brokers: config.kafka.brokers.clone(),
                group_id: consumers.group_history.clone(),
                topic: config.kafka.topics.history.clone(),
                retry_interval: Duration::from_millis(consumers.retry_interval_ms),
            },
            Arc::new(HistoryProcessor::new(
                ledger.clone(),
                profiles.clone(),
                history.clone(),
                rules.clone(),
                consumers.commit_on_dlq_history,
            )) as Arc<dyn KindProcessor>,
        ),
    ];

    let mut consumer_handles = Vec::with_capacity(runners.len());
    for runner in runners {
        let rx = shutdown_rx.clone();
        consumer_handles.push(tokio::spawn(async move {
            if let Err(e) = runner.run(rx).await {
                error!("consumer runner exited with error: {}", e);
            }
        }));
    }

    let state = web::Data::new(AppState {
        ledger,
        profiles,
        history,
        publisher,
    });
    let pool_data = web::Data::new(pool);

    let bind_addr = (config.app.host.clone(), config.app.port);
    info!(
        host = %config.app.host,
        port = config.app.port,
        env = %config.app.env,
        "starting hr-events-service"
    );

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .app_data(pool_data.clone())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run();

    let result = server.await;

    info!("http server stopped, shutting down consumers");
    let _ = shutdown_tx.send(true);

    for handle in consumer_handles {
        match tokio::time::timeout(Duration::from_secs(10), handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("consumer task panicked: {}", e),
            Err(_) => warn!("consumer did not stop within 10s, abandoning"),
        }
    }

    info!("shutdown complete");
    result
}
