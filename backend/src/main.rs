use backend::{app, TaskRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,backend=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("TASKS_BIND").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let registry = TaskRegistry::default();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind task service address");
    tracing::info!("task service listening on http://{bind_addr}");
    axum::serve(listener, app(registry)).await.unwrap();
}
