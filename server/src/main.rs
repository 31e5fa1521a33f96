// ABOUTME: leadloop-server binary - serves the lead CRM API and the agent
// ABOUTME: chat endpoints over axum.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use leadloop::store::LeadStore;

mod api;
mod service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_file =
        std::env::var("LEADLOOP_DATA_FILE").unwrap_or_else(|_| "data/leads.json".to_string());
    let store = Arc::new(LeadStore::new(&data_file));

    let runtime = service::build_runtime(store.clone()).await;
    let state = Arc::new(api::AppState {
        store,
        runtime: Mutex::new(runtime),
    });

    let addr: SocketAddr = std::env::var("LEADLOOP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
        .parse()?;

    tracing::info!(%addr, data_file, "starting leadloop server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, api::router(state)).await?;

    Ok(())
}
