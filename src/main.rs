mod layout;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize LLM client (non-fatal: AI features disabled if config missing).
    let llm = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = client.model(), "LLM client initialized");
            Some(Arc::new(client) as Arc<dyn llm::LlmChat>)
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI features disabled");
            None
        }
    };

    let state = state::AppState::new(llm);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "collabboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
