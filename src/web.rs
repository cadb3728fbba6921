use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::Result;
use crate::api;
use crate::planner::PreparednessPlanner;

pub fn app(planner: Arc<PreparednessPlanner>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", api::router(planner)).layer(cors)
}

pub async fn run(planner: Arc<PreparednessPlanner>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app(planner)).await?;
    Ok(())
}
