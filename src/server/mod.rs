pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::AppError;

pub use state::AppState;

/// Assemble the dashboard router: the HTML page, the JSON metrics API and
/// the filtered-CSV download.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::pagina))
        .route("/api/kpis", get(routes::kpis))
        .route("/api/insights", get(routes::insights))
        .route("/api/series/{campo}", get(routes::serie))
        .route("/api/temporal", get(routes::temporal))
        .route("/api/opcoes", get(routes::opcoes))
        .route("/exportar.csv", get(routes::exportar))
        .with_state(state)
}

/// Bind and serve until interrupted.
pub async fn serve(state: AppState, porta: u16) -> Result<(), AppError> {
    let router = build_router(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::UNSPECIFIED, porta)).await?;
    info!("Dashboard disponível em http://{}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}
