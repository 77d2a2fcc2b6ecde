//! Dashboard HTTP Server
//! Serves the single dashboard page and the JSON endpoints behind it.

use crate::charts::{ChartEngine, ChartSpec, EngineError, Selection, ALL_STATES};
use crate::data::CovidData;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

use super::page::INDEX_HTML;

/// Server configuration; the port is the only tunable.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8081 }
    }
}

/// Shared state handed to every handler: the immutable loaded table.
#[derive(Clone)]
struct AppState {
    data: Arc<CovidData>,
}

/// Dropdown option lists derived from the loaded table, plus the selection
/// the page starts from.
#[derive(Debug, Serialize)]
struct OptionsResponse {
    states: Vec<String>,
    months: Vec<String>,
    years: Vec<i32>,
    default: Selection,
}

/// The two cross-filtered charts for one selection.
#[derive(Debug, Serialize)]
struct ChartsResponse {
    cases: ChartSpec,
    deaths: ChartSpec,
}

struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            EngineError::InvalidSelection { .. } => StatusCode::BAD_REQUEST,
            EngineError::Filter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Serve the dashboard until the process is terminated.
pub async fn serve(data: Arc<CovidData>, config: ServerConfig) -> anyhow::Result<()> {
    let router = Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/charts", get(charts))
        .with_state(AppState { data });

    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, router).await?;
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let data = &state.data;

    let mut states = vec![ALL_STATES.to_string()];
    states.extend(data.states());

    Json(OptionsResponse {
        states,
        months: data.month_names(),
        years: data.years(),
        default: Selection::default(),
    })
}

async fn charts(
    State(state): State<AppState>,
    Query(selection): Query<Selection>,
) -> Result<Json<ChartsResponse>, ApiError> {
    tracing::debug!(
        state = %selection.state,
        month = %selection.month,
        year = selection.year,
        "recomputing charts"
    );

    let (cases, deaths) = ChartEngine::render(&state.data, &selection)?;
    Ok(Json(ChartsResponse { cases, deaths }))
}
