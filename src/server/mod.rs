//! HTTP surface (feature `serve`): restore a list from `faction` / `army`
//! query parameters and return its summary or print sheet.

use crate::catalog::Catalog;
use crate::codec::{Location, ARMY_PARAM, FACTION_PARAM};
use crate::config::BuilderConfig;
use crate::report::{build_print_sheet, faction_info, render_html, FactionInfo};
use crate::session::{BuilderSession, ListSummary};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerState {
    pub catalog: Arc<Catalog>,
    pub config: BuilderConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub faction: Option<String>,
    pub army: Option<String>,
}

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/factions", get(api_factions))
        .route("/api/factions/:name", get(api_faction_info))
        .route("/api/list", get(api_list))
        .route("/print", get(print_page))
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: ServerState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", addr);
    axum::serve(listener, build_router(state)).await
}

/// Each request restores its own session; the catalog is the only shared state.
fn session_for(state: &ServerState, query: &ListQuery) -> Result<BuilderSession, (StatusCode, String)> {
    let mut location = Location::parse(&state.config.base_url)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("bad base_url: {}", e)))?;
    let mut url = location.url().clone();
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(f) = &query.faction {
            pairs.append_pair(FACTION_PARAM, f);
        }
        if let Some(a) = &query.army {
            pairs.append_pair(ARMY_PARAM, a);
        }
    }
    location.replace(url);
    Ok(BuilderSession::restore(
        Arc::clone(&state.catalog),
        location,
        state.config.debounce(),
    ))
}

async fn health() -> &'static str {
    "ok"
}

async fn api_factions(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    Json(state.catalog.faction_names().map(str::to_string).collect())
}

async fn api_faction_info(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<Json<FactionInfo>, (StatusCode, String)> {
    faction_info(&state.catalog, &name)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, format!("unknown faction: {}", name)))
}

async fn api_list(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListSummary>, (StatusCode, String)> {
    let session = session_for(&state, &query)?;
    Ok(Json(session.summary()))
}

async fn print_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let session = session_for(&state, &query)?;
    let sheet = build_print_sheet(session.catalog(), session.list())
        .ok_or((StatusCode::NOT_FOUND, "no faction selected".to_string()))?;
    Ok(Html(render_html(&sheet)))
}
