use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::server::AppState;
use crate::storage::StoreStats;
use std::sync::Arc;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    #[serde(flatten)]
    pub records: StoreStats,
}

pub async fn graphql(State(state): State<Arc<AppState>>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

pub async fn playground(State(state): State<Arc<AppState>>) -> Response {
    if !state.playground {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(playground_source(GraphQLPlaygroundConfig::new("/"))).into_response()
}

pub async fn healthz(State(state): State<Arc<AppState>>) -> Json<Health> {
    let records = state.store.read().await.stats();
    Json(Health { status: "ok", records })
}
