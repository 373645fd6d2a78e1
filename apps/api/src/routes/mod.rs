pub mod health;

use std::collections::HashMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    routing::{get, post, MethodRouter},
    Router,
};

use crate::matching::handlers::handle_generate_filters;
use crate::providers::Provider;
use crate::search::handlers::{handle_search_query, handle_search_upload};
use crate::state::AppState;

/// Résumé uploads are larger than axum's 2 MB default.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// GET takes filters from the query string; POST takes a multipart form
/// with an optional résumé.
fn search_route(provider: Provider) -> MethodRouter<AppState> {
    get(
        move |state: State<AppState>, query: Query<HashMap<String, String>>| {
            handle_search_query(provider, state, query)
        },
    )
    .post(move |state: State<AppState>, multipart: Multipart| {
        handle_search_upload(provider, state, multipart)
    })
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/fetch_jobs", search_route(Provider::Jobs))
        .route("/fetch_internships", search_route(Provider::Internships))
        .route("/fetch_yc_jobs", search_route(Provider::YcJobs))
        .route("/fetch_adzuna_jobs", search_route(Provider::Adzuna))
        .route("/generate_filters", post(handle_generate_filters))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
