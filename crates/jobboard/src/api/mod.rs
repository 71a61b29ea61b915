use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::api::models::{InfoQuery, MethodResponse};
use crate::config::is_truthy;
use crate::datetime::CreationFormatter;
use crate::i18n::{resolve_lang, Catalog};
use crate::jobs::{collect_jobs, JobSummary, ListingContext};
use crate::queue::{QueueBackend, QueueNamespace};
use crate::scheduler::{scheduler_state, status_pair};
use crate::settings::SettingsSource;
use crate::tenant::resolve_site;

pub mod models;

#[derive(Clone)]
pub struct ApiState {
    pub queues: Arc<dyn QueueBackend>,
    pub settings: Arc<dyn SettingsSource>,
    pub catalog: Arc<Catalog>,
    pub namespace: QueueNamespace,
    pub default_site: Option<String>,
    pub disable_scheduler: bool,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/method/get_info", get(get_info))
        .route("/api/method/get_scheduler_status", get(get_scheduler_status))
        // Health
        .route("/health", get(health))
        .with_state(state)
}

fn internal_err(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!(error = %format!("{e:#}"), "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("internal error: {e}"),
    )
}

fn require_site(state: &ApiState, headers: &HeaderMap) -> Result<String, (StatusCode, String)> {
    resolve_site(headers, state.default_site.as_deref())
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "site could not be determined".into()))
}

pub async fn get_info(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Query(q): Query<InfoQuery>,
) -> Result<Json<MethodResponse<Vec<JobSummary>>>, (StatusCode, String)> {
    let site = require_site(&state, &headers)?;
    let show_failed = q.show_failed.as_deref().map(is_truthy).unwrap_or(false);

    let settings = state
        .settings
        .site_settings(&site)
        .await
        .map_err(internal_err)?;
    let formatter = CreationFormatter::from_settings(
        settings.time_zone.as_deref(),
        settings.date_format.as_deref(),
    );

    let store = state.queues.connect().await.map_err(internal_err)?;
    let ctx = ListingContext {
        site: &site,
        namespace: &state.namespace,
        formatter: &formatter,
    };
    let jobs = collect_jobs(store.as_ref(), &ctx, show_failed)
        .await
        .map_err(internal_err)?;

    tracing::debug!(site = %site, show_failed, count = jobs.len(), "listed background jobs");

    Ok(Json(MethodResponse::new(jobs)))
}

pub async fn get_scheduler_status(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> Result<Json<MethodResponse<[String; 2]>>, (StatusCode, String)> {
    let site = require_site(&state, &headers)?;
    let settings = state
        .settings
        .site_settings(&site)
        .await
        .map_err(internal_err)?;

    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let lang = resolve_lang(accept_language, settings.language.as_deref());

    let scheduler = scheduler_state(state.disable_scheduler, &settings);
    tracing::debug!(site = %site, state = ?scheduler, "scheduler status");

    Ok(Json(MethodResponse::new(status_pair(
        scheduler,
        &state.catalog,
        &lang,
    ))))
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
