use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path as AxumPath, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use catalog::{load_catalog, Catalog, Project};
use foundation::{ParticipantId, Position};
use gateway::{FilesystemGateway, GatewayCell, UrlResolver};
use layout::{compute_grid, GridLayout};
use serde::Serialize;
use serde_json::json;
use streaming::{ObjectFormat, TileAddress, TileSourceDescriptor, TileUrlRegistry};
use tokio::sync::OnceCell;
use tracing::{error, warn};
use viewer::{navigation_entries, NavEntry, ViewerError};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GatewayCell>,
    /// Local mirror served under `/storage`.
    pub local: Arc<FilesystemGateway>,
    pub project: Arc<Project>,
    pub catalog: Arc<OnceCell<Catalog>>,
}

impl AppState {
    /// Project documents, fetched on first use and kept for the process lifetime.
    async fn catalog(&self) -> Result<&Catalog, ViewerError> {
        self.catalog
            .get_or_try_init(move || async move {
                let gateway = self
                    .gateway
                    .ready()
                    .map_err(|_| ViewerError::GatewayNotReady)?;
                load_catalog(gateway.as_ref(), &self.project)
                    .await
                    .map_err(ViewerError::from_document)
            })
            .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub title: String,
    pub participants: usize,
    pub tile_root: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSource {
    pub position: Position,
    #[serde(flatten)]
    pub descriptor: TileSourceDescriptor,
    /// Server route for a tile; `{level}`, `{x}` and `{y}` are substituted by the client.
    pub tile_url_template: String,
    /// Direct storage URL of the coarsest tile.
    pub preview_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub participant: ParticipantId,
    pub team_name: String,
    /// `None` for a participant without pages.
    pub layout: Option<GridLayout>,
    pub pages: Vec<PageSource>,
}

pub fn project_summary(catalog: &Catalog) -> ProjectSummary {
    ProjectSummary {
        id: catalog.project.id.clone(),
        title: catalog.roster.project_title.clone(),
        participants: catalog.metadata.participants.len(),
        tile_root: catalog.project.tile_root().to_string(),
    }
}

/// Grid layout and tile sources of one participant.
pub fn grid_response<R: UrlResolver>(
    catalog: &Catalog,
    id: &ParticipantId,
    resolver: R,
) -> Result<GridResponse, ViewerError> {
    let participant = catalog
        .participant(id)
        .ok_or_else(|| ViewerError::UnknownParticipant { id: id.clone() })?;
    let team_name = catalog.team(id).fullname;

    let Some(grid) = compute_grid(&participant.pages) else {
        warn!("{}", ViewerError::NoPagesForParticipant { id: id.clone() });
        return Ok(GridResponse {
            participant: id.clone(),
            team_name,
            layout: None,
            pages: Vec::new(),
        });
    };

    let mut registry = TileUrlRegistry::new(resolver, catalog.project.tile_root());
    let descriptors = registry.replace_with_grid(id, &grid);
    let pages = grid
        .placements
        .iter()
        .zip(descriptors)
        .map(|(placement, descriptor)| {
            let position = placement.position();
            PageSource {
                position,
                tile_url_template: format!(
                    "/api/participants/{id}/tiles/{}/{{level}}/{{x}}/{{y}}",
                    position.0
                ),
                preview_url: registry.tile_url(descriptor.id, 0, 0, 0),
                descriptor,
            }
        })
        .collect();

    Ok(GridResponse {
        participant: id.clone(),
        team_name,
        layout: Some(grid.layout),
        pages,
    })
}

/// Storage path of one tile, `None` if the page or level does not exist.
pub fn tile_path(
    catalog: &Catalog,
    id: &ParticipantId,
    position: Position,
    level: u32,
    x: u32,
    y: u32,
) -> Option<String> {
    let participant = catalog.participant(id)?;
    let page = participant.pages.iter().find(|p| p.position == position)?;
    TileAddress::new(id.clone(), page).tile_path(catalog.project.tile_root(), level, x, y)
}

fn status_for(err: &ViewerError) -> StatusCode {
    match err {
        ViewerError::GatewayNotReady => StatusCode::SERVICE_UNAVAILABLE,
        ViewerError::DocumentFetch { source, .. } if source.is_not_found() => StatusCode::NOT_FOUND,
        ViewerError::DocumentFetch { .. } => StatusCode::BAD_GATEWAY,
        ViewerError::NoProjectFound { .. }
        | ViewerError::UnknownParticipant { .. }
        | ViewerError::NoPagesForParticipant { .. } => StatusCode::NOT_FOUND,
        ViewerError::ConfigLoad(_) | ViewerError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: ViewerError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("{err}");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

pub async fn get_project(State(state): State<AppState>) -> Response {
    match state.catalog().await {
        Ok(catalog) => Json(project_summary(catalog)).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn get_participants(State(state): State<AppState>) -> Response {
    match state.catalog().await {
        Ok(catalog) => {
            let entries: Vec<NavEntry> = navigation_entries(catalog, None);
            Json(entries).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub async fn get_grid(State(state): State<AppState>, AxumPath(id): AxumPath<String>) -> Response {
    let catalog = match state.catalog().await {
        Ok(catalog) => catalog,
        Err(err) => return error_response(err),
    };
    match grid_response(catalog, &ParticipantId::new(id), state.gateway.clone()) {
        Ok(grid) => Json(grid).into_response(),
        Err(err) => error_response(err),
    }
}

pub async fn get_tile(
    State(state): State<AppState>,
    AxumPath((id, position, level, x, y)): AxumPath<(String, i64, u32, u32, u32)>,
) -> Response {
    let catalog = match state.catalog().await {
        Ok(catalog) => catalog,
        Err(err) => return error_response(err),
    };
    let id = ParticipantId::new(id);
    let Some(path) = tile_path(catalog, &id, Position(position), level, x, y) else {
        return (StatusCode::NOT_FOUND, "tile unavailable").into_response();
    };
    let url = state.gateway.resolve_public_url(&path);
    if url.is_empty() {
        return error_response(ViewerError::GatewayNotReady);
    }
    Redirect::temporary(&url).into_response()
}

pub async fn get_storage(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Response {
    let local = match state.local.local_path(&path) {
        Ok(local) => local,
        Err(err) => {
            warn!(path = err.path().unwrap_or_default(), "rejected storage path: {err}");
            return (StatusCode::BAD_REQUEST, "invalid path").into_response();
        }
    };
    serve_file(&local, ObjectFormat::from_path(&path).content_type()).await
}

async fn serve_file(path: &Path, content_type: &str) -> Response {
    match tokio::fs::read(path).await {
        Ok(data) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_str(content_type)
                    .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
            );
            headers.insert(
                http::header::CACHE_CONTROL,
                HeaderValue::from_static("public, max-age=3600"),
            );
            (StatusCode::OK, headers, Body::from(data)).into_response()
        }
        Err(err) => {
            warn!("file read failed: {path:?} -> {err}");
            (StatusCode::NOT_FOUND, "not found").into_response()
        }
    }
}
