mod api;

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use catalog::ProjectConfig;
use gateway::{
    FilesystemGateway, Gateway, GatewayCell, GatewayError, HttpGateway, StorageConfig,
};
use tokio::sync::OnceCell;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("DOCVIEW_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:9200".to_string())
        .parse()
        .expect("invalid DOCVIEW_ADDR");
    let config_path =
        env::var("DOCVIEW_CONFIG").unwrap_or_else(|_| "projects-config.json".to_string());
    let storage_root = PathBuf::from(
        env::var("DOCVIEW_STORAGE_ROOT").unwrap_or_else(|_| "data/storage".to_string()),
    );
    let public_base =
        env::var("DOCVIEW_PUBLIC_BASE").unwrap_or_else(|_| format!("http://{addr}/storage"));

    let config = match ProjectConfig::load(&config_path) {
        Ok(config) => config,
        Err(err) => {
            error!("error loading {config_path}: {err}");
            std::process::exit(1);
        }
    };
    let project = match config.current_project() {
        Ok(project) => project.clone(),
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    let local = FilesystemGateway::new(&storage_root, public_base);
    let storage = env::var("DOCVIEW_STORAGE_URL").ok().map(|url| {
        let mut storage = config
            .storage()
            .unwrap_or_else(|| StorageConfig::new(url.clone()));
        storage.storage_url = url;
        storage
    });

    let cell = Arc::new(GatewayCell::new());
    let init_local = local.clone();
    let init = cell
        .get_or_try_init(move || async move {
            let gateway: Arc<dyn Gateway> = match storage {
                Some(storage) => {
                    info!(url = %storage.storage_url, bucket = %storage.bucket, "using object storage");
                    Arc::new(HttpGateway::connect(storage)?)
                }
                None => {
                    info!(root = ?init_local.root(), "using local storage");
                    Arc::new(init_local)
                }
            };
            Ok::<_, GatewayError>(gateway)
        })
        .await;
    if let Err(err) = init {
        error!("error initializing storage gateway: {err}");
        std::process::exit(1);
    }

    let state = AppState {
        gateway: cell,
        local: Arc::new(local),
        project: Arc::new(project),
        catalog: Arc::new(OnceCell::new()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/healthz", get(api::healthz))
        .route("/api/project", get(api::get_project))
        .route("/api/participants", get(api::get_participants))
        .route("/api/participants/:id/grid", get(api::get_grid))
        .route(
            "/api/participants/:id/tiles/:position/:level/:x/:y",
            get(api::get_tile),
        )
        .route("/storage/*path", get(api::get_storage))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("tile server listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}
