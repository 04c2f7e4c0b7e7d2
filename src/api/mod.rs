use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SyncConfig;
use crate::forms::{validate_field, CharacterCounter, FieldInput, ValidationOutcome};
use crate::models::{ApiResponse, Notification};
use crate::services::{HttpFetcher, Poller};
use crate::view::export::{table_to_csv, CSV_CONTENT_TYPE};
use crate::view::filter::FilterSnapshot;
use crate::view::html::render_page;
use crate::view::render::FixtureRow;
use crate::view::table::SortDirection;
use crate::view::{FixtureView, SharedView, SyncStatus};

#[derive(Clone)]
pub struct AppState {
    pub view: SharedView,
    pub export_filename: Arc<str>,
}

pub async fn serve(config: SyncConfig, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Fixture view listening on port {}", port);

    serve_on(listener, config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

/// Serve the fixture view on a bound listener until `shutdown` resolves.
///
/// The first fetch runs in the background; the page shows an empty table
/// until it lands.
pub async fn serve_on<F>(listener: TcpListener, config: SyncConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let view = FixtureView::new().shared();
    let fetcher = Arc::new(HttpFetcher::new(&config.api_url));
    tracing::info!("Polling {} every {:?}", fetcher.endpoint(), config.poll_interval);

    let poller = Poller::new(fetcher, Arc::clone(&view), config.poll_interval);
    poller.spawn_refresh();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    let state = AppState {
        view,
        export_filename: config.export_filename.into(),
    };
    let app = create_router().with_state(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Shutting down fixture view");
        })
        .await?;

    let _ = shutdown_tx.send(true);
    poller_task.await?;
    Ok(())
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/fixture", get(fixture_page_handler))
        .route("/fixture/rows", get(fixture_rows_handler))
        .route("/fixture/status", get(sync_status_handler))
        .route("/fixture/sort/{column}", get(sort_handler))
        .route("/fixture/export.csv", get(export_handler))
        .route("/partidos/{id}/detalle", get(detail_handler))
        .route("/notificaciones", get(notifications_handler))
        .route("/validar", post(validate_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

// Health check endpoint
async fn health_check() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("Fixture view is running"))
}

// GET /fixture - The fixture page. Filter params act like the page's filter controls.
#[derive(Deserialize)]
struct FixtureQuery {
    fase: Option<String>,
    estado: Option<String>,
    equipo: Option<String>,
    q: Option<String>,
}

async fn fixture_page_handler(
    State(state): State<AppState>,
    Query(params): Query<FixtureQuery>,
) -> Html<String> {
    let mut view = state.view.write().await;

    if params.fase.is_some() || params.estado.is_some() || params.equipo.is_some() {
        view.set_filter(FilterSnapshot::new(
            params.fase.unwrap_or_default(),
            params.estado.unwrap_or_default(),
            params.equipo.unwrap_or_default(),
        ));
    }
    if let Some(q) = params.q {
        view.set_search(&q);
    }

    Html(render_page(&view))
}

// GET /fixture/rows - Rendered rows with their current visibility
async fn fixture_rows_handler(State(state): State<AppState>) -> Json<ApiResponse<Vec<FixtureRow>>> {
    let view = state.view.read().await;
    Json(ApiResponse::success(view.table().rows().to_vec()))
}

async fn sync_status_handler(State(state): State<AppState>) -> Json<ApiResponse<SyncStatus>> {
    let view = state.view.read().await;
    Json(ApiResponse::success(view.status().clone()))
}

// GET /fixture/sort/{column} - Header click
#[derive(Serialize)]
struct SortResponse {
    column: usize,
    direction: SortDirection,
    rows: Vec<FixtureRow>,
}

async fn sort_handler(
    State(state): State<AppState>,
    Path(column): Path<usize>,
) -> Result<Json<ApiResponse<SortResponse>>, (StatusCode, Json<ApiResponse<()>>)> {
    let mut view = state.view.write().await;
    match view.sort_by(column) {
        Ok(direction) => Ok(Json(ApiResponse::success(SortResponse {
            column,
            direction,
            rows: view.table().rows().to_vec(),
        }))),
        Err(e) => Err((StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string())))),
    }
}

// GET /fixture/export.csv - Download the whole table
async fn export_handler(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    let view = state.view.read().await;
    match table_to_csv(view.table()) {
        Ok(csv) => Ok((
            [
                (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", state.export_filename),
                ),
            ],
            csv,
        )),
        Err(e) => {
            tracing::error!("Failed to export fixture table: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

// GET /partidos/{id}/detalle - Row detail trigger
async fn detail_handler(
    State(state): State<AppState>,
    Path(partido_id): Path<String>,
) -> Result<Json<ApiResponse<Notification>>, StatusCode> {
    let mut view = state.view.write().await;
    let trigger = match view.find_row(&partido_id) {
        Some(row) => row.detail.clone(),
        None => return Err(StatusCode::NOT_FOUND),
    };
    let notification = trigger.activate(view.notifications_mut());
    Ok(Json(ApiResponse::success(notification)))
}

async fn notifications_handler(State(state): State<AppState>) -> Json<ApiResponse<Vec<Notification>>> {
    let view = state.view.read().await;
    Json(ApiResponse::success(view.notifications().active()))
}

// POST /validar - Blur-time field validation
#[derive(Serialize)]
struct ValidationResponse {
    outcome: ValidationOutcome,
    css_class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    counter: Option<CharacterCounter>,
}

async fn validate_handler(Json(field): Json<FieldInput>) -> Json<ApiResponse<ValidationResponse>> {
    let outcome = validate_field(&field);
    let css_class = outcome.css_class();
    Json(ApiResponse::success(ValidationResponse {
        outcome,
        css_class,
        counter: field.counter(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::view::test_support::partido;

    async fn spawn_app() -> (String, SharedView) {
        let view = FixtureView::new().shared();
        view.write().await.accept(
            1,
            &[
                partido("1", "grupos", "finalizado", "Norte", "Sur"),
                partido("2", "final", "programado", "Este, \"B\"", "Oeste"),
            ],
        );
        let state = AppState {
            view: Arc::clone(&view),
            export_filename: "datos_exportados.csv".into(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router().with_state(state)).await.unwrap();
        });
        (format!("http://{}", addr), view)
    }

    #[tokio::test]
    async fn test_fixture_page_stores_filter() {
        let (base, view) = spawn_app().await;
        let page = reqwest::get(format!("{}/fixture?fase=final", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert!(page.contains("partidosTable"));

        let view = view.read().await;
        assert_eq!(view.filter(), Some(&FilterSnapshot::new("final", "", "")));
        assert_eq!(view.table().visible_rows().count(), 1);
    }

    #[tokio::test]
    async fn test_export_download() {
        let (base, _view) = spawn_app().await;
        let response = reqwest::get(format!("{}/fixture/export.csv", base)).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(
            response.headers()["content-disposition"],
            "attachment; filename=\"datos_exportados.csv\""
        );
        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv"));

        let body = response.text().await.unwrap();
        assert_eq!(body.lines().count(), 3);
        assert!(body.contains(r#""Este, ""B""""#));
    }

    #[tokio::test]
    async fn test_sort_and_bad_column() {
        let (base, _view) = spawn_app().await;
        let ok = reqwest::get(format!("{}/fixture/sort/2", base)).await.unwrap();
        assert_eq!(ok.status().as_u16(), 200);
        let body: serde_json::Value = ok.json().await.unwrap();
        assert_eq!(body["data"]["direction"], "desc");
        assert_eq!(body["data"]["rows"][0]["attrs"]["equipo_local"], "Norte");

        let bad = reqwest::get(format!("{}/fixture/sort/6", base)).await.unwrap();
        assert_eq!(bad.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_detail_trigger() {
        let (base, _view) = spawn_app().await;
        let body: serde_json::Value = reqwest::get(format!("{}/partidos/2/detalle", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["message"], "Detalles del partido 2");

        let active: serde_json::Value = reqwest::get(format!("{}/notificaciones", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(active["data"].as_array().unwrap().len(), 1);

        let missing = reqwest::get(format!("{}/partidos/99/detalle", base)).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_validate_endpoint() {
        let (base, _view) = spawn_app().await;
        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/validar", base))
            .json(&serde_json::json!({"kind": "email", "required": true, "value": "nope"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["outcome"]["result"], "invalid");
        assert_eq!(body["data"]["outcome"]["message"], "Formato de email inválido");
        assert_eq!(body["data"]["css_class"], "is-invalid");
        assert!(body["data"].get("counter").is_none());
    }

    #[tokio::test]
    async fn test_validate_endpoint_counts_characters() {
        let (base, _view) = spawn_app().await;
        let body: serde_json::Value = reqwest::Client::new()
            .post(format!("{}/validar", base))
            .json(&serde_json::json!({"kind": "textarea", "value": "hola", "max_length": 4}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["outcome"]["result"], "valid");
        assert_eq!(body["data"]["counter"]["text"], "4/4");
        assert_eq!(body["data"]["counter"]["warning"], true);
    }

    #[tokio::test]
    async fn test_serves_while_upstream_hangs() {
        // Upstream accepts connections and never answers
        let upstream = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let upstream_addr = upstream.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = upstream.accept().await {
                held.push(socket);
            }
        });

        let config = SyncConfig {
            api_url: format!("http://{}", upstream_addr),
            ..Default::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
        let server = tokio::spawn(serve_on(listener, config, async move {
            let _ = stop_rx.await;
        }));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let health = client.get(format!("{}/health", base)).send().await.unwrap();
        assert_eq!(health.status().as_u16(), 200);

        let status: serde_json::Value = client
            .get(format!("{}/fixture/status", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(status["data"]["accepted"], 0);
        drop(client);

        stop_tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
    }
}
