use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;

use crate::controller::{ControllerHandle, DashboardState};
use crate::panel::{visible_panels, PanelId, PanelView};

pub struct AppState {
    pub dashboard: ControllerHandle,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    loading: bool,
    focused: Option<PanelId>,
    error: Option<String>,
    panels: Vec<PanelView>,
}

impl DashboardResponse {
    fn from_state(state: &DashboardState) -> Self {
        DashboardResponse {
            loading: !state.is_ready(),
            focused: state.focused,
            error: state.last_error.clone(),
            panels: state
                .snapshot()
                .map(|snapshot| visible_panels(snapshot, state.focused))
                .unwrap_or_default(),
        }
    }
}

// Current panels, filtered by focus
async fn get_dashboard(state: web::Data<AppState>) -> Result<HttpResponse> {
    let current = state.dashboard.current();
    Ok(HttpResponse::Ok().json(DashboardResponse::from_state(&current)))
}

// Focus toggle endpoint
async fn select_panel(id: web::Path<u8>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let panel = match PanelId::try_from(id.into_inner()) {
        Ok(panel) => panel,
        Err(e) => return Ok(HttpResponse::BadRequest().json(serde_json::json!({"error": e}))),
    };

    if let Err(e) = state.dashboard.select(panel).await {
        return Ok(HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({"error": e.to_string()})));
    }

    let current = state.dashboard.current();
    Ok(HttpResponse::Ok().json(DashboardResponse::from_state(&current)))
}

// Full snapshot, once bootstrapped
async fn get_snapshot(state: web::Data<AppState>) -> Result<HttpResponse> {
    let current = state.dashboard.current();
    match current.snapshot() {
        Some(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        None => Ok(HttpResponse::ServiceUnavailable()
            .json(serde_json::json!({"error": "Snapshot not loaded yet"}))),
    }
}

async fn get_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.dashboard.current().status()))
}

// Caller-driven bootstrap retry, a no-op once the snapshot is loaded
async fn reload(state: web::Data<AppState>) -> Result<HttpResponse> {
    match state.dashboard.reload() {
        Ok(()) => Ok(HttpResponse::Accepted().json(serde_json::json!({"success": true}))),
        Err(e) => Ok(HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        }))),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/dashboard", web::get().to(get_dashboard))
        .route("/api/focus/{id}", web::post().to(select_panel))
        .route("/api/snapshot", web::get().to(get_snapshot))
        .route("/api/status", web::get().to(get_status))
        .route("/api/reload", web::post().to(reload));
}

pub async fn start_server(port: u16, dashboard: ControllerHandle) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState { dashboard });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("127.0.0.1", port))?
    .run()
    .await
}
