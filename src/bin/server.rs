use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use chest_cutlist::carcass::{CarcassDimensions, compute_carcass};
use chest_cutlist::config::ChestConfig;
use chest_cutlist::cutlist::aggregate;
use chest_cutlist::drawer::{DrawerBoxDimensions, compute_drawer_boxes};
use chest_cutlist::optimizer::{CutlistPlan, default_sheets, optimize};
use chest_cutlist::types::{CutPiece, StockSheet};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct OptimizeRequest {
    config: ChestConfig,
    /// One sheet per thickness; 4x8 sheets of every used thickness when absent.
    #[serde(default)]
    sheets: Option<Vec<StockSheet>>,
    #[serde(default = "default_true")]
    allow_rotation: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
struct DimensionsResponse {
    carcass: CarcassDimensions,
    drawers: Vec<DrawerBoxDimensions>,
}

#[derive(Serialize)]
struct OptimizeResponse {
    plan: CutlistPlan,
    sheet_count: usize,
    waste_percent: f64,
}

fn check(config: &ChestConfig) -> Result<(), (StatusCode, String)> {
    config
        .validate()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

async fn dimensions(
    Json(config): Json<ChestConfig>,
) -> Result<Json<DimensionsResponse>, (StatusCode, String)> {
    tracing::info!(columns = config.columns.len(), "POST /dimensions");
    check(&config)?;
    Ok(Json(DimensionsResponse {
        carcass: compute_carcass(&config),
        drawers: compute_drawer_boxes(&config),
    }))
}

async fn cutlist(
    Json(config): Json<ChestConfig>,
) -> Result<Json<Vec<CutPiece>>, (StatusCode, String)> {
    tracing::info!(columns = config.columns.len(), "POST /cutlist");
    check(&config)?;
    Ok(Json(aggregate(&config)))
}

async fn optimize_handler(
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /optimize"
    );
    check(&req.config)?;

    let sheets = match req.sheets {
        Some(sheets) => {
            if sheets.iter().any(|s| !(s.width > 0.0 && s.height > 0.0)) {
                return Err((
                    StatusCode::BAD_REQUEST,
                    "sheet dimensions must be positive".to_string(),
                ));
            }
            sheets
        }
        None => default_sheets(&req.config),
    };
    if req.config.tolerances.kerf < 0.0 {
        return Err((StatusCode::BAD_REQUEST, "kerf must not be negative".to_string()));
    }

    let plan = optimize(&req.config, &sheets, req.allow_rotation);
    Ok(Json(OptimizeResponse {
        sheet_count: plan.sheet_count(),
        waste_percent: plan.total_waste_percent(),
        plan,
    }))
}

fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(serve());
}

async fn serve() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/dimensions", post(dimensions))
        .route("/cutlist", post(cutlist))
        .route("/optimize", post(optimize_handler))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
