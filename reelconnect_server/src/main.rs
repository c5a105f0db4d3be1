use axum::http::StatusCode;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::TypedHeader;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use reelconnect_core::{spin_once, ProvablyFairRng};
use reelconnect_shared::{
    ApiError, MatchDto, RotateSeedRequest, RotateSeedResponse, SpinRequest, SpinResponse,
    VerifyResponse,
};

mod db;

use db::NewSpinParts;

#[derive(Clone)]
struct AppState {
    db: SqlitePool,
    api_key: String,
}

fn reject(err: ApiError) -> StatusCode {
    match err {
        ApiError::Invalid(msg) => {
            info!("rejected request: {msg}");
            StatusCode::BAD_REQUEST
        }
        ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn internal(err: anyhow::Error) -> StatusCode {
    error!("{err:#}");
    reject(ApiError::Internal)
}

async fn route_verify(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VerifyResponse>, StatusCode> {
    let p = db::get_params(&state.db).await.map_err(internal)?;
    Ok(Json(VerifyResponse {
        server_seed_hash: p.server_seed_hash,
    }))
}

async fn route_spin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpinRequest>,
) -> Result<Json<SpinResponse>, StatusCode> {
    if req.client_seed.trim().is_empty() {
        return Err(reject(ApiError::Invalid(
            "client_seed must not be empty".into(),
        )));
    }
    let response = db::record_spin(&state.db, &req.client_seed, |p| {
        let rng = ProvablyFairRng::new(&p.server_seed, &req.client_seed, p.nonce as u64);
        let outcome = spin_once(&rng)?;
        let response = SpinResponse::from_outcome(
            p.server_seed_hash.clone(),
            p.nonce as u64,
            &outcome.grid,
            &outcome.evaluation,
        );
        let parts = NewSpinParts {
            grid_json: serde_json::to_string(&outcome.grid)?,
            matches: outcome.evaluation.matches.iter().map(MatchDto::from).collect(),
            win_amount: outcome.evaluation.win_amount as i64,
        };
        Ok((response, parts))
    })
    .await
    .map_err(internal)?;

    info!(
        nonce = response.nonce,
        win_amount = response.win_amount,
        "spin served"
    );
    Ok(Json(response))
}

async fn route_admin_rotate_seed(
    State(state): State<Arc<AppState>>,
    TypedHeader(axum_extra::headers::Authorization(bearer)): TypedHeader<
        axum_extra::headers::Authorization<axum_extra::headers::authorization::Bearer>,
    >,
    Json(req): Json<RotateSeedRequest>,
) -> Result<Json<RotateSeedResponse>, StatusCode> {
    if bearer.token() != state.api_key {
        return Err(reject(ApiError::Unauthorized));
    }
    if req.new_seed.is_empty() {
        return Err(reject(ApiError::Invalid("new_seed must not be empty".into())));
    }
    let (old, hash) = db::rotate_seed(&state.db, &req.new_seed)
        .await
        .map_err(internal)?;
    info!("rotated server seed, new hash {hash}");
    Ok(Json(RotateSeedResponse {
        server_seed_hash: hash,
        revealed_seed: old.server_seed,
        revealed_seed_hash: old.server_seed_hash,
    }))
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/verify", get(route_verify))
        .route("/spin", post(route_spin))
        .route("/admin/rotate-seed", post(route_admin_rotate_seed))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let db = db::connect(
        &std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://reelconnect.db?mode=rwc".to_string()),
    )
    .await?;
    db::init_db(&db).await?;

    let state = Arc::new(AppState {
        db,
        api_key: std::env::var("API_KEY").unwrap_or_else(|_| "dev-key".into()),
    });

    let addr = std::env::var("BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
