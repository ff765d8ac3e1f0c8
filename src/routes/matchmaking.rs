use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::mpsc;
use validator::Validate;

use crate::models::{
    CreateProfileRequest, CreateProfileResponse, ErrorResponse, HealthResponse,
    MatchDetailResponse, MatchListQuery, MatchListResponse, MatchStatus, MatchmakingCriteria,
    ProfileResponse, ProfileUpdatedEvent, SearchResponse, UpdateMatchStatusRequest,
    UpdateMatchStatusResponse,
};
use crate::services::engine::{paginate, EngineError, MatchEngine};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    /// Ingress side of the profile-update event log
    pub profile_updates: mpsc::Sender<ProfileUpdatedEvent>,
}

/// Configure all matchmaking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/profiles", web::post().to(create_profile))
        .route("/profiles/{user_id}", web::get().to(get_profile))
        .route("/matches/user/{user_id}", web::get().to(list_matches))
        .route("/matches/search", web::post().to(search_matches))
        .route("/matches/{match_id}", web::get().to(get_match))
        .route(
            "/matches/{match_id}/status",
            web::put().to(update_match_status),
        )
        .route(
            "/events/profile-updated",
            web::post().to(ingest_profile_update),
        );
}

/// Translate an engine error into the JSON error contract
fn engine_error_response(err: EngineError) -> HttpResponse {
    match err {
        EngineError::NotFound(what) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message: what,
            status_code: 404,
        }),
        EngineError::Store(err) => {
            tracing::error!("storage error: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "storage_error".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}

fn validation_error_response(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "validation_failed".to_string(),
        message,
        status_code: 400,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Create or refresh a matching profile
///
/// POST /api/v1/profiles
///
/// Stores the profile and synchronously regenerates matches for the user,
/// returning how many were persisted.
async fn create_profile(
    state: web::Data<AppState>,
    req: web::Json<CreateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors.to_string());
    }

    let user_id = req.user_id.clone();
    let profile = req.into_inner().into_profile();

    if let Err(err) = state.engine.upsert_profile(profile).await {
        return engine_error_response(err);
    }

    let matches = match state.engine.generate_for(&user_id).await {
        Ok(matches) => matches,
        Err(err) => return engine_error_response(err),
    };

    tracing::info!("created profile for {}, {} matches found", user_id, matches.len());

    HttpResponse::Created().json(CreateProfileResponse {
        message: "User profile created successfully".to_string(),
        matches_found: matches.len(),
    })
}

/// Retrieve a matching profile
///
/// GET /api/v1/profiles/{user_id}
async fn get_profile(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let user_id = path.into_inner();

    match state.engine.get_profile(&user_id).await {
        Ok(profile) => HttpResponse::Ok().json(ProfileResponse { profile }),
        Err(err) => engine_error_response(err),
    }
}

/// List matches for a user
///
/// GET /api/v1/matches/user/{user_id}?status=&limit=&offset=
///
/// The optional status filter applies before pagination; `total` counts
/// the filtered set.
async fn list_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<MatchListQuery>,
) -> impl Responder {
    let user_id = path.into_inner();

    let status = match &query.status {
        Some(raw) => match raw.parse::<MatchStatus>() {
            Ok(status) => Some(status),
            Err(message) => return validation_error_response(message),
        },
        None => None,
    };

    let mut matches = match state.engine.list_matches(&user_id).await {
        Ok(matches) => matches,
        Err(err) => return engine_error_response(err),
    };

    if let Some(status) = status {
        matches.retain(|record| record.status == status);
    }

    let total = matches.len();
    let matches = paginate(matches, query.limit, query.offset);

    HttpResponse::Ok().json(MatchListResponse { matches, total })
}

/// Retrieve a single match
///
/// GET /api/v1/matches/{match_id}
async fn get_match(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let match_id = path.into_inner();

    match state.engine.get_match(&match_id).await {
        Ok(record) => HttpResponse::Ok().json(MatchDetailResponse { record }),
        Err(err) => engine_error_response(err),
    }
}

/// Update a match's lifecycle status
///
/// PUT /api/v1/matches/{match_id}/status
///
/// Request body: `{"status": "pending|accepted|rejected"}`; anything else
/// is rejected before reaching the engine.
async fn update_match_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateMatchStatusRequest>,
) -> impl Responder {
    let match_id = path.into_inner();

    let status = match req.status.parse::<MatchStatus>() {
        Ok(status) => status,
        Err(message) => return validation_error_response(message),
    };

    match state.engine.update_status(&match_id, status).await {
        Ok(record) => HttpResponse::Ok().json(UpdateMatchStatusResponse {
            message: "Match status updated successfully".to_string(),
            record,
        }),
        Err(err) => engine_error_response(err),
    }
}

/// Search profiles against ad hoc criteria
///
/// POST /api/v1/matches/search
///
/// Returns ranked, paginated (user_id, score, reason) tuples, independent
/// of the persisted match set.
async fn search_matches(
    state: web::Data<AppState>,
    req: web::Json<MatchmakingCriteria>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error_response(errors.to_string());
    }

    match state.engine.search(&req).await {
        Ok(results) => HttpResponse::Ok().json(SearchResponse {
            matches: results.hits,
            total: results.total,
        }),
        Err(err) => engine_error_response(err),
    }
}

/// Enqueue a profile-update event onto the inbound log
///
/// POST /api/v1/events/profile-updated
///
/// Ingress boundary for the profile-API collaborator; processing happens
/// asynchronously on the consumer task.
async fn ingest_profile_update(
    state: web::Data<AppState>,
    req: web::Json<ProfileUpdatedEvent>,
) -> impl Responder {
    if req.user_id.is_empty() {
        return validation_error_response("user_id is required".to_string());
    }

    match state.profile_updates.send(req.into_inner()).await {
        Ok(()) => HttpResponse::Accepted().json(serde_json::json!({
            "message": "event accepted",
        })),
        Err(err) => {
            tracing::error!("failed to enqueue profile update: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "event_log_unavailable".to_string(),
                message: "profile-update consumer is not running".to_string(),
                status_code: 500,
            })
        }
    }
}
