use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;
use crate::core::{AnalysisError, AnalysisOutcome, AnalysisResult, AnalysisVariant, Analyzer};
use crate::models::{
    AnalysisRequest, ErrorResponse, GoalProbabilityResponse, HealthResponse, NotFoundResponse,
    SuccessRateResponse,
};
use crate::services::{MatchRepository, ResultCache};

/// The three analysis variants served by this instance
#[derive(Debug, Clone, Copy)]
pub struct Variants {
    pub success_rate: AnalysisVariant,
    pub halftime_goals: AnalysisVariant,
    pub fulltime_goals: AnalysisVariant,
}

impl Variants {
    pub fn with_limits(success_rate_limit: usize, distribution_limit: usize) -> Self {
        Self {
            success_rate: AnalysisVariant::HALFTIME_SUCCESS_RATE.with_limit(success_rate_limit),
            halftime_goals: AnalysisVariant::HALFTIME_GOALS.with_limit(distribution_limit),
            fulltime_goals: AnalysisVariant::FULLTIME_GOALS.with_limit(distribution_limit),
        }
    }
}

impl Default for Variants {
    fn default() -> Self {
        Self {
            success_rate: AnalysisVariant::HALFTIME_SUCCESS_RATE,
            halftime_goals: AnalysisVariant::HALFTIME_GOALS,
            fulltime_goals: AnalysisVariant::FULLTIME_GOALS,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MatchRepository>,
    pub cache: Option<Arc<dyn ResultCache>>,
    pub cache_ttl_secs: u64,
    pub analyzer: Analyzer,
    pub variants: Variants,
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/analyze-bet-history", web::post().to(analyze_bet_history))
        .route("/predict-halftime-goals", web::post().to(predict_halftime_goals))
        .route("/predict-fulltime-goals", web::post().to(predict_fulltime_goals));
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Halftime success rates of the requested selections
///
/// POST /api/analyze-bet-history
///
/// Request body:
/// ```json
/// {
///   "league": "Premier League",
///   "bet_odds": {
///     "over": { "goal_line": 1.5, "odd": 1.9 },
///     "under": { "odd": 1.9 },
///     "btts_yes": { "odd": 2.1 },
///     "btts_no": { "odd": 1.7 }
///   }
/// }
/// ```
async fn analyze_bet_history(
    state: web::Data<AppState>,
    req: web::Json<AnalysisRequest>,
) -> impl Responder {
    let variant = state.variants.success_rate;
    run_analysis(&state, &variant, req.into_inner(), |r| SuccessRateResponse::from(r)).await
}

/// Halftime goal distribution
///
/// POST /api/predict-halftime-goals
async fn predict_halftime_goals(
    state: web::Data<AppState>,
    req: web::Json<AnalysisRequest>,
) -> impl Responder {
    let variant = state.variants.halftime_goals;
    run_analysis(&state, &variant, req.into_inner(), |r| GoalProbabilityResponse::from(r)).await
}

/// Fulltime goal distribution
///
/// POST /api/predict-fulltime-goals
async fn predict_fulltime_goals(
    state: web::Data<AppState>,
    req: web::Json<AnalysisRequest>,
) -> impl Responder {
    let variant = state.variants.fulltime_goals;
    run_analysis(&state, &variant, req.into_inner(), |r| GoalProbabilityResponse::from(r)).await
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn json_body(bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(bytes)
}

/// Shared request pipeline: validate, consult the cache, analyze, render, cache
async fn run_analysis<T, F>(
    state: &AppState,
    variant: &AnalysisVariant,
    req: AnalysisRequest,
    render: F,
) -> HttpResponse
where
    T: Serialize,
    F: Fn(&AnalysisResult) -> T,
{
    if let Err(errors) = req.validate() {
        tracing::info!(variant = variant.name, "Validation failed: {}", errors);
        return bad_request(errors.to_string());
    }

    let Some(bet_odds) = req.bet_odds.as_ref() else {
        return bad_request("League and bet odds are required".to_string());
    };

    let query = bet_odds.to_query(&req.league);
    let cache_key = serde_json::to_string(bet_odds)
        .ok()
        .map(|odds| variant.cache_key(&query.league, &odds));

    tracing::info!(
        variant = variant.name,
        league = %query.league,
        markets = query.markets.len(),
        "Analyzing similar matches"
    );

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        match cache.get(key).await {
            Ok(Some(bytes)) => {
                tracing::debug!("Serving cached analysis: {}", key);
                return json_body(bytes);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to read cached analysis: {}", e),
        }
    }

    let result = match state.analyzer.run(state.store.as_ref(), variant, &query).await {
        Ok(AnalysisOutcome::Found(result)) => result,
        Ok(AnalysisOutcome::NotFound) => {
            tracing::info!(variant = variant.name, league = %query.league, "No similar historical matches");
            return HttpResponse::NotFound().json(NotFoundResponse {
                message: "No similar historical matches found".to_string(),
            });
        }
        Err(AnalysisError::InvalidQuery(message)) => return bad_request(message),
        Err(e @ AnalysisError::StoreUnavailable(_)) => {
            tracing::error!(variant = variant.name, "Analysis failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to query historical matches".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let bytes = match serde_json::to_vec(&render(&result)) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to serialize analysis: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to serialize analysis".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    if let (Some(cache), Some(key)) = (&state.cache, &cache_key) {
        if let Err(e) = cache.set(key, &bytes, state.cache_ttl_secs).await {
            tracing::warn!("Failed to cache analysis: {}", e);
        }
    }

    tracing::info!(
        variant = variant.name,
        total_matches = result.total_matches,
        "Returning analysis"
    );

    json_body(bytes)
}
