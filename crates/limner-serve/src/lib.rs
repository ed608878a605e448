use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use limner_catalog::{CatalogLookup, SqliteCatalog};
use limner_core::date::{parse_date_key, resolve_or_today, today_date_key, today_utc};
use limner_core::lookup::resolve_profile;
use limner_core::suggest::SuggestionIndex;
use limner_core::{
    Evaluator, FeedbackDetail, GameConfig, GameError, PuzzleRecord, PuzzleReveal,
    ValidationError,
};

/// Upper bound for `limit` on list endpoints.
const MAX_LIST_LIMIT: usize = 500;

/// How many catalog names a suggestion search scans.
const SUGGESTION_POOL: usize = 10_000;

// ── Config ──

pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
}

// ── App State ──

struct AppState {
    catalog: CatalogLookup,
    game: GameConfig,
}

impl AppState {
    fn puzzle(&self, date: &str) -> Result<PuzzleRecord, AppError> {
        self.catalog
            .with_catalog(|c| c.get_puzzle(date))?
            .ok_or_else(|| GameError::PuzzleNotFound(date.to_string()).into())
    }

    /// The answer plus the target's profile, for finished puzzles only.
    async fn reveal(&self, puzzle: &PuzzleRecord) -> PuzzleReveal {
        let profile =
            resolve_profile(&self.catalog, &puzzle.artist, self.game.lookup_timeout()).await;
        PuzzleReveal::from_record(puzzle, profile)
    }
}

// ── Error Handling ──

struct AppError(GameError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            GameError::Validation(_) | GameError::MalformedDate(_) => StatusCode::BAD_REQUEST,
            GameError::PuzzleNotFound(_) => StatusCode::NOT_FOUND,
            GameError::ReferenceDataUnavailable(_) | GameError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl From<GameError> for AppError {
    fn from(err: GameError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err.into())
    }
}

// ── Entrypoint ──

pub async fn serve(catalog_db: &Path, game: GameConfig, config: ServeConfig) -> anyhow::Result<()> {
    game.validate()?;
    let catalog = SqliteCatalog::open(catalog_db)?;
    let app = router(catalog, game);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, catalog = %catalog_db.display(), "limner HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router (for testing without binding to a port).
pub fn router(catalog: SqliteCatalog, game: GameConfig) -> Router {
    let state = Arc::new(AppState {
        catalog: CatalogLookup::new(catalog),
        game,
    });
    Router::new()
        .route("/api/health", get(health))
        .route("/api/puzzle", get(get_puzzle))
        .route("/api/guess", post(post_guess))
        .route("/api/archive", get(get_archive))
        .route("/api/artists", get(get_artists))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── GET /api/puzzle ──

#[derive(Deserialize)]
struct PuzzleQuery {
    date: Option<String>,
}

/// What a player may see before finishing: no title, no artist.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PuzzleView {
    date: String,
    image_url: Option<String>,
    museum: Option<String>,
    year: Option<String>,
    max_attempts: u32,
}

async fn get_puzzle(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PuzzleQuery>,
) -> Result<Json<PuzzleView>, AppError> {
    let date = resolve_or_today(params.date.as_deref(), today_utc()).ok_or_else(|| {
        GameError::PuzzleNotFound(params.date.clone().unwrap_or_default())
    })?;
    let puzzle = state.puzzle(&date)?;
    Ok(Json(PuzzleView {
        image_url: puzzle.display_image().map(str::to_string),
        museum: puzzle.museum,
        year: puzzle.year,
        date: puzzle.date,
        max_attempts: state.game.max_attempts,
    }))
}

// ── POST /api/guess ──

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GuessBody {
    date: Option<String>,
    guess: Option<String>,
    #[serde(default)]
    attempts_used: u32,
    #[serde(default)]
    give_up: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GuessResponse {
    correct: bool,
    finished: bool,
    success: bool,
    feedback: Vec<FeedbackDetail>,
    attempts_used: u32,
    /// `null` until the puzzle is finished.
    revealed_artwork: Option<PuzzleReveal>,
}

async fn post_guess(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GuessBody>,
) -> Result<Json<GuessResponse>, AppError> {
    // Unlike puzzle viewing, a guess never silently retargets today's puzzle.
    if let Some(raw) = body.date.as_deref() {
        if parse_date_key(raw).is_none() {
            return Err(GameError::MalformedDate(raw.to_string()).into());
        }
    }
    let date = resolve_or_today(body.date.as_deref(), today_utc())
        .ok_or_else(|| GameError::PuzzleNotFound(body.date.clone().unwrap_or_default()))?;
    let puzzle = state.puzzle(&date)?;
    let max = state.game.max_attempts;

    if body.give_up {
        tracing::info!(%date, attempts_used = body.attempts_used, "player gave up");
        return Ok(Json(GuessResponse {
            correct: false,
            finished: true,
            success: false,
            feedback: Vec::new(),
            attempts_used: body.attempts_used.min(max),
            revealed_artwork: Some(state.reveal(&puzzle).await),
        }));
    }

    let guess = body.guess.as_deref().map(str::trim).unwrap_or_default();
    if guess.is_empty() {
        return Err(ValidationError::EmptyGuess.into());
    }
    if body.attempts_used >= max {
        return Err(ValidationError::AttemptsExhausted {
            used: body.attempts_used,
            max,
        }
        .into());
    }

    let evaluation = Evaluator::new(&state.catalog, &state.game)
        .evaluate(&puzzle, guess, body.attempts_used)
        .await;
    let revealed_artwork = if evaluation.finished {
        Some(state.reveal(&puzzle).await)
    } else {
        None
    };
    Ok(Json(GuessResponse {
        correct: evaluation.correct,
        finished: evaluation.finished,
        success: evaluation.success,
        feedback: evaluation.feedback,
        attempts_used: evaluation.attempts_used,
        revealed_artwork,
    }))
}

// ── GET /api/archive ──

#[derive(Deserialize)]
struct ListQuery {
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ArchiveResponse {
    today: String,
    dates: Vec<String>,
}

async fn get_archive(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ArchiveResponse>, AppError> {
    let today = today_date_key();
    let limit = params.limit.unwrap_or(30).min(MAX_LIST_LIMIT);
    let dates = state
        .catalog
        .with_catalog(|c| c.puzzle_dates_until(&today, limit))?;
    Ok(Json(ArchiveResponse { today, dates }))
}

// ── GET /api/artists ──

#[derive(Serialize)]
struct ArtistsResponse {
    names: Vec<String>,
}

async fn get_artists(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ArtistsResponse>, AppError> {
    let limit = params.limit.unwrap_or(20).min(MAX_LIST_LIMIT);
    let names = match params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        None => state.catalog.with_catalog(|c| c.artist_names(limit))?,
        Some(q) => {
            let pool = state
                .catalog
                .with_catalog(|c| c.artist_names(SUGGESTION_POOL))?;
            SuggestionIndex::new(pool)
                .search(q, limit)
                .into_iter()
                .map(str::to_string)
                .collect()
        }
    };
    Ok(Json(ArtistsResponse { names }))
}
