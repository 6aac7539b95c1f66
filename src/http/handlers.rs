use super::state::AppState;
use crate::error::{SessionError, StorageError, UserInputError};
use crate::history::{HistoryBrowser, HistoryFilter};
use crate::language::OutputLanguage;
use crate::session::{SessionRecord, SettingsUpdate};
use crate::subjects;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectSubjectRequest {
    pub subject_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLanguagesRequest {
    /// Spoken language code, unchanged when omitted
    pub input_language: Option<String>,

    /// Output language tags or short codes, in selection order
    pub output_languages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Subject id, or `all`
    pub subject: Option<String>,

    /// `YYYY-MM-DD`, local time
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub input_language: String,
    pub output_languages: Vec<OutputLanguage>,
    pub room_code: String,
}

#[derive(Debug, Serialize)]
pub struct SettingsUpdateResponse {
    pub restart_required: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RoomCodeResponse {
    pub room_code: String,
}

#[derive(Debug, Serialize)]
pub struct StartSessionResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub status: String,
    pub message: String,
    pub record: SessionRecord,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn input_error_response(e: &UserInputError) -> Response {
    let status = match e {
        UserInputError::AlreadyRunning | UserInputError::NotRunning => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, e.to_string())
}

fn storage_error_response(e: &StorageError) -> Response {
    error!("Storage failure: {}", e);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to save: {}", e),
    )
}

fn session_error_response(e: &SessionError) -> Response {
    match e {
        SessionError::Input(e) => input_error_response(e),
        SessionError::Storage(e) => storage_error_response(e),
    }
}

fn settings_update_response(update: SettingsUpdate, saved: &str) -> Response {
    let message = if update.restart_required {
        format!("{saved}. Restart the session to apply the change.")
    } else {
        saved.to_string()
    };
    (
        StatusCode::OK,
        Json(SettingsUpdateResponse {
            restart_required: update.restart_required,
            message,
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /subjects
pub async fn list_subjects() -> impl IntoResponse {
    Json(subjects::all())
}

/// GET /settings
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let room_code = match state.preferences.room_code() {
        Ok(code) => code,
        Err(e) => return storage_error_response(&e),
    };

    let controller = state.live.controller();
    let controller = controller.lock().await;

    (
        StatusCode::OK,
        Json(SettingsResponse {
            input_language: controller.input_language().to_string(),
            output_languages: controller.output_languages().languages().to_vec(),
            room_code,
        }),
    )
        .into_response()
}

/// PUT /settings/languages
pub async fn update_languages(
    State(state): State<AppState>,
    Json(req): Json<UpdateLanguagesRequest>,
) -> impl IntoResponse {
    let languages: Result<Vec<OutputLanguage>, UserInputError> =
        req.output_languages.iter().map(|s| s.parse()).collect();
    let languages = match languages {
        Ok(languages) => languages,
        Err(e) => return input_error_response(&e),
    };

    let controller = state.live.controller();
    let mut controller = controller.lock().await;

    match controller.update_languages(req.input_language.as_deref(), languages) {
        Ok(update) => settings_update_response(update, "Language settings saved"),
        Err(e) => session_error_response(&e),
    }
}

/// POST /room-code
pub async fn regenerate_room_code(State(state): State<AppState>) -> impl IntoResponse {
    match state.preferences.regenerate_room_code() {
        Ok(room_code) => (StatusCode::OK, Json(RoomCodeResponse { room_code })).into_response(),
        Err(e) => storage_error_response(&e),
    }
}

/// POST /session/subject
pub async fn select_subject(
    State(state): State<AppState>,
    Json(req): Json<SelectSubjectRequest>,
) -> impl IntoResponse {
    let controller = state.live.controller();
    let mut controller = controller.lock().await;

    match controller.select_subject(req.subject_id) {
        Ok(update) => settings_update_response(update, "Subject selected"),
        Err(e) => input_error_response(&e),
    }
}

/// POST /session/start
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.live.start().await {
        warn!("Failed to start session: {}", e);
        return input_error_response(&e);
    }

    let subject = {
        let controller = state.live.controller();
        let controller = controller.lock().await;
        controller.selected_subject().map(|s| s.name).unwrap_or_default()
    };

    info!("Session started for {}", subject);

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            status: "running".to_string(),
            message: format!("Translation of {} started", subject),
        }),
    )
        .into_response()
}

/// POST /session/stop
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.live.stop().await {
        Ok(record) => (
            StatusCode::OK,
            Json(StopSessionResponse {
                status: "saved".to_string(),
                message: format!("Session saved ({})", record.duration_label()),
                record,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("Failed to stop session: {}", e);
            session_error_response(&e)
        }
    }
}

/// GET /session/status
pub async fn session_status(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.live.controller();
    let status = controller.lock().await.status();
    Json(status)
}

/// GET /history?subject=&date=
pub async fn list_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let subject_id = match query.subject.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid subject filter: {}", raw),
                )
            }
        },
    };

    let date = match query.date.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<NaiveDate>() {
            Ok(date) => Some(date),
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid date filter: {}", raw),
                )
            }
        },
    };

    let filter = HistoryFilter { subject_id, date };
    let summaries = HistoryBrowser::new(&state.history).summaries(&filter);
    (StatusCode::OK, Json(summaries)).into_response()
}

/// GET /history/:record_id
pub async fn get_history_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    match HistoryBrowser::new(&state.history).get(record_id) {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", record_id),
        ),
    }
}

/// DELETE /history/:record_id
pub async fn delete_history_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> impl IntoResponse {
    match HistoryBrowser::new(&state.history).delete(record_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(
            StatusCode::NOT_FOUND,
            format!("Session {} not found", record_id),
        ),
        Err(e) => storage_error_response(&e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
