use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use tracing::{error, info};

use crate::{
    error::TimetableError,
    models::timetable::{ScheduleEntry, COLUMNS},
    session::{Session, TableKind},
};

/// The timetable service: holds every in-memory session and exposes the
/// upload / selection / schedule / export surface over HTTP.
///
/// Sessions live only as long as the process; there is no persistence.
#[derive(Default)]
pub struct TimetableService {
    sessions: RwLock<HashMap<String, Session>>,
}

type ErrorResponse = (StatusCode, String);

impl TimetableService {
    pub fn new() -> Self {
        info!("Creating new TimetableService instance");
        Self::default()
    }

    /// Create an Axum router for the timetable service.
    pub fn router(self) -> Router {
        info!("Creating timetable service router");
        let shared_state = Arc::new(self);

        Router::new()
            .route("/sessions/{session}/tables/{kind}", post(upload_table))
            .route(
                "/sessions/{session}/faculty",
                get(list_faculty).put(select_faculty),
            )
            .route("/sessions/{session}/schedule", put(set_schedule))
            .route("/sessions/{session}/timetable", get(view_timetable))
            .route("/sessions/{session}/timetable.pdf", get(download_timetable))
            .with_state(shared_state)
    }

    /// Run `f` against the session, creating it on first touch. Writes only:
    /// reads go through [`Self::read_session`] so a stray GET cannot grow the
    /// session map.
    fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<T, TimetableError>,
    ) -> Result<T, TimetableError> {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        let session = sessions.entry(id.to_string()).or_default();
        f(session)
    }

    /// Run `f` against an existing session without creating one. An unknown
    /// session id is 404.
    fn read_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&Session) -> Result<T, TimetableError>,
    ) -> Result<T, ErrorResponse> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        let session = sessions
            .get(id)
            .ok_or_else(|| (StatusCode::NOT_FOUND, format!("unknown session '{id}'")))?;
        f(session).map_err(|e| error_response(&e))
    }
}

/// Map pipeline errors onto HTTP responses. Every error stays a readable
/// message; only rendering failures are the server's fault.
fn error_response(err: &TimetableError) -> ErrorResponse {
    let status = match err {
        TimetableError::Load(_) | TimetableError::MissingColumn { .. } => StatusCode::BAD_REQUEST,
        TimetableError::MissingTables
        | TimetableError::EmptySelection
        | TimetableError::EmptyRooms
        | TimetableError::EmptyFaculty => StatusCode::UNPROCESSABLE_ENTITY,
        TimetableError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

#[derive(Debug, Serialize)]
struct TimetableResponse {
    columns: Vec<String>,
    rows: Vec<[String; 6]>,
}

// Route handlers

async fn upload_table(
    State(service): State<Arc<TimetableService>>,
    Path((session, kind)): Path<(String, String)>,
    body: Bytes,
) -> Result<String, ErrorResponse> {
    info!(
        "Received {} byte upload for table '{}' in session '{}'",
        body.len(),
        kind,
        session
    );

    let kind: TableKind = kind
        .parse()
        .map_err(|msg: String| (StatusCode::BAD_REQUEST, msg))?;

    service
        .with_session(&session, |s| s.load_table(kind, &body))
        .map_err(|e| {
            error!("Failed to load {} table: {}", kind, e);
            error_response(&e)
        })?;

    Ok(format!("{kind} table uploaded"))
}

async fn list_faculty(
    State(service): State<Arc<TimetableService>>,
    Path(session): Path<String>,
) -> Result<Json<Vec<String>>, ErrorResponse> {
    info!("Listing faculty options for session '{}'", session);

    let names = service.read_session(&session, |s| {
        s.faculty_names().ok_or(TimetableError::MissingTables)
    })?;

    Ok(Json(names))
}

async fn select_faculty(
    State(service): State<Arc<TimetableService>>,
    Path(session): Path<String>,
    Json(names): Json<Vec<String>>,
) -> Result<String, ErrorResponse> {
    info!(
        "Updating faculty selection for session '{}': {} name(s)",
        session,
        names.len()
    );

    let count = names.len();
    service
        .with_session(&session, |s| {
            s.select_faculty(names);
            Ok(())
        })
        .map_err(|e| error_response(&e))?;

    Ok(format!("{count} faculty member(s) selected"))
}

async fn set_schedule(
    State(service): State<Arc<TimetableService>>,
    Path(session): Path<String>,
    Json(entries): Json<Vec<ScheduleEntry>>,
) -> Result<String, ErrorResponse> {
    info!(
        "Updating schedule for session '{}': {} entry(ies)",
        session,
        entries.len()
    );

    let count = entries.len();
    service
        .with_session(&session, |s| {
            s.set_schedule(entries);
            Ok(())
        })
        .map_err(|e| error_response(&e))?;

    Ok(format!("{count} schedule entry(ies) stored"))
}

async fn view_timetable(
    State(service): State<Arc<TimetableService>>,
    Path(session): Path<String>,
) -> Result<Json<TimetableResponse>, ErrorResponse> {
    info!("Generating timetable for session '{}'", session);

    let timetable = service
        .read_session(&session, |s| s.generate())
        .map_err(|(status, msg)| {
            error!("Failed to generate timetable: {}", msg);
            (status, msg)
        })?;

    Ok(Json(TimetableResponse {
        columns: COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        rows: timetable.display_rows(),
    }))
}

async fn download_timetable(
    State(service): State<Arc<TimetableService>>,
    Path(session): Path<String>,
) -> Result<impl IntoResponse, ErrorResponse> {
    info!("Exporting timetable PDF for session '{}'", session);

    let pdf = service
        .read_session(&session, |s| s.export_pdf())
        .map_err(|(status, msg)| {
            error!("Failed to export timetable PDF: {}", msg);
            (status, msg)
        })?;

    info!("Timetable PDF exported, size: {} bytes", pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"timetable.pdf\"",
            ),
        ],
        pdf,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_expected_statuses() {
        let (status, msg) = error_response(&TimetableError::MissingTables);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "please upload all required files");

        let (status, _) = error_response(&TimetableError::Load("bad zip".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn writes_create_sessions_on_first_touch() {
        let service = TimetableService::new();
        service
            .with_session("alpha", |s| {
                s.select_faculty(vec!["A".to_string()]);
                Ok(())
            })
            .unwrap();

        assert!(service.sessions.read().unwrap().contains_key("alpha"));
    }

    #[test]
    fn reads_of_unknown_sessions_are_not_found() {
        let service = TimetableService::new();

        let (status, _) = service
            .read_session("ghost", |s| s.generate())
            .unwrap_err();
        assert_eq!(status, StatusCode::NOT_FOUND);

        // A read probe must not grow the session map.
        assert!(!service.sessions.read().unwrap().contains_key("ghost"));
    }

    #[test]
    fn reads_of_known_sessions_surface_pipeline_errors() {
        let service = TimetableService::new();
        service
            .with_session("alpha", |s| {
                s.select_faculty(vec!["A".to_string()]);
                Ok(())
            })
            .unwrap();

        let (status, msg) = service
            .read_session("alpha", |s| s.generate())
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "please upload all required files");
    }
}
