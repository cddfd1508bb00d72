use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use timetable_util::TimetableService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting timetable service example");

    let timetable_service = TimetableService::new();

    // Create router with the timetable service
    let app = Router::new()
        .nest("/api/timetable", timetable_service.router())
        .route("/health", axum::routing::get(|| async { "OK" }));

    // Start server
    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    info!("Server running on http://0.0.0.0:3000");

    axum::serve(listener, app).await?;

    Ok(())
}

/*
Example usage of the service:

1. POST /api/timetable/sessions/{session}/tables/{kind}
   - kind is one of: subjects, rooms, faculty
   - body is the raw .xlsx/.xls file

2. PUT /api/timetable/sessions/{session}/faculty
   - JSON array of selected faculty names, e.g. ["Dr. Rao", "Dr. Lee"]

3. PUT /api/timetable/sessions/{session}/schedule
   - JSON array of {year, subject, occurrence, date_time} entries

4. GET /api/timetable/sessions/{session}/timetable
   - the generated timetable as JSON

5. GET /api/timetable/sessions/{session}/timetable.pdf
   - the generated timetable as a downloadable PDF
*/
