use thiserror::Error;

/// Errors surfaced by the timetable pipeline.
///
/// Every stage converts its failure into one of these at the stage boundary;
/// nothing here is allowed to take down the session loop.
#[derive(Error, Debug)]
pub enum TimetableError {
    #[error("error reading file: {0}")]
    Load(String),

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("please upload all required files")]
    MissingTables,

    #[error("no faculty members selected")]
    EmptySelection,

    #[error("room table is empty, cannot assign rooms")]
    EmptyRooms,

    #[error("no faculty available for assignment")]
    EmptyFaculty,

    #[error("failed to render PDF: {0}")]
    Render(#[from] lopdf::Error),
}

pub type Result<T> = std::result::Result<T, TimetableError>;
