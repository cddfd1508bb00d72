//! Timetable Utility Library
//!
//! This library provides functionality for loading subject, room and faculty
//! spreadsheets, round-robin assignment of subjects to rooms and faculty,
//! and exporting the generated timetable as a PDF.

pub mod engine;
pub mod error;
pub mod helpers;
pub mod models;
pub mod session;
pub mod service;

pub use error::TimetableError;
pub use service::TimetableService;
pub use session::{Session, TableKind};

// Re-export key types for convenience
pub use models::catalog::{FacultyTable, Room, RoomTable, SubjectTable};
pub use models::timetable::{AssignmentRow, Schedule, ScheduleEntry, Timetable};
