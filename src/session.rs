//! Session-scoped pipeline state.
//!
//! A [`Session`] holds everything one user has supplied so far: the three
//! uploaded tables, the faculty selection and the entered date/time strings.
//! Nothing is persisted; generation re-runs the whole pipeline from the
//! current inputs every time.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::engine;
use crate::error::{Result, TimetableError};
use crate::helpers::excel::{self, DataTable};
use crate::helpers::pdf;
use crate::models::catalog::{FacultyTable, RoomTable, SubjectTable};
use crate::models::timetable::{build_timetable, Schedule, ScheduleEntry, Timetable};

/// Which of the three uploads a spreadsheet is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Subjects,
    Rooms,
    Faculty,
}

impl FromStr for TableKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "subjects" => Ok(TableKind::Subjects),
            "rooms" => Ok(TableKind::Rooms),
            "faculty" => Ok(TableKind::Faculty),
            other => Err(format!(
                "unknown table kind '{other}' (expected subjects, rooms or faculty)"
            )),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Subjects => "subjects",
            TableKind::Rooms => "rooms",
            TableKind::Faculty => "faculty",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    subjects: Option<SubjectTable>,
    rooms: Option<RoomTable>,
    faculty: Option<FacultyTable>,
    selected_faculty: Vec<String>,
    schedule: Schedule,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse uploaded spreadsheet bytes and store the table under `kind`.
    /// The faculty sheet is validated for its `faculty name` column right
    /// here so a bad upload is reported at upload time.
    pub fn load_table(&mut self, kind: TableKind, bytes: &[u8]) -> Result<()> {
        let table: DataTable = excel::load_table(bytes)?;
        match kind {
            TableKind::Subjects => {
                let subjects = SubjectTable::from(&table);
                info!(
                    "Stored subjects table: {} year(s), {} subject(s)",
                    subjects.years().len(),
                    subjects.subject_count()
                );
                self.subjects = Some(subjects);
            }
            TableKind::Rooms => {
                let rooms = RoomTable::from(&table);
                info!("Stored rooms table: {} room(s)", rooms.len());
                self.rooms = Some(rooms);
            }
            TableKind::Faculty => {
                let faculty = FacultyTable::try_from(&table)?;
                info!("Stored faculty table: {} member(s)", faculty.members().len());
                self.faculty = Some(faculty);
            }
        }
        Ok(())
    }

    pub fn select_faculty(&mut self, names: Vec<String>) {
        info!("Faculty selection updated: {} name(s)", names.len());
        self.selected_faculty = names;
    }

    /// Replace the entered date/time strings wholesale.
    pub fn set_schedule(&mut self, entries: Vec<ScheduleEntry>) {
        info!("Schedule updated: {} entry(ies)", entries.len());
        self.schedule = Schedule::from(entries);
    }

    /// Names available for selection, or `None` before the faculty upload.
    pub fn faculty_names(&self) -> Option<Vec<String>> {
        self.faculty.as_ref().map(FacultyTable::names)
    }

    /// Run the full pipeline from the current inputs.
    ///
    /// Fails with [`TimetableError::MissingTables`] until all three sheets
    /// are uploaded and with [`TimetableError::EmptySelection`] while no
    /// faculty member is selected; engine preconditions propagate as-is.
    pub fn generate(&self) -> Result<Timetable> {
        let (subjects, rooms, faculty) = match (&self.subjects, &self.rooms, &self.faculty) {
            (Some(s), Some(r), Some(f)) => (s, r, f),
            _ => return Err(TimetableError::MissingTables),
        };

        if self.selected_faculty.is_empty() {
            return Err(TimetableError::EmptySelection);
        }
        let roster = faculty.filtered(&self.selected_faculty);

        let assignments = engine::assign(subjects, rooms, &roster)?;
        Ok(build_timetable(assignments, &self.schedule))
    }

    /// `generate()` plus PDF serialization.
    pub fn export_pdf(&self) -> Result<Vec<u8>> {
        let timetable = self.generate()?;
        pdf::render_timetable(&timetable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::timetable::UNSCHEDULED;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn sheet_bytes(rows: &[Vec<&str>]) -> Vec<u8> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sheet.xlsx");
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
        workbook.save(&path).unwrap();
        std::fs::read(&path).unwrap()
    }

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session
            .load_table(
                TableKind::Subjects,
                &sheet_bytes(&[vec!["Year1"], vec!["Math"], vec!["Science"]]),
            )
            .unwrap();
        session
            .load_table(
                TableKind::Rooms,
                &sheet_bytes(&[
                    vec!["Capacity", "Building", "Room Number"],
                    vec!["30", "science block", "101"],
                ]),
            )
            .unwrap();
        session
            .load_table(
                TableKind::Faculty,
                &sheet_bytes(&[vec!["Faculty Name"], vec!["A"], vec!["B"]]),
            )
            .unwrap();
        session
    }

    #[test]
    fn full_pipeline_produces_rows() {
        let mut session = loaded_session();
        session.select_faculty(vec!["A".to_string(), "B".to_string()]);
        session.set_schedule(vec![ScheduleEntry {
            year: "year1".to_string(),
            subject: "Math".to_string(),
            occurrence: 0,
            date_time: "Mon 9:00".to_string(),
        }]);

        let timetable = session.generate().unwrap();
        assert_eq!(timetable.rows.len(), 2);
        assert_eq!(timetable.rows[0].year, "Year1");
        assert_eq!(timetable.rows[0].date_time, "Mon 9:00");
        assert_eq!(timetable.rows[1].date_time, UNSCHEDULED);
        assert_eq!(timetable.rows[0].faculty_names, ["A"]);
        assert_eq!(timetable.rows[1].faculty_names, ["B"]);
        assert_eq!(timetable.rows[0].building, "Science Block");
    }

    #[test]
    fn generation_is_deterministic() {
        let mut session = loaded_session();
        session.select_faculty(vec!["A".to_string(), "B".to_string()]);

        let first = session.generate().unwrap();
        let second = session.generate().unwrap();
        assert_eq!(first, second);

        let pdf_a = session.export_pdf().unwrap();
        let pdf_b = session.export_pdf().unwrap();
        assert_eq!(pdf_a, pdf_b);
    }

    #[test]
    fn missing_uploads_halt_the_pipeline() {
        let mut session = Session::new();
        session.select_faculty(vec!["A".to_string()]);
        let err = session.generate().unwrap_err();
        assert!(matches!(err, TimetableError::MissingTables));
        assert_eq!(err.to_string(), "please upload all required files");
    }

    #[test]
    fn empty_selection_skips_assignment() {
        let session = loaded_session();
        let err = session.generate().unwrap_err();
        assert!(matches!(err, TimetableError::EmptySelection));
        assert!(session.export_pdf().is_err());
    }

    #[test]
    fn selection_matching_no_rows_is_a_precondition_failure() {
        let mut session = loaded_session();
        session.select_faculty(vec!["Nobody".to_string()]);
        let err = session.generate().unwrap_err();
        assert!(matches!(err, TimetableError::EmptyFaculty));
    }

    #[test]
    fn empty_rooms_sheet_fails_fast() {
        let mut session = loaded_session();
        session
            .load_table(
                TableKind::Rooms,
                &sheet_bytes(&[vec!["Capacity", "Building", "Room Number"]]),
            )
            .unwrap();
        session.select_faculty(vec!["A".to_string()]);

        let err = session.generate().unwrap_err();
        assert!(matches!(err, TimetableError::EmptyRooms));
    }

    #[test]
    fn bad_faculty_sheet_is_rejected_at_upload() {
        let mut session = Session::new();
        let err = session
            .load_table(TableKind::Faculty, &sheet_bytes(&[vec!["name"], vec!["A"]]))
            .unwrap_err();
        assert!(matches!(err, TimetableError::MissingColumn { .. }));
    }

    #[test]
    fn table_kind_parses_known_names_only() {
        assert_eq!("rooms".parse::<TableKind>().unwrap(), TableKind::Rooms);
        assert!("students".parse::<TableKind>().is_err());
    }
}
