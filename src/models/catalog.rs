//! Typed views over the three uploaded tables.
//!
//! Column lookups assume loader-normalized (trimmed, lowercased) headers.

use crate::error::TimetableError;
use crate::helpers::excel::DataTable;

const FACULTY_NAME_COLUMN: &str = "faculty name";
const CAPACITY_COLUMN: &str = "capacity";
const BUILDING_COLUMN: &str = "building";
const ROOM_NUMBER_COLUMN: &str = "room number";

const MISSING_FIELD: &str = "N/A";

/// One year/program column of the subjects sheet: the raw (normalized)
/// label and its non-missing subject names in row order.
#[derive(Debug, Clone)]
pub struct YearSubjects {
    pub year: String,
    pub subjects: Vec<String>,
}

/// Every column of the subjects sheet is a year/program; gaps within a
/// column are dropped, so a subject's occurrence index is its position
/// among the surviving cells.
#[derive(Debug, Clone, Default)]
pub struct SubjectTable {
    years: Vec<YearSubjects>,
}

impl SubjectTable {
    pub fn years(&self) -> &[YearSubjects] {
        &self.years
    }

    pub fn subject_count(&self) -> usize {
        self.years.iter().map(|y| y.subjects.len()).sum()
    }
}

impl From<&DataTable> for SubjectTable {
    fn from(table: &DataTable) -> Self {
        let years = table
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, year)| YearSubjects {
                year: year.clone(),
                subjects: table
                    .column_values(idx)
                    .into_iter()
                    .filter(|cell| !cell.is_missing())
                    .map(|cell| cell.to_display())
                    .collect(),
            })
            .collect();
        SubjectTable { years }
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub capacity: f64,
    pub building: String,
    pub room_number: String,
}

/// Rooms in sheet row order; the order defines the round-robin sequence.
#[derive(Debug, Clone, Default)]
pub struct RoomTable {
    rooms: Vec<Room>,
}

impl RoomTable {
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub(crate) fn from_rooms(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }
}

impl From<&DataTable> for RoomTable {
    fn from(table: &DataTable) -> Self {
        let rooms = (0..table.row_count())
            .map(|row| {
                let capacity = table
                    .cell(row, CAPACITY_COLUMN)
                    .and_then(|c| c.as_f64())
                    .unwrap_or(0.0);
                let building = table
                    .cell(row, BUILDING_COLUMN)
                    .filter(|c| !c.is_missing())
                    .map(|c| c.to_display())
                    .unwrap_or_else(|| MISSING_FIELD.to_string());
                let room_number = table
                    .cell(row, ROOM_NUMBER_COLUMN)
                    .filter(|c| !c.is_missing())
                    .map(|c| c.to_display())
                    .unwrap_or_else(|| MISSING_FIELD.to_string());
                Room {
                    capacity,
                    building,
                    room_number,
                }
            })
            .collect();
        RoomTable { rooms }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Faculty {
    pub name: String,
}

/// Faculty in sheet row order. Requires a `faculty name` column.
#[derive(Debug, Clone, Default)]
pub struct FacultyTable {
    members: Vec<Faculty>,
}

impl FacultyTable {
    pub fn members(&self) -> &[Faculty] {
        &self.members
    }

    pub fn names(&self) -> Vec<String> {
        self.members.iter().map(|f| f.name.clone()).collect()
    }

    /// The chosen subset, in *table* order regardless of selection order.
    pub fn filtered(&self, selected_names: &[String]) -> Vec<Faculty> {
        self.members
            .iter()
            .filter(|f| selected_names.contains(&f.name))
            .cloned()
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn from_names(names: &[&str]) -> Self {
        Self {
            members: names
                .iter()
                .map(|n| Faculty {
                    name: (*n).to_string(),
                })
                .collect(),
        }
    }
}

impl TryFrom<&DataTable> for FacultyTable {
    type Error = TimetableError;

    fn try_from(table: &DataTable) -> Result<Self, Self::Error> {
        if table.column_index(FACULTY_NAME_COLUMN).is_none() {
            return Err(TimetableError::MissingColumn {
                column: FACULTY_NAME_COLUMN.to_string(),
            });
        }

        let members = (0..table.row_count())
            .map(|row| {
                let name = table
                    .cell(row, FACULTY_NAME_COLUMN)
                    .filter(|c| !c.is_missing())
                    .map(|c| c.to_display())
                    .unwrap_or_else(|| MISSING_FIELD.to_string());
                Faculty { name }
            })
            .collect();

        Ok(FacultyTable { members })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::excel::CellValue;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn subjects_drop_gaps_per_column() {
        let table = DataTable::from_parts(
            vec!["year1".into(), "year2".into()],
            vec![
                vec![s("Math"), s("Physics")],
                vec![CellValue::Null, s("Chemistry")],
                vec![s("Science"), CellValue::String("  ".into())],
            ],
        );

        let subjects = SubjectTable::from(&table);
        assert_eq!(subjects.years()[0].year, "year1");
        assert_eq!(subjects.years()[0].subjects, ["Math", "Science"]);
        assert_eq!(subjects.years()[1].subjects, ["Physics", "Chemistry"]);
        assert_eq!(subjects.subject_count(), 4);
    }

    #[test]
    fn rooms_default_absent_fields() {
        // No capacity column at all, one blank building cell.
        let table = DataTable::from_parts(
            vec!["building".into(), "room number".into()],
            vec![
                vec![s("science block"), CellValue::Int(101)],
                vec![CellValue::Null, CellValue::Float(202.0)],
            ],
        );

        let rooms = RoomTable::from(&table);
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms.rooms()[0].capacity, 0.0);
        assert_eq!(rooms.rooms()[0].room_number, "101");
        assert_eq!(rooms.rooms()[1].building, "N/A");
        assert_eq!(rooms.rooms()[1].room_number, "202");
    }

    #[test]
    fn faculty_requires_name_column() {
        let table = DataTable::from_parts(vec!["name".into()], vec![vec![s("Dr. Rao")]]);
        let err = FacultyTable::try_from(&table).unwrap_err();
        assert!(matches!(
            err,
            TimetableError::MissingColumn { column } if column == "faculty name"
        ));
    }

    #[test]
    fn filtered_preserves_table_order() {
        let faculty = FacultyTable::from_names(&["A", "B", "C"]);
        let picked = faculty.filtered(&["C".to_string(), "A".to_string()]);
        let names: Vec<_> = picked.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }
}
