//! The generated timetable and the user-entered schedule strings that get
//! merged into it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::title_case;

/// Fixed display column order.
pub const COLUMNS: [&str; 6] = [
    "Year",
    "Subject",
    "Room Number",
    "Building",
    "Date & Time",
    "Faculty",
];

/// Shown for any row the user has not scheduled yet.
pub const UNSCHEDULED: &str = "Not Assigned";

/// Engine output: one subject occurrence mapped onto a room and faculty.
/// `year` is the raw (normalized) column label; `building` is already
/// title-cased for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub year: String,
    pub subject: String,
    pub occurrence: usize,
    pub room_number: String,
    pub building: String,
    pub faculty_names: Vec<String>,
}

/// One user-entered date/time string, keyed by its row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub year: String,
    pub subject: String,
    pub occurrence: usize,
    pub date_time: String,
}

/// Date/time strings keyed by (year, subject, occurrence). Year keys are
/// normalized like loader headers so callers may pass either the raw label
/// or its displayed form.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    entries: HashMap<(String, String, usize), String>,
}

fn schedule_key(year: &str, subject: &str, occurrence: usize) -> (String, String, usize) {
    (year.trim().to_lowercase(), subject.to_string(), occurrence)
}

impl Schedule {
    pub fn set(&mut self, year: &str, subject: &str, occurrence: usize, date_time: String) {
        self.entries
            .insert(schedule_key(year, subject, occurrence), date_time);
    }

    pub fn get(&self, year: &str, subject: &str, occurrence: usize) -> Option<&str> {
        self.entries
            .get(&schedule_key(year, subject, occurrence))
            .map(String::as_str)
    }
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        let mut schedule = Schedule::default();
        for entry in entries {
            schedule.set(&entry.year, &entry.subject, entry.occurrence, entry.date_time);
        }
        schedule
    }
}

/// One display-ready timetable row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentRow {
    pub year: String,
    pub subject: String,
    pub room_number: String,
    pub building: String,
    pub date_time: String,
    pub faculty_names: Vec<String>,
}

impl AssignmentRow {
    pub fn display_cells(&self) -> [String; 6] {
        [
            self.year.clone(),
            self.subject.clone(),
            self.room_number.clone(),
            self.building.clone(),
            self.date_time.clone(),
            self.faculty_names.join(", "),
        ]
    }
}

/// The unit handed to the exporter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timetable {
    pub rows: Vec<AssignmentRow>,
}

impl Timetable {
    pub fn display_rows(&self) -> Vec<[String; 6]> {
        self.rows.iter().map(AssignmentRow::display_cells).collect()
    }
}

/// Merge engine output with the user-entered schedule into the final table.
/// Pure transformation; rows missing a schedule entry read "Not Assigned".
pub fn build_timetable(assignments: Vec<Assignment>, schedule: &Schedule) -> Timetable {
    let rows = assignments
        .into_iter()
        .map(|a| {
            let date_time = schedule
                .get(&a.year, &a.subject, a.occurrence)
                .unwrap_or(UNSCHEDULED)
                .to_string();
            AssignmentRow {
                year: title_case(&a.year),
                subject: a.subject,
                room_number: a.room_number,
                building: a.building,
                date_time,
                faculty_names: a.faculty_names,
            }
        })
        .collect();
    Timetable { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(year: &str, subject: &str, occurrence: usize) -> Assignment {
        Assignment {
            year: year.to_string(),
            subject: subject.to_string(),
            occurrence,
            room_number: "101".to_string(),
            building: "Main".to_string(),
            faculty_names: vec!["A".to_string(), "B".to_string()],
        }
    }

    #[test]
    fn merges_schedule_and_defaults_the_rest() {
        let mut schedule = Schedule::default();
        schedule.set("year1", "Math", 0, "Mon 9:00".to_string());

        let timetable = build_timetable(
            vec![assignment("year1", "Math", 0), assignment("year1", "Science", 1)],
            &schedule,
        );

        assert_eq!(timetable.rows[0].date_time, "Mon 9:00");
        assert_eq!(timetable.rows[1].date_time, UNSCHEDULED);
        assert_eq!(timetable.rows[0].year, "Year1");
    }

    #[test]
    fn schedule_keys_normalize_year_labels() {
        let mut schedule = Schedule::default();
        schedule.set(" Year1 ", "Math", 0, "Tue 10:00".to_string());
        assert_eq!(schedule.get("year1", "Math", 0), Some("Tue 10:00"));
        assert_eq!(schedule.get("year1", "Math", 1), None);
    }

    #[test]
    fn display_cells_join_faculty_with_commas() {
        let timetable = build_timetable(vec![assignment("year1", "Math", 0)], &Schedule::default());
        let cells = timetable.display_rows();
        assert_eq!(cells[0][5], "A, B");
        assert_eq!(cells[0].len(), COLUMNS.len());
    }

    #[test]
    fn schedule_entries_deserialize_from_json() {
        let entries: Vec<ScheduleEntry> = serde_json::from_str(
            r#"[{"year":"year1","subject":"Math","occurrence":0,"date_time":"Mon 9:00"}]"#,
        )
        .unwrap();
        let schedule = Schedule::from(entries);
        assert_eq!(schedule.get("year1", "Math", 0), Some("Mon 9:00"));
    }
}
