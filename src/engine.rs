//! The assignment engine: deterministic round-robin mapping of subject
//! occurrences onto rooms and faculty.
//!
//! No conflict detection is performed; the same room or faculty member may
//! appear in any number of rows. That matches the intended behavior of the
//! tool, which is a viewer, not a solver.

use tracing::info;

use crate::error::{Result, TimetableError};
use crate::models::catalog::{Faculty, RoomTable, SubjectTable};
use crate::models::timetable::Assignment;
use crate::models::title_case;

/// Rooms holding more than this many seats get a second faculty member.
const LARGE_ROOM_CAPACITY: f64 = 50.0;

/// Assign every subject occurrence to a room and one-or-two faculty members.
///
/// Within each year the occurrence index `i` restarts at zero; the room is
/// `rooms[i % rooms.len()]` and faculty are `faculty[(i + j) % faculty.len()]`
/// for `j` in `0..faculty_count`, where `faculty_count` is 2 iff the room's
/// capacity exceeds 50.
///
/// Both tables must be non-empty: an empty room table fails with
/// [`TimetableError::EmptyRooms`] and an empty faculty roster with
/// [`TimetableError::EmptyFaculty`] before any indexing happens.
pub fn assign(
    subjects: &SubjectTable,
    rooms: &RoomTable,
    faculty: &[Faculty],
) -> Result<Vec<Assignment>> {
    if rooms.is_empty() {
        return Err(TimetableError::EmptyRooms);
    }
    if faculty.is_empty() {
        return Err(TimetableError::EmptyFaculty);
    }

    let mut assignments = Vec::with_capacity(subjects.subject_count());

    for year in subjects.years() {
        for (i, subject) in year.subjects.iter().enumerate() {
            let room = &rooms.rooms()[i % rooms.len()];

            let faculty_count = if room.capacity > LARGE_ROOM_CAPACITY {
                2
            } else {
                1
            };
            let faculty_names = (0..faculty_count)
                .map(|j| faculty[(i + j) % faculty.len()].name.clone())
                .collect();

            assignments.push(Assignment {
                year: year.year.clone(),
                subject: subject.clone(),
                occurrence: i,
                room_number: room.room_number.clone(),
                building: title_case(&room.building),
                faculty_names,
            });
        }
    }

    info!(
        "Assigned {} subject occurrences across {} year(s)",
        assignments.len(),
        subjects.years().len()
    );

    Ok(assignments)
}
