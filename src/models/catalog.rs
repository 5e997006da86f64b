//! Domain catalog.
//!
//! The static input of a timetabling problem: professors, subjects,
//! groups and rooms. The catalog has no behavior beyond lookup; the
//! search only ever reads it.

use serde::{Deserialize, Serialize};

use super::{Group, GroupId, Professor, ProfessorId, Room, RoomId, Subject, SubjectId};

/// Professors, subjects, groups and rooms of one timetabling problem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    /// Teaching staff.
    pub professors: Vec<Professor>,
    /// Subjects to schedule.
    pub subjects: Vec<Subject>,
    /// Student groups.
    pub groups: Vec<Group>,
    /// Classrooms and laboratories.
    pub rooms: Vec<Room>,
}

impl Catalog {
    /// Creates a catalog.
    pub fn new(
        professors: Vec<Professor>,
        subjects: Vec<Subject>,
        groups: Vec<Group>,
        rooms: Vec<Room>,
    ) -> Self {
        Self {
            professors,
            subjects,
            groups,
            rooms,
        }
    }

    /// Adds a professor.
    pub fn with_professor(mut self, professor: Professor) -> Self {
        self.professors.push(professor);
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Finds a professor by ID.
    pub fn professor(&self, id: ProfessorId) -> Option<&Professor> {
        self.professors.iter().find(|p| p.id == id)
    }

    /// Finds a subject by ID.
    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Finds a group by ID.
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Finds a room by ID.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Subjects taken by a group.
    pub fn subjects_for_group(&self, group_id: GroupId) -> Vec<&Subject> {
        self.subjects
            .iter()
            .filter(|s| s.group_id == group_id)
            .collect()
    }

    /// Total weekly hours over all subjects (= number of events).
    pub fn required_hours(&self) -> u32 {
        self.subjects.iter().map(|s| s.weekly_hours).sum()
    }

    /// Rooms that satisfy a subject's capacity and laboratory needs.
    ///
    /// Ordered by preference: rooms whose laboratory flag matches the
    /// subject first, then smallest sufficient capacity, then ID.
    pub fn suitable_rooms(&self, subject: &Subject) -> Vec<&Room> {
        let students = self.group(subject.group_id).map_or(0, |g| g.students);
        let mut rooms: Vec<&Room> = self
            .rooms
            .iter()
            .filter(|r| r.fits(students, subject.requires_lab))
            .collect();
        rooms.sort_by_key(|r| (r.is_lab != subject.requires_lab, r.capacity, r.id));
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        Catalog::new(
            vec![Professor::new(0, 12), Professor::new(1, 15)],
            vec![
                Subject::new(0, 5, 0, 0).requiring_lab(),
                Subject::new(1, 4, 0, 1),
                Subject::new(2, 5, 1, 0),
            ],
            vec![
                Group::new(0, 35).with_subject(0).with_subject(1),
                Group::new(1, 33).with_subject(2),
            ],
            vec![Room::lab(0, 35), Room::new(1, 40), Room::new(2, 34)],
        )
    }

    #[test]
    fn test_required_hours() {
        assert_eq!(sample_catalog().required_hours(), 14);

        let c = Catalog::default()
            .with_professor(Professor::new(0, 10))
            .with_subject(Subject::new(0, 3, 0, 0))
            .with_subject(Subject::new(1, 2, 0, 0));
        assert_eq!(c.required_hours(), 5);
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{
            "professors": [{"id": 0, "max_hours": 10}],
            "subjects": [{"id": 0, "weekly_hours": 2, "group_id": 0, "professor_id": 0}],
            "groups": [{"id": 0, "students": 20}],
            "rooms": [{"id": 0, "capacity": 30}]
        }"#;
        let c: Catalog = serde_json::from_str(json).unwrap();

        assert_eq!(c.professor(0), Some(&Professor::new(0, 10)));
        assert_eq!(c.subject(0), Some(&Subject::new(0, 2, 0, 0)));
        assert_eq!(c.group(0), Some(&Group::new(0, 20)));
        assert_eq!(c.room(0), Some(&Room::new(0, 30)));
        assert!(crate::validation::validate_catalog(&c).is_ok());

        // Missing entity lists default to empty.
        let empty: Catalog = serde_json::from_str(r#"{"rooms": []}"#).unwrap();
        assert_eq!(empty, Catalog::default());
    }

    #[test]
    fn test_lookups() {
        let c = sample_catalog();
        assert!(c.group(1).is_some());
        assert!(c.group(9).is_none());
        assert!(c.room(2).is_some());
        assert_eq!(c.subjects_for_group(0).len(), 2);
    }

    #[test]
    fn test_suitable_rooms_order() {
        let c = sample_catalog();
        // Lab subject: only the lab fits.
        let lab: Vec<_> = c.suitable_rooms(c.subject(0).unwrap()).iter().map(|r| r.id).collect();
        assert_eq!(lab, vec![0]);

        // Group 0 has 35 students: room 2 (34 seats) is too small, standard rooms first.
        let std: Vec<_> = c.suitable_rooms(c.subject(1).unwrap()).iter().map(|r| r.id).collect();
        assert_eq!(std, vec![1, 0]);

        // Group 1 has 33 students: tightest standard room first.
        let g1: Vec<_> = c.suitable_rooms(c.subject(2).unwrap()).iter().map(|r| r.id).collect();
        assert_eq!(g1, vec![2, 1, 0]);
    }
}
