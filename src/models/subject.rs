//! Subject and group models.
//!
//! A subject is taught to exactly one group by exactly one professor for a
//! fixed number of weekly hours. Each required hour becomes one event.

use serde::{Deserialize, Serialize};

use super::{GroupId, ProfessorId, Shift, SubjectId};

/// A subject taught to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: SubjectId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Weekly hours required (one event per hour).
    pub weekly_hours: u32,
    /// Group taking the subject.
    pub group_id: GroupId,
    /// Professor teaching the subject.
    pub professor_id: ProfessorId,
    /// Whether the subject must be taught in a laboratory.
    #[serde(default)]
    pub requires_lab: bool,
}

impl Subject {
    /// Creates a subject.
    pub fn new(
        id: SubjectId,
        weekly_hours: u32,
        group_id: GroupId,
        professor_id: ProfessorId,
    ) -> Self {
        Self {
            id,
            name: String::new(),
            weekly_hours,
            group_id,
            professor_id,
            requires_lab: false,
        }
    }

    /// Sets the subject name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the subject as requiring a laboratory.
    pub fn requiring_lab(mut self) -> Self {
        self.requires_lab = true;
        self
    }
}

/// A student group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Human-readable name (e.g., "ITI 5-1").
    #[serde(default)]
    pub name: String,
    /// Number of students.
    pub students: u32,
    /// Teaching shift.
    #[serde(default)]
    pub shift: Shift,
    /// Subjects the group takes.
    #[serde(default)]
    pub subjects: Vec<SubjectId>,
}

impl Group {
    /// Creates a morning-shift group.
    pub fn new(id: GroupId, students: u32) -> Self {
        Self {
            id,
            name: String::new(),
            students,
            shift: Shift::Morning,
            subjects: Vec::new(),
        }
    }

    /// Sets the group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the shift.
    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shift = shift;
        self
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject_id: SubjectId) -> Self {
        self.subjects.push(subject_id);
        self
    }
}
