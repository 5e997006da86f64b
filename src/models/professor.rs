//! Professor model.
//!
//! A professor teaches one or more subjects, has a weekly hour ceiling,
//! and may declare slots they refuse to teach in. Refused slots are a
//! preference: violating one costs a soft penalty, it does not block.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{ProfessorId, Slot, SubjectId};

/// A professor that can be assigned to teaching events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    /// Unique professor identifier.
    pub id: ProfessorId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Maximum weekly teaching hours.
    pub max_hours: u32,
    /// Slots the professor refuses to teach in.
    #[serde(default)]
    pub excluded_slots: BTreeSet<Slot>,
    /// Subjects the professor may teach. Empty = unrestricted.
    #[serde(default)]
    pub subjects: BTreeSet<SubjectId>,
}

impl Professor {
    /// Creates a professor with the given hour ceiling.
    pub fn new(id: ProfessorId, max_hours: u32) -> Self {
        Self {
            id,
            name: String::new(),
            max_hours,
            excluded_slots: BTreeSet::new(),
            subjects: BTreeSet::new(),
        }
    }

    /// Sets the professor name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a refused slot.
    pub fn with_excluded_slot(mut self, slot: Slot) -> Self {
        self.excluded_slots.insert(slot);
        self
    }

    /// Adds a subject the professor may teach.
    pub fn with_subject(mut self, subject_id: SubjectId) -> Self {
        self.subjects.insert(subject_id);
        self
    }

    /// Whether the professor refuses the given slot.
    #[inline]
    pub fn refuses(&self, slot: Slot) -> bool {
        self.excluded_slots.contains(&slot)
    }

    /// Whether the professor may teach a subject.
    pub fn can_teach(&self, subject_id: SubjectId) -> bool {
        self.subjects.is_empty() || self.subjects.contains(&subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_professor_builder() {
        let p = Professor::new(1, 12)
            .with_name("Dr. Polanco")
            .with_excluded_slot(Slot::new(0, 0))
            .with_subject(3);

        assert_eq!(p.id, 1);
        assert_eq!(p.max_hours, 12);
        assert!(p.refuses(Slot::new(0, 0)));
        assert!(!p.refuses(Slot::new(0, 1)));
        assert!(p.can_teach(3));
        assert!(!p.can_teach(4));
    }

    #[test]
    fn test_unrestricted_subjects() {
        let p = Professor::new(1, 10);
        assert!(p.can_teach(42));
    }

    #[test]
    fn test_deserialize_with_optional_fields_omitted() {
        let p: Professor = serde_json::from_str(r#"{"id": 3, "max_hours": 12}"#).unwrap();
        assert_eq!(p, Professor::new(3, 12));
        assert!(p.can_teach(9));
    }
}
