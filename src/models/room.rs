//! Room model.

use serde::{Deserialize, Serialize};

use super::RoomId;

/// A classroom or laboratory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: RoomId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Seats available.
    pub capacity: u32,
    /// Whether the room is a laboratory.
    #[serde(default)]
    pub is_lab: bool,
}

impl Room {
    /// Creates a standard classroom.
    pub fn new(id: RoomId, capacity: u32) -> Self {
        Self {
            id,
            name: String::new(),
            capacity,
            is_lab: false,
        }
    }

    /// Creates a laboratory.
    pub fn lab(id: RoomId, capacity: u32) -> Self {
        Self {
            is_lab: true,
            ..Self::new(id, capacity)
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the room seats `students`.
    #[inline]
    pub fn seats(&self, students: u32) -> bool {
        self.capacity >= students
    }

    /// Whether the room satisfies both the capacity and the laboratory rule.
    pub fn fits(&self, students: u32, requires_lab: bool) -> bool {
        self.seats(students) && (!requires_lab || self.is_lab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builders() {
        let a = Room::new(1, 40).with_name("A1");
        assert!(!a.is_lab);
        assert_eq!(a.name, "A1");

        let z = Room::lab(2, 35);
        assert!(z.is_lab);
        assert_eq!(z.capacity, 35);
    }

    #[test]
    fn test_room_fits() {
        let a = Room::new(1, 30);
        assert!(a.fits(30, false));
        assert!(!a.fits(31, false));
        assert!(!a.fits(20, true));

        let z = Room::lab(2, 30);
        assert!(z.fits(20, true));
        assert!(z.fits(20, false));
    }
}
