//! Pre-flight validation of a timetabling catalog.
//!
//! Checks structural integrity and obvious infeasibility before any
//! search starts. Detects:
//! - Duplicate IDs
//! - Subjects referencing unknown groups or professors
//! - Group subject lists out of sync with the subjects
//! - Subjects no room can host
//! - Demand that cannot fit the 70-slot grid (per group, per professor,
//!   per room pool) or a professor's hour ceiling
//!
//! All issues are collected; validation never stops at the first one.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use crate::models::{Catalog, ProfessorId, RoomId, SLOT_COUNT};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same type share an ID.
    DuplicateId,
    /// A subject references a group that doesn't exist.
    UnknownGroup,
    /// A subject references a professor that doesn't exist.
    UnknownProfessor,
    /// A group lists a subject that doesn't exist.
    UnknownSubject,
    /// A group lists a subject owned by another group.
    SubjectGroupMismatch,
    /// A subject requires zero weekly hours.
    EmptySubject,
    /// A professor is assigned a subject outside their declared list.
    UnqualifiedProfessor,
    /// No room satisfies a subject's capacity and laboratory needs.
    NoSuitableRoom,
    /// A professor's required hours exceed their maximum.
    ProfessorOverloaded,
    /// Required hours cannot fit the slot grid.
    GridCapacityExceeded,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a catalog before scheduling.
///
/// Checks:
/// 1. No duplicate professor, subject, group or room IDs
/// 2. Every subject references an existing group and professor
/// 3. Every subject listed by a group exists and belongs to that group
/// 4. Every subject needs at least one hour
/// 5. Professors with a declared subject list teach only those subjects
/// 6. Every subject has at least one suitable room
/// 7. No professor's required hours exceed their maximum
/// 8. No group or professor needs more than 70 hours, and the room
///    pools (all rooms, laboratories) can host the hours assigned to them
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_catalog(catalog: &Catalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_duplicates(
        "professor",
        catalog.professors.iter().map(|p| p.id),
        &mut errors,
    );
    check_duplicates("subject", catalog.subjects.iter().map(|s| s.id), &mut errors);
    check_duplicates("group", catalog.groups.iter().map(|g| g.id), &mut errors);
    check_duplicates("room", catalog.rooms.iter().map(|r| r.id), &mut errors);

    // Subject references
    for subject in &catalog.subjects {
        if catalog.group(subject.group_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownGroup,
                format!(
                    "Subject {} references unknown group {}",
                    subject.id, subject.group_id
                ),
            ));
        }
        match catalog.professor(subject.professor_id) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::UnknownProfessor,
                format!(
                    "Subject {} references unknown professor {}",
                    subject.id, subject.professor_id
                ),
            )),
            Some(p) if !p.can_teach(subject.id) => errors.push(ValidationError::new(
                ValidationErrorKind::UnqualifiedProfessor,
                format!("Professor {} does not teach subject {}", p.id, subject.id),
            )),
            Some(_) => {}
        }
        if subject.weekly_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySubject,
                format!("Subject {} has no weekly hours", subject.id),
            ));
        }
        if catalog.group(subject.group_id).is_some() && catalog.suitable_rooms(subject).is_empty()
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoSuitableRoom,
                format!("No room can host subject {}", subject.id),
            ));
        }
    }

    // Group subject lists
    for group in &catalog.groups {
        for &subject_id in &group.subjects {
            match catalog.subject(subject_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSubject,
                    format!("Group {} lists unknown subject {}", group.id, subject_id),
                )),
                Some(s) if s.group_id != group.id => errors.push(ValidationError::new(
                    ValidationErrorKind::SubjectGroupMismatch,
                    format!(
                        "Group {} lists subject {} owned by group {}",
                        group.id, subject_id, s.group_id
                    ),
                )),
                Some(_) => {}
            }
        }
    }

    check_capacity(catalog, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicates(
    entity: &str,
    ids: impl Iterator<Item = u32>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}

/// Demand versus the grid, per group, per professor and per room pool.
fn check_capacity(catalog: &Catalog, errors: &mut Vec<ValidationError>) {
    let grid = SLOT_COUNT as u32;
    let mut group_hours: BTreeMap<u32, u32> = BTreeMap::new();
    let mut professor_hours: BTreeMap<ProfessorId, u32> = BTreeMap::new();
    let mut lab_hours = 0u32;

    for subject in &catalog.subjects {
        *group_hours.entry(subject.group_id).or_insert(0) += subject.weekly_hours;
        *professor_hours.entry(subject.professor_id).or_insert(0) += subject.weekly_hours;
        if subject.requires_lab {
            lab_hours += subject.weekly_hours;
        }
    }

    for (group_id, hours) in group_hours {
        if hours > grid {
            errors.push(ValidationError::new(
                ValidationErrorKind::GridCapacityExceeded,
                format!("Group {group_id} needs {hours} hours, the grid has {grid} slots"),
            ));
        }
    }

    for (professor_id, hours) in professor_hours {
        if hours > grid {
            errors.push(ValidationError::new(
                ValidationErrorKind::GridCapacityExceeded,
                format!("Professor {professor_id} needs {hours} hours, the grid has {grid} slots"),
            ));
        }
        if let Some(p) = catalog.professor(professor_id) {
            if hours > p.max_hours {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ProfessorOverloaded,
                    format!(
                        "Professor {} needs {} hours, maximum is {}",
                        professor_id, hours, p.max_hours
                    ),
                ));
            }
        }
    }

    let total = catalog.required_hours();
    let room_slots = grid * catalog.rooms.len() as u32;
    if total > room_slots {
        errors.push(ValidationError::new(
            ValidationErrorKind::GridCapacityExceeded,
            format!("{total} hours required, rooms offer {room_slots} room-slots"),
        ));
    }

    let lab_slots = grid * catalog.rooms.iter().filter(|r| r.is_lab).count() as u32;
    if lab_hours > lab_slots {
        errors.push(ValidationError::new(
            ValidationErrorKind::GridCapacityExceeded,
            format!("{lab_hours} laboratory hours required, laboratories offer {lab_slots}"),
        ));
    }

    check_room_pools(catalog, errors);
}

/// Subjects whose suitable rooms all lie inside a pool compete for that
/// pool's room-slots. Subjects with no suitable room are reported elsewhere.
fn check_room_pools(catalog: &Catalog, errors: &mut Vec<ValidationError>) {
    let grid = SLOT_COUNT as u32;
    let demands: Vec<(BTreeSet<RoomId>, u32)> = catalog
        .subjects
        .iter()
        .filter(|s| catalog.group(s.group_id).is_some())
        .map(|s| {
            let rooms: BTreeSet<RoomId> = catalog.suitable_rooms(s).iter().map(|r| r.id).collect();
            (rooms, s.weekly_hours)
        })
        .filter(|(rooms, _)| !rooms.is_empty())
        .collect();

    let all_rooms: BTreeSet<RoomId> = catalog.rooms.iter().map(|r| r.id).collect();
    let pools: BTreeSet<&BTreeSet<RoomId>> = demands.iter().map(|(rooms, _)| rooms).collect();

    for pool in pools {
        // The full room set is covered by the total-hours check.
        if *pool == all_rooms {
            continue;
        }
        let hours: u32 = demands
            .iter()
            .filter(|(rooms, _)| rooms.is_subset(pool))
            .map(|(_, h)| h)
            .sum();
        let slots = grid * pool.len() as u32;
        if hours > slots {
            errors.push(ValidationError::new(
                ValidationErrorKind::GridCapacityExceeded,
                format!("{hours} hours can only use rooms {pool:?}, which offer {slots} room-slots"),
            ));
        }
    }
}
