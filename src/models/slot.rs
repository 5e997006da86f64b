//! Weekly slot grid.
//!
//! The week is a fixed grid of 5 teaching days × 14 periods of 55 minutes,
//! starting at 07:00. Every overlap check in the crate keys on the canonical
//! slot id `day * 14 + period`, which ranges over `0..70`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Number of teaching days (Monday through Friday).
pub const DAYS: u8 = 5;
/// Number of periods per day.
pub const PERIODS_PER_DAY: u8 = 14;
/// Total number of slots in the weekly grid.
pub const SLOT_COUNT: usize = DAYS as usize * PERIODS_PER_DAY as usize;

const DAY_NAMES: [&str; DAYS as usize] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const FIRST_PERIOD_MINUTES: u16 = 7 * 60;
const PERIOD_MINUTES: u16 = 55;

/// A (day, period) coordinate in the weekly grid.
///
/// Ordering is day-major, which matches ordering by [`Slot::id`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Slot {
    /// Day index, 0 = Monday.
    pub day: u8,
    /// Period index within the day, 0 = 07:00.
    pub period: u8,
}

impl Slot {
    /// Creates a slot.
    ///
    /// # Panics
    /// Panics if `day >= 5` or `period >= 14`.
    pub fn new(day: u8, period: u8) -> Self {
        assert!(
            day < DAYS && period < PERIODS_PER_DAY,
            "slot ({day}, {period}) is outside the {DAYS}x{PERIODS_PER_DAY} grid"
        );
        Self { day, period }
    }

    /// Creates a slot, returning `None` outside the grid.
    pub fn try_new(day: u8, period: u8) -> Option<Self> {
        (day < DAYS && period < PERIODS_PER_DAY).then_some(Self { day, period })
    }

    /// Creates a slot from its canonical id.
    ///
    /// # Panics
    /// Panics if `id >= SLOT_COUNT`.
    pub fn from_id(id: usize) -> Self {
        assert!(id < SLOT_COUNT, "slot id {id} is outside 0..{SLOT_COUNT}");
        Self {
            day: (id / PERIODS_PER_DAY as usize) as u8,
            period: (id % PERIODS_PER_DAY as usize) as u8,
        }
    }

    /// Canonical id: `day * 14 + period`.
    #[inline]
    pub fn id(&self) -> usize {
        self.day as usize * PERIODS_PER_DAY as usize + self.period as usize
    }

    /// Whether this is the first or last period of the day.
    #[inline]
    pub fn is_edge_period(&self) -> bool {
        self.period == 0 || self.period == PERIODS_PER_DAY - 1
    }

    /// Iterates the whole grid in canonical order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOT_COUNT).map(Slot::from_id)
    }

    /// English weekday name.
    pub fn day_name(&self) -> &'static str {
        DAY_NAMES[self.day as usize]
    }

    /// Period start time as `HH:MM`.
    pub fn start_time(&self) -> String {
        let minutes = FIRST_PERIOD_MINUTES + self.period as u16 * PERIOD_MINUTES;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day_name(), self.start_time())
    }
}

/// Teaching shift of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    /// Periods 0..=7 (07:00 to 13:25 start).
    #[default]
    Morning,
    /// Periods 7..=13 (13:25 to 18:55 start).
    Evening,
}

impl Shift {
    /// Periods belonging to this shift.
    pub fn window(&self) -> RangeInclusive<u8> {
        match self {
            Shift::Morning => 0..=7,
            Shift::Evening => 7..=PERIODS_PER_DAY - 1,
        }
    }

    /// Whether a slot falls inside this shift.
    #[inline]
    pub fn contains(&self, slot: Slot) -> bool {
        self.window().contains(&slot.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_id_roundtrip_covers_grid() {
        let ids: Vec<usize> = Slot::all().map(|s| s.id()).collect();
        assert_eq!(ids, (0..SLOT_COUNT).collect::<Vec<_>>());
        assert_eq!(Slot::new(4, 13).id(), 69);
        assert_eq!(Slot::from_id(15), Slot::new(1, 1));
    }

    #[test]
    fn test_slot_ordering_matches_id() {
        assert!(Slot::new(0, 13) < Slot::new(1, 0));
        assert!(Slot::new(2, 3) < Slot::new(2, 4));
    }

    #[test]
    fn test_try_new_rejects_outside_grid() {
        assert!(Slot::try_new(5, 0).is_none());
        assert!(Slot::try_new(0, 14).is_none());
        assert_eq!(Slot::try_new(3, 2), Some(Slot::new(3, 2)));
    }

    #[test]
    #[should_panic(expected = "outside the 5x14 grid")]
    fn test_new_panics_outside_grid() {
        let _ = Slot::new(0, 14);
    }

    #[test]
    fn test_edge_periods() {
        assert!(Slot::new(0, 0).is_edge_period());
        assert!(Slot::new(3, 13).is_edge_period());
        assert!(!Slot::new(3, 6).is_edge_period());
    }

    #[test]
    fn test_display_uses_start_times() {
        assert_eq!(Slot::new(0, 0).to_string(), "Monday 07:00");
        assert_eq!(Slot::new(1, 1).to_string(), "Tuesday 07:55");
        assert_eq!(Slot::new(4, 13).start_time(), "18:55");
    }

    #[test]
    fn test_shift_windows() {
        assert!(Shift::Morning.contains(Slot::new(0, 7)));
        assert!(!Shift::Morning.contains(Slot::new(0, 8)));
        assert!(Shift::Evening.contains(Slot::new(0, 7)));
        assert!(!Shift::Evening.contains(Slot::new(0, 6)));
        assert!(Shift::Evening.contains(Slot::new(0, 13)));
    }
}
