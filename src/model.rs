use serde::{Deserialize, Serialize};
use time::{Date, Time};
use ulid::Ulid;

/// Half-open wall-clock interval `[start, end)` within a single day.
/// Cross-midnight windows are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Time,
    pub end: Time,
}

impl TimeWindow {
    pub fn new(start: Time, end: Time) -> Self {
        debug_assert!(start < end, "window start must be before end");
        Self { start, end }
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).as_seconds_f64() / 3600.0
    }

    /// Strict overlap: an interval ending exactly at `other.start` does not
    /// overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns true if `self` covers all of `other`. Boundary equality counts
    /// as containment.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    /// Clamped intersection with `other`. Callers check `overlaps` first.
    pub fn intersection(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow::new(self.start.max(other.start), self.end.min(other.end))
    }
}

/// Booking priority, lowest to highest. An assignment upsert displaces the
/// current occupant only if the incoming priority ranks strictly higher.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Basic,
    Union,
    Lecturer,
    Dispatcher,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Ulid,
    pub name: String,
    /// Unique natural key; upserts conflict on it.
    pub username: String,
    pub password: String,
    pub priority: Priority,
    pub group: String,
}

/// A physical room resource. Bookings reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cabinet {
    pub id: Ulid,
    /// Unique natural key; upserts conflict on it.
    pub number: i32,
    pub floor: i32,
    pub kind: String,
    pub description: Option<String>,
}

/// A scheduled time slot: one calendar day plus a wall-clock window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub id: Ulid,
    pub day: Date,
    pub window: TimeWindow,
}

/// Binds one pair to one cabinet with a responsible user and purpose.
/// At most one assignment exists per (pair, cabinet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub pair_id: Ulid,
    pub cabinet_id: Ulid,
    pub user_id: Ulid,
    pub purpose: Option<String>,
}

/// One occupied interval for one cabinet on one date — the joined row the
/// availability engine consumes. Carries the display fields of the cabinet
/// and the reserving user so results need no further lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub pair_id: Ulid,
    pub cabinet_id: Ulid,
    pub cabinet_number: i32,
    pub floor: i32,
    pub cabinet_kind: String,
    pub day: Date,
    pub window: TimeWindow,
    pub user_id: Ulid,
    pub reserved_by: String,
    pub user_priority: Priority,
    pub purpose: Option<String>,
}

impl Booking {
    /// Sort key for busy listings: floor, then cabinet number, then start.
    pub(crate) fn busy_order(&self) -> (i32, i32, Time) {
        (self.floor, self.cabinet_number, self.window.start)
    }
}

// ── Query result types ───────────────────────────────────────────

/// A booking overlapping the query window without containing it, with the
/// clamped overlap interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialOverlap {
    pub booking: Booking,
    pub overlap: TimeWindow,
}

/// One row of a cabinet's daily schedule: the booking, its length in hours,
/// and the idle gap before the next booking (None on the last row).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub booking: Booking,
    pub duration_hours: f64,
    pub next_booking_starts: Option<Time>,
    pub gap_to_next_hours: Option<f64>,
}
