use async_trait::async_trait;
use dashmap::DashMap;
use time::Date;
use ulid::Ulid;

use crate::model::*;

use super::{EngineError, ScheduleSource};

/// In-memory stand-in for the relational datastore: one map per relation
/// plus the secondary indexes the natural-key upserts need. All methods take
/// `&self`; per-key entry guards serialize conflicting writers.
pub struct InMemoryStore {
    pub(super) users: DashMap<Ulid, User>,
    pub(super) cabinets: DashMap<Ulid, Cabinet>,
    pub(super) pairs: DashMap<Ulid, Pair>,
    /// Keyed by (pair_id, cabinet_id) — the relation's composite primary key.
    pub(super) assignments: DashMap<(Ulid, Ulid), Assignment>,
    /// username → user id
    pub(super) username_index: DashMap<String, Ulid>,
    /// cabinet number → cabinet id
    pub(super) number_index: DashMap<i32, Ulid>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            cabinets: DashMap::new(),
            pairs: DashMap::new(),
            assignments: DashMap::new(),
            username_index: DashMap::new(),
            number_index: DashMap::new(),
        }
    }

    // ── Point reads ──────────────────────────────────────────

    pub fn user(&self, id: &Ulid) -> Option<User> {
        self.users.get(id).map(|e| e.value().clone())
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let id = *self.username_index.get(username)?.value();
        self.user(&id)
    }

    pub fn cabinet(&self, id: &Ulid) -> Option<Cabinet> {
        self.cabinets.get(id).map(|e| e.value().clone())
    }

    pub fn cabinet_by_number(&self, number: i32) -> Option<Cabinet> {
        let id = *self.number_index.get(&number)?.value();
        self.cabinet(&id)
    }

    pub fn pair(&self, id: &Ulid) -> Option<Pair> {
        self.pairs.get(id).map(|e| e.value().clone())
    }

    /// Pairs scheduled on `day`, ordered by start time.
    pub fn pairs_for_day(&self, day: Date) -> Vec<Pair> {
        let mut hits: Vec<Pair> = self
            .pairs
            .iter()
            .filter(|e| e.value().day == day)
            .map(|e| e.value().clone())
            .collect();
        hits.sort_by_key(|p| p.window.start);
        hits
    }

    pub fn assignment(&self, pair_id: &Ulid, cabinet_id: &Ulid) -> Option<Assignment> {
        self.assignments
            .get(&(*pair_id, *cabinet_id))
            .map(|e| e.value().clone())
    }

    // ── Joins ────────────────────────────────────────────────

    /// pairs ⋈ assignments ⋈ cabinets ⋈ users for one assignment row.
    /// None if a referenced row is gone mid-iteration.
    fn booking_row(&self, assignment: &Assignment, pair: &Pair) -> Option<Booking> {
        let cabinet = self.cabinet(&assignment.cabinet_id)?;
        let user = self.user(&assignment.user_id)?;
        Some(Booking {
            pair_id: pair.id,
            cabinet_id: cabinet.id,
            cabinet_number: cabinet.number,
            floor: cabinet.floor,
            cabinet_kind: cabinet.kind,
            day: pair.day,
            window: pair.window,
            user_id: user.id,
            reserved_by: user.name,
            user_priority: user.priority,
            purpose: assignment.purpose.clone(),
        })
    }

    /// Every binding of one pair, joined with cabinet and user display
    /// fields. Ordered by (floor, cabinet number, start time).
    pub fn pair_assignments(&self, pair_id: &Ulid) -> Vec<Booking> {
        let Some(pair) = self.pair(pair_id) else {
            return Vec::new();
        };
        let mut rows: Vec<Booking> = self
            .assignments
            .iter()
            .filter(|e| e.key().0 == *pair_id)
            .filter_map(|e| self.booking_row(e.value(), &pair))
            .collect();
        rows.sort_by_key(Booking::busy_order);
        rows
    }
}

#[async_trait]
impl ScheduleSource for InMemoryStore {
    async fn bookings_for_day(&self, day: Date) -> Result<Vec<Booking>, EngineError> {
        let mut rows = Vec::new();
        for pair in self.pairs.iter().filter(|e| e.value().day == day) {
            for entry in self.assignments.iter().filter(|e| e.key().0 == pair.id) {
                if let Some(row) = self.booking_row(entry.value(), pair.value()) {
                    rows.push(row);
                }
            }
        }
        rows.sort_by_key(Booking::busy_order);
        Ok(rows)
    }

    async fn bookings_for_cabinet(
        &self,
        cabinet_id: Ulid,
        day: Date,
    ) -> Result<Vec<Booking>, EngineError> {
        let mut rows = Vec::new();
        for pair in self.pairs.iter().filter(|e| e.value().day == day) {
            if let Some(entry) = self.assignments.get(&(pair.id, cabinet_id))
                && let Some(row) = self.booking_row(entry.value(), pair.value())
            {
                rows.push(row);
            }
        }
        rows.sort_by_key(|b| b.window.start);
        Ok(rows)
    }

    async fn all_cabinets(&self) -> Result<Vec<Cabinet>, EngineError> {
        let mut cabinets: Vec<Cabinet> = self.cabinets.iter().map(|e| e.value().clone()).collect();
        cabinets.sort_by_key(|c| (c.floor, c.number));
        Ok(cabinets)
    }
}
