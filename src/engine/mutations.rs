use dashmap::mapref::entry::Entry;
use tracing::debug;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;
use crate::observability;

use super::conflict::should_replace;
use super::{EngineError, InMemoryStore};

impl InMemoryStore {
    /// Insert a user, or update the record holding the same username in
    /// place (name, password, priority, group) — the stored id wins on
    /// conflict. Returns the id of the stored record.
    pub fn upsert_user(&self, user: User) -> Result<Ulid, EngineError> {
        if user.name.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("user name too long"));
        }
        if user.username.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("username too long"));
        }
        if user.password.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("password too long"));
        }
        if user.group.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("group too long"));
        }

        // The index entry guard serializes concurrent upserts of one username.
        match self.username_index.entry(user.username.clone()) {
            Entry::Occupied(slot) => {
                let existing_id = *slot.get();
                if let Some(mut existing) = self.users.get_mut(&existing_id) {
                    existing.name = user.name;
                    existing.password = user.password;
                    existing.priority = user.priority;
                    existing.group = user.group;
                } else {
                    self.users.insert(existing_id, User { id: existing_id, ..user });
                }
                Ok(existing_id)
            }
            Entry::Vacant(slot) => {
                let id = user.id;
                slot.insert(id);
                self.users.insert(id, user);
                Ok(id)
            }
        }
    }

    /// Delete a user and every assignment it holds.
    pub fn delete_user(&self, id: &Ulid) -> Result<(), EngineError> {
        let (_, user) = self.users.remove(id).ok_or(EngineError::NotFound(*id))?;
        self.username_index.remove(&user.username);
        self.drop_assignments_where(|a| a.user_id == *id);
        Ok(())
    }

    /// Insert a cabinet, or update the record holding the same number in
    /// place (floor, kind, description). Returns the id of the stored record.
    pub fn upsert_cabinet(&self, cabinet: Cabinet) -> Result<Ulid, EngineError> {
        if cabinet.kind.len() > MAX_NAME_LEN {
            return Err(EngineError::LimitExceeded("cabinet kind too long"));
        }
        if let Some(d) = &cabinet.description
            && d.len() > MAX_TEXT_LEN
        {
            return Err(EngineError::LimitExceeded("cabinet description too long"));
        }

        match self.number_index.entry(cabinet.number) {
            Entry::Occupied(slot) => {
                let existing_id = *slot.get();
                if let Some(mut existing) = self.cabinets.get_mut(&existing_id) {
                    existing.floor = cabinet.floor;
                    existing.kind = cabinet.kind;
                    existing.description = cabinet.description;
                } else {
                    self.cabinets
                        .insert(existing_id, Cabinet { id: existing_id, ..cabinet });
                }
                Ok(existing_id)
            }
            Entry::Vacant(slot) => {
                let id = cabinet.id;
                slot.insert(id);
                self.cabinets.insert(id, cabinet);
                Ok(id)
            }
        }
    }

    /// Delete a cabinet and every assignment bound to it.
    pub fn delete_cabinet(&self, id: &Ulid) -> Result<(), EngineError> {
        let (_, cabinet) = self.cabinets.remove(id).ok_or(EngineError::NotFound(*id))?;
        self.number_index.remove(&cabinet.number);
        self.drop_assignments_where(|a| a.cabinet_id == *id);
        Ok(())
    }

    /// Insert or replace a pair by id. The window must be well-formed.
    pub fn upsert_pair(&self, pair: Pair) -> Result<Ulid, EngineError> {
        if pair.window.start >= pair.window.end {
            return Err(EngineError::InvalidWindow {
                start: pair.window.start,
                end: pair.window.end,
            });
        }
        let id = pair.id;
        self.pairs.insert(id, pair);
        Ok(id)
    }

    /// Delete a pair and every assignment scheduled in it.
    pub fn delete_pair(&self, id: &Ulid) -> Result<(), EngineError> {
        self.pairs.remove(id).ok_or(EngineError::NotFound(*id))?;
        self.drop_assignments_where(|a| a.pair_id == *id);
        Ok(())
    }

    /// Bind a pair to a cabinet for `user_id`. A fresh (pair, cabinet) key
    /// inserts; an occupied key is replaced only when the incoming user's
    /// priority ranks strictly higher than the occupant's. Returns whether
    /// the write was applied.
    pub fn assign(
        &self,
        pair_id: Ulid,
        cabinet_id: Ulid,
        user_id: Ulid,
        purpose: Option<String>,
    ) -> Result<bool, EngineError> {
        if let Some(p) = &purpose
            && p.len() > MAX_TEXT_LEN
        {
            return Err(EngineError::LimitExceeded("purpose too long"));
        }
        if !self.pairs.contains_key(&pair_id) {
            return Err(EngineError::NotFound(pair_id));
        }
        if !self.cabinets.contains_key(&cabinet_id) {
            return Err(EngineError::NotFound(cabinet_id));
        }
        let incoming = self
            .users
            .get(&user_id)
            .map(|u| u.priority)
            .ok_or(EngineError::NotFound(user_id))?;

        // The entry guard makes the read-compare-replace atomic per key.
        match self.assignments.entry((pair_id, cabinet_id)) {
            Entry::Vacant(slot) => {
                slot.insert(Assignment {
                    pair_id,
                    cabinet_id,
                    user_id,
                    purpose,
                });
                Ok(true)
            }
            Entry::Occupied(mut slot) => {
                let occupant = self
                    .users
                    .get(&slot.get().user_id)
                    .map(|u| u.priority);
                // a dangling occupant lost its user row; anyone may take over
                if occupant.is_none_or(|current| should_replace(current, incoming)) {
                    slot.insert(Assignment {
                        pair_id,
                        cabinet_id,
                        user_id,
                        purpose,
                    });
                    Ok(true)
                } else {
                    debug!(%pair_id, %cabinet_id, "assignment kept: incoming priority does not outrank occupant");
                    metrics::counter!(observability::ASSIGNMENTS_REJECTED_TOTAL).increment(1);
                    Ok(false)
                }
            }
        }
    }

    /// Remove a pair+cabinet binding. Returns whether it existed.
    pub fn unassign(&self, pair_id: &Ulid, cabinet_id: &Ulid) -> bool {
        self.assignments.remove(&(*pair_id, *cabinet_id)).is_some()
    }

    fn drop_assignments_where(&self, doomed: impl Fn(&Assignment) -> bool) {
        let keys: Vec<(Ulid, Ulid)> = self
            .assignments
            .iter()
            .filter(|e| doomed(e.value()))
            .map(|e| *e.key())
            .collect();
        for key in &keys {
            self.assignments.remove(key);
        }
        if !keys.is_empty() {
            debug!(count = keys.len(), "cascade removed assignments");
        }
    }
}
