mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;
mod store;

pub use availability::{free_cabinets, fully_busy, partially_busy, schedule_with_gaps};
pub use conflict::{should_replace, validate_window};
pub use error::EngineError;
pub use store::InMemoryStore;

use async_trait::async_trait;
use mockall::automock;
use time::Date;
use ulid::Ulid;

use crate::model::{Booking, Cabinet};

/// Read-only view of the bookings relation for one date, supplied by the
/// external datastore. The engine fetches through this seam and never writes.
#[automock]
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Joined booking rows for every cabinet on `day`.
    async fn bookings_for_day(&self, day: Date) -> Result<Vec<Booking>, EngineError>;

    /// Joined booking rows for one cabinet on `day`, sortable by start time.
    async fn bookings_for_cabinet(
        &self,
        cabinet_id: Ulid,
        day: Date,
    ) -> Result<Vec<Booking>, EngineError>;

    /// Every cabinet in the directory.
    async fn all_cabinets(&self) -> Result<Vec<Cabinet>, EngineError>;
}

/// Availability queries over a schedule source. Stateless between calls —
/// every operation reads a fresh snapshot from the source, so concurrent
/// callers never observe engine-held state.
pub struct Engine<S> {
    source: S,
}

impl<S: ScheduleSource> Engine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
