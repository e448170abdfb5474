use std::time::Instant;

use time::{Date, Time};
use ulid::Ulid;

use crate::model::{Booking, Cabinet, PartialOverlap, ScheduleEntry};
use crate::observability;

use super::availability;
use super::conflict::validate_window;
use super::{Engine, EngineError, ScheduleSource};

impl<S: ScheduleSource> Engine<S> {
    /// Bookings whose interval fully contains `[start, end)` on `day`,
    /// ordered by (floor, cabinet number, start time).
    pub async fn fully_busy_cabinets(
        &self,
        day: Date,
        start: Time,
        end: Time,
    ) -> Result<Vec<Booking>, EngineError> {
        let window = validate_window(start, end)?;
        let began = Instant::now();
        let bookings = self.source.bookings_for_day(day).await?;
        let hits = availability::fully_busy(&window, &bookings);
        observability::record_query("fully_busy", began.elapsed());
        Ok(hits)
    }

    /// Bookings overlapping `[start, end)` on `day` without containing it,
    /// each with its clamped overlap interval. Ordered like
    /// `fully_busy_cabinets`.
    pub async fn partially_busy_cabinets(
        &self,
        day: Date,
        start: Time,
        end: Time,
    ) -> Result<Vec<PartialOverlap>, EngineError> {
        let window = validate_window(start, end)?;
        let began = Instant::now();
        let bookings = self.source.bookings_for_day(day).await?;
        let hits = availability::partially_busy(&window, &bookings);
        observability::record_query("partially_busy", began.elapsed());
        Ok(hits)
    }

    /// Cabinets with no booking overlapping `[start, end)` on `day`,
    /// ordered by (floor, number).
    pub async fn free_cabinets(
        &self,
        day: Date,
        start: Time,
        end: Time,
    ) -> Result<Vec<Cabinet>, EngineError> {
        let window = validate_window(start, end)?;
        let began = Instant::now();
        let cabinets = self.source.all_cabinets().await?;
        let bookings = self.source.bookings_for_day(day).await?;
        let free = availability::free_cabinets(&window, &cabinets, &bookings);
        observability::record_query("free", began.elapsed());
        Ok(free)
    }

    /// One cabinet's full-day schedule ordered by start time, each entry with
    /// its duration and the gap to the next booking. An unknown cabinet or an
    /// empty day yields an empty schedule.
    pub async fn cabinet_schedule(
        &self,
        cabinet_id: Ulid,
        day: Date,
    ) -> Result<Vec<ScheduleEntry>, EngineError> {
        let began = Instant::now();
        let bookings = self.source.bookings_for_cabinet(cabinet_id, day).await?;
        let entries = availability::schedule_with_gaps(&bookings);
        observability::record_query("schedule", began.elapsed());
        Ok(entries)
    }
}
