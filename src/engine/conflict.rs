use time::Time;

use crate::model::{Priority, TimeWindow};

use super::EngineError;

/// Decide whether an incoming assignment may displace the current occupant
/// of a pair+cabinet binding. Strictly higher priority wins; equal priority
/// keeps the incumbent.
pub fn should_replace(current: Priority, incoming: Priority) -> bool {
    incoming > current
}

/// Validate a caller-supplied query window before any computation. A window
/// whose start is not strictly before its end never reaches the engine.
pub fn validate_window(start: Time, end: Time) -> Result<TimeWindow, EngineError> {
    if start >= end {
        return Err(EngineError::InvalidWindow { start, end });
    }
    Ok(TimeWindow::new(start, end))
}
