use time::Time;
use ulid::Ulid;

#[derive(Debug)]
pub enum EngineError {
    /// Query window whose start is not strictly before its end. Rejected
    /// before any computation or fetch happens.
    InvalidWindow { start: Time, end: Time },
    NotFound(Ulid),
    LimitExceeded(&'static str),
    /// The schedule source failed to produce a snapshot.
    Source(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidWindow { start, end } => {
                write!(f, "invalid window: start {start} is not before end {end}")
            }
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Source(e) => write!(f, "schedule source error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
