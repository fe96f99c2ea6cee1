//! Window planning: session start times across the overall window.

use crate::error::ValidationError;
use crate::time::SessionTime;

/// Start times of every session between `start` and `end`.
///
/// Starts at `start` and steps by `length` while the current value is
/// strictly before `end`. The last session may run past `end`; it is not
/// clipped. `start >= end` yields no sessions.
pub fn plan_sessions(
    start: SessionTime,
    end: SessionTime,
    length: SessionTime,
) -> Result<Vec<SessionTime>, ValidationError> {
    if length.is_zero() {
        return Err(ValidationError::NonPositiveLength);
    }

    let mut times = Vec::new();
    let mut current = start;
    while current < end {
        times.push(current);
        current = current
            .checked_add(length)
            .ok_or_else(|| ValidationError::TimeOverflow(format!("{current} + {length}")))?;
    }
    Ok(times)
}
