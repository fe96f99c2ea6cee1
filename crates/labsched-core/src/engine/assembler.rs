//! Schedule assembly: plan, allocate, shuffle once, slice and partition.

use tracing::{debug, info};

use super::capacity::allocate;
use super::partition::{assign, index_chunks};
use super::planner::plan_sessions;
use super::shuffle::RosterShuffler;
use crate::error::{Result, ValidationError};
use crate::schedule::{GroupAssignment, Schedule, SessionRecord, SessionWindow};
use crate::time::{GroupSize, SessionTime};

/// Validated inputs for one assembly run.
///
/// Owns its roster; the roster is shuffled in place during [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    start: SessionTime,
    end: SessionTime,
    length: SessionTime,
    roster: Vec<String>,
    group_size: Option<GroupSize>,
}

impl ScheduleRequest {
    pub fn new(
        start: SessionTime,
        end: SessionTime,
        length: SessionTime,
        roster: Vec<String>,
        group_size: Option<GroupSize>,
    ) -> Result<Self, ValidationError> {
        if length.is_zero() {
            return Err(ValidationError::NonPositiveLength);
        }
        Ok(Self {
            start,
            end,
            length,
            roster,
            group_size,
        })
    }

    /// Build from raw `"H:M:S"` strings and an optional group size.
    pub fn parse(
        start: &str,
        end: &str,
        length: &str,
        roster: Vec<String>,
        group_size: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let group_size = group_size.map(str::parse::<GroupSize>).transpose()?;
        Self::new(
            SessionTime::parse(start)?,
            SessionTime::parse(end)?,
            SessionTime::parse(length)?,
            roster,
            group_size,
        )
    }

    pub fn roster(&self) -> &[String] {
        &self.roster
    }

    pub fn group_size(&self) -> Option<GroupSize> {
        self.group_size
    }

    /// Run the assembly. Every participant lands in exactly one session.
    pub fn build(mut self, shuffler: &mut RosterShuffler) -> Result<Schedule> {
        let windows = plan_sessions(self.start, self.end, self.length)?;
        debug!(sessions = windows.len(), "planned session windows");
        if windows.is_empty() {
            info!("window is empty, no sessions scheduled");
            return Ok(Vec::new());
        }

        let total = self.roster.len();
        let capacity = allocate(windows.len(), total, self.group_size);
        debug!(capacity, participants = total, "computed session capacity");

        shuffler.shuffle(&mut self.roster);

        let last = windows.len() - 1;
        let mut schedule = Vec::with_capacity(windows.len());
        for (index, &start) in windows.iter().enumerate() {
            let from = index.saturating_mul(capacity).min(total);
            let to = if index == last {
                total
            } else {
                from.saturating_add(capacity).min(total)
            };
            let slice = &self.roster[from..to];

            let assignment = match self.group_size {
                Some(size) => {
                    let chunks = index_chunks(slice.len(), Some(size));
                    GroupAssignment::Grouped(assign(slice, &chunks)?)
                }
                None => GroupAssignment::Flat(slice.to_vec()),
            };

            let end = start.checked_add(self.length).ok_or_else(|| {
                ValidationError::TimeOverflow(format!("{start} + {}", self.length))
            })?;

            schedule.push(SessionRecord {
                index,
                window: SessionWindow { start, end },
                assignment,
            });
        }

        info!(
            sessions = schedule.len(),
            participants = total,
            grouped = self.group_size.is_some(),
            "schedule assembled"
        );
        Ok(schedule)
    }
}

/// Build a schedule from raw inputs with an entropy-seeded shuffle.
pub fn build_schedule(
    start: &str,
    end: &str,
    length: &str,
    roster: Vec<String>,
    group_size: Option<usize>,
) -> Result<Schedule> {
    let group_size = group_size.map(GroupSize::new).transpose()?;
    let request = ScheduleRequest::new(
        SessionTime::parse(start)?,
        SessionTime::parse(end)?,
        SessionTime::parse(length)?,
        roster,
        group_size,
    )?;
    request.build(&mut RosterShuffler::new())
}
