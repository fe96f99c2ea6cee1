//! Validated value types for engine inputs.
//!
//! [`SessionTime`] is an offset from midnight (or any other reference point),
//! not a calendar timestamp. [`GroupSize`] is a strictly positive sub-group
//! size. Both can only be obtained through validating constructors.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Non-negative span of hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionTime(TimeDelta);

impl SessionTime {
    /// Parse `"H:M:S"`. Exactly three unsigned integer components are
    /// required; components are not range-limited (`"0:90:00"` is 1h30m).
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedTime {
            input: input.to_string(),
        };

        let parts: Vec<&str> = input.trim().split(':').collect();
        let [hours, minutes, seconds] = parts.as_slice() else {
            return Err(malformed());
        };

        let mut total: i64 = 0;
        for (part, unit) in [(hours, 3600i64), (minutes, 60), (seconds, 1)] {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            let value: i64 = part.parse().map_err(|_| malformed())?;
            total = value
                .checked_mul(unit)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| ValidationError::TimeOverflow(input.to_string()))?;
        }

        Self::from_secs(total).ok_or_else(|| ValidationError::TimeOverflow(input.to_string()))
    }

    /// Build from whole seconds. `None` when negative or out of range.
    pub fn from_secs(secs: i64) -> Option<Self> {
        if secs < 0 {
            return None;
        }
        TimeDelta::try_seconds(secs).map(SessionTime)
    }

    pub fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        let secs = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
        SessionTime(TimeDelta::seconds(secs))
    }

    pub fn as_secs(&self) -> i64 {
        self.0.num_seconds()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: SessionTime) -> Option<SessionTime> {
        self.0.checked_add(&rhs.0).map(SessionTime)
    }
}

impl fmt::Display for SessionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.as_secs();
        write!(f, "{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    }
}

impl FromStr for SessionTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionTime::parse(s)
    }
}

impl Serialize for SessionTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SessionTime::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Strictly positive number of participants per sub-group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupSize(NonZeroUsize);

impl GroupSize {
    pub fn new(size: usize) -> Result<Self, ValidationError> {
        NonZeroUsize::new(size)
            .map(GroupSize)
            .ok_or_else(|| ValidationError::InvalidGroupSize {
                input: size.to_string(),
            })
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl FromStr for GroupSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidGroupSize {
            input: s.to_string(),
        };
        let size: usize = s.trim().parse().map_err(|_| invalid())?;
        GroupSize::new(size).map_err(|_| invalid())
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
