//! # Labsched Core Library
//!
//! Assigns a roster of participants to fixed-length sessions across a time
//! window, optionally splitting each session into fixed-size sub-groups.
//! The `labsched` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Engine**: window planning, capacity allocation, a single global
//!   shuffle and sub-group partitioning, composed by the assembler
//! - **Roster**: CSV loading of participant names and addresses
//! - **Store**: JSON-file persistence of schedules with metadata
//! - **Notify**: per-participant messages through a pluggable transport
//!   (outbox directory, stdout or an SMTP relay)
//! - **Format**: plain-text reports
//!
//! ## Key Components
//!
//! - [`ScheduleRequest`]: validated inputs, `build()` runs the engine
//! - [`RosterShuffler`]: injectable randomness (seedable for tests)
//! - [`ScheduleStore`]: bundle persistence with auto-incrementing ids
//! - [`Notifier`]: message composition and delivery reporting
//! - [`Config`]: application configuration management

pub mod engine;
pub mod error;
pub mod format;
pub mod notify;
pub mod roster;
pub mod schedule;
pub mod storage;
pub mod store;
pub mod time;

pub use engine::{allocate, build_schedule, plan_sessions, RosterShuffler, ScheduleRequest};
pub use error::{
    CardinalityError, ConfigError, CoreError, NotifyError, RosterError, StoreError,
    ValidationError,
};
pub use format::{render_bundles, render_schedule};
pub use notify::{
    DeliveryLog, DeliveryStatus, Notifier, OutboxTransport, SmtpTransport, StdoutTransport,
    Transport,
};
pub use roster::Roster;
pub use schedule::{GroupAssignment, Schedule, SessionRecord, SessionWindow};
pub use storage::Config;
pub use store::{ScheduleBundle, ScheduleStore};
pub use time::{GroupSize, SessionTime};
