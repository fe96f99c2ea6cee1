//! Allocation engine.
//!
//! Four steps run in sequence for every schedule:
//! - [`planner`]: session start times across the window
//! - [`capacity`]: participants per non-final session
//! - [`shuffle`]: one global randomization of the roster
//! - [`partition`]: fixed-size sub-groups within a session
//!
//! [`assembler`] composes them. The engine is pure and synchronous; it does
//! no I/O and holds no state between runs.

pub mod assembler;
pub mod capacity;
pub mod partition;
pub mod planner;
pub mod shuffle;

pub use assembler::{build_schedule, ScheduleRequest};
pub use capacity::allocate;
pub use partition::{assign, group_label, index_chunks};
pub use planner::plan_sessions;
pub use shuffle::{shuffle_roster, RosterShuffler};
