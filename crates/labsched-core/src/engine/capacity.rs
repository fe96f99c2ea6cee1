//! Per-session capacity.

use crate::time::GroupSize;

/// Number of participants placed in each non-final session.
///
/// Without a group size this is `ceil(participants / sessions)`, or 1 when
/// there are fewer participants than sessions. With a group size `g` the
/// ceiling is rounded down to a multiple of `g` so sub-groups are not split
/// across sessions; fewer participants than sessions yields `g`.
///
/// The result may be 0 when the ceiling is below `g`. The final session
/// always absorbs the remainder, so this is a degenerate case, not an error.
pub fn allocate(num_sessions: usize, num_participants: usize, group_size: Option<GroupSize>) -> usize {
    if num_sessions == 0 {
        return 0;
    }

    let fewer_than_sessions = num_participants < num_sessions;
    match group_size {
        None if fewer_than_sessions => 1,
        None => num_participants.div_ceil(num_sessions),
        Some(g) if fewer_than_sessions => g.get(),
        Some(g) => {
            let per_session = num_participants.div_ceil(num_sessions);
            per_session - per_session % g.get()
        }
    }
}
