//! Schedule data model.
//!
//! A [`Schedule`] is the ordered list of [`SessionRecord`]s produced by the
//! assembler. Its serialized shape is the payload the store keeps verbatim:
//!
//! ```json
//! {
//!   "session_number": 0,
//!   "start_time": "12:00:00",
//!   "end_time": "12:30:00",
//!   "groups": { "group 0": ["Ada", "Lin"] }
//! }
//! ```
//!
//! `groups` is a plain array when no sub-grouping was requested.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::time::SessionTime;

/// Start and end of one session. `end` is `start + length` and is not
/// clipped to the overall window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    #[serde(rename = "start_time")]
    pub start: SessionTime,
    #[serde(rename = "end_time")]
    pub end: SessionTime,
}

/// Participants of one session, either flat or split into labelled sub-groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupAssignment {
    Flat(Vec<String>),
    Grouped(IndexMap<String, Vec<String>>),
}

impl GroupAssignment {
    /// Every participant in this assignment, in group order.
    pub fn participants(&self) -> Vec<&str> {
        match self {
            GroupAssignment::Flat(names) => names.iter().map(String::as_str).collect(),
            GroupAssignment::Grouped(groups) => groups
                .values()
                .flat_map(|names| names.iter().map(String::as_str))
                .collect(),
        }
    }

    /// `(group label, participant)` pairs; the label is `None` in flat mode.
    pub fn members(&self) -> Vec<(Option<&str>, &str)> {
        match self {
            GroupAssignment::Flat(names) => names.iter().map(|n| (None, n.as_str())).collect(),
            GroupAssignment::Grouped(groups) => groups
                .iter()
                .flat_map(|(label, names)| {
                    names.iter().map(move |n| (Some(label.as_str()), n.as_str()))
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            GroupAssignment::Flat(names) => names.len(),
            GroupAssignment::Grouped(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One planned session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "session_number")]
    pub index: usize,
    #[serde(flatten)]
    pub window: SessionWindow,
    #[serde(rename = "groups")]
    pub assignment: GroupAssignment,
}

/// Ordered session records, index-aligned with planning order.
pub type Schedule = Vec<SessionRecord>;

/// Every participant across a schedule, in session order.
pub fn scheduled_participants(schedule: &[SessionRecord]) -> Vec<&str> {
    schedule
        .iter()
        .flat_map(|record| record.assignment.participants())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(assignment: GroupAssignment) -> SessionRecord {
        SessionRecord {
            index: 0,
            window: SessionWindow {
                start: SessionTime::hms(12, 0, 0),
                end: SessionTime::hms(13, 0, 0),
            },
            assignment,
        }
    }

    #[test]
    fn flat_record_serializes_as_array() {
        let rec = record(GroupAssignment::Flat(vec!["Ada".into(), "Lin".into()]));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "session_number": 0,
                "start_time": "12:00:00",
                "end_time": "13:00:00",
                "groups": ["Ada", "Lin"],
            })
        );
    }

    #[test]
    fn grouped_record_roundtrips_in_label_order() {
        let mut groups = IndexMap::new();
        groups.insert("group 0".to_string(), vec!["Ada".to_string()]);
        groups.insert("group 1".to_string(), vec!["Lin".to_string(), "Bo".to_string()]);
        let rec = record(GroupAssignment::Grouped(groups));

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.find("group 0").unwrap() < json.find("group 1").unwrap());

        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert_eq!(back.assignment.participants(), vec!["Ada", "Lin", "Bo"]);
    }

    #[test]
    fn members_carry_group_labels() {
        let mut groups = IndexMap::new();
        groups.insert("group 0".to_string(), vec!["Ada".to_string()]);
        let grouped = GroupAssignment::Grouped(groups);
        assert_eq!(grouped.members(), vec![(Some("group 0"), "Ada")]);

        let flat = GroupAssignment::Flat(vec!["Lin".into()]);
        assert_eq!(flat.members(), vec![(None, "Lin")]);
    }

    #[test]
    fn empty_flat_assignment() {
        let flat = GroupAssignment::Flat(Vec::new());
        assert!(flat.is_empty());
        assert_eq!(flat.len(), 0);
    }
}
