//! Roster file -> schedule -> store -> notify -> report.

use labsched_core::notify::DeliveryStatus;
use labsched_core::storage::NotifyConfig;
use labsched_core::{
    render_bundles, Notifier, OutboxTransport, Roster, RosterShuffler, ScheduleBundle,
    ScheduleRequest, ScheduleStore,
};
use tempfile::TempDir;

const ROSTER: &str = "\
Name,Email
Adam Adams,adam@example.com
Taylor Wall,taylor@example.com
Jason Torres,jason@example.com
Cassandra Weber,cassandra@example.com
Carl Mclaughlin,carl@example.com
Gabriel Lee,gabriel@example.com
Jessica Brown,jessica@example.com
";

#[test]
fn full_workflow() {
    let dir = TempDir::new().unwrap();
    let roster_path = dir.path().join("students.csv");
    std::fs::write(&roster_path, ROSTER).unwrap();

    let roster = Roster::load(&roster_path).unwrap();
    assert_eq!(roster.names.len(), 7);

    let schedule = ScheduleRequest::parse(
        "12:00:00",
        "15:00:00",
        "1:00:00",
        roster.names.clone(),
        Some("3"),
    )
    .unwrap()
    .build(&mut RosterShuffler::seeded(2023))
    .unwrap();
    assert_eq!(schedule.len(), 3);

    let bundle = ScheduleBundle::new(schedule)
        .with_meta("course", Some("MCT543"))
        .with_meta("day", Some("Monday"))
        .with_meta("start_time", Some("12:00:00"))
        .with_meta("end_time", Some("15:00:00"))
        .with_meta("file", Some(roster_path.to_string_lossy().to_string()))
        .with_meta("id", None::<String>);

    let mut store = ScheduleStore::open(dir.path().join("schedules.json")).unwrap();
    let id = store.save(bundle).unwrap();
    assert_eq!(id, "1");

    let found = store.retrieve("course", "MCT543");
    assert_eq!(found.len(), 1);
    let stored = &found[0];
    assert_eq!(stored.id().as_deref(), Some("1"));

    // Re-derive contacts from the stored file path, as a later run would.
    let file = stored.meta_str("file").unwrap();
    let contacts = Roster::load(file).unwrap().contacts;

    let mut outbox = OutboxTransport::open(dir.path().join("outbox")).unwrap();
    let log = Notifier::new(&NotifyConfig::default()).notify(stored, &contacts, &mut outbox);
    assert_eq!(log.sent_count(), 7);
    assert!(log.reports.iter().all(|r| r.status == DeliveryStatus::Sent));
    assert_eq!(std::fs::read_dir(outbox.dir()).unwrap().count(), 7);

    let report = render_bundles(&found);
    assert!(report.contains("MCT543"));
    assert!(report.contains("DAY: MONDAY"));
    assert!(report.contains("SESSION NUMBER: 2"));
    assert!(report.contains("TIME: 14:00:00 - 15:00:00"));

    let removed = store.delete("id", "1").unwrap();
    assert_eq!(removed.len(), 1);
    assert!(store.is_empty());
}
