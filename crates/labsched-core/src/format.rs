//! Plain-text rendering of schedules for terminals and printouts.

use crate::schedule::{GroupAssignment, SessionRecord};
use crate::store::ScheduleBundle;

const WIDTH: usize = 100;
const GROUP_WIDTH: usize = 50;

fn rule(out: &mut String, ch: char) {
    out.push_str(&ch.to_string().repeat(WIDTH));
    out.push('\n');
}

fn centered(out: &mut String, text: &str, width: usize) {
    out.push_str(&format!("{text:^width$}\n"));
}

fn header(out: &mut String, bundle: &ScheduleBundle) {
    rule(out, '*');
    if let Some(course) = bundle.meta_str("course") {
        centered(out, &course, WIDTH);
    }
    if let Some(date) = bundle.meta_str("date") {
        centered(out, &date, WIDTH);
    }
    for (key, label) in [("day", "DAY"), ("semester", "SEMESTER"), ("session", "SESSION")] {
        if let Some(value) = bundle.meta_str(key) {
            centered(out, &format!("{label}: {}", value.to_uppercase()), WIDTH);
        }
    }
    if let (Some(start), Some(end)) = (bundle.meta_str("start_time"), bundle.meta_str("end_time")) {
        centered(out, &format!("TIME: {start} - {end}"), WIDTH);
    }
    rule(out, '*');
}

fn numbered(out: &mut String, names: &[String]) {
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("{} {}\n", i + 1, name.to_uppercase()));
    }
}

fn session(out: &mut String, record: &SessionRecord) {
    centered(out, &format!("SESSION NUMBER: {}", record.index), WIDTH);
    centered(
        out,
        &format!("TIME: {} - {}", record.window.start, record.window.end),
        WIDTH,
    );
    rule(out, '-');

    match &record.assignment {
        GroupAssignment::Flat(names) => numbered(out, names),
        GroupAssignment::Grouped(groups) => {
            for (label, names) in groups {
                centered(out, &label.to_uppercase(), GROUP_WIDTH);
                numbered(out, names);
                rule(out, '-');
            }
        }
    }
    rule(out, '*');
}

/// Render sessions without any bundle header.
pub fn render_schedule(schedule: &[SessionRecord]) -> String {
    let mut out = String::new();
    for record in schedule {
        session(&mut out, record);
    }
    out
}

/// Render stored bundles, each with its metadata header.
pub fn render_bundles(bundles: &[ScheduleBundle]) -> String {
    let mut out = String::new();
    for bundle in bundles {
        header(&mut out, bundle);
        out.push_str(&render_schedule(&bundle.schedule));
    }
    out
}
