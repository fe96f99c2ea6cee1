use std::path::PathBuf;

use clap::Args;
use labsched_core::{
    render_bundles, Config, Roster, RosterShuffler, ScheduleBundle, ScheduleRequest, ScheduleStore,
};

use super::{notify_bundle, BundleMeta};

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// CSV file with Name and Email columns
    #[arg(short, long)]
    pub file: PathBuf,
    /// Start of the window (hour:minute:second)
    #[arg(short, long = "start-time", alias = "start_time")]
    pub start_time: String,
    /// End of the window (hour:minute:second)
    #[arg(short, long = "end-time", alias = "end_time")]
    pub end_time: String,
    /// Length of each session (hour:minute:second)
    #[arg(short = 't', long = "time-per-session", alias = "time_per_session")]
    pub time_per_session: String,
    /// Number of students per sub-group (optional)
    #[arg(short = 'n', long = "per-group", alias = "num_students_per_subgroup")]
    pub per_group: Option<String>,
    /// Seed for a reproducible shuffle
    #[arg(long)]
    pub seed: Option<u64>,
    /// Print the schedule bundle as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ScheduleArgs, meta: &BundleMeta) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let roster = Roster::load(&args.file)?;
    tracing::debug!(file = %args.file.display(), seed = ?args.seed, "building schedule");

    let request = ScheduleRequest::parse(
        &args.start_time,
        &args.end_time,
        &args.time_per_session,
        roster.names.clone(),
        args.per_group.as_deref(),
    )?;
    let schedule = request.build(&mut RosterShuffler::from_seed_option(args.seed))?;

    let subject = meta.subject(&config);
    let mut bundle = ScheduleBundle::new(schedule);
    for (key, value) in meta.fields(&subject) {
        bundle = bundle.with_meta(key, value);
    }
    bundle = bundle
        .with_meta("file", Some(args.file.to_string_lossy().to_string()))
        .with_meta("start_time", Some(args.start_time.clone()))
        .with_meta("end_time", Some(args.end_time.clone()))
        .with_meta("time_per_session", Some(args.time_per_session.clone()))
        .with_meta("per_group", args.per_group.clone());

    if meta.save {
        let mut store = ScheduleStore::open(config.store_path()?)?;
        let id = store.save(bundle.clone())?;
        bundle = bundle.with_meta("id", Some(id.clone()));
        eprintln!("schedule saved with id {id}");
    }

    if meta.email {
        notify_bundle(&config, meta, &bundle, &roster.contacts)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
    } else {
        print!("{}", render_bundles(std::slice::from_ref(&bundle)));
    }
    Ok(())
}
