use clap::{ArgGroup, Args};
use labsched_core::{render_bundles, Config, Roster, ScheduleBundle, ScheduleStore};

use super::{notify_bundle, BundleMeta};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("op").required(true).args(["retrieve", "delete"])))]
pub struct DbArgs {
    /// Retrieve schedules whose KEY field equals VALUE
    #[arg(short, long, num_args = 2, value_names = ["KEY", "VALUE"], alias = "retrive")]
    pub retrieve: Option<Vec<String>>,
    /// Delete schedules whose KEY field equals VALUE
    #[arg(long = "delete", visible_alias = "del", num_args = 2, value_names = ["KEY", "VALUE"])]
    pub delete: Option<Vec<String>>,
    /// Print matching bundles as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

fn key_value(pair: &[String]) -> (&str, &str) {
    (pair[0].as_str(), pair[1].as_str())
}

fn print_bundles(bundles: &[ScheduleBundle], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(bundles)?);
    } else if bundles.is_empty() {
        eprintln!("no matching schedules");
    } else {
        print!("{}", render_bundles(bundles));
    }
    Ok(())
}

pub fn run(args: DbArgs, meta: &BundleMeta) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut store = ScheduleStore::open(config.store_path()?)?;

    if let Some(pair) = &args.retrieve {
        let (key, value) = key_value(pair);
        let bundles = store.retrieve(key, value);
        print_bundles(&bundles, args.json)?;

        if meta.email {
            for bundle in &bundles {
                let Some(file) = bundle.meta_str("file") else {
                    eprintln!(
                        "schedule {} has no roster file recorded, skipping notification",
                        bundle.id().unwrap_or_default()
                    );
                    continue;
                };
                let roster = Roster::load(&file)?;
                notify_bundle(&config, meta, bundle, &roster.contacts)?;
            }
        }
    }

    if let Some(pair) = &args.delete {
        let (key, value) = key_value(pair);
        let removed = store.delete(key, value)?;
        eprintln!("deleted {} schedule(s)", removed.len());
        print_bundles(&removed, args.json)?;
    }
    Ok(())
}
