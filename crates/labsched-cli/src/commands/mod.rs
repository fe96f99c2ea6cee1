pub mod config;
pub mod db;
pub mod schedule;

use clap::{Args, ValueEnum};
use indexmap::IndexMap;
use labsched_core::{
    Config, DeliveryLog, Notifier, OutboxTransport, ScheduleBundle, SmtpTransport, StdoutTransport,
    Transport,
};

/// Where `--email` sends rendered messages.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Delivery {
    /// One file per message in the configured outbox directory
    #[default]
    Outbox,
    /// Print messages to standard output
    Stdout,
    /// Send through the relay in [notify.smtp]
    Smtp,
}

/// Options shared by every command; most become bundle metadata.
#[derive(Args, Debug, Clone)]
pub struct BundleMeta {
    /// Save the schedule to the store
    #[arg(long, global = true)]
    pub save: bool,
    /// Notify students of their sessions
    #[arg(long, global = true)]
    pub email: bool,
    /// Delivery backend for --email
    #[arg(long, global = true, value_enum, default_value_t = Delivery::Outbox)]
    pub delivery: Delivery,
    /// Subject line for notifications (defaults to notify.subject)
    #[arg(long, global = true)]
    pub subject: Option<String>,
    /// Course name (for example: MCT524)
    #[arg(long, global = true)]
    pub course: Option<String>,
    /// School session (for example: 2022)
    #[arg(long, global = true)]
    pub session: Option<String>,
    /// School semester (for example: first)
    #[arg(long, global = true)]
    pub semester: Option<String>,
    /// Identifier for the stored schedule; assigned automatically when omitted
    #[arg(long, global = true)]
    pub id: Option<String>,
    /// Day of the week for the practical
    #[arg(long, global = true)]
    pub day: Option<String>,
    /// Date of the practical
    #[arg(long, global = true)]
    pub date: Option<String>,
}

impl BundleMeta {
    /// Metadata fields in display order.
    pub fn fields(&self, subject: &str) -> IndexMap<&'static str, Option<String>> {
        let mut fields = IndexMap::new();
        fields.insert("course", self.course.clone());
        fields.insert("session", self.session.clone());
        fields.insert("semester", self.semester.clone());
        fields.insert("day", self.day.clone());
        fields.insert("date", self.date.clone());
        fields.insert("subject", Some(subject.to_string()));
        fields.insert("id", self.id.clone());
        fields
    }

    pub fn subject(&self, config: &Config) -> String {
        self.subject
            .clone()
            .unwrap_or_else(|| config.notify.subject.clone())
    }
}

/// Notify everyone in `bundle` and print a summary to stderr.
pub fn notify_bundle(
    config: &Config,
    meta: &BundleMeta,
    bundle: &ScheduleBundle,
    contacts: &IndexMap<String, String>,
) -> Result<DeliveryLog, Box<dyn std::error::Error>> {
    let notifier = Notifier::new(&config.notify).with_subject(meta.subject(config));
    let mut transport: Box<dyn Transport> = match meta.delivery {
        Delivery::Outbox => Box::new(OutboxTransport::open(config.outbox_path()?)?),
        Delivery::Stdout => Box::new(StdoutTransport),
        Delivery::Smtp => Box::new(SmtpTransport::from_config(&config.notify)?),
    };

    let log = notifier.notify(bundle, contacts, transport.as_mut());
    eprintln!(
        "notified {} participant(s), {} failed",
        log.sent_count(),
        log.failure_count()
    );
    for failure in log.failures() {
        if let labsched_core::DeliveryStatus::Failed { reason } = &failure.status {
            eprintln!("  {}: {reason}", failure.recipient);
        }
    }
    Ok(log)
}
