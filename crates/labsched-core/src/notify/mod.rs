//! Participant notifications.
//!
//! Every participant of a stored schedule gets one message with their
//! session window, sub-group and the bundle's metadata. Failures are
//! collected per recipient; the schedule is never touched.

mod message;
mod smtp;
mod transport;

pub use message::{validate_email, Message, MessageTemplate, SessionDetails};
pub use smtp::{SmtpTransport, SMTP_PASSWORD_ENV, SMTP_USER_ENV};
pub use transport::{OutboxTransport, StdoutTransport, Transport};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::storage::NotifyConfig;
use crate::store::ScheduleBundle;

/// Outcome for one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Sent,
    Failed {
        /// Human-readable reason for failure
        reason: String,
    },
}

/// Delivery record for one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub recipient: String,
    pub address: Option<String>,
    pub session_number: usize,
    pub group: Option<String>,
    pub status: DeliveryStatus,
}

/// Reports of one notification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryLog {
    pub sent_at: DateTime<Utc>,
    pub reports: Vec<DeliveryReport>,
}

impl DeliveryLog {
    pub fn new(reports: Vec<DeliveryReport>) -> Self {
        Self {
            sent_at: Utc::now(),
            reports,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, DeliveryStatus::Sent))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, DeliveryStatus::Failed { .. }))
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeliveryReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.status, DeliveryStatus::Failed { .. }))
    }
}

/// Composes and delivers per-participant messages.
pub struct Notifier {
    sender: Option<String>,
    subject: String,
    signature: String,
    ignored_keys: Vec<String>,
}

impl Notifier {
    pub fn new(config: &NotifyConfig) -> Self {
        Self {
            sender: config.sender.clone(),
            subject: config.subject.clone(),
            signature: config.signature.clone(),
            ignored_keys: config.ignored_keys.clone(),
        }
    }

    /// Override the configured subject line.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Notify everyone in `bundle`. `contacts` maps names to addresses.
    pub fn notify(
        &self,
        bundle: &ScheduleBundle,
        contacts: &IndexMap<String, String>,
        transport: &mut dyn Transport,
    ) -> DeliveryLog {
        let template = MessageTemplate::from_bundle(bundle, &self.ignored_keys);
        let mut reports = Vec::new();

        for record in &bundle.schedule {
            for (group, name) in record.assignment.members() {
                let details = SessionDetails {
                    group: group.map(str::to_string),
                    start_time: record.window.start.to_string(),
                    end_time: record.window.end.to_string(),
                    session_number: record.index,
                };
                let address = contacts.get(name).cloned();
                let status = match self.send(name, address.as_deref(), &details, &template, transport) {
                    Ok(()) => DeliveryStatus::Sent,
                    Err(e) => {
                        tracing::warn!(recipient = name, error = %e, "notification failed");
                        DeliveryStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                };
                reports.push(DeliveryReport {
                    recipient: name.to_string(),
                    address,
                    session_number: record.index,
                    group: details.group,
                    status,
                });
            }
        }

        let log = DeliveryLog::new(reports);
        tracing::info!(
            transport = transport.name(),
            sent = log.sent_count(),
            failed = log.failure_count(),
            "notifications processed"
        );
        log
    }

    fn send(
        &self,
        name: &str,
        address: Option<&str>,
        details: &SessionDetails,
        template: &MessageTemplate,
        transport: &mut dyn Transport,
    ) -> Result<(), NotifyError> {
        let address = address.ok_or_else(|| NotifyError::UnknownRecipient(name.to_string()))?;
        let body = template.render(name, details, &self.signature);
        let message = Message::new(self.sender.clone(), address, &self.subject, body)?;
        transport.deliver(&message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RosterShuffler, ScheduleRequest};

    #[derive(Default)]
    struct Recording {
        sent: Vec<Message>,
        reject: Option<String>,
    }

    impl Transport for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
            if self.reject.as_deref() == Some(message.to.as_str()) {
                return Err(NotifyError::DeliveryFailed {
                    recipient: message.to.clone(),
                    message: "mailbox full".into(),
                });
            }
            self.sent.push(message.clone());
            Ok(())
        }
    }

    fn contacts(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(n, e)| (n.to_string(), e.to_string()))
            .collect()
    }

    fn bundle(names: &[&str], group_size: Option<&str>) -> ScheduleBundle {
        let roster = names.iter().map(|s| s.to_string()).collect();
        let schedule = ScheduleRequest::parse("12:00:00", "13:00:00", "00:30:00", roster, group_size)
            .unwrap()
            .build(&mut RosterShuffler::seeded(4))
            .unwrap();
        ScheduleBundle::new(schedule).with_meta("course", Some("MCT543"))
    }

    #[test]
    fn one_message_per_participant() {
        let bundle = bundle(&["Ada", "Lin", "Bo", "Cy"], Some("2"));
        let contacts = contacts(&[
            ("Ada", "ada@x.io"),
            ("Lin", "lin@x.io"),
            ("Bo", "bo@x.io"),
            ("Cy", "cy@x.io"),
        ]);
        let mut transport = Recording::default();
        let log = Notifier::new(&NotifyConfig::default()).notify(&bundle, &contacts, &mut transport);

        assert_eq!(log.sent_count(), 4);
        assert_eq!(transport.sent.len(), 4);
        assert!(transport.sent.iter().all(|m| m.subject == "LAB SCHEDULE"));
        assert!(transport.sent.iter().all(|m| m.body.contains("COURSE: MCT543")));
        assert!(transport.sent.iter().all(|m| m.body.contains("GROUP_NUMBER: group 0")));
    }

    #[test]
    fn failures_are_reported_per_recipient() {
        let bundle = bundle(&["Ada", "Lin", "Bo"], None);
        let contacts = contacts(&[("Ada", "ada@x.io"), ("Lin", "not-an-address")]);
        let mut transport = Recording::default();
        let log = Notifier::new(&NotifyConfig::default())
            .with_subject("PHYSICS LAB")
            .notify(&bundle, &contacts, &mut transport);

        assert_eq!(log.reports.len(), 3);
        assert_eq!(log.sent_count(), 1);
        assert_eq!(log.failure_count(), 2);
        assert_eq!(transport.sent[0].to, "ada@x.io");
        assert_eq!(transport.sent[0].subject, "PHYSICS LAB");

        let failed: Vec<&str> = log.failures().map(|r| r.recipient.as_str()).collect();
        assert!(failed.contains(&"Lin"));
        assert!(failed.contains(&"Bo"));
    }

    #[test]
    fn transport_errors_do_not_stop_the_run() {
        let bundle = bundle(&["Ada", "Lin"], None);
        let contacts = contacts(&[("Ada", "ada@x.io"), ("Lin", "lin@x.io")]);
        let mut transport = Recording {
            reject: Some("ada@x.io".into()),
            ..Default::default()
        };
        let log = Notifier::new(&NotifyConfig::default()).notify(&bundle, &contacts, &mut transport);

        assert_eq!(log.sent_count(), 1);
        assert_eq!(transport.sent[0].to, "lin@x.io");
        let failure = log.failures().next().unwrap();
        assert_eq!(failure.recipient, "Ada");
        assert!(matches!(&failure.status, DeliveryStatus::Failed { reason } if reason.contains("mailbox full")));
    }
}
