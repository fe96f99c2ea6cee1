//! Message composition.

use serde_json::Value;

use crate::error::ValidationError;
use crate::store::ScheduleBundle;

const INTRO: &str = "Below is details of your Practical session";

/// Check an address has the `local@domain.tld` shape.
pub fn validate_email(address: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(address.to_string());
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let is_part = |c: char| is_word(c) || c == '.' || c == '-';

    let (local, domain) = address.split_once('@').ok_or_else(invalid)?;
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if local.is_empty() || !local.chars().all(is_part) {
        return Err(invalid());
    }
    if host.is_empty() || !host.chars().all(is_part) {
        return Err(invalid());
    }
    if tld.is_empty() || !tld.chars().all(is_word) {
        return Err(invalid());
    }
    Ok(())
}

/// Where a recipient sits in the schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetails {
    pub group: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub session_number: usize,
}

/// Body lines shared by every recipient of one bundle.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
    lines: Vec<String>,
}

impl MessageTemplate {
    /// Intro line plus one upper-cased `KEY: VALUE` line per metadata field.
    /// Null fields, the schedule payload and `ignored_keys` are left out.
    pub fn from_bundle(bundle: &ScheduleBundle, ignored_keys: &[String]) -> Self {
        let mut lines = vec![INTRO.to_string()];
        for (key, value) in &bundle.meta {
            if ignored_keys.iter().any(|k| k == key) {
                continue;
            }
            let text = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            lines.push(format!("{key}: {text}").to_uppercase());
        }
        Self { lines }
    }

    /// Personalized body for `name`.
    pub fn render(&self, name: &str, details: &SessionDetails, signature: &str) -> String {
        let mut lines = Vec::with_capacity(self.lines.len() + 6);
        lines.push(format!("Hi {name},\n"));
        lines.extend(self.lines.iter().cloned());
        if let Some(group) = &details.group {
            lines.push(format!("GROUP_NUMBER: {group}"));
        }
        lines.push(format!("START_TIME: {}", details.start_time));
        lines.push(format!("END_TIME: {}", details.end_time));
        lines.push(format!("SESSION_NUMBER: {}", details.session_number));
        format!("{}\n\nSigned\n{signature}\n", lines.join("\n"))
    }
}

/// An addressed message ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: Option<String>,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Message {
    pub fn new(
        from: Option<String>,
        to: &str,
        subject: &str,
        body: String,
    ) -> Result<Self, ValidationError> {
        validate_email(to)?;
        if let Some(sender) = &from {
            validate_email(sender)?;
        }
        Ok(Self {
            from,
            to: to.to_string(),
            subject: subject.to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("adam@example.com").is_ok());
        assert!(validate_email("first.last-1@mail.uni.edu.ng").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "adam", "adam@", "@example.com", "adam@example", "adam@example.", "a b@x.io", "adam@ex ample.com"] {
            assert!(validate_email(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn template_skips_null_and_ignored_keys() {
        let bundle = ScheduleBundle::new(Vec::new())
            .with_meta("course", Some("mct543"))
            .with_meta("day", Some("Monday"))
            .with_meta("date", None::<String>)
            .with_meta("id", Some("3"));
        let template = MessageTemplate::from_bundle(&bundle, &["id".to_string()]);
        let body = template.render(
            "Ada",
            &SessionDetails {
                group: Some("group 1".into()),
                start_time: "12:00:00".into(),
                end_time: "12:30:00".into(),
                session_number: 0,
            },
            "Management",
        );

        assert_eq!(
            body,
            "Hi Ada,\n\n\
             Below is details of your Practical session\n\
             COURSE: MCT543\n\
             DAY: MONDAY\n\
             GROUP_NUMBER: group 1\n\
             START_TIME: 12:00:00\n\
             END_TIME: 12:30:00\n\
             SESSION_NUMBER: 0\n\nSigned\nManagement\n"
        );
    }

    #[test]
    fn flat_details_have_no_group_line() {
        let template = MessageTemplate::from_bundle(&ScheduleBundle::new(Vec::new()), &[]);
        let body = template.render(
            "Lin",
            &SessionDetails {
                group: None,
                start_time: "1:00:00".into(),
                end_time: "2:00:00".into(),
                session_number: 2,
            },
            "Lab",
        );
        assert!(!body.contains("GROUP_NUMBER"));
        assert!(body.contains("SESSION_NUMBER: 2"));
    }

    #[test]
    fn message_validates_recipient() {
        assert!(Message::new(None, "not-an-address", "s", String::new()).is_err());
        assert!(Message::new(Some("bad".into()), "a@x.io", "s", String::new()).is_err());
        assert!(Message::new(None, "a@x.io", "s", String::new()).is_ok());
    }
}
