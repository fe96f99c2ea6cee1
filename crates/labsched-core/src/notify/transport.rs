//! Message delivery backends.

use std::io::Write;
use std::path::PathBuf;

use super::message::Message;
use crate::error::NotifyError;

/// Hands a composed message to some delivery mechanism.
pub trait Transport {
    /// Short identifier used in logs (e.g. "outbox", "stdout").
    fn name(&self) -> &str;

    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError>;
}

fn render(message: &Message) -> String {
    let mut out = String::new();
    if let Some(from) = &message.from {
        out.push_str(&format!("From: {from}\n"));
    }
    out.push_str(&format!("To: {}\n", message.to));
    out.push_str(&format!("Subject: {}\n\n", message.subject));
    out.push_str(&message.body);
    out
}

/// Writes one text file per message into a directory.
pub struct OutboxTransport {
    dir: PathBuf,
    sequence: usize,
}

impl OutboxTransport {
    /// Create the outbox directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, NotifyError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let sequence = std::fs::read_dir(&dir)?.count();
        Ok(Self { dir, sequence })
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl Transport for OutboxTransport {
    fn name(&self) -> &str {
        "outbox"
    }

    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
        self.sequence += 1;
        let stem: String = message
            .to
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        let path = self.dir.join(format!("{:05}-{stem}.txt", self.sequence));
        std::fs::write(&path, render(message)).map_err(|e| NotifyError::DeliveryFailed {
            recipient: message.to.clone(),
            message: format!("{}: {e}", path.display()),
        })
    }
}

/// Prints messages to standard output, separated by a rule.
#[derive(Default)]
pub struct StdoutTransport;

impl Transport for StdoutTransport {
    fn name(&self) -> &str {
        "stdout"
    }

    fn deliver(&mut self, message: &Message) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", "=".repeat(60))?;
        write!(stdout, "{}", render(message))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn message(to: &str) -> Message {
        Message::new(Some("office@uni.edu".into()), to, "LAB SCHEDULE", "Hi\n".into()).unwrap()
    }

    #[test]
    fn outbox_writes_one_file_per_message() {
        let dir = TempDir::new().unwrap();
        let mut outbox = OutboxTransport::open(dir.path().join("outbox")).unwrap();
        outbox.deliver(&message("a@x.io")).unwrap();
        outbox.deliver(&message("b@x.io")).unwrap();

        let mut files: Vec<_> = std::fs::read_dir(outbox.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(files, vec!["00001-a_x.io.txt", "00002-b_x.io.txt"]);

        let content = std::fs::read_to_string(outbox.dir().join("00001-a_x.io.txt")).unwrap();
        assert_eq!(content, "From: office@uni.edu\nTo: a@x.io\nSubject: LAB SCHEDULE\n\nHi\n");
    }

    #[test]
    fn outbox_continues_numbering() {
        let dir = TempDir::new().unwrap();
        OutboxTransport::open(dir.path()).unwrap().deliver(&message("a@x.io")).unwrap();
        let mut again = OutboxTransport::open(dir.path()).unwrap();
        again.deliver(&message("a@x.io")).unwrap();
        assert!(dir.path().join("00002-a_x.io.txt").exists());
    }
}
