//! Plain-text transcript export

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::Result;
use crate::session::Message;

/// Render messages as `[timestamp] Sender: content`, separated by blank lines.
pub fn transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("[{}] {}: {}", m.timestamp, m.kind.label(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// File name for a transcript exported on `date`
pub fn file_name(date: NaiveDate) -> String {
    format!("chat-{}.txt", date.format("%Y-%m-%d"))
}

/// Write the transcript of `messages` into `dir` and return the file path
pub fn write_transcript(dir: &Path, messages: &[Message], date: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name(date));
    std::fs::write(&path, transcript(messages))?;
    info!("Exported {} messages to {}", messages.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::user("hi").with_timestamp("10:00"),
            Message::bot("hello").with_timestamp("10:00"),
        ]
    }

    #[test]
    fn test_transcript_format() {
        assert_eq!(transcript(&sample()), "[10:00] You: hi\n\n[10:00] AI: hello");
    }

    #[test]
    fn test_transcript_empty() {
        assert_eq!(transcript(&[]), "");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(file_name(date), "chat-2024-03-07.txt");
    }

    #[test]
    fn test_write_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

        let path = write_transcript(&dir.path().join("exports"), &sample(), date).unwrap();

        assert!(path.ends_with("chat-2024-03-07.txt"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, "[10:00] You: hi\n\n[10:00] AI: hello");
    }
}
