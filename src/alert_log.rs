use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use chrono::Local;
use crate::error::AlertError;
use crate::posting::JobPosting;

const HEADER: [&str; 6] = ["id", "title", "location", "salary", "url", "notified_at"];

/// Append-only CSV record of every alert that went out.
pub struct AlertLog {
    path: PathBuf,
}

impl AlertLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        AlertLog { path: path.as_ref().to_path_buf() }
    }

    pub fn append(&self, posting: &JobPosting) -> Result<(), AlertError> {
        let csv_err = |source: csv::Error| AlertError::AlertLog { path: self.path.clone(), source };

        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| csv_err(csv::Error::from(e)))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if !file_exists {
            writer.write_record(HEADER).map_err(csv_err)?;
        }

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        writer
            .write_record([
                posting.id.as_str(),
                posting.title.as_str(),
                posting.location.as_str(),
                posting.salary.as_deref().unwrap_or(""),
                posting.url.as_str(),
                timestamp.as_str(),
            ])
            .map_err(csv_err)?;
        writer.flush().map_err(|e| csv_err(csv::Error::from(e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = AlertLog::new(dir.path().join("alerts.csv"));
        let posting = JobPosting {
            id: "9".into(),
            title: "Analyst, Ops".into(),
            url: "https://jobs.example/9".into(),
            ..Default::default()
        };

        log.append(&posting).unwrap();
        log.append(&posting).unwrap();

        let content = fs::read_to_string(dir.path().join("alerts.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,title,location,salary,url,notified_at");
        assert!(lines[1].starts_with("9,\"Analyst, Ops\",,,https://jobs.example/9,"));
    }
}
