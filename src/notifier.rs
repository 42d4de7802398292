use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use log::info;
use crate::config::TelegramCredentials;
use crate::error::AlertError;
use crate::posting::JobPosting;

const TELEGRAM_API: &str = "https://api.telegram.org";
// Stands in for the request url in errors and logs; the real url carries the bot token.
const SEND_TARGET: &str = "telegram sendMessage";

/// Delivers alert text to the single configured recipient.
pub trait Notifier {
    fn send(&self, text: &str) -> Result<(), AlertError>;
}

pub struct TelegramNotifier {
    client: Client,
    credentials: TelegramCredentials,
}

impl TelegramNotifier {
    pub fn new(credentials: TelegramCredentials) -> Result<Self, AlertError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| AlertError::Transport { target: SEND_TARGET.to_string(), source })?;
        Ok(TelegramNotifier { client, credentials })
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API, self.credentials.bot_token)
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, text: &str) -> Result<(), AlertError> {
        let resp = self
            .client
            .post(self.endpoint())
            .form(&[("chat_id", self.credentials.chat_id.as_str()), ("text", text)])
            .send()
            // Drop the url from the error so the token never reaches the logs.
            .map_err(|e| AlertError::Transport { target: SEND_TARGET.to_string(), source: e.without_url() })?;

        check_status(resp.status())?;
        info!("Alert delivered to chat {}", self.credentials.chat_id);
        Ok(())
    }
}

/// The Bot API answers 200 for a delivered message; anything else is a failed send.
fn check_status(status: StatusCode) -> Result<(), AlertError> {
    if status != StatusCode::OK {
        return Err(AlertError::Status { target: SEND_TARGET.to_string(), status });
    }
    Ok(())
}

/// Renders the alert text for one posting.
pub fn format_alert(posting: &JobPosting) -> String {
    let mut lines = vec!["NEW JOB:".to_string(), posting.title.clone()];
    if !posting.location.trim().is_empty() {
        lines.push(posting.location.trim().to_string());
    }
    if let Some(salary) = &posting.salary {
        lines.push(format!("Salary: {}", salary.trim()));
    }
    if !posting.url.is_empty() {
        lines.push(posting.url.clone());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ok_counts_as_delivered() {
        assert!(check_status(StatusCode::OK).is_ok());
        for status in [StatusCode::CREATED, StatusCode::NO_CONTENT, StatusCode::BAD_REQUEST,
                       StatusCode::TOO_MANY_REQUESTS, StatusCode::BAD_GATEWAY] {
            match check_status(status) {
                Err(AlertError::Status { status: got, target }) => {
                    assert_eq!(got, status);
                    assert!(!target.contains("/bot"));
                }
                other => panic!("expected status error for {}, got {:?}", status, other),
            }
        }
    }

    #[test]
    fn alert_lists_optional_lines_only_when_present() {
        let mut posting = JobPosting {
            id: "7".into(),
            title: "Project Coordinator".into(),
            url: "https://jobs.example/7".into(),
            ..Default::default()
        };
        assert_eq!(format_alert(&posting), "NEW JOB:\nProject Coordinator\nhttps://jobs.example/7");

        posting.location = "India ".into();
        posting.salary = Some("3 LPA".into());
        assert_eq!(
            format_alert(&posting),
            "NEW JOB:\nProject Coordinator\nIndia\nSalary: 3 LPA\nhttps://jobs.example/7"
        );
    }
}
