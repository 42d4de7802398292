use std::path::PathBuf;
use std::time::Duration;
use log::warn;
use serde::Serialize;

pub const DEFAULT_FEED_URL: &str = "https://remotive.com/api/remote-jobs";
pub const DEFAULT_BOARD_URL: &str = "https://www.indeed.com";

/// Matching criteria handed to [`crate::MatchFilter::new`].
#[derive(Debug, Clone, Serialize)]
pub struct FilterConfig {
    pub title_keywords: Vec<String>,
    pub location_keywords: Vec<String>,
    pub zero_experience_terms: Vec<String>,
    pub exclusion_terms: Vec<String>,
    pub min_inr: u64,
    pub max_inr: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            title_keywords: strings(&[
                "project coordinator", "project associate", "program coordinator",
                "operations associate", "operations executive", "business analyst",
                "pmo", "scrum",
            ]),
            location_keywords: strings(&["remote", "india", "anywhere", "worldwide", "asia"]),
            zero_experience_terms: strings(&[
                "fresher", "entry level", "entry-level", "graduate", "trainee",
                "no experience",
            ]),
            exclusion_terms: strings(&[
                "senior", "sr.", "lead", "manager", "intern", "volunteer",
                "unpaid", "contractor", "freelance",
            ]),
            min_inr: 200_000,
            max_inr: 1_200_000,
        }
    }
}

/// Where postings come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SourceConfig {
    /// JSON API answering `{ "jobs": [...] }`.
    JsonFeed { url: String },
    /// HTML search results page; links are resolved against `base_url`.
    HtmlBoard { url: String, base_url: String },
}

impl SourceConfig {
    pub fn json_feed(search: &str) -> Self {
        SourceConfig::JsonFeed {
            url: format!("{}?search={}", DEFAULT_FEED_URL, urlencoding::encode(search)),
        }
    }

    pub fn html_board(query: &str, location: &str) -> Self {
        SourceConfig::HtmlBoard {
            url: format!(
                "{}/jobs?q={}&l={}",
                DEFAULT_BOARD_URL,
                urlencoding::encode(query),
                urlencoding::encode(location)
            ),
            base_url: DEFAULT_BOARD_URL.to_string(),
        }
    }
}

/// Bot API credentials. Both values are needed to send anything.
#[derive(Debug, Clone, Serialize)]
pub struct TelegramCredentials {
    #[serde(skip)]
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BotConfig {
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub telegram: Option<TelegramCredentials>,
    pub seen_file: PathBuf,
    pub alert_log: Option<PathBuf>,
    pub poll_interval: Duration,
    pub max_alerts_per_cycle: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            source: SourceConfig::json_feed("project coordinator"),
            filter: FilterConfig::default(),
            telegram: None,
            seen_file: PathBuf::from("seen.json"),
            alert_log: Some(PathBuf::from("alerts.csv")),
            poll_interval: Duration::from_secs(300),
            max_alerts_per_cycle: 3,
        }
    }
}

impl BotConfig {
    /// Defaults plus `BOT_TOKEN`, `CHAT_ID` and `JOB_SOURCE` from the
    /// environment (a `.env` file is read first when present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = BotConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        config.telegram = match (non_empty("BOT_TOKEN"), non_empty("CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramCredentials { bot_token, chat_id }),
            _ => None,
        };

        match non_empty("JOB_SOURCE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("json") => {}
            Some("html") => config.source = SourceConfig::html_board("project coordinator", "remote"),
            Some(other) => warn!("Unknown JOB_SOURCE '{}', using the JSON feed.", other),
        }

        config
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> BotConfig {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        BotConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn credentials_need_both_values() {
        assert!(config_from(&[("BOT_TOKEN", "123:abc")]).telegram.is_none());
        assert!(config_from(&[("BOT_TOKEN", "123:abc"), ("CHAT_ID", " ")]).telegram.is_none());

        let config = config_from(&[("BOT_TOKEN", "123:abc"), ("CHAT_ID", "-10042")]);
        let telegram = config.telegram.unwrap();
        assert_eq!(telegram.bot_token, "123:abc");
        assert_eq!(telegram.chat_id, "-10042");
    }

    #[test]
    fn job_source_selects_board() {
        let config = config_from(&[("JOB_SOURCE", "HTML")]);
        assert_eq!(
            config.source,
            SourceConfig::HtmlBoard {
                url: "https://www.indeed.com/jobs?q=project%20coordinator&l=remote".to_string(),
                base_url: DEFAULT_BOARD_URL.to_string(),
            }
        );
        assert!(matches!(config_from(&[]).source, SourceConfig::JsonFeed { .. }));
        assert!(matches!(config_from(&[("JOB_SOURCE", "rss")]).source, SourceConfig::JsonFeed { .. }));
    }

    #[test]
    fn token_is_not_serialized() {
        let config = config_from(&[("BOT_TOKEN", "123:secret"), ("CHAT_ID", "7")]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
