pub mod alert_log;
pub mod config;
pub mod delay_manager;
pub mod error;
pub mod job_source;
pub mod logger;
pub mod match_filter;
pub mod notifier;
pub mod poll_cycle;
pub mod posting;
pub mod salary;
pub mod seen_store;

// Exporting types for convenience
pub use alert_log::AlertLog;
pub use config::{BotConfig, FilterConfig, SourceConfig};
pub use error::AlertError;
pub use job_source::{HtmlBoardSource, JobSource, JsonFeedSource};
pub use match_filter::{MatchFilter, Rejection};
pub use notifier::{Notifier, TelegramNotifier};
pub use poll_cycle::{CycleReport, PollDriver};
pub use posting::JobPosting;
pub use salary::{parse_salary, SalaryRange};
pub use seen_store::{SeenSet, SeenStore};
