use job_alert_lib::{job_source, logger};
use job_alert_lib::{AlertLog, BotConfig, MatchFilter, PollDriver, SeenStore, TelegramNotifier};

use std::error::Error;
use log::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting Job Alert Bot...");

    let config = BotConfig::from_env();
    info!(
        "Polling every {} seconds, at most {} alerts per cycle, seen ids in {:?}",
        config.poll_interval.as_secs(),
        config.max_alerts_per_cycle,
        config.seen_file
    );

    let source = job_source::from_config(&config.source)?;

    let notifier = match config.telegram.clone() {
        Some(credentials) => Some(TelegramNotifier::new(credentials)?),
        None => {
            warn!("BOT_TOKEN or CHAT_ID missing. Alerts will be logged but not sent.");
            None
        }
    };

    let filter = MatchFilter::new(config.filter.clone());
    let mut driver = PollDriver::new(source, notifier, filter, SeenStore::new(&config.seen_file))
        .with_max_alerts_per_cycle(config.max_alerts_per_cycle)
        .with_poll_interval(config.poll_interval);
    if let Some(path) = &config.alert_log {
        driver = driver.with_alert_log(AlertLog::new(path));
    }

    driver.run_forever()
}
