use std::time::Duration;
use log::{debug, error, info, warn};
use crate::alert_log::AlertLog;
use crate::delay_manager;
use crate::error::AlertError;
use crate::job_source::JobSource;
use crate::match_filter::MatchFilter;
use crate::notifier::{format_alert, Notifier};
use crate::seen_store::{SeenSet, SeenStore};

/// Tally of one fetch-filter-notify-persist pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub already_seen: usize,
    pub rejected: usize,
    pub matched: usize,
    pub notified: usize,
    pub failed: usize,
    /// Matches left for a later cycle: sending disabled or the per-cycle cap hit.
    pub deferred: usize,
}

/// Runs poll cycles against one source, one notifier and one seen file.
pub struct PollDriver<S: JobSource, N: Notifier> {
    source: S,
    notifier: Option<N>,
    filter: MatchFilter,
    seen_store: SeenStore,
    alert_log: Option<AlertLog>,
    max_alerts_per_cycle: usize,
    poll_interval: Duration,
}

impl<S: JobSource, N: Notifier> PollDriver<S, N> {
    pub fn new(source: S, notifier: Option<N>, filter: MatchFilter, seen_store: SeenStore) -> Self {
        PollDriver {
            source,
            notifier,
            filter,
            seen_store,
            alert_log: None,
            max_alerts_per_cycle: 3,
            poll_interval: Duration::from_secs(300),
        }
    }

    pub fn with_alert_log(mut self, alert_log: AlertLog) -> Self {
        self.alert_log = Some(alert_log);
        self
    }

    pub fn with_max_alerts_per_cycle(mut self, max: usize) -> Self {
        self.max_alerts_per_cycle = max;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// One pass. Only a failed fetch aborts the cycle; every other failure is
    /// logged and the cycle carries on.
    pub fn run_cycle(&mut self) -> Result<CycleReport, AlertError> {
        let postings = self.source.fetch()?;
        let mut report = CycleReport { fetched: postings.len(), ..Default::default() };

        let mut seen = match self.seen_store.load() {
            Ok(seen) => seen,
            Err(e) => {
                error!("{}. Continuing with an empty seen set.", e);
                SeenSet::new()
            }
        };

        if self.notifier.is_none() {
            warn!("BOT_TOKEN or CHAT_ID not set; matches will not be sent.");
        }

        for posting in &postings {
            if seen.contains(&posting.id) {
                report.already_seen += 1;
                continue;
            }
            if let Err(reason) = self.filter.evaluate(posting) {
                debug!("Rejected '{}' ({}): {}", posting.title, posting.id, reason);
                report.rejected += 1;
                continue;
            }
            report.matched += 1;

            let Some(notifier) = &self.notifier else {
                report.deferred += 1;
                continue;
            };
            if report.notified >= self.max_alerts_per_cycle {
                report.deferred += 1;
                continue;
            }

            match notifier.send(&format_alert(posting)) {
                Ok(()) => {
                    info!("Notified: {} ({})", posting.title, posting.id);
                    seen.insert(posting.id.clone());
                    report.notified += 1;
                    if let Some(log) = &self.alert_log {
                        if let Err(e) = log.append(posting) {
                            warn!("{}", e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to notify '{}' ({}): {}", posting.title, posting.id, e);
                    report.failed += 1;
                }
            }
        }

        if let Err(e) = self.seen_store.save(&seen) {
            error!("{}", e);
        }
        Ok(report)
    }

    /// Polls forever. Errors end the current cycle, never the loop.
    pub fn run_forever(&mut self) -> ! {
        loop {
            match self.run_cycle() {
                Ok(report) => info!(
                    "Cycle done: {} fetched, {} already seen, {} rejected, {} matched, {} notified, {} failed, {} deferred",
                    report.fetched,
                    report.already_seen,
                    report.rejected,
                    report.matched,
                    report.notified,
                    report.failed,
                    report.deferred
                ),
                Err(e) => error!("Cycle skipped: {}", e),
            }
            delay_manager::wait_for_next_cycle(self.poll_interval);
        }
    }
}
