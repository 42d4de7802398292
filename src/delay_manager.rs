use std::time::Duration;
use std::thread;
use log::info;

/// Blocks until the next poll cycle is due.
pub fn wait_for_next_cycle(interval: Duration) {
    info!("Waiting for {} seconds (Poll Interval)...", interval.as_secs());
    thread::sleep(interval);
}
