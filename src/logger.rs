use log::LevelFilter;
use env_logger::Builder;
use std::io::Write;
use chrono::Local;

/// Installs the global logger. `RUST_LOG` overrides the default `info` level.
pub fn init() {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // Tests may call init more than once.
    if builder.try_init().is_ok() {
        log::info!("Logger initialized.");
    }
}
