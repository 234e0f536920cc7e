use zonectl_domain::Config;

pub fn init_logging(config: &Config) {
    let log_level = config
        .logging
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_max_level(log_level)
        .init();

    tracing::info!(level = %config.logging.level, "logging initialized");
}
