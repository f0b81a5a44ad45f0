//! Thin `env_logger` bootstrap for the demo binary (§1.2: only the CLI
//! ever initializes a logger — the library crates just emit through the
//! `log` facade).

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
