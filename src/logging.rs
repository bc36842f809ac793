use anyhow::Context;
use env_logger::{Builder, Env, Target};
use std::fs::OpenOptions;
use std::path::Path;

/// Installs the global logger. `RUST_LOG` wins over `default_filter`; with a
/// `log_file` the output is appended there instead of stderr.
pub fn init(log_file: Option<&Path>, default_filter: &str) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder.format_timestamp_millis();
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        // Log files default to debug unless RUST_LOG is set.
        if std::env::var_os("RUST_LOG").is_none() {
            builder.filter_level(log::LevelFilter::Debug);
        }
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder
        .try_init()
        .context("install logger")
}
