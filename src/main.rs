use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = lilacam::config::Config::parse();
    lilacam::logging::init(cfg.log_file.as_deref(), "off")?;
    lilacam::app::run(cfg)
}
