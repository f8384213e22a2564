mod commands;
mod ops;
mod reports;

use clap::Parser;
use eyre::Result;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use crate::commands::Cli;

/// Install a stderr subscriber when `MOCKGEN_LOG` is set.
fn init_tracing() {
    let Ok(filter) = EnvFilter::try_from_env("MOCKGEN_LOG") else {
        return;
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("MOCKGEN_LOG_STYLE").is_ok_and(|style| style == "full") {
        builder
            .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
            .with_target(true)
            .init();
    } else {
        builder.with_target(false).without_time().init();
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    Cli::parse().run()
}
