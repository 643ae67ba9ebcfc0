//! # Widget Canvas
//!
//! Command-line entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use widget_cli::{run, CliArgs, CliConfig};

/// Initialize tracing on stderr so stdout carries only command output.
///
/// Set `RUST_LOG` to control log levels (default: warn, or
/// info,widget_core=debug,widget_cli=debug with `--verbose`).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,widget_core=debug,widget_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let command = args.command.clone();
    let config = CliConfig::from(args);
    tracing::debug!("Data directory: {}", config.data_dir.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&config, command, &mut out)
}
