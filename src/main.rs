use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use docforest::cli::args::Cli;
use docforest::cli::commands::execute_command;
use docforest::cli::output;
use docforest::config::Settings;
use docforest::errors::ForestError;
use docforest::exitcode;

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            std::process::exit(exitcode::CONFIG);
        }
    };
    settings.display.color.apply();

    if let Err(e) = execute_command(&cli, &settings) {
        output::error(&e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &ForestError) -> i32 {
    match error {
        ForestError::FileNotFound(_) | ForestError::NoInput(_) | ForestError::Io { .. } => {
            exitcode::NOINPUT
        }
        ForestError::CycleDetected(_)
        | ForestError::InvalidDirective { .. }
        | ForestError::UnknownNode { .. } => exitcode::DATAERR,
        ForestError::Config(_) => exitcode::CONFIG,
        ForestError::Serialize(_) => exitcode::SOFTWARE,
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Keep the interactive selector's internals out of the logs
    let noisy_modules = ["skim"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::ENTER)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
