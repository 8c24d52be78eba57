use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tradesim::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install log subscriber: {e}");
    }

    run(cli)
}
