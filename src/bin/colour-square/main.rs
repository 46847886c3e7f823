use std::process::ExitCode;

use clap::Parser;

use tracing_subscriber::EnvFilter;

mod app;
mod args;
mod dialog;

use app::{App, AppError};
use args::Args;

fn main() -> ExitCode {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    init_logging(args.verbose);

    match start(&args) {
        Ok(app) => {
            app.run();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}: {e}", e.title());
            dialog::show_error(e.title(), &e.to_string());
            ExitCode::from(1)
        }
    }
}

fn start(args: &Args) -> Result<App, AppError> {
    let settings = args.settings()?;

    App::new(settings, args.seed)
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
