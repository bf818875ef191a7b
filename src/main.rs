mod app;

use clap::Parser;

use app::cli::Cli;
use app::error::exit_code_for;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose() { "warn,ue_tidy=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Err(err) = app::run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(exit_code_for(&err));
    }
}
