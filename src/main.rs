use std::{path::PathBuf, process::ExitCode};

use book_catalog::start_repl;
use clap::Parser;
use env_logger::Env;
use log::error;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optionally, sets the catalog file to use
    #[arg(short, long, value_name = "FILE", default_value = "data/books.json")]
    file: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match start_repl(cli.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
