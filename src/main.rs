use clap::Parser;
use log::error;

use tabula_engine::cli::{self, CliParser, system_message};

fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = CliParser::parse();

    if let Err(message) = cli::run(cli) {
        error!("{}", message);
        eprintln!("{}", system_message("error", format!("{}", message)));
        std::process::exit(1);
    }
}
