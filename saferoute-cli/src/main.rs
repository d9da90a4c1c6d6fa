//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use saferoute_cli::{CliError, run};

fn main() {
    pretty_env_logger::init();
    if let Err(err) = run() {
        if let CliError::ArgumentParsing(clap_err) = &err {
            clap_err.exit();
        }
        eprintln!("saferoute: {err}");
        std::process::exit(1);
    }
}
